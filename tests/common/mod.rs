use std::net::SocketAddr;
use std::path::PathBuf;

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use dems::config::Config;

/// A running test server instance with a dedicated test database and
/// throwaway upload directories.
pub struct TestApp {
    pub addr: SocketAddr,
    pub pool: PgPool,
    pub client: Client,
    pub db_name: String,
    pub upload_dir: PathBuf,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Register the bootstrap admin, return the auth body + status.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/v1/auth/register"))
            .json(&json!({ "name": name, "email": email, "password": password }))
            .send()
            .await
            .expect("register request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn login(&self, email: &str, password: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/v1/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("login request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Register the bootstrap admin, return its access token.
    pub async fn bootstrap_admin(&self) -> String {
        let (body, status) = self.register("Admin", "admin@test.com", "password123").await;
        assert_eq!(status, StatusCode::OK, "bootstrap register failed: {body}");
        body["access_token"].as_str().unwrap().to_string()
    }

    /// Create an employee account, return the employee JSON.
    pub async fn create_employee(
        &self,
        admin_token: &str,
        name: &str,
        email: &str,
        password: &str,
    ) -> Value {
        let (body, status) = self
            .post_auth(
                "/api/v1/admin/employees",
                admin_token,
                &json!({ "name": name, "email": email, "password": password }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create employee failed: {body}");
        body["employee"].clone()
    }

    /// Insert `count` catalog images directly, already unassigned.
    pub async fn seed_images(&self, count: usize) {
        for _ in 0..count {
            let filename = format!("scan_{}.png", Uuid::now_v7().simple());
            sqlx::query("INSERT INTO images (filename) VALUES ($1)")
                .bind(&filename)
                .execute(&self.pool)
                .await
                .expect("seed image failed");
        }
    }

    pub async fn assign(
        &self,
        admin_token: &str,
        employee_id: &str,
        task_count: i64,
        cost: &str,
        expiry_days: i64,
    ) -> (Value, StatusCode) {
        self.post_auth(
            "/api/v1/admin/assignments",
            admin_token,
            &json!({
                "employee_id": employee_id,
                "task_count": task_count,
                "cost": cost,
                "security_deposit": "0.00",
                "expiry_days": expiry_days,
            }),
        )
        .await
    }

    /// Push a project's expiry into the past, bypassing the API.
    pub async fn expire_project(&self, project_id: &str) {
        let id = Uuid::parse_str(project_id).unwrap();
        sqlx::query("UPDATE projects SET expiry_date = now() - interval '1 day' WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .expect("expire project failed");
    }

    pub async fn wallet_balance(&self, user_id: &str) -> String {
        let id = Uuid::parse_str(user_id).unwrap();
        sqlx::query_scalar::<_, String>("SELECT wallet_balance::text FROM users WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .expect("wallet balance query failed")
    }

    pub async fn count_images(&self, status: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM images WHERE status = '{status}'"
        ))
        .fetch_one(&self.pool)
        .await
        .expect("image count query failed")
    }

    pub async fn count_rows(&self, table: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await
            .expect("row count query failed")
    }

    pub async fn get_auth(&self, path: &str, token: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("get request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn post_auth(&self, path: &str, token: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("post request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn put_auth(&self, path: &str, token: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .put(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("put request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }
}

/// Spawn a test app with a fresh temporary database and upload dirs.
pub async fn spawn_app() -> TestApp {
    let _ = dotenvy::dotenv();

    let base_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");

    let suffix = Uuid::now_v7().simple().to_string();
    let db_name = format!("dems_test_{suffix}");

    // Connect to default postgres DB to create the test DB
    let admin_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/postgres"))
        .unwrap_or_else(|| base_url.clone());

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url)
        .await
        .expect("Failed to connect to postgres for test DB creation");

    sqlx::query(&format!("CREATE DATABASE \"{db_name}\""))
        .execute(&admin_pool)
        .await
        .expect("Failed to create test database");

    admin_pool.close().await;

    let test_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/{db_name}"))
        .unwrap_or_else(|| base_url.clone());

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&test_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations on test database");

    let upload_dir = std::env::temp_dir().join(format!("dems_test_{suffix}_pending"));
    let avatar_dir = std::env::temp_dir().join(format!("dems_test_{suffix}_avatars"));
    std::fs::create_dir_all(&upload_dir).expect("Failed to create test upload dir");
    std::fs::create_dir_all(&avatar_dir).expect("Failed to create test avatar dir");

    let config = Config {
        database_url: test_url,
        jwt_secret: "test-jwt-secret-that-is-long-enough".to_string(),
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to a random port
        upload_dir: upload_dir.clone(),
        avatar_dir,
        max_body_size: 5_242_880,
        log_level: "warn".to_string(),
    };

    let app = dems::build_app(pool.clone(), config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    let client = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        addr,
        pool,
        client,
        db_name,
        upload_dir,
    }
}

/// Drop the test database after tests complete.
pub async fn cleanup(app: TestApp) {
    let db_name = app.db_name.clone();
    let _ = std::fs::remove_dir_all(&app.upload_dir);
    app.pool.close().await;

    let base_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");
    let admin_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/postgres"))
        .unwrap_or_else(|| base_url.clone());

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url)
        .await
        .expect("Failed to connect for cleanup");

    let _ = sqlx::query(&format!("DROP DATABASE IF EXISTS \"{db_name}\" WITH (FORCE)"))
        .execute(&admin_pool)
        .await;

    admin_pool.close().await;
}
