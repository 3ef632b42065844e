use sqlx::PgPool;

use crate::models::Inquiry;

pub async fn create(
    pool: &PgPool,
    name: &str,
    email: &str,
    mobile_number: Option<&str>,
    message: &str,
) -> Result<Inquiry, sqlx::Error> {
    sqlx::query_as::<_, Inquiry>(
        "INSERT INTO inquiries (name, email, mobile_number, message)
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(name)
    .bind(email)
    .bind(mobile_number)
    .bind(message)
    .fetch_one(pool)
    .await
}

pub async fn list(pool: &PgPool) -> Result<Vec<Inquiry>, sqlx::Error> {
    sqlx::query_as::<_, Inquiry>("SELECT * FROM inquiries ORDER BY submitted_at DESC")
        .fetch_all(pool)
        .await
}
