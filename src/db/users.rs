use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::models::{BankDetails, User, UserRole, UserStatus};

pub async fn create<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    employee_code: &str,
    name: &str,
    email: &str,
    password_hash: &str,
    role: UserRole,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "INSERT INTO users (employee_code, name, email, password_hash, role)
         VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(employee_code)
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .fetch_one(executor)
    .await
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_id<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    id: Uuid,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn count_all<'e, E: sqlx::PgExecutor<'e>>(executor: E) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(executor)
        .await?;
    Ok(row.0)
}

/// Tail of the employee-code sequence. Length-first ordering keeps the
/// comparison numeric once a counter outgrows its zero padding.
pub async fn last_employee_code<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        "SELECT employee_code FROM users
         ORDER BY length(employee_code) DESC, employee_code DESC LIMIT 1",
    )
    .fetch_optional(executor)
    .await
}

pub async fn list_active_employees(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT * FROM users WHERE role = 'employee' AND status = 'active' ORDER BY name",
    )
    .fetch_all(pool)
    .await
}

pub async fn update_status(
    pool: &PgPool,
    id: Uuid,
    status: UserStatus,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET status = $2 WHERE id = $1")
        .bind(id)
        .bind(status)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn touch_last_login(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET last_login = now() WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn update_password(
    pool: &PgPool,
    id: Uuid,
    password_hash: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn update_profile(
    pool: &PgPool,
    id: Uuid,
    phone_number: Option<&str>,
    gender: Option<&str>,
    date_of_birth: Option<chrono::NaiveDate>,
    designation: Option<&str>,
    bank_details: &BankDetails,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE users SET phone_number = $2, gender = $3, date_of_birth = $4,
         designation = $5, bank_details = $6 WHERE id = $1",
    )
    .bind(id)
    .bind(phone_number)
    .bind(gender)
    .bind(date_of_birth)
    .bind(designation)
    .bind(Json(bank_details))
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn set_profile_picture(
    pool: &PgPool,
    id: Uuid,
    filename: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET profile_picture = $2 WHERE id = $1")
        .bind(id)
        .bind(filename)
        .execute(pool)
        .await?;
    Ok(())
}

/// Additive wallet credit. Runs inside the finalize transaction so the
/// balance and the project status always move together.
pub async fn credit_wallet<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    id: Uuid,
    amount: Decimal,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET wallet_balance = wallet_balance + $2 WHERE id = $1")
        .bind(id)
        .bind(amount)
        .execute(executor)
        .await?;
    Ok(())
}
