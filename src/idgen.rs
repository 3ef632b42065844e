use crate::db;
use crate::error::AppError;

pub const PROJECT_PREFIX: &str = "HL_B_";
pub const PROJECT_WIDTH: usize = 3;

pub const EMPLOYEE_PREFIX: &str = "DT-UAO-";
pub const EMPLOYEE_WIDTH: usize = 6;

/// Advisory lock keys serializing identifier allocation. Two requests
/// reading the same sequence tail would otherwise mint the same id and
/// collide on the unique constraint.
pub const PROJECT_SEQ_LOCK: i64 = 1;
pub const EMPLOYEE_SEQ_LOCK: i64 = 2;

pub async fn acquire_seq_lock<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    key: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(key)
        .execute(executor)
        .await?;
    Ok(())
}

/// Next identifier in a prefixed, zero-padded sequence. `last` is the
/// highest existing identifier, or None when the sequence is empty.
///
/// A non-numeric stored suffix is a hard configuration error: downstream
/// uniqueness depends on monotonic numbering, so it must surface rather
/// than be swallowed.
pub fn next_in_sequence(
    last: Option<&str>,
    prefix: &str,
    width: usize,
) -> Result<String, AppError> {
    let Some(last) = last else {
        return Ok(format!("{prefix}{:0width$}", 1, width = width));
    };

    let suffix = last.rsplit(['_', '-']).next().unwrap_or(last);
    let n: u64 = suffix.parse().map_err(|_| {
        AppError::Internal(format!(
            "Stored identifier '{last}' has a non-numeric suffix; sequence cannot advance"
        ))
    })?;

    Ok(format!("{prefix}{:0width$}", n + 1, width = width))
}

/// Must be called inside a transaction holding `PROJECT_SEQ_LOCK`.
pub async fn next_project_name<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
) -> Result<String, AppError> {
    let last = db::projects::last_project_name(executor).await?;
    next_in_sequence(last.as_deref(), PROJECT_PREFIX, PROJECT_WIDTH)
}

/// Must be called inside a transaction holding `EMPLOYEE_SEQ_LOCK`.
pub async fn next_employee_code<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
) -> Result<String, AppError> {
    let last = db::users::last_employee_code(executor).await?;
    next_in_sequence(last.as_deref(), EMPLOYEE_PREFIX, EMPLOYEE_WIDTH)
}
