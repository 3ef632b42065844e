use uuid::Uuid;

use crate::models::Image;

pub async fn list_filenames<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT filename FROM images")
        .fetch_all(executor)
        .await
}

pub async fn insert_unassigned<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    filename: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO images (filename) VALUES ($1)")
        .bind(filename)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn count_unassigned<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
) -> Result<i64, sqlx::Error> {
    let row: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM images WHERE status = 'unassigned'")
            .fetch_one(executor)
            .await?;
    Ok(row.0)
}

/// Oldest-first slice of the unassigned pool. Callers serialize via the
/// assignment advisory lock, so no row locking is needed here.
pub async fn select_unassigned<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    limit: i64,
) -> Result<Vec<Image>, sqlx::Error> {
    sqlx::query_as::<_, Image>(
        "SELECT * FROM images WHERE status = 'unassigned' ORDER BY discovered_at LIMIT $1",
    )
    .bind(limit)
    .fetch_all(executor)
    .await
}

pub async fn mark_assigned<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE images SET status = 'assigned' WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(())
}
