use std::collections::HashSet;
use std::path::Path;

use sqlx::PgPool;

use crate::db;
use crate::error::AppError;

/// Reconcile the pending-uploads directory with the image catalog: any
/// file on disk that the catalog does not know yet is inserted as
/// `unassigned`. Idempotent, so it runs on every admin dashboard load.
/// Catalog rows whose files were deleted from disk are retained.
///
/// Returns the number of newly discovered files.
pub async fn reconcile(pool: &PgPool, dir: &Path) -> Result<usize, AppError> {
    tokio::fs::create_dir_all(dir).await.map_err(|e| {
        AppError::Internal(format!("Cannot create upload dir {}: {e}", dir.display()))
    })?;

    let mut on_disk = HashSet::new();
    let mut entries = tokio::fs::read_dir(dir).await.map_err(|e| {
        AppError::Internal(format!("Cannot read upload dir {}: {e}", dir.display()))
    })?;
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| AppError::Internal(format!("Upload dir scan failed: {e}")))?
    {
        let is_file = entry.file_type().await.map(|t| t.is_file()).unwrap_or(false);
        if !is_file {
            continue;
        }
        if let Ok(name) = entry.file_name().into_string() {
            on_disk.insert(name);
        }
    }

    let known: HashSet<String> = db::images::list_filenames(pool).await?.into_iter().collect();

    let mut tx = pool.begin().await?;
    let mut discovered = 0usize;
    for filename in on_disk.difference(&known) {
        db::images::insert_unassigned(&mut *tx, filename).await?;
        discovered += 1;
    }
    tx.commit().await?;

    if discovered > 0 {
        tracing::info!("Image pool: cataloged {discovered} new file(s)");
    }
    Ok(discovered)
}
