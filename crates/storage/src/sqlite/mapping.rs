use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::{PreferencesRecord, StorageError};

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn map_preferences_row(row: &SqliteRow) -> Result<PreferencesRecord, StorageError> {
    let class_level: String = row.try_get("class_level").map_err(ser)?;
    let catalog_base_url: Option<String> = row.try_get("catalog_base_url").map_err(ser)?;
    Ok(PreferencesRecord {
        class_level,
        catalog_base_url,
    })
}
