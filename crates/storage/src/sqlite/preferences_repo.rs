use async_trait::async_trait;
use chrono::Utc;

use quiz_core::model::QuizPreferences;

use crate::repository::{PreferencesRecord, QuizPreferencesRepository, StorageError};

use super::SqliteRepository;
use super::mapping::map_preferences_row;

/// The preferences table holds a single row.
const PREFERENCES_ROW_ID: i64 = 1;

#[async_trait]
impl QuizPreferencesRepository for SqliteRepository {
    async fn get_preferences(&self) -> Result<Option<QuizPreferences>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT class_level, catalog_base_url
            FROM quiz_preferences
            WHERE id = ?1
            ",
        )
        .bind(PREFERENCES_ROW_ID)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        map_preferences_row(&row)?.into_preferences().map(Some)
    }

    async fn save_preferences(&self, preferences: &QuizPreferences) -> Result<(), StorageError> {
        let record = PreferencesRecord::from_preferences(preferences);
        sqlx::query(
            r"
            INSERT INTO quiz_preferences (id, class_level, catalog_base_url, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(id) DO UPDATE SET
                class_level = excluded.class_level,
                catalog_base_url = excluded.catalog_base_url,
                updated_at = excluded.updated_at
            ",
        )
        .bind(PREFERENCES_ROW_ID)
        .bind(record.class_level)
        .bind(record.catalog_base_url)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }
}
