use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use crate::models::{RawRecord, SavedInputRecord};

/// Errors that can occur when interacting with the saved-input store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),
}

/// SQLite store for submitted inputs
///
/// Every successfully scored record is appended verbatim so it can be used
/// for retraining later. Inference never reads from this table.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `database_url`
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(options)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// In-memory store; a single connection so every query sees the same database
    pub async fn in_memory() -> Result<Self, StoreError> {
        Self::new("sqlite::memory:", 1).await
    }

    /// Create a store from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Opening saved-input store at {}", url);
        Self::new(url, max_connections.unwrap_or(5)).await
    }

    /// Append a submitted record and return it with its assigned id
    pub async fn save(&self, record: &RawRecord) -> Result<SavedInputRecord, StoreError> {
        let query = r#"
            INSERT INTO saved_inputs (
                hours_studied, attendance, parental_involvement, access_to_resources,
                extracurricular_activities, sleep_hours, previous_scores, motivation_level,
                internet_access, tutoring_sessions, family_income, teacher_quality,
                school_type, peer_influence, physical_activity, learning_disabilities,
                parental_education_level, distance_from_home, gender
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id, created_at
        "#;

        let row = sqlx::query(query)
            .bind(record.hours_studied)
            .bind(record.attendance)
            .bind(&record.parental_involvement)
            .bind(&record.access_to_resources)
            .bind(record.extracurricular_activities)
            .bind(record.sleep_hours)
            .bind(record.previous_scores)
            .bind(&record.motivation_level)
            .bind(record.internet_access)
            .bind(record.tutoring_sessions)
            .bind(&record.family_income)
            .bind(&record.teacher_quality)
            .bind(&record.school_type)
            .bind(&record.peer_influence)
            .bind(record.physical_activity)
            .bind(record.learning_disabilities)
            .bind(&record.parental_education_level)
            .bind(&record.distance_from_home)
            .bind(&record.gender)
            .fetch_one(&self.pool)
            .await?;

        let saved = SavedInputRecord {
            id: row.try_get("id")?,
            created_at: row.try_get("created_at")?,
            record: record.clone(),
        };

        tracing::debug!("Saved input record {}", saved.id);

        Ok(saved)
    }

    /// Number of stored records
    pub async fn count(&self) -> Result<i64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM saved_inputs")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("total")?)
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> RawRecord {
        RawRecord {
            hours_studied: 12.5,
            attendance: 91,
            parental_involvement: "Medium".to_string(),
            access_to_resources: "High".to_string(),
            extracurricular_activities: false,
            sleep_hours: 8.0,
            previous_scores: 64,
            motivation_level: "Low".to_string(),
            internet_access: true,
            tutoring_sessions: 0,
            family_income: "High".to_string(),
            teacher_quality: "Medium".to_string(),
            school_type: "Private".to_string(),
            peer_influence: "Neutral".to_string(),
            physical_activity: 4,
            learning_disabilities: true,
            parental_education_level: "Postgraduate".to_string(),
            distance_from_home: "Far".to_string(),
            gender: "Male".to_string(),
        }
    }

    #[tokio::test]
    async fn test_save_assigns_increasing_ids() {
        let store = SqliteStore::in_memory().await.unwrap();

        let first = store.save(&sample_record()).await.unwrap();
        let second = store.save(&sample_record()).await.unwrap();

        assert!(second.id > first.id);
        assert_eq!(first.record, sample_record());
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_stored_columns_match_record() {
        let store = SqliteStore::in_memory().await.unwrap();
        let saved = store.save(&sample_record()).await.unwrap();

        let row = sqlx::query("SELECT * FROM saved_inputs WHERE id = ?")
            .bind(saved.id)
            .fetch_one(&store.pool)
            .await
            .unwrap();

        assert_eq!(row.get::<f64, _>("hours_studied"), 12.5);
        assert_eq!(row.get::<i64, _>("attendance"), 91);
        assert!(row.get::<bool, _>("learning_disabilities"));
        assert_eq!(row.get::<String, _>("parental_education_level"), "Postgraduate");
        assert_eq!(row.get::<String, _>("gender"), "Male");
    }

    #[tokio::test]
    async fn test_health_check() {
        let store = SqliteStore::in_memory().await.unwrap();
        assert!(store.health_check().await.unwrap());
    }
}
