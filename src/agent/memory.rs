use std::path::PathBuf;

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Row, Sqlite,
};
use tokio::sync::OnceCell;
use tracing::debug;

use crate::config::Config;
use crate::error::{VoiceError, VoiceResult};

/// Append-only archive of captured assistant responses.
///
/// The connection is opened lazily on the first write, so a missing or
/// unwritable database never affects startup. Must be constructed inside a
/// tokio runtime, the pool spawns its maintenance task on creation.
#[derive(Debug)]
pub struct ResponseStore {
    pool: Pool<Sqlite>,
    db_path: PathBuf,
    enabled: bool,
    schema: OnceCell<()>,
}

impl ResponseStore {
    pub fn new(config: &Config) -> Self {
        let options = SqliteConnectOptions::new()
            .filename(&config.db_path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_lazy_with(options);

        Self {
            pool,
            db_path: config.db_path.clone(),
            enabled: config.save_responses,
            schema: OnceCell::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Persist one response. Failures are swallowed.
    pub async fn store(&self, content: &str) {
        if !self.enabled || content.trim().is_empty() {
            return;
        }

        if let Err(e) = self.insert(content).await {
            debug!("Response not stored: {}", e);
        }
    }

    async fn insert(&self, content: &str) -> VoiceResult<()> {
        self.ensure_schema().await?;

        sqlx::query("INSERT INTO responses (content) VALUES (?)")
            .bind(content)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn ensure_schema(&self) -> VoiceResult<()> {
        self.schema
            .get_or_try_init(|| async {
                if let Some(parent) = self.db_path.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }

                sqlx::query(
                    "CREATE TABLE IF NOT EXISTS responses (
                        id INTEGER PRIMARY KEY AUTOINCREMENT,
                        content TEXT NOT NULL,
                        created_at DATETIME DEFAULT CURRENT_TIMESTAMP
                    )",
                )
                .execute(&self.pool)
                .await?;
                Ok::<(), VoiceError>(())
            })
            .await?;
        Ok(())
    }

    /// Most recent responses, oldest first.
    pub async fn recent(&self, limit: i64) -> VoiceResult<Vec<String>> {
        self.ensure_schema().await?;

        let rows = sqlx::query("SELECT content FROM responses ORDER BY id DESC LIMIT ?")
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        let mut contents: Vec<String> = rows.iter().map(|row| row.get("content")).collect();
        contents.reverse();
        Ok(contents)
    }

    pub async fn count(&self) -> VoiceResult<i64> {
        self.ensure_schema().await?;

        let row = sqlx::query("SELECT COUNT(*) AS n FROM responses")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("n"))
    }
}
