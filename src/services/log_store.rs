//! services/log_store.rs
//! Persistencia de `message_logs`. Una conexión por operación, se cierra al terminar.

use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteRow};
use sqlx::{ConnectOptions, Connection, Row};

use crate::config::app_config::StoreConfig;
use crate::models::log_model::{LogRecord, NewLogRecord, TIMESTAMP_FORMAT};

const CREATE_TABLE_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS message_logs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        country_code VARCHAR(5),
        phone_number VARCHAR(15),
        file_type VARCHAR(20),
        message TEXT,
        file_path VARCHAR(255),
        timestamp DATETIME,
        status VARCHAR(50)
    )
"#;

#[derive(Clone, Debug)]
pub struct LogStore {
    connect_options: SqliteConnectOptions,
}

impl LogStore {
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let connect_options = SqliteConnectOptions::from_str(&config.database_url)
            .with_context(|| format!("Invalid DATABASE_URL {}", config.database_url))?
            .create_if_missing(true);

        Ok(LogStore { connect_options })
    }

    async fn connect(&self) -> Result<SqliteConnection> {
        self.connect_options
            .connect()
            .await
            .context("Failed to open message log database")
    }

    /// Crea la tabla si no existe. No toca filas existentes.
    pub async fn ensure_schema(&self) -> Result<()> {
        let mut conn = self.connect().await?;
        let result = sqlx::query(CREATE_TABLE_SQL)
            .execute(&mut conn)
            .await
            .context("Failed to create message_logs");
        conn.close().await.ok();
        result?;
        Ok(())
    }

    /// Inserta una fila y devuelve el id asignado
    pub async fn append(&self, record: &NewLogRecord) -> Result<i64> {
        let timestamp = record.timestamp.format(TIMESTAMP_FORMAT).to_string();

        let mut conn = self.connect().await?;
        let result = sqlx::query(
            r#"
            INSERT INTO message_logs (
                country_code, phone_number, file_type, message,
                file_path, timestamp, status
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&record.country_code)
        .bind(&record.phone_number)
        .bind(record.file_type.as_str())
        .bind(record.message.as_deref())
        .bind(record.file_path.as_deref())
        .bind(timestamp)
        .bind(&record.status)
        .execute(&mut conn)
        .await
        .context("Failed to insert message log");
        conn.close().await.ok();

        Ok(result?.last_insert_rowid())
    }

    /// Todas las filas, en orden de inserción
    pub async fn list_all(&self) -> Result<Vec<LogRecord>> {
        let mut conn = self.connect().await?;
        let rows = sqlx::query(
            r#"
            SELECT id, country_code, phone_number, file_type,
                   message, file_path, timestamp, status
            FROM message_logs
            ORDER BY id
            "#,
        )
        .fetch_all(&mut conn)
        .await
        .context("Failed to fetch message logs");
        conn.close().await.ok();

        rows?.iter().map(row_to_record).collect()
    }
}

fn row_to_record(row: &SqliteRow) -> Result<LogRecord> {
    let file_type: String = row.try_get("file_type")?;
    let timestamp: String = row.try_get("timestamp")?;

    Ok(LogRecord {
        id: row.try_get("id")?,
        country_code: row.try_get::<Option<String>, _>("country_code")?.unwrap_or_default(),
        phone_number: row.try_get::<Option<String>, _>("phone_number")?.unwrap_or_default(),
        file_type: file_type.parse()?,
        message: row.try_get("message")?,
        file_path: row.try_get("file_path")?,
        timestamp: NaiveDateTime::parse_from_str(&timestamp, TIMESTAMP_FORMAT)
            .with_context(|| format!("Bad timestamp in message_logs: {timestamp}"))?,
        status: row.try_get::<Option<String>, _>("status")?.unwrap_or_default(),
    })
}
