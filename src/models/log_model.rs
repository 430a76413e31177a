//! models/log_model.rs
//! Filas de la tabla `message_logs`.

use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Formato de la columna `timestamp` (hora local)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const STATUS_SENT: &str = "Sent";
pub const STATUS_FAILED_PREFIX: &str = "Failed: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileType {
    Message,
    Image,
    Video,
    Document,
}

impl FileType {
    pub const ALL: [FileType; 4] = [
        FileType::Message,
        FileType::Image,
        FileType::Video,
        FileType::Document,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Message => "Message",
            FileType::Image => "Image",
            FileType::Video => "Video",
            FileType::Document => "Document",
        }
    }

    pub fn requires_file(&self) -> bool {
        !matches!(self, FileType::Message)
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FileType::ALL
            .into_iter()
            .find(|ft| ft.as_str() == s)
            .ok_or_else(|| anyhow!("Unknown file_type '{}'", s))
    }
}

/// Una fila por intento de envío. No se actualiza nunca.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogRecord {
    pub id: i64,
    pub country_code: String,
    pub phone_number: String,
    pub file_type: FileType,
    pub message: Option<String>,
    pub file_path: Option<String>,
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: NaiveDateTime,
    pub status: String,
}

/// Fila a insertar; el id lo asigna la DB
#[derive(Debug, Clone)]
pub struct NewLogRecord {
    pub country_code: String,
    pub phone_number: String,
    pub file_type: FileType,
    pub message: Option<String>,
    pub file_path: Option<String>,
    pub timestamp: NaiveDateTime,
    pub status: String,
}

impl NewLogRecord {
    pub fn into_record(self, id: i64) -> LogRecord {
        LogRecord {
            id,
            country_code: self.country_code,
            phone_number: self.phone_number,
            file_type: self.file_type,
            message: self.message,
            file_path: self.file_path,
            timestamp: self.timestamp,
            status: self.status,
        }
    }
}

pub fn failed_status(detail: &str) -> String {
    format!("{STATUS_FAILED_PREFIX}{detail}")
}

fn serialize_timestamp<S>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&ts.format(TIMESTAMP_FORMAT).to_string())
}

#[derive(Debug, Clone, Serialize)]
pub struct ListLogsResponse {
    pub total: usize,
    pub items: Vec<LogRecord>,
}
