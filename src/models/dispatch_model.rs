//! models/dispatch_model.rs
//! Entrada del formulario, campos de hora y respuestas de envío.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::models::log_model::FileType;

pub const COUNTRY_CODES: [&str; 15] = [
    "+1", "+91", "+44", "+61", "+81", "+86", "+33", "+49", "+39", "+7", "+34", "+971", "+93",
    "+55", "+27",
];

/// Extensiones que acepta el campo de archivo
pub const UPLOAD_EXTENSIONS: [&str; 6] = ["jpg", "png", "mp4", "pdf", "docx", "xlsx"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TargetLanguage {
    #[default]
    #[serde(rename = "none", alias = "None")]
    None,
    #[serde(rename = "es")]
    Spanish,
    #[serde(rename = "fr")]
    French,
    #[serde(rename = "de")]
    German,
    #[serde(rename = "zh")]
    Chinese,
    #[serde(rename = "hi")]
    Hindi,
    #[serde(rename = "ar")]
    Arabic,
}

impl TargetLanguage {
    pub const ALL: [TargetLanguage; 7] = [
        TargetLanguage::None,
        TargetLanguage::Spanish,
        TargetLanguage::French,
        TargetLanguage::German,
        TargetLanguage::Chinese,
        TargetLanguage::Hindi,
        TargetLanguage::Arabic,
    ];

    /// Código para el traductor; `None` si no se traduce.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            TargetLanguage::None => None,
            TargetLanguage::Spanish => Some("es"),
            TargetLanguage::French => Some("fr"),
            TargetLanguage::German => Some("de"),
            TargetLanguage::Chinese => Some("zh"),
            TargetLanguage::Hindi => Some("hi"),
            TargetLanguage::Arabic => Some("ar"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Meridiem {
    #[default]
    AM,
    PM,
}

/// Campos de "Set Time to Send". No se guardan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScheduleInput {
    pub send_immediately: bool,
    pub hour: u8,
    pub minute: u8,
    pub am_pm: Meridiem,
}

impl Default for ScheduleInput {
    fn default() -> Self {
        ScheduleInput {
            send_immediately: false,
            hour: 1,
            minute: 0,
            am_pm: Meridiem::AM,
        }
    }
}

/// Hora local en 24h que recibe el sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SendTime {
    pub hour: u32,
    pub minute: u32,
}

impl SendTime {
    pub fn new(hour: u32, minute: u32) -> Self {
        SendTime { hour, minute }
    }
}

/// Archivo subido, en base64 dentro del JSON
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedFile {
    pub filename: String,
    #[serde(deserialize_with = "deserialize_base64")]
    pub data: Vec<u8>,
}

fn deserialize_base64<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    STANDARD.decode(s).map_err(serde::de::Error::custom)
}

/// Body de POST /api/messages
#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageRequest {
    #[serde(default)]
    pub country_code: String,
    #[serde(default)]
    pub phone_number: String,
    pub file_type: FileType,
    pub message: Option<String>,
    #[serde(default)]
    pub target_language: TargetLanguage,
    pub file: Option<UploadedFile>,
    #[serde(default)]
    pub schedule: ScheduleInput,
}

/// Lo que procesa el orquestador, con el archivo (si hay) ya en disco.
#[derive(Debug, Clone)]
pub struct Submission {
    pub country_code: String,
    pub phone_number: String,
    pub file_type: FileType,
    pub message: Option<String>,
    pub target_language: TargetLanguage,
    pub file_path: Option<String>,
    pub schedule: ScheduleInput,
}

impl Submission {
    /// Código de país + número, tal cual, sin normalizar.
    pub fn full_number(&self) -> String {
        format!("{}{}", self.country_code, self.phone_number)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DispatchResponse {
    pub success: bool,
    pub log_id: i64,
    pub status: String,
    pub scheduled_for: Option<SendTime>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FormOptionsResponse {
    pub country_codes: Vec<&'static str>,
    pub file_types: Vec<FileType>,
    pub languages: Vec<TargetLanguage>,
    pub hours: Vec<u8>,
    pub minutes: Vec<u8>,
    pub meridiems: Vec<Meridiem>,
    pub upload_extensions: Vec<&'static str>,
}

impl Default for FormOptionsResponse {
    fn default() -> Self {
        FormOptionsResponse {
            country_codes: COUNTRY_CODES.to_vec(),
            file_types: FileType::ALL.to_vec(),
            languages: TargetLanguage::ALL.to_vec(),
            hours: (1..=12).collect(),
            minutes: (0..60).collect(),
            meridiems: vec![Meridiem::AM, Meridiem::PM],
            upload_extensions: UPLOAD_EXTENSIONS.to_vec(),
        }
    }
}
