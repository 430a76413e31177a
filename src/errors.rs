//! errors.rs
//! Tipos de error que ve el operador.

use thiserror::Error;

/// Errores de entrada: no se envía ni se registra nada.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter the phone number.")]
    MissingPhoneNumber,

    #[error("Please select a country code.")]
    MissingCountryCode,

    #[error("Unsupported country code '{0}'.")]
    UnsupportedCountryCode(String),

    #[error("Please upload a file for Image, Video, or Document.")]
    MissingFile,

    #[error("Unsupported file extension for '{0}'.")]
    UnsupportedFileExtension(String),

    #[error("Invalid schedule time {hour}:{minute:02} (hour 1-12, minute 0-59).")]
    InvalidScheduleTime { hour: u8, minute: u8 },
}

/// Lo que corta un envío antes del sender (no incluye envíos fallidos).
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to store uploaded file: {0}")]
    Upload(#[source] anyhow::Error),

    #[error("Failed to write message log: {0}")]
    Store(#[source] anyhow::Error),
}
