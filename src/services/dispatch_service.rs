//! services/dispatch_service.rs
//! validar -> traducir -> resolver hora -> enviar -> registrar.
//! Exactamente una fila de log por envío que pasa la validación.

use anyhow::Result;
use chrono::{Local, NaiveDateTime};
use std::path::Path;
use std::sync::Arc;

use crate::errors::{SubmitError, ValidationError};
use crate::models::dispatch_model::{SendTime, Submission, COUNTRY_CODES};
use crate::models::log_model::{failed_status, LogRecord, NewLogRecord, STATUS_SENT};
use crate::services::log_store::LogStore;
use crate::services::schedule_resolver;
use crate::services::sender::{MessageSender, SendRoute};
use crate::services::translator::Translator;

/// Resultado de un envío que pasó la validación. Ambos casos llevan
/// la fila que se escribió.
#[derive(Debug, Clone)]
pub enum DispatchOutcome {
    Sent {
        record: LogRecord,
        scheduled_for: SendTime,
    },
    Failed {
        record: LogRecord,
        error: String,
    },
}

impl DispatchOutcome {
    pub fn record(&self) -> &LogRecord {
        match self {
            DispatchOutcome::Sent { record, .. } | DispatchOutcome::Failed { record, .. } => {
                record
            }
        }
    }
}

#[derive(Clone)]
pub struct DispatchService {
    log_store: LogStore,
    translator: Arc<dyn Translator>,
    sender: Arc<dyn MessageSender>,
}

impl DispatchService {
    pub fn new(
        log_store: LogStore,
        translator: Arc<dyn Translator>,
        sender: Arc<dyn MessageSender>,
    ) -> Self {
        Self {
            log_store,
            translator,
            sender,
        }
    }

    pub async fn dispatch(&self, submission: Submission) -> Result<DispatchOutcome, SubmitError> {
        self.dispatch_at(submission, Local::now().naive_local())
            .await
    }

    /// `now` es el timestamp del intento y la base del envío inmediato.
    pub async fn dispatch_at(
        &self,
        mut submission: Submission,
        now: NaiveDateTime,
    ) -> Result<DispatchOutcome, SubmitError> {
        validate(&submission)?;

        let full_number = submission.full_number();
        log::info!(
            "(dispatch_at) {} to {} ({})",
            submission.file_type,
            full_number,
            if submission.schedule.send_immediately {
                "immediate"
            } else {
                "scheduled"
            }
        );

        let result = self.attempt(&mut submission, &full_number, now).await;

        let (status, error) = match &result {
            Ok(_) => (STATUS_SENT.to_string(), None),
            Err(e) => {
                // {:#} conserva la causa además del contexto
                let detail = format!("{e:#}");
                log::error!("(dispatch_at) Send to {} failed: {:?}", full_number, e);
                (failed_status(&detail), Some(detail))
            }
        };

        let new_record = NewLogRecord {
            country_code: submission.country_code,
            phone_number: submission.phone_number,
            file_type: submission.file_type,
            message: submission.message,
            file_path: submission.file_path,
            timestamp: now,
            status,
        };
        let id = self
            .log_store
            .append(&new_record)
            .await
            .map_err(SubmitError::Store)?;
        let record = new_record.into_record(id);
        log::info!("(dispatch_at) Logged attempt id={} status='{}'", id, record.status);

        Ok(match (result, error) {
            (Ok(scheduled_for), _) => DispatchOutcome::Sent {
                record,
                scheduled_for,
            },
            (Err(_), error) => DispatchOutcome::Failed {
                record,
                error: error.unwrap_or_default(),
            },
        })
    }

    /// Pasos que pueden fallar y aun así se registran. Si la traducción sale
    /// bien reemplaza `submission.message`, así el log muestra lo enviado.
    async fn attempt(
        &self,
        submission: &mut Submission,
        full_number: &str,
        now: NaiveDateTime,
    ) -> Result<SendTime> {
        if let (Some(message), Some(lang)) = (
            submission.message.as_deref().filter(|m| !m.is_empty()),
            submission.target_language.code(),
        ) {
            log::info!("(attempt) Translating message to '{}'", lang);
            let translated = self.translator.translate(message, lang).await?;
            submission.message = Some(translated);
        }

        let send_at = schedule_resolver::resolve(&submission.schedule, now);
        let message = submission.message.as_deref().unwrap_or_default();

        match submission.file_type.route() {
            SendRoute::Text => {
                self.sender
                    .send_text(full_number, message, send_at)
                    .await?
            }
            SendRoute::Image => {
                let path = required_path(submission)?;
                self.sender.send_image(full_number, path, message).await?
            }
            SendRoute::Document => {
                let path = required_path(submission)?;
                self.sender.send_document(full_number, path).await?
            }
        }

        Ok(send_at)
    }

    pub async fn list_logs(&self) -> Result<Vec<LogRecord>> {
        self.log_store.list_all().await
    }
}

fn required_path(submission: &Submission) -> Result<&Path> {
    submission
        .file_path
        .as_deref()
        .map(Path::new)
        .ok_or_else(|| anyhow::anyhow!("No file for {}", submission.file_type))
}

/// Se chequea en este orden; gana el primer error.
pub fn validate(submission: &Submission) -> Result<(), ValidationError> {
    if submission.phone_number.trim().is_empty() {
        return Err(ValidationError::MissingPhoneNumber);
    }
    if submission.country_code.trim().is_empty() {
        return Err(ValidationError::MissingCountryCode);
    }
    if !COUNTRY_CODES.contains(&submission.country_code.as_str()) {
        return Err(ValidationError::UnsupportedCountryCode(
            submission.country_code.clone(),
        ));
    }
    if submission.file_type.requires_file()
        && submission
            .file_path
            .as_deref()
            .map_or(true, |p| p.is_empty())
    {
        return Err(ValidationError::MissingFile);
    }
    schedule_resolver::validate(&submission.schedule)
}
