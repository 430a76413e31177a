//! tests/support.rs
//! Fakes de los servicios externos y un SQLite descartable.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use chrono::{NaiveDate, NaiveDateTime};
use tempfile::TempDir;

use crate::config::app_config::StoreConfig;
use crate::models::dispatch_model::{Meridiem, ScheduleInput, SendTime, Submission, TargetLanguage};
use crate::models::log_model::FileType;
use crate::services::dispatch_service::DispatchService;
use crate::services::log_store::LogStore;
use crate::services::sender::MessageSender;
use crate::services::translator::Translator;

#[derive(Debug, Clone, PartialEq)]
pub enum SentCall {
    Text {
        target: String,
        message: String,
        at: SendTime,
    },
    Image {
        target: String,
        path: PathBuf,
        caption: String,
    },
    Document {
        target: String,
        path: PathBuf,
    },
}

#[derive(Default)]
pub struct FakeSender {
    pub calls: Mutex<Vec<SentCall>>,
    pub fail_with: Option<String>,
    pub fail_context: Option<String>,
}

impl FakeSender {
    pub fn failing(msg: &str) -> Self {
        FakeSender {
            calls: Mutex::new(Vec::new()),
            fail_with: Some(msg.to_string()),
            fail_context: None,
        }
    }

    /// Falla como reqwest detrás de un `.context(..)`.
    pub fn failing_with_context(cause: &str, context: &str) -> Self {
        FakeSender {
            fail_context: Some(context.to_string()),
            ..FakeSender::failing(cause)
        }
    }

    pub fn calls(&self) -> Vec<SentCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: SentCall) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        match (&self.fail_with, &self.fail_context) {
            (Some(msg), Some(ctx)) => Err(anyhow!(msg.clone()).context(ctx.clone())),
            (Some(msg), None) => Err(anyhow!(msg.clone())),
            (None, _) => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl MessageSender for FakeSender {
    async fn send_text(&self, target: &str, message: &str, at: SendTime) -> Result<()> {
        self.record(SentCall::Text {
            target: target.to_string(),
            message: message.to_string(),
            at,
        })
    }

    async fn send_image(&self, target: &str, path: &Path, caption: &str) -> Result<()> {
        self.record(SentCall::Image {
            target: target.to_string(),
            path: path.to_path_buf(),
            caption: caption.to_string(),
        })
    }

    async fn send_document(&self, target: &str, path: &Path) -> Result<()> {
        self.record(SentCall::Document {
            target: target.to_string(),
            path: path.to_path_buf(),
        })
    }
}

#[derive(Default)]
pub struct FakeTranslator {
    pub fail: bool,
    pub calls: Mutex<Vec<(String, String)>>,
}

#[async_trait::async_trait]
impl Translator for FakeTranslator {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((text.to_string(), target_language.to_string()));
        if self.fail {
            return Err(anyhow!("translator unavailable"));
        }
        Ok(format!("[{target_language}] {text}"))
    }
}

pub fn temp_store() -> (TempDir, LogStore) {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("message_logs.db");
    let config = StoreConfig {
        database_url: format!("sqlite:{}", db_path.to_string_lossy()),
    };
    let store = LogStore::new(&config).expect("store");
    (dir, store)
}

pub struct Harness {
    pub _dir: TempDir,
    pub store: LogStore,
    pub sender: Arc<FakeSender>,
    pub translator: Arc<FakeTranslator>,
    pub service: DispatchService,
}

pub async fn harness_with(sender: FakeSender, translator: FakeTranslator) -> Harness {
    let (dir, store) = temp_store();
    store.ensure_schema().await.expect("schema");
    let sender = Arc::new(sender);
    let translator = Arc::new(translator);
    let service = DispatchService::new(store.clone(), translator.clone(), sender.clone());
    Harness {
        _dir: dir,
        store,
        sender,
        translator,
        service,
    }
}

pub async fn harness() -> Harness {
    harness_with(FakeSender::default(), FakeTranslator::default()).await
}

pub fn scheduled(hour: u8, minute: u8, am_pm: Meridiem) -> ScheduleInput {
    ScheduleInput {
        send_immediately: false,
        hour,
        minute,
        am_pm,
    }
}

pub fn immediate() -> ScheduleInput {
    ScheduleInput {
        send_immediately: true,
        ..Default::default()
    }
}

pub fn at(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

pub fn text_submission(message: &str) -> Submission {
    Submission {
        country_code: "+91".to_string(),
        phone_number: "9876543210".to_string(),
        file_type: FileType::Message,
        message: Some(message.to_string()),
        target_language: TargetLanguage::None,
        file_path: None,
        schedule: immediate(),
    }
}

pub fn file_submission(file_type: FileType, path: &str) -> Submission {
    Submission {
        file_type,
        message: None,
        file_path: Some(path.to_string()),
        ..text_submission("")
    }
}
