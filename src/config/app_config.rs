//! config/app_config.rs
//! Configuración leída del entorno (main carga el .env antes).

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

const DEFAULT_DATABASE_URL: &str = "sqlite:data/message_logs.db";
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5022;

/// Dónde vive el log de mensajes. Se le pasa a `LogStore::new`.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub database_url: String,
}

#[derive(Debug, Clone, Default)]
pub struct WhatsAppApiConfig {
    pub base_url: Option<String>,
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct TranslateApiConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub upload_dir: PathBuf,
    pub host: String,
    pub port: u16,
    pub whatsapp: WhatsAppApiConfig,
    pub translate: TranslateApiConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let port = match env::var("HTTP_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("Invalid HTTP_PORT: {raw}"))?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(AppConfig {
            store: StoreConfig {
                database_url: env::var("DATABASE_URL")
                    .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            },
            upload_dir: PathBuf::from(
                env::var("UPLOAD_DIR").unwrap_or_else(|_| DEFAULT_UPLOAD_DIR.to_string()),
            ),
            host: env::var("HTTP_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port,
            whatsapp: WhatsAppApiConfig {
                base_url: non_empty_var("WHATSAPP_API_URL"),
                session_id: non_empty_var("WHATSAPP_API_SESSION_ID"),
            },
            translate: TranslateApiConfig {
                base_url: non_empty_var("TRANSLATE_API_URL"),
                api_key: non_empty_var("TRANSLATE_API_KEY"),
            },
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
