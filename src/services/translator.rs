//! services/translator.rs
//! Traducción de mensajes vía una API HTTP compatible con LibreTranslate.

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::config::app_config::TranslateApiConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[async_trait::async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String>;
}

#[derive(Clone)]
pub struct HttpTranslator {
    http_client: Client,
    config: TranslateApiConfig,
}

#[derive(Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

impl HttpTranslator {
    pub fn new(config: TranslateApiConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build translator HTTP client")?;
        Ok(Self {
            http_client,
            config,
        })
    }
}

#[async_trait::async_trait]
impl Translator for HttpTranslator {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String> {
        let base_url = self
            .config
            .base_url
            .as_deref()
            .ok_or_else(|| anyhow!("TRANSLATE_API_URL is not set"))?;
        let url = format!("{}/translate", base_url.trim_end_matches('/'));

        let mut payload = serde_json::json!({
            "q": text,
            "source": "auto",
            "target": target_language,
            "format": "text",
        });
        if let Some(key) = &self.config.api_key {
            payload["api_key"] = serde_json::json!(key);
        }

        log::info!("(translate) POST {} target={}", url, target_language);
        let resp = self
            .http_client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .context("Translation request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            log::error!("(translate) status={} body='{}'", status, body);
            return Err(anyhow!("Translation service returned {status}: {body}"));
        }

        let parsed = resp
            .json::<TranslateResponse>()
            .await
            .context("Unexpected translation response")?;
        Ok(parsed.translated_text)
    }
}
