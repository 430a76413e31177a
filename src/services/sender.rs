//! services/sender.rs
//! Envío de mensajes. El orquestador solo conoce `MessageSender`;
//! `WhatsAppApiSender` habla con una sesión REST de whatsapp-web.js.

use anyhow::{anyhow, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{Duration as ChronoDuration, Local, NaiveDateTime, NaiveTime};
use reqwest::Client;
use std::path::Path;
use std::time::Duration;

use crate::config::app_config::WhatsAppApiConfig;
use crate::models::dispatch_model::SendTime;
use crate::models::log_model::FileType;

/// Tiempo máximo por petición a la API de WhatsApp
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Una hora alcanzada hace menos de esto se envía ya, no mañana
const LATE_GRACE_MINUTES: i64 = 5;

/// Punto de entrada del sender según el tipo de archivo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendRoute {
    Text,
    Image,
    Document,
}

impl FileType {
    /// Video sale por el mismo punto de entrada que Document.
    pub fn route(&self) -> SendRoute {
        match self {
            FileType::Message => SendRoute::Text,
            FileType::Image => SendRoute::Image,
            FileType::Video | FileType::Document => SendRoute::Document,
        }
    }
}

#[async_trait::async_trait]
pub trait MessageSender: Send + Sync {
    /// Envía `message` a `target` cuando el reloj local llega a `at`.
    async fn send_text(&self, target: &str, message: &str, at: SendTime) -> Result<()>;

    async fn send_image(&self, target: &str, path: &Path, caption: &str) -> Result<()>;

    async fn send_document(&self, target: &str, path: &Path) -> Result<()>;
}

/// Espera hasta la próxima vez que el reloj local marque `at`.
/// Si `at` pasó hace menos de `LATE_GRACE_MINUTES` (p.ej. un envío inmediato
/// que cruzó el minuto durante el chequeo de sesión) la espera es cero;
/// si pasó hace más, se apunta a mañana.
pub fn delay_until(at: SendTime, now: NaiveDateTime) -> Result<Duration> {
    let time = NaiveTime::from_hms_opt(at.hour, at.minute, 0)
        .ok_or_else(|| anyhow!("Invalid send time {:02}:{:02}", at.hour, at.minute))?;

    let today = now.date().and_time(time);
    let grace = ChronoDuration::minutes(LATE_GRACE_MINUTES);
    // ayer cubre un objetivo 23:59 visto ya pasada la medianoche
    for candidate in [today, today - ChronoDuration::days(1)] {
        if candidate <= now && now - candidate <= grace {
            return Ok(Duration::ZERO);
        }
    }

    let target = if today > now {
        today
    } else {
        today + ChronoDuration::days(1)
    };

    (target - now)
        .to_std()
        .context("Negative delay computing send time")
}

pub fn mime_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "mp4" => "video/mp4",
        "pdf" => "application/pdf",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        _ => "application/octet-stream",
    }
}

/// whatsapp-web.js espera solo dígitos seguidos de `@c.us`.
pub(crate) fn chat_id(target: &str) -> String {
    let digits: String = target.chars().filter(|c| c.is_ascii_digit()).collect();
    format!("{digits}@c.us")
}

pub(crate) fn text_payload(target: &str, message: &str) -> serde_json::Value {
    serde_json::json!({
        "chatId": chat_id(target),
        "contentType": "string",
        "content": message
    })
}

/// Lee el archivo y arma el `MessageMedia`. El caption solo va si no está vacío.
pub(crate) async fn media_payload(
    target: &str,
    path: &Path,
    caption: Option<&str>,
) -> Result<serde_json::Value> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Could not read {:?}", path))?;
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("file")
        .to_string();

    let mut payload = serde_json::json!({
        "chatId": chat_id(target),
        "contentType": "MessageMedia",
        "content": {
            "mimetype": mime_type_for(path),
            "data": STANDARD.encode(&data),
            "filename": filename
        }
    });
    if let Some(caption) = caption.filter(|c| !c.is_empty()) {
        payload["options"] = serde_json::json!({ "caption": caption });
    }
    Ok(payload)
}

#[derive(Clone)]
pub struct WhatsAppApiSender {
    http_client: Client,
    config: WhatsAppApiConfig,
}

impl WhatsAppApiSender {
    pub fn new(config: WhatsAppApiConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build WhatsApp HTTP client")?;
        Ok(Self {
            http_client,
            config,
        })
    }

    fn endpoint(&self, path: &str) -> Result<String> {
        let base_url = self
            .config
            .base_url
            .as_deref()
            .ok_or_else(|| anyhow!("WHATSAPP_API_URL is not set"))?;
        let session_id = self
            .config
            .session_id
            .as_deref()
            .ok_or_else(|| anyhow!("WHATSAPP_API_SESSION_ID is not set"))?;
        Ok(format!(
            "{}/{}/{}",
            base_url.trim_end_matches('/'),
            path,
            session_id
        ))
    }

    /// La sesión tiene que estar CONNECTED antes de postear nada.
    async fn ensure_connected(&self) -> Result<()> {
        let status_url = self.endpoint("session/status")?;
        log::info!("(ensure_connected) GET {}", status_url);

        let resp = self
            .http_client
            .get(&status_url)
            .send()
            .await
            .context("GET session/status failed")?;

        if !resp.status().is_success() {
            let body_txt = resp.text().await.unwrap_or_default();
            log::error!("(ensure_connected) status check failed: '{}'", body_txt);
            return Err(anyhow!("Error checking WhatsApp session: {}", body_txt));
        }

        let json_val = resp.json::<serde_json::Value>().await?;
        let connected = json_val
            .get("state")
            .and_then(|v| v.as_str())
            .map(|s| s == "CONNECTED")
            .unwrap_or(false);

        if !connected {
            return Err(anyhow!("WhatsApp session is not CONNECTED"));
        }
        Ok(())
    }

    async fn post_message(&self, payload: serde_json::Value) -> Result<()> {
        let send_url = self.endpoint("client/sendMessage")?;
        let r = self
            .http_client
            .post(&send_url)
            .json(&payload)
            .send()
            .await
            .context("POST client/sendMessage failed")?;

        if !r.status().is_success() {
            let e = r.text().await.unwrap_or_default();
            log::error!("(post_message) send rejected: {}", e);
            return Err(anyhow!("WhatsApp send failed: {}", e));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl MessageSender for WhatsAppApiSender {
    async fn send_text(&self, target: &str, message: &str, at: SendTime) -> Result<()> {
        self.ensure_connected().await?;

        let delay = delay_until(at, Local::now().naive_local())?;
        log::info!(
            "(send_text) Waiting {}s to send to {} at {:02}:{:02}",
            delay.as_secs(),
            target,
            at.hour,
            at.minute
        );
        tokio::time::sleep(delay).await;

        self.post_message(text_payload(target, message)).await
    }

    async fn send_image(&self, target: &str, path: &Path, caption: &str) -> Result<()> {
        self.ensure_connected().await?;
        log::info!("(send_image) {:?} -> {}", path, target);
        let payload = media_payload(target, path, Some(caption)).await?;
        self.post_message(payload).await
    }

    async fn send_document(&self, target: &str, path: &Path) -> Result<()> {
        self.ensure_connected().await?;
        log::info!("(send_document) {:?} -> {}", path, target);
        let payload = media_payload(target, path, None).await?;
        self.post_message(payload).await
    }
}
