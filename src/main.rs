use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use dotenv::dotenv;

use crate::config::app_config::AppConfig;
use crate::logger::init_logger;
use crate::services::dispatch_service::DispatchService;
use crate::services::log_store::LogStore;
use crate::services::sender::WhatsAppApiSender;
use crate::services::translator::HttpTranslator;
use crate::services::upload_service::UploadService;

mod app;
mod config;
mod errors;
mod handlers;
mod logger;
mod models;
mod services;

#[cfg(test)]
mod tests;

/// Los archivos viajan en base64 dentro del JSON
const JSON_LIMIT_BYTES: usize = 64 * 1024 * 1024;

/// SQLite no crea la carpeta del archivo de la DB
fn ensure_database_dir(database_url: &str) {
    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:");
    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                log::error!("Could not create database directory {:?}: {}", parent, e);
            }
        }
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_logger();

    let config = AppConfig::from_env()?;

    ensure_database_dir(&config.store.database_url);
    log::info!("Message log database at {}", config.store.database_url);
    let log_store = LogStore::new(&config.store)?;

    // Si la DB falla se reporta, pero el formulario igual levanta.
    if let Err(e) = log_store.ensure_schema().await {
        log::error!("Database Error: {:?}", e);
    }

    let translator = Arc::new(HttpTranslator::new(config.translate.clone())?);
    let sender = Arc::new(WhatsAppApiSender::new(config.whatsapp.clone())?);
    let dispatch_service = DispatchService::new(log_store, translator, sender);
    let upload_service = UploadService::new(config.upload_dir.clone());

    log::info!("Listening on {}:{}", config.host, config.port);
    HttpServer::new(move || {
        App::new()
            .app_data(web::JsonConfig::default().limit(JSON_LIMIT_BYTES))
            .app_data(web::Data::new(dispatch_service.clone()))
            .app_data(web::Data::new(upload_service.clone()))
            .configure(app::init_app)
    })
    .workers(1)
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
