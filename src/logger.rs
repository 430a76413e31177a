//! logger.rs
//! Logger con env_logger. sqlx loguea cada sentencia en info, así que
//! por defecto se baja a warn salvo que RUST_LOG diga otra cosa.

const DEFAULT_FILTER: &str = "info,sqlx=warn";

pub fn init_logger() {
    let filter = log_filter(std::env::var("RUST_LOG").ok());

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .format_timestamp_secs()
        .format_module_path(false)
        .init();
}

/// RUST_LOG vacío cuenta como no definido
pub(crate) fn log_filter(rust_log: Option<String>) -> String {
    rust_log
        .filter(|f| !f.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}
