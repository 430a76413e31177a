//! handlers/log_handler.rs
use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::models::log_model::ListLogsResponse;
use crate::services::dispatch_service::DispatchService;

/// GET /api/logs
pub async fn list_logs_endpoint(dispatch_service: web::Data<DispatchService>) -> HttpResponse {
    match dispatch_service.list_logs().await {
        Ok(items) => HttpResponse::Ok().json(ListLogsResponse {
            total: items.len(),
            items,
        }),
        Err(e) => {
            log::error!("(list_logs_endpoint) {:?}", e);
            HttpResponse::InternalServerError().json(json!({
                "error": "Failed to fetch logs",
                "details": format!("{:?}", e)
            }))
        }
    }
}
