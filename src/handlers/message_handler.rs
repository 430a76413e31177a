//! handlers/message_handler.rs
use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::errors::SubmitError;
use crate::models::dispatch_model::{
    DispatchResponse, FormOptionsResponse, SendMessageRequest, Submission,
};
use crate::services::dispatch_service::{DispatchOutcome, DispatchService};
use crate::services::upload_service::UploadService;

/// GET /api/form/options
pub async fn form_options_endpoint() -> HttpResponse {
    HttpResponse::Ok().json(FormOptionsResponse::default())
}

/// POST /api/messages
pub async fn send_message_endpoint(
    dispatch_service: web::Data<DispatchService>,
    upload_service: web::Data<UploadService>,
    body: web::Json<SendMessageRequest>,
) -> HttpResponse {
    let req = body.into_inner();

    // El archivo se guarda al recibirlo, antes de validar.
    // Un "Message" no lleva archivo: se ignora aunque venga.
    let upload = req.file.as_ref().filter(|_| req.file_type.requires_file());
    let file_path = match upload {
        Some(file) => match upload_service.save(file).await {
            Ok(path) => Some(path.to_string_lossy().into_owned()),
            Err(e) => return submit_error_response(e),
        },
        None => None,
    };

    let submission = Submission {
        country_code: req.country_code,
        phone_number: req.phone_number,
        file_type: req.file_type,
        message: req.message,
        target_language: req.target_language,
        file_path,
        schedule: req.schedule,
    };

    let outcome = match dispatch_service.dispatch(submission).await {
        Ok(outcome) => outcome,
        Err(e) => return submit_error_response(e),
    };
    log::info!(
        "(send_message_endpoint) Intento registrado id={}",
        outcome.record().id
    );

    match outcome {
        DispatchOutcome::Sent {
            record,
            scheduled_for,
        } => HttpResponse::Ok().json(DispatchResponse {
            success: true,
            log_id: record.id,
            status: record.status,
            scheduled_for: Some(scheduled_for),
        }),
        DispatchOutcome::Failed { record, error } => HttpResponse::BadGateway().json(json!({
            "success": false,
            "log_id": record.id,
            "status": record.status,
            "error": format!("An error occurred: {}", error)
        })),
    }
}

fn submit_error_response(e: SubmitError) -> HttpResponse {
    match e {
        SubmitError::Validation(v) => HttpResponse::BadRequest().json(json!({
            "success": false,
            "error": v.to_string()
        })),
        other => {
            log::error!("(send_message_endpoint) {:?}", other);
            HttpResponse::InternalServerError().json(json!({
                "success": false,
                "error": other.to_string()
            }))
        }
    }
}
