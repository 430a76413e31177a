//! tests/api_tests.rs
//! Endpoints HTTP armados con fakes.

use actix_web::{http::StatusCode, test, web, App};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Value};

use crate::app::init_app;
use crate::services::upload_service::UploadService;
use crate::tests::support::{harness, harness_with, FakeSender, FakeTranslator, Harness};

macro_rules! app {
    ($h:expr, $uploads:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($h.service.clone()))
                .app_data(web::Data::new(UploadService::new($uploads)))
                .configure(init_app),
        )
        .await
    };
}

async fn logs(h: &Harness) -> usize {
    h.store.list_all().await.unwrap().len()
}

#[actix_rt::test]
async fn test_form_options_lists_choices() {
    let h = harness().await;
    let tmp = tempfile::tempdir().unwrap();
    let app = app!(h, tmp.path().join("uploads"));

    let req = test::TestRequest::get().uri("/api/form/options").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["country_codes"][0], "+1");
    assert_eq!(body["country_codes"].as_array().unwrap().len(), 15);
    assert_eq!(body["file_types"], json!(["Message", "Image", "Video", "Document"]));
    assert_eq!(
        body["languages"],
        json!(["none", "es", "fr", "de", "zh", "hi", "ar"])
    );
    assert_eq!(body["hours"].as_array().unwrap().len(), 12);
    assert_eq!(body["minutes"].as_array().unwrap().len(), 60);
}

#[actix_rt::test]
async fn test_missing_phone_is_bad_request_without_log() {
    let h = harness().await;
    let tmp = tempfile::tempdir().unwrap();
    let app = app!(h, tmp.path().join("uploads"));

    let req = test::TestRequest::post()
        .uri("/api/messages")
        .set_json(json!({
            "country_code": "+91",
            "phone_number": "",
            "file_type": "Message",
            "message": "hi",
            "schedule": { "send_immediately": true }
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Please enter the phone number.");
    assert_eq!(logs(&h).await, 0);
}

#[actix_rt::test]
async fn test_scheduled_message_is_sent_and_logged() {
    let h = harness().await;
    let tmp = tempfile::tempdir().unwrap();
    let app = app!(h, tmp.path().join("uploads"));

    let req = test::TestRequest::post()
        .uri("/api/messages")
        .set_json(json!({
            "country_code": "+44",
            "phone_number": "7700900000",
            "file_type": "Message",
            "message": "see you",
            "target_language": "None",
            "schedule": { "hour": 12, "minute": 30, "am_pm": "AM" }
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "Sent");
    assert_eq!(body["scheduled_for"], json!({ "hour": 0, "minute": 30 }));

    let req = test::TestRequest::get().uri("/api/logs").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["phone_number"], "7700900000");
    assert_eq!(body["items"][0]["file_type"], "Message");
    assert_eq!(body["items"][0]["status"], "Sent");
}

#[actix_rt::test]
async fn test_document_upload_is_saved_and_sent() {
    let h = harness().await;
    let tmp = tempfile::tempdir().unwrap();
    let uploads = tmp.path().join("uploads");
    let app = app!(h, uploads.clone());

    let req = test::TestRequest::post()
        .uri("/api/messages")
        .set_json(json!({
            "country_code": "+1",
            "phone_number": "5550100",
            "file_type": "Document",
            "file": { "filename": "cv.pdf", "data": STANDARD.encode(b"%PDF") },
            "schedule": { "send_immediately": true }
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let saved = uploads.join("cv.pdf");
    assert_eq!(std::fs::read(&saved).unwrap(), b"%PDF");
    let rows = h.store.list_all().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows[0].file_path.as_deref(),
        Some(saved.to_string_lossy().as_ref())
    );
}

#[actix_rt::test]
async fn test_send_failure_is_bad_gateway_with_failed_log() {
    let h = harness_with(FakeSender::failing("no session"), FakeTranslator::default()).await;
    let tmp = tempfile::tempdir().unwrap();
    let app = app!(h, tmp.path().join("uploads"));

    let req = test::TestRequest::post()
        .uri("/api/messages")
        .set_json(json!({
            "country_code": "+91",
            "phone_number": "12345",
            "file_type": "Message",
            "message": "hi",
            "schedule": { "send_immediately": true }
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "An error occurred: no session");

    let rows = h.store.list_all().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, "Failed: no session");
    assert_eq!(body["log_id"], rows[0].id);
}

#[actix_rt::test]
async fn test_image_without_file_is_rejected() {
    let h = harness().await;
    let tmp = tempfile::tempdir().unwrap();
    let app = app!(h, tmp.path().join("uploads"));

    let req = test::TestRequest::post()
        .uri("/api/messages")
        .set_json(json!({
            "country_code": "+91",
            "phone_number": "12345",
            "file_type": "Image",
            "message": "caption"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(logs(&h).await, 0);
    assert!(h.sender.calls().is_empty());
}

#[actix_rt::test]
async fn test_message_type_ignores_attached_file() {
    let h = harness().await;
    let tmp = tempfile::tempdir().unwrap();
    let uploads = tmp.path().join("uploads");
    let app = app!(h, uploads.clone());

    let req = test::TestRequest::post()
        .uri("/api/messages")
        .set_json(json!({
            "country_code": "+91",
            "phone_number": "12345",
            "file_type": "Message",
            "message": "just text",
            "file": { "filename": "cv.pdf", "data": STANDARD.encode(b"%PDF") },
            "schedule": { "send_immediately": true }
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    assert!(!uploads.exists());
    let rows = h.store.list_all().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].file_path, None);
}
