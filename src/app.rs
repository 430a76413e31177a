//! app.rs
use crate::handlers::{log_handler, message_handler};
use actix_web::web;

pub fn init_app(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(
                web::scope("/form")
                    .route("/options", web::get().to(message_handler::form_options_endpoint)),
            )
            .service(
                web::scope("/messages")
                    .route("", web::post().to(message_handler::send_message_endpoint)),
            )
            .service(web::scope("/logs").route("", web::get().to(log_handler::list_logs_endpoint))),
    );
}
