use actix_web::{web, HttpResponse};
use callme_reminder_api_structs::{get_service_health, get_service_liveness};

async fn status() -> HttpResponse {
    HttpResponse::Ok().json(get_service_health::APIResponse {
        message: "CallMe Reminder API is running".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(get_service_liveness::APIResponse {
        status: "healthy".into(),
    })
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(status));
    cfg.route("/health", web::get().to(health));
}
