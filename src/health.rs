use crate::state::AppState;
use actix_web::{web, HttpResponse};
use serde_json::json;

/// `GET /` — unauthenticated liveness probe with a constant shape.
pub async fn home(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "message": "Lecture notes backend is running",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_seconds": state.uptime_seconds()
    }))
}
