use std::time::Duration;

use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use humantime::format_duration;
use serde::Serialize;

use crate::{constants::START_TIME, AppState};

#[derive(Debug, Serialize)]
struct HealthCheckResponse {
    status: &'static str,
    uptime: String,
    start_at: String,
    timestamp: String,
    version: &'static str,
    database: &'static str,
}

#[get("/health")]
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let now_utc = Utc::now();
    let uptime = now_utc.signed_duration_since(*START_TIME).num_seconds().max(0) as u64;

    let database = match state.project_handler.check_connection().await {
        Ok(()) => "OK",
        Err(e) => {
            tracing::warn!("Health check database query failed: {}", e);
            "Unavailable"
        }
    };

    HttpResponse::Ok().json(HealthCheckResponse {
        status: "healthy",
        uptime: format_duration(Duration::from_secs(uptime)).to_string(),
        start_at: START_TIME.to_rfc3339(),
        timestamp: now_utc.to_rfc3339(),
        version: env!("CARGO_PKG_VERSION"),
        database,
    })
}
