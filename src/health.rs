use crate::state::AppState;
use actix_web::{web, HttpResponse};
use serde_json::json;

/// Service identifier reported by the health endpoint.
pub const SERVICE_NAME: &str = "Slack → Transcription → Zoho Desk Worker";

pub async fn home(state: web::Data<AppState>) -> HttpResponse {
    let config = &state.config;

    HttpResponse::Ok().json(json!({
        "status": "running",
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "webhook": "/webhook",
            "process": "/process",
            "health": "/",
            "status": "/status"
        },
        "configured_services": {
            "deepgram": config.deepgram_configured(),
            "zoho_desk": config.zoho_configured()
        }
    }))
}

pub async fn status(state: web::Data<AppState>) -> HttpResponse {
    let config = &state.config;
    let metrics = state.metrics_snapshot();

    let mut endpoint_stats = Vec::new();
    for (endpoint, metric) in metrics.endpoint_metrics.iter() {
        endpoint_stats.push(json!({
            "endpoint": endpoint,
            "request_count": metric.request_count,
            "error_count": metric.error_count,
            "average_duration_ms": metric.average_duration_ms()
        }));
    }

    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "timestamp": chrono::Local::now().to_rfc3339(),
        "services": {
            "deepgram": config.deepgram_configured(),
            "zoho_desk": config.zoho_configured()
        },
        "configuration": {
            "zoho_org_id": config.zoho.org_id,
            "zoho_department_id": config.zoho.department_id
        },
        "metrics": {
            "uptime_seconds": state.uptime_seconds(),
            "total_requests": metrics.request_count,
            "total_errors": metrics.error_count,
            "endpoints": endpoint_stats
        }
    }))
}
