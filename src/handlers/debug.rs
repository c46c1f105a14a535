//! Debug endpoint for webhook connectivity checks.
//!
//! Zapier setups are easiest to verify by pointing them at `/test` first and
//! eyeballing what actually arrives.

use actix_web::{web, HttpResponse};
use serde_json::json;

/// Echo the received JSON body back to the caller.
///
/// POST /test
pub async fn test_endpoint(body: web::Bytes) -> HttpResponse {
    let received: serde_json::Value =
        serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);

    HttpResponse::Ok().json(json!({
        "message": "Test endpoint working",
        "received_data": received,
        "timestamp": chrono::Local::now().to_rfc3339()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};
    use serde_json::json;

    #[actix_web::test]
    async fn test_echoes_received_json() {
        let app = test::init_service(
            App::new().route("/test", web::post().to(test_endpoint)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/test")
            .set_json(json!({"hello": "world"}))
            .to_request();
        let body: serde_json::Value =
            test::read_body_json(test::call_service(&app, req).await).await;

        assert_eq!(body["message"], "Test endpoint working");
        assert_eq!(body["received_data"]["hello"], "world");
        assert!(body["timestamp"].is_string());
    }

    #[actix_web::test]
    async fn test_non_json_body_echoes_null() {
        let app = test::init_service(
            App::new().route("/test", web::post().to(test_endpoint)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/test")
            .set_payload("plain text")
            .to_request();
        let body: serde_json::Value =
            test::read_body_json(test::call_service(&app, req).await).await;

        assert!(body["received_data"].is_null());
    }
}
