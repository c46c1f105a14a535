//! Webhook endpoints that trigger the voice-message pipeline.
//!
//! `POST /webhook` (called by the Zapier forwarder) and `POST /process`
//! (manual testing) share one handler and one contract. A processed pipeline
//! run always answers HTTP 200, even when the run itself failed — only
//! malformed input earns a 400.

use crate::error::{AppError, AppResult};
use crate::pipeline::VoiceMetadata;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use tracing::info;

/// Incoming webhook body.
///
/// Every field is optional at the serde layer; the handler checks the
/// required ones itself so the 400 message matches the documented contract
/// instead of a deserializer error.
#[derive(Debug, Deserialize)]
pub struct VoiceMessageRequest {
    pub file_url: Option<String>,
    pub slack_token: Option<String>,
    #[serde(default)]
    pub metadata: Option<VoiceMetadata>,
}

pub async fn process_voice_message(
    state: web::Data<AppState>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let request: VoiceMessageRequest = serde_json::from_slice(&body)
        .map_err(|_| AppError::BadRequest("No JSON data received".to_string()))?;

    let (file_url, slack_token) =
        match (request.file_url.as_deref(), request.slack_token.as_deref()) {
            (Some(url), Some(token)) if !url.is_empty() && !token.is_empty() => (url, token),
            _ => {
                return Err(AppError::BadRequest(
                    "Missing required fields: file_url and slack_token".to_string(),
                ))
            }
        };

    info!(file_url = %file_url, "Received voice message webhook");

    let outcome = state
        .pipeline
        .process(file_url, slack_token, request.metadata)
        .await;

    Ok(HttpResponse::Ok().json(outcome))
}
