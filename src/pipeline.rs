//! # Pipeline Orchestrator
//!
//! Sequences one voice-message run: download from Slack, transcribe with
//! Deepgram, file a Zoho Desk ticket. The order is fixed and strictly
//! sequential; a failed stage ends the run immediately.
//!
//! ## Outcome mapping:
//! - download failed → `error: "Failed to download audio from Slack"`
//! - transcription failed → `error: "Transcription failed"`
//! - submission failed → `error` carries the submission error text, and the
//!   transcript obtained so far is still returned
//! - all stages succeeded → transcript, ticket id, ticket URL
//!
//! The temporary audio file is removed (best-effort) as soon as the
//! transcription attempt has finished, whatever its result. No stage is ever
//! retried.

use crate::audio::SlackAudioFetcher;
use crate::config::AppConfig;
use crate::ticketing::{TicketRef, ZohoDeskClient};
use crate::transcription::DeepgramClient;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

/// Optional submitter/source details forwarded by the webhook caller.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VoiceMetadata {
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub channel_name: Option<String>,
}

/// Flat result shape returned to the webhook caller.
///
/// Serialized as-is; absent fields are omitted from the JSON. A failed run
/// never carries `ticket_id`/`ticket_url`, and carries `transcript` only when
/// the failure happened at the submission stage.
#[derive(Debug, Serialize)]
pub struct PipelineOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PipelineOutcome {
    fn completed(transcript: String, ticket: TicketRef) -> Self {
        Self {
            success: true,
            transcript: Some(transcript),
            ticket_id: ticket.id,
            ticket_url: ticket.url,
            message: Some("Voice message processed successfully".to_string()),
            error: None,
        }
    }

    fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            transcript: None,
            ticket_id: None,
            ticket_url: None,
            message: None,
            error: Some(error.into()),
        }
    }

    fn failed_after_transcription(transcript: String, error: impl Into<String>) -> Self {
        Self {
            transcript: Some(transcript),
            ..Self::failed(error)
        }
    }
}

/// The three stage clients, constructed once at startup and shared across
/// requests. Each run owns its temporary audio file, so concurrent requests
/// never interfere with one another.
pub struct VoicePipeline {
    fetcher: SlackAudioFetcher,
    transcriber: DeepgramClient,
    ticketing: ZohoDeskClient,
}

impl VoicePipeline {
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        Ok(Self {
            fetcher: SlackAudioFetcher::new()?,
            transcriber: DeepgramClient::new(&config.deepgram)?,
            ticketing: ZohoDeskClient::new(&config.zoho)?,
        })
    }

    /// Run the full download → transcribe → ticket sequence for one request.
    pub async fn process(
        &self,
        file_url: &str,
        slack_token: &str,
        metadata: Option<VoiceMetadata>,
    ) -> PipelineOutcome {
        let run_id = Uuid::new_v4();
        info!(%run_id, file_url = %file_url, "Starting voice message processing");

        let audio = match self.fetcher.fetch(file_url, slack_token).await {
            Ok(audio) => audio,
            Err(e) => {
                error!(%run_id, error = %e, "Audio download failed");
                return PipelineOutcome::failed("Failed to download audio from Slack");
            }
        };

        let transcription = self.transcriber.transcribe(&audio).await;
        // The downloaded file has served its purpose once transcription has
        // been attempted; remove it before looking at the result.
        audio.cleanup();

        let transcript = match transcription {
            Ok(transcript) => transcript,
            Err(e) => {
                error!(%run_id, error = %e, "Transcription failed");
                return PipelineOutcome::failed("Transcription failed");
            }
        };

        match self.ticketing.submit(&transcript, metadata.as_ref()).await {
            Ok(ticket) => {
                info!(%run_id, ticket_id = ?ticket.id, "Voice message processed successfully");
                PipelineOutcome::completed(transcript, ticket)
            }
            Err(e) => {
                error!(%run_id, error = %e, "Ticket creation failed");
                PipelineOutcome::failed_after_transcription(transcript, e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_outcome_never_carries_ticket_fields() {
        let outcome = PipelineOutcome::failed("Transcription failed");
        let json = serde_json::to_value(&outcome).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Transcription failed");
        assert!(json.get("ticket_id").is_none());
        assert!(json.get("ticket_url").is_none());
        assert!(json.get("transcript").is_none());
    }

    #[test]
    fn test_submission_failure_keeps_transcript() {
        let outcome = PipelineOutcome::failed_after_transcription(
            "please reset my password".to_string(),
            "HTTP 503: try later",
        );
        let json = serde_json::to_value(&outcome).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["transcript"], "please reset my password");
        assert_eq!(json["error"], "HTTP 503: try later");
        assert!(json.get("ticket_id").is_none());
    }

    #[test]
    fn test_completed_outcome_shape() {
        let ticket = TicketRef {
            id: Some("1892000000042001".to_string()),
            url: Some("https://desk.zoho.com/desk/v1/tickets/1892000000042001".to_string()),
        };
        let outcome = PipelineOutcome::completed("hello".to_string(), ticket);
        let json = serde_json::to_value(&outcome).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["transcript"], "hello");
        assert_eq!(json["ticket_id"], "1892000000042001");
        assert_eq!(
            json["ticket_url"],
            "https://desk.zoho.com/desk/v1/tickets/1892000000042001"
        );
        assert_eq!(json["message"], "Voice message processed successfully");
        assert!(json.get("error").is_none());
    }
}
