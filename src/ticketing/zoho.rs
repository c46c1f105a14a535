//! Zoho Desk API client for filing transcription tickets.

use crate::config::ZohoConfig;
use crate::pipeline::VoiceMetadata;
use chrono::{DateTime, Local};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{error, info, warn};

const SUBMIT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur while creating a ticket.
#[derive(Debug)]
pub enum SubmissionError {
    /// Zoho Desk API key or organization id not configured
    Unconfigured,
    /// Zoho Desk returned a non-success status
    ServiceError { status: u16, body: String },
    /// Network-level failure, or an unreadable response body
    Transport(String),
}

impl std::fmt::Display for SubmissionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionError::Unconfigured => {
                write!(f, "Zoho Desk credentials not configured")
            }
            SubmissionError::ServiceError { status, body } => {
                write!(f, "HTTP {}: {}", status, body)
            }
            SubmissionError::Transport(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for SubmissionError {}

/// Reference to a ticket created in Zoho Desk.
///
/// `id` is `None` in the unusual case where Desk answers 200/201 without an
/// `id` field; the ticket still exists downstream, we just cannot point at it.
#[derive(Debug, Clone)]
pub struct TicketRef {
    pub id: Option<String>,
    pub url: Option<String>,
}

/// Ticket payload in the shape the Desk tickets API expects.
#[derive(Debug, Serialize)]
pub struct TicketPayload {
    pub subject: String,
    pub description: String,
    #[serde(rename = "departmentId")]
    pub department_id: String,
    pub priority: String,
    pub status: String,
    pub channel: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<TicketContact>,
}

#[derive(Debug, Serialize)]
pub struct TicketContact {
    #[serde(rename = "firstName")]
    pub first_name: String,
    pub email: String,
}

/// Compose the ticket for a transcript.
///
/// Subject carries the timestamp to minute precision; the description embeds
/// the transcript, a provenance footer with the full-precision timestamp, and
/// a source-channel line when the webhook metadata names one.
fn build_ticket_payload(
    transcript: &str,
    metadata: Option<&VoiceMetadata>,
    department_id: Option<&str>,
    now: DateTime<Local>,
) -> TicketPayload {
    let mut description = format!(
        "**Voice Message Transcription**\n\n{}\n\n---\n\
         *Generated automatically from Slack voice message*\n*Timestamp: {}*",
        transcript,
        now.to_rfc3339()
    );

    if let Some(channel_name) = metadata.and_then(|m| m.channel_name.as_deref()) {
        description.push_str(&format!("\n\n**Source Channel:** {}", channel_name));
    }

    let contact = metadata
        .and_then(|m| m.user_name.as_deref())
        .map(|name| TicketContact {
            first_name: name.to_string(),
            email: metadata
                .and_then(|m| m.user_email.clone())
                .unwrap_or_else(|| "unknown@example.com".to_string()),
        });

    TicketPayload {
        subject: format!(
            "Voice Message Transcription - {}",
            now.format("%Y-%m-%d %H:%M")
        ),
        description,
        department_id: department_id.unwrap_or("default").to_string(),
        priority: "Medium".to_string(),
        status: "Open".to_string(),
        channel: "Voice Message".to_string(),
        contact,
    }
}

/// Desk ids arrive as JSON strings, but tolerate numeric ids too.
fn ticket_id_from(body: &serde_json::Value) -> Option<String> {
    match body.get("id") {
        Some(serde_json::Value::String(id)) => Some(id.clone()),
        Some(serde_json::Value::Number(id)) => Some(id.to_string()),
        _ => None,
    }
}

/// Client for the Zoho Desk tickets API.
pub struct ZohoDeskClient {
    client: Client,
    api_key: Option<String>,
    org_id: Option<String>,
    department_id: Option<String>,
    endpoint: String,
}

impl ZohoDeskClient {
    pub fn new(config: &ZohoConfig) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(SUBMIT_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_key: trimmed(config.api_key.as_deref()),
            org_id: trimmed(config.org_id.as_deref()),
            department_id: trimmed(config.department_id.as_deref()),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// Create a ticket for the transcript and return a reference to it.
    ///
    /// The configuration check runs before any network I/O.
    pub async fn submit(
        &self,
        transcript: &str,
        metadata: Option<&VoiceMetadata>,
    ) -> Result<TicketRef, SubmissionError> {
        let (api_key, org_id) = match (self.api_key.as_deref(), self.org_id.as_deref()) {
            (Some(key), Some(org)) => (key, org),
            _ => return Err(SubmissionError::Unconfigured),
        };

        let payload = build_ticket_payload(
            transcript,
            metadata,
            self.department_id.as_deref(),
            Local::now(),
        );

        info!(subject = %payload.subject, "Creating Zoho Desk ticket");

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("orgId", org_id)
            .json(&payload)
            .send()
            .await
            .map_err(|e| SubmissionError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 && status != 201 {
            let body = response.text().await.unwrap_or_default();
            error!(status = status, body = %body, "Zoho Desk ticket creation failed");
            return Err(SubmissionError::ServiceError { status, body });
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| SubmissionError::Transport(e.to_string()))?;

        match ticket_id_from(&body) {
            Some(id) => {
                let url = format!("{}/{}", self.endpoint, id);
                info!(ticket_id = %id, "Zoho Desk ticket created");
                Ok(TicketRef {
                    id: Some(id),
                    url: Some(url),
                })
            }
            None => {
                warn!("Zoho Desk accepted the ticket but returned no id");
                Ok(TicketRef { id: None, url: None })
            }
        }
    }
}

fn trimmed(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}
