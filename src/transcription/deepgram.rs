//! Deepgram API client for speech-to-text transcription.

use crate::audio::AudioFile;
use crate::config::DeepgramConfig;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{error, info};

const TRANSCRIBE_TIMEOUT: Duration = Duration::from_secs(60);

/// Errors that can occur during transcription.
#[derive(Debug)]
pub enum TranscriptionError {
    /// Deepgram API key not configured
    Unconfigured,
    /// Reading the downloaded audio file failed
    FileRead(String),
    /// Network-level failure talking to Deepgram
    Transport(String),
    /// Deepgram returned a non-200 status
    ServiceError { status: u16, body: String },
    /// The response did not contain a transcript where expected
    MalformedResponse(String),
}

impl std::fmt::Display for TranscriptionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranscriptionError::Unconfigured => {
                write!(f, "Deepgram API key not configured")
            }
            TranscriptionError::FileRead(msg) => {
                write!(f, "Failed to read audio file: {}", msg)
            }
            TranscriptionError::Transport(msg) => write!(f, "Deepgram request failed: {}", msg),
            TranscriptionError::ServiceError { status, body } => {
                write!(f, "Deepgram error ({}): {}", status, body)
            }
            TranscriptionError::MalformedResponse(msg) => {
                write!(f, "Unexpected Deepgram response: {}", msg)
            }
        }
    }
}

impl std::error::Error for TranscriptionError {}

/// Pre-recorded listen response, pared down to the fields we navigate.
#[derive(Debug, Deserialize)]
struct ListenResponse {
    results: ListenResults,
}

#[derive(Debug, Deserialize)]
struct ListenResults {
    channels: Vec<ChannelResult>,
}

#[derive(Debug, Deserialize)]
struct ChannelResult {
    alternatives: Vec<Alternative>,
}

#[derive(Debug, Deserialize)]
struct Alternative {
    transcript: String,
}

/// Take the first channel's first alternative, whitespace-trimmed.
fn extract_transcript(response: ListenResponse) -> Result<String, TranscriptionError> {
    response
        .results
        .channels
        .first()
        .and_then(|channel| channel.alternatives.first())
        .map(|alternative| alternative.transcript.trim().to_string())
        .ok_or_else(|| {
            TranscriptionError::MalformedResponse(
                "response contained no transcript alternatives".to_string(),
            )
        })
}

/// Client for the Deepgram pre-recorded listen endpoint.
pub struct DeepgramClient {
    client: Client,
    api_key: Option<String>,
    model: String,
    language: String,
    endpoint: String,
}

impl DeepgramClient {
    pub fn new(config: &DeepgramConfig) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(TRANSCRIBE_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_key: config
                .api_key
                .as_deref()
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_owned),
            model: config.model.clone(),
            language: config.language.clone(),
            endpoint: config.endpoint.clone(),
        })
    }

    /// Upload the audio file and return the trimmed transcript.
    ///
    /// The configuration check runs before any file or network I/O so an
    /// unconfigured deployment fails fast and cheap.
    pub async fn transcribe(&self, audio: &AudioFile) -> Result<String, TranscriptionError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(TranscriptionError::Unconfigured)?;

        info!(path = %audio.path().display(), "Transcribing with Deepgram");

        let bytes = tokio::fs::read(audio.path())
            .await
            .map_err(|e| TranscriptionError::FileRead(e.to_string()))?;

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[
                ("model", self.model.as_str()),
                ("language", self.language.as_str()),
                ("punctuate", "true"),
                ("smart_format", "true"),
            ])
            .header("Authorization", format!("Token {}", api_key))
            // Fixed label, even when the download was stored as .wav.
            .header("Content-Type", "audio/mp3")
            .body(bytes)
            .send()
            .await
            .map_err(|e| TranscriptionError::Transport(e.to_string()))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), body = %body, "Deepgram transcription failed");
            return Err(TranscriptionError::ServiceError {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ListenResponse = response
            .json()
            .await
            .map_err(|e| TranscriptionError::MalformedResponse(e.to_string()))?;

        let transcript = extract_transcript(parsed)?;
        info!(chars = transcript.len(), "Deepgram transcription successful");
        Ok(transcript)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ListenResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_extracts_first_alternative_of_first_channel() {
        let response = parse(
            r#"{
                "results": {
                    "channels": [
                        {"alternatives": [
                            {"transcript": "  My printer is on fire.  "},
                            {"transcript": "My printer is on hire."}
                        ]},
                        {"alternatives": [{"transcript": "second channel"}]}
                    ]
                }
            }"#,
        );
        let transcript = extract_transcript(response).unwrap();
        assert_eq!(transcript, "My printer is on fire.");
    }

    #[test]
    fn test_empty_channels_is_malformed() {
        let response = parse(r#"{"results": {"channels": []}}"#);
        assert!(matches!(
            extract_transcript(response),
            Err(TranscriptionError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_empty_alternatives_is_malformed() {
        let response = parse(r#"{"results": {"channels": [{"alternatives": []}]}}"#);
        assert!(matches!(
            extract_transcript(response),
            Err(TranscriptionError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_missing_results_fails_to_parse() {
        let result = serde_json::from_str::<ListenResponse>(r#"{"metadata": {}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_unconfigured_display_names_the_credential() {
        let err = TranscriptionError::Unconfigured;
        assert!(err.to_string().contains("Deepgram API key"));
    }

    #[test]
    fn test_service_error_display_includes_status_and_body() {
        let err = TranscriptionError::ServiceError {
            status: 402,
            body: "insufficient credits".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("402"));
        assert!(text.contains("insufficient credits"));
    }

    #[tokio::test]
    async fn test_unconfigured_client_fails_before_any_io() {
        let config = crate::config::DeepgramConfig {
            api_key: None,
            model: "nova-2".to_string(),
            language: "en-US".to_string(),
            endpoint: "http://127.0.0.1:9".to_string(),
        };
        let client = DeepgramClient::new(&config).unwrap();
        let audio = crate::audio::fetcher::test_audio_file(b"fake audio", ".mp3");

        let result = client.transcribe(&audio).await;
        assert!(matches!(result, Err(TranscriptionError::Unconfigured)));
    }
}
