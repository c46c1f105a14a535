//! Downloads voice-message audio from Slack into a scoped temporary file.

use reqwest::Client;
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tempfile::NamedTempFile;
use tracing::{info, warn};

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur while downloading audio from Slack.
#[derive(Debug)]
pub enum FetchError {
    /// Slack answered with something other than 200 OK
    Status(u16),
    /// Network-level failure (DNS, TLS, timeout, ...)
    Transport(String),
    /// Writing the downloaded bytes to temporary storage failed
    Io(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Status(status) => {
                write!(f, "Slack file download returned HTTP {}", status)
            }
            FetchError::Transport(msg) => write!(f, "Slack file download failed: {}", msg),
            FetchError::Io(msg) => write!(f, "Failed to store downloaded audio: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

/// A downloaded voice message, backed by a uniquely named temporary file.
///
/// Ownership belongs to a single pipeline run. The file is removed when
/// [`AudioFile::cleanup`] is called; dropping the value without calling it
/// still removes the file as a backstop.
#[derive(Debug)]
pub struct AudioFile {
    file: NamedTempFile,
    extension: &'static str,
}

impl AudioFile {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn extension(&self) -> &'static str {
        self.extension
    }

    /// Remove the temporary file. Best-effort: a failed removal is logged
    /// and swallowed, never surfaced to the caller.
    pub fn cleanup(self) {
        let path = self.file.path().display().to_string();
        if let Err(e) = self.file.close() {
            warn!(path = %path, error = %e, "Failed to remove temporary audio file");
        }
    }
}

/// Map a response content type onto a file extension label.
///
/// Anything unrecognized (or absent) defaults to `.mp3`, matching what the
/// transcription service is told about the payload later on.
pub fn extension_for_content_type(content_type: Option<&str>) -> &'static str {
    match content_type {
        Some(ct) if ct.contains("audio/mpeg") => ".mp3",
        Some(ct) if ct.contains("audio/wav") => ".wav",
        _ => ".mp3",
    }
}

/// Authenticated downloader for Slack-hosted files.
pub struct SlackAudioFetcher {
    client: Client,
}

impl SlackAudioFetcher {
    pub fn new() -> anyhow::Result<Self> {
        let client = Client::builder().timeout(DOWNLOAD_TIMEOUT).build()?;
        Ok(Self { client })
    }

    /// Download `file_url` using the provided bearer token and persist the
    /// body to a new temporary file. Success is exactly HTTP 200.
    pub async fn fetch(&self, file_url: &str, slack_token: &str) -> Result<AudioFile, FetchError> {
        info!(file_url = %file_url, "Downloading audio from Slack");

        let response = self
            .client
            .get(file_url)
            .header("Authorization", format!("Bearer {}", slack_token))
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(FetchError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let extension = extension_for_content_type(content_type.as_deref());

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let mut file = tempfile::Builder::new()
            .prefix("slack-voice-")
            .suffix(extension)
            .tempfile()
            .map_err(|e| FetchError::Io(e.to_string()))?;
        file.write_all(&body)
            .map_err(|e| FetchError::Io(e.to_string()))?;
        file.flush().map_err(|e| FetchError::Io(e.to_string()))?;

        info!(
            path = %file.path().display(),
            bytes = body.len(),
            extension = extension,
            "Audio downloaded"
        );

        Ok(AudioFile { file, extension })
    }
}

/// Build an [`AudioFile`] from raw bytes without touching the network.
#[cfg(test)]
pub(crate) fn test_audio_file(bytes: &[u8], extension: &'static str) -> AudioFile {
    let mut file = tempfile::Builder::new()
        .prefix("slack-voice-")
        .suffix(extension)
        .tempfile()
        .unwrap();
    file.write_all(bytes).unwrap();
    AudioFile { file, extension }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_for_mpeg() {
        assert_eq!(extension_for_content_type(Some("audio/mpeg")), ".mp3");
        assert_eq!(
            extension_for_content_type(Some("audio/mpeg; charset=binary")),
            ".mp3"
        );
    }

    #[test]
    fn test_extension_for_wav() {
        assert_eq!(extension_for_content_type(Some("audio/wav")), ".wav");
    }

    #[test]
    fn test_extension_defaults_to_mp3() {
        assert_eq!(extension_for_content_type(Some("audio/ogg")), ".mp3");
        assert_eq!(extension_for_content_type(Some("application/octet-stream")), ".mp3");
        assert_eq!(extension_for_content_type(None), ".mp3");
    }

    #[test]
    fn test_cleanup_removes_file() {
        let audio = test_audio_file(b"fake audio", ".mp3");
        let path = audio.path().to_path_buf();
        assert!(path.exists());
        assert_eq!(audio.extension(), ".mp3");

        audio.cleanup();
        assert!(!path.exists());
    }

    #[test]
    fn test_status_error_display() {
        let err = FetchError::Status(403);
        assert!(err.to_string().contains("403"));
    }
}
