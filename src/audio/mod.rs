//! # Audio Acquisition Module
//!
//! Handles retrieval of voice-message audio referenced by incoming webhooks.
//!
//! ## Key Components:
//! - **Fetcher**: authenticated download of the Slack-hosted file
//! - **AudioFile**: scoped temporary file owning the downloaded bytes,
//!   labeled with an extension inferred from the response content type
//!
//! The extension is a best-effort label for downstream services; nothing here
//! validates the actual audio encoding.

pub mod fetcher;

pub use fetcher::{AudioFile, FetchError, SlackAudioFetcher};
