//! # Transcription Module
//!
//! Speech-to-text via the Deepgram pre-recorded listen API.
//!
//! ## Key Components:
//! - **DeepgramClient**: uploads downloaded audio and extracts the best
//!   transcript alternative from the structured response
//! - **TranscriptionError**: configuration, service, and response-shape
//!   failures, all of which the pipeline reports as a single flat reason
//!
//! The request enables punctuation and smart formatting; model and language
//! are configurable and default to `nova-2` / `en-US`.

pub mod deepgram;

pub use deepgram::{DeepgramClient, TranscriptionError};
