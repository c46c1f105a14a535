//! # Slack → Transcription → Zoho Desk Worker
//!
//! Webhook relay that downloads a Slack voice message, transcribes it with
//! Deepgram, and files the transcript as a Zoho Desk support ticket.
//!
//! ## Application Architecture:
//! - **config**: application configuration (TOML file + environment variables)
//! - **state**: shared application state and request metrics
//! - **audio**: Slack file download into scoped temporary storage
//! - **transcription**: Deepgram speech-to-text client
//! - **ticketing**: Zoho Desk ticket composition and submission
//! - **pipeline**: the sequential download → transcribe → ticket orchestration
//! - **handlers** / **health**: HTTP endpoints
//! - **middleware**: request logging and counters
//! - **error**: request-level error types and their HTTP responses

pub mod audio;
pub mod config;
pub mod error;
pub mod handlers;
pub mod health;
pub mod middleware;
pub mod pipeline;
pub mod state;
pub mod ticketing;
pub mod transcription;
