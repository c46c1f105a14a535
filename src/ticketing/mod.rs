//! # Ticketing Module
//!
//! Files transcripts as support tickets in Zoho Desk.
//!
//! ## Key Components:
//! - **ZohoDeskClient**: composes the ticket payload (subject, description
//!   with provenance footer, optional contact) and submits it
//! - **TicketRef**: identifier and URL of the created ticket
//! - **SubmissionError**: configuration, service, and transport failures;
//!   unlike the earlier stages, its text is surfaced verbatim to the caller

pub mod zoho;

pub use zoho::{SubmissionError, TicketRef, ZohoDeskClient};
