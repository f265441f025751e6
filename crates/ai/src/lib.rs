//! AI assistant integration for petbook-rs.
//!
//! Everything here sits behind the [`client::TextGenerator`] trait; the rest of
//! the workspace never talks to the Gemini API directly. The assistant posts
//! answers through the regular Q&A service, so AI answers obey the same
//! invariants as human ones.

pub mod assistant;
pub mod client;
pub mod medical;

pub use assistant::AnswerAssistant;
pub use client::{Attachment, GeminiClient, GenerationRequest, TextGenerator};
pub use medical::MedicalExtractor;
