//! Gemini API integration for image recognition.

mod client;
mod error;
mod types;

pub use client::GeminiClient;
pub use error::GeminiError;
