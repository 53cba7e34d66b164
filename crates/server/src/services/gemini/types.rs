//! Types for the Gemini API.
//!
//! These types match the `generateContent` request/response format.

use serde::{Deserialize, Serialize};

/// Request body for the Gemini `generateContent` API.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    /// Conversation contents. A single-turn request holds one entry.
    pub contents: Vec<Content>,
}

/// A single content entry: an ordered list of parts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    /// The parts making up this content.
    pub parts: Vec<Part>,
}

/// A part within a content entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Part {
    /// Plain text.
    #[serde(rename = "text")]
    Text(String),
    /// Inline binary data (images), base64 encoded.
    InlineData {
        /// MIME type of the data, e.g. `image/jpeg`.
        #[serde(rename = "mimeType")]
        mime_type: String,
        /// Base64-encoded bytes.
        data: String,
    },
}

/// Response from the Gemini `generateContent` API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Generated candidates. Usually exactly one.
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// A generated candidate.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// The candidate's content.
    pub content: Option<Content>,
    /// Reason generation stopped (e.g. `STOP`, `MAX_TOKENS`, `SAFETY`).
    #[serde(default)]
    pub finish_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenate the text parts of the first candidate.
    ///
    /// Returns `None` when there is no candidate or no text part at all.
    #[must_use]
    pub fn first_candidate_text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let mut text = String::new();
        for part in &content.parts {
            if let Part::Text(t) = part {
                text.push_str(t);
            }
        }
        if text.is_empty() { None } else { Some(text) }
    }
}
