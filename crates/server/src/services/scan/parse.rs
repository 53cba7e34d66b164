//! Defensive parsing of the vision model's response.
//!
//! The model is instructed to answer with a bare JSON object, but in
//! practice responses arrive wrapped in markdown fences or prose. The
//! parser extracts the first balanced brace-delimited object and ignores
//! everything around it.

use serde::Deserialize;

/// Fields recognized from a scan response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recognition {
    /// Item name as printed on the packaging.
    pub name: String,
    /// Best-matching category from the prompt vocabulary.
    #[serde(default)]
    pub category: Option<String>,
    /// Estimated days until expiry.
    #[serde(default)]
    pub days_to_expire: Option<i64>,
    /// Whether an explicit date was visible, vs. estimated.
    #[serde(default)]
    pub found_expiry_date: bool,
}

/// Parse a raw model response into a [`Recognition`].
///
/// Returns `None` when no JSON object is present, the object does not
/// deserialize, or the name is missing/empty.
#[must_use]
pub fn parse_recognition(raw: &str) -> Option<Recognition> {
    let json = extract_json_object(raw)?;
    let recognition: Recognition = serde_json::from_str(json).ok()?;

    if recognition.name.trim().is_empty() {
        return None;
    }

    Some(recognition)
}

/// Extract the first balanced brace-delimited object from `raw`.
///
/// Tracks brace depth and skips braces inside string literals, so an item
/// name like `"Jam {homemade}"` does not truncate the object.
fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in raw[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&raw[start..=start + offset]);
                }
            }
            _ => {}
        }
    }

    None
}
