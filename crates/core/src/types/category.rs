//! Item category vocabulary.
//!
//! Categories are stored as plain text, but the vision prompt asks the model
//! to pick from this closed list, and anything absent normalizes to
//! [`DEFAULT_CATEGORY`].

/// Category used when none is supplied or recognized.
pub const DEFAULT_CATEGORY: &str = "General";

/// The closed category vocabulary offered to the vision model.
pub const KNOWN_CATEGORIES: &[&str] = &[
    "Fruit",
    "Vegetable",
    "Dairy",
    "Meat",
    "Bakery",
    "Pantry",
    "Snacks",
    "Medicine",
    "Beverages",
    "Personal Care",
    "Household",
];

/// Normalize an optional category string.
///
/// Empty or missing categories become [`DEFAULT_CATEGORY`]. Non-empty values
/// pass through unchanged, even when outside [`KNOWN_CATEGORIES`]: the
/// vocabulary constrains the prompt, not the storage.
#[must_use]
pub fn normalize_category(category: Option<&str>) -> String {
    match category {
        Some(c) if !c.trim().is_empty() => c.trim().to_owned(),
        _ => DEFAULT_CATEGORY.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_defaults_to_general() {
        assert_eq!(normalize_category(None), "General");
        assert_eq!(normalize_category(Some("")), "General");
        assert_eq!(normalize_category(Some("   ")), "General");
    }

    #[test]
    fn test_known_category_passes_through() {
        assert_eq!(normalize_category(Some("Dairy")), "Dairy");
    }

    #[test]
    fn test_unknown_category_is_kept() {
        assert_eq!(normalize_category(Some("Frozen")), "Frozen");
    }

    #[test]
    fn test_whitespace_trimmed() {
        assert_eq!(normalize_category(Some(" Bakery ")), "Bakery");
    }
}
