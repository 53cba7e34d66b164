//! Shared type definitions.

pub mod category;
pub mod email;
pub mod expiry;
pub mod id;
pub mod status;

pub use category::{DEFAULT_CATEGORY, KNOWN_CATEGORIES, normalize_category};
pub use email::{Email, EmailError};
pub use expiry::{ExpiryClass, ExpiryStatus, SOON_THRESHOLD_DAYS, classify};
pub use id::{ItemId, UserId};
pub use status::ItemStatus;
