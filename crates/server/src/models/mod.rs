//! Domain models.

pub mod item;
pub mod scan;
pub mod session;
pub mod user;

pub use item::Item;
pub use scan::{ScanImage, ScanOutcome, ScanResult};
pub use session::{CurrentUser, keys as session_keys};
pub use user::{Preferences, User};
