//! Business logic services.

pub mod auth;
pub mod email;
pub mod gemini;
pub mod media;
pub mod notify;
pub mod scan;

pub use auth::AuthService;
pub use email::EmailService;
pub use gemini::GeminiClient;
pub use media::MediaStore;
pub use scan::ScanService;
