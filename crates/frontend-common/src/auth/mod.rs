//! Authentication module

pub mod context;
pub mod error_messages;

// Re-export commonly used items
pub use context::{AuthAction, AuthHandle, AuthView, MountGuard};
pub use error_messages::get_user_friendly_error;
