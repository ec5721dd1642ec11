//! Wallet core types and utilities
//!
//! Shared by the HTTP client, the frontend session layer and the CLI: the
//! persisted auth flag, the public endpoint policy and client settings.

pub mod auth;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod validation;

pub use auth::{AuthFlagStore, MemoryFlagStore};
#[cfg(not(target_arch = "wasm32"))]
pub use auth::FileFlagStore;
pub use config::{ClientSettings, DEFAULT_USER_AGENT};
pub use endpoints::PublicEndpoints;
pub use error::{CoreError, CoreResult};
pub use validation::ValidateConfig;
