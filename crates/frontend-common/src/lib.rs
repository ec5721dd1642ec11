//! Session handling shared by wallet front ends: the auth service that owns
//! the persisted flag, and the [`AuthHandle`] facade views read from.

pub mod auth;
pub mod client;
pub mod services;
#[cfg(target_arch = "wasm32")]
pub mod storage;

pub use auth::{AuthAction, AuthHandle, AuthView, MountGuard, get_user_friendly_error};
pub use services::{AuthError, AuthService, Credentials, with_auth_error_handling};
