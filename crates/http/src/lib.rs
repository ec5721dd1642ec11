//! Wallet HTTP module providing the session-aware API client
//!
//! The client gates protected calls on the persisted auth flag and
//! transparently refreshes an expired session once before giving up.

pub mod types;

#[cfg(feature = "client")]
pub mod client;

#[cfg(feature = "client")]
pub use client::{ApiClient, ApiClientBuilder, ApiResponse, ClientError, RequestDescriptor};
