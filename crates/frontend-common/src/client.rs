//! Client configuration and initialization

use std::sync::Arc;
use wallet_core::{AuthFlagStore, ClientSettings};
use wallet_http::client::{ApiClient, ApiClientBuilder, ClientError};

/// Build a client from settings around the given flag store
pub fn create_client(
    settings: &ClientSettings,
    flags: Arc<dyn AuthFlagStore>,
) -> Result<ApiClient, ClientError> {
    ApiClientBuilder::from_settings(settings)
        .flag_store(flags)
        .build()
}

/// Client whose flag survives restarts in the settings' state directory
#[cfg(not(target_arch = "wasm32"))]
pub fn create_native_client(settings: &ClientSettings) -> Result<ApiClient, ClientError> {
    let flags = wallet_core::FileFlagStore::new(settings.state_dir());
    create_client(settings, Arc::new(flags))
}

/// Get the base URL for API calls
#[cfg(target_arch = "wasm32")]
fn get_base_url() -> String {
    // Try to get from window location
    if let Some(window) = web_sys::window() {
        if let Ok(location) = window.location().origin() {
            return location;
        }
    }

    // Default to relative URLs
    String::new()
}

/// Client for the page's own origin, flag kept in `localStorage`
#[cfg(target_arch = "wasm32")]
pub fn create_browser_client(settings: &ClientSettings) -> Result<ApiClient, ClientError> {
    ApiClientBuilder::from_settings(settings)
        .base_url(get_base_url())
        .flag_store(Arc::new(crate::storage::LocalStorageFlagStore))
        .build()
}
