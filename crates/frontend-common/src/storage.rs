//! Browser-backed auth flag

use gloo::storage::{LocalStorage, Storage};
use tracing::warn;
use wallet_core::auth::{AUTH_FLAG_KEY, AUTH_FLAG_MARKER, is_marker};
use wallet_core::AuthFlagStore;

/// Flag kept in `localStorage` under [`AUTH_FLAG_KEY`]. Storage errors
/// (quota, private mode) read as logged out.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageFlagStore;

impl AuthFlagStore for LocalStorageFlagStore {
    fn set(&self, authenticated: bool) {
        let storage = LocalStorage::raw();
        let result = if authenticated {
            storage.set_item(AUTH_FLAG_KEY, AUTH_FLAG_MARKER)
        } else {
            storage.remove_item(AUTH_FLAG_KEY)
        };
        if let Err(e) = result {
            warn!("Failed to write auth flag: {e:?}");
        }
    }

    fn get(&self) -> bool {
        let raw = LocalStorage::raw().get_item(AUTH_FLAG_KEY).ok().flatten();
        is_marker(raw.as_deref())
    }
}
