//! Client-side authenticated-state flag
//!
//! The flag is the client's cached belief that the remote session is alive.
//! It is read before every protected request and written by the session
//! service (login, logout, status checks) and by the refresh path when a
//! session turns out to be dead.

mod memory;
#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use memory::MemoryFlagStore;
#[cfg(not(target_arch = "wasm32"))]
pub use file::FileFlagStore;

/// Name the flag is persisted under
pub const AUTH_FLAG_KEY: &str = "isAuthenticated";

/// The only persisted value that reads back as authenticated
pub const AUTH_FLAG_MARKER: &str = "true";

/// Durable key/value storage for the authenticated flag.
///
/// Writes are idempotent and last-writer-wins. Implementations never fail:
/// persistence problems are logged and the read side falls back to `false`.
pub trait AuthFlagStore: Send + Sync {
    /// Persist the flag when `true`, remove it when `false`
    fn set(&self, authenticated: bool);

    /// `true` only when the stored value is exactly the marker
    fn get(&self) -> bool;

    /// Remove the flag
    fn clear(&self) {
        self.set(false);
    }
}

/// Interpret a raw persisted value, failing closed on anything unexpected
pub fn is_marker(raw: Option<&str>) -> bool {
    raw == Some(AUTH_FLAG_MARKER)
}
