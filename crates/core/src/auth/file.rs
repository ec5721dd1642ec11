//! Durable flag store for native front ends

use super::{AUTH_FLAG_KEY, AUTH_FLAG_MARKER, AuthFlagStore, is_marker};
use crate::CoreResult;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Stores the flag as a single file inside a state directory.
///
/// The file holds the marker while authenticated and is absent otherwise,
/// so a reload of the process sees the last written state.
#[derive(Debug, Clone)]
pub struct FileFlagStore {
    path: PathBuf,
}

impl FileFlagStore {
    /// Create a store keeping its file under `dir`
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(AUTH_FLAG_KEY),
        }
    }

    /// Location of the flag file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self) -> CoreResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, AUTH_FLAG_MARKER)?;
        Ok(())
    }

    fn remove(&self) -> CoreResult<()> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

impl AuthFlagStore for FileFlagStore {
    fn set(&self, authenticated: bool) {
        let result = if authenticated {
            self.write()
        } else {
            self.remove()
        };

        match result {
            Ok(()) => debug!(path = %self.path.display(), authenticated, "Auth flag updated"),
            Err(e) => warn!(path = %self.path.display(), "Failed to persist auth flag: {e}"),
        }
    }

    fn get(&self) -> bool {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => is_marker(Some(raw.trim_end())),
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(e) => {
                warn!(path = %self.path.display(), "Failed to read auth flag: {e}");
                false
            }
        }
    }
}
