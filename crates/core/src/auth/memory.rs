use super::AuthFlagStore;
use std::sync::atomic::{AtomicBool, Ordering};

/// Flag store that lives as long as the process
#[derive(Debug, Default)]
pub struct MemoryFlagStore {
    flag: AtomicBool,
}

impl MemoryFlagStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start out authenticated, handy for seeding tests
    pub fn authenticated() -> Self {
        Self {
            flag: AtomicBool::new(true),
        }
    }
}

impl AuthFlagStore for MemoryFlagStore {
    fn set(&self, authenticated: bool) {
        self.flag.store(authenticated, Ordering::SeqCst);
    }

    fn get(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
