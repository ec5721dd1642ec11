//! Authentication state exposed to the UI
//!
//! [`AuthHandle`] is the one place views read auth state from. It mirrors the
//! session service into an [`AuthView`] published on a watch channel, so any
//! UI layer can subscribe and re-render on change.

use crate::services::auth::{AuthError, AuthService, Credentials};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Authentication state as seen by views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthView {
    pub is_logged_in: bool,
    /// True until the first server verification after mount has landed
    pub is_loading: bool,
}

/// Authentication state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    /// The server answered the status check
    Verified(bool),
    LoggedIn,
    LoggedOut,
}

impl AuthView {
    /// Optimistic state before the server has been asked
    pub fn initial(flagged: bool) -> Self {
        Self {
            is_logged_in: flagged,
            is_loading: true,
        }
    }

    #[must_use]
    pub fn reduce(self, action: AuthAction) -> Self {
        match action {
            AuthAction::Verified(authenticated) => Self {
                is_logged_in: authenticated,
                is_loading: false,
            },
            AuthAction::LoggedIn => Self {
                is_logged_in: true,
                ..self
            },
            AuthAction::LoggedOut => Self {
                is_logged_in: false,
                ..self
            },
        }
    }
}

/// Cancels the pending mount verification when dropped
#[derive(Debug)]
pub struct MountGuard {
    token: CancellationToken,
}

impl MountGuard {
    /// Unmount explicitly
    pub fn unmount(self) {}

    pub fn is_mounted(&self) -> bool {
        !self.token.is_cancelled()
    }
}

impl Drop for MountGuard {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Handle to the shared authentication state
#[derive(Clone)]
pub struct AuthHandle {
    service: AuthService,
    state: Arc<watch::Sender<AuthView>>,
}

impl AuthHandle {
    /// Seed the state from the persisted flag; nothing is verified yet
    pub fn new(service: AuthService) -> Self {
        let (state, _) = watch::channel(AuthView::initial(service.is_flagged()));
        Self {
            service,
            state: Arc::new(state),
        }
    }

    pub fn service(&self) -> &AuthService {
        &self.service
    }

    pub fn view(&self) -> AuthView {
        *self.state.borrow()
    }

    pub fn is_logged_in(&self) -> bool {
        self.view().is_logged_in
    }

    pub fn is_loading(&self) -> bool {
        self.view().is_loading
    }

    /// Receive every state change
    pub fn subscribe(&self) -> watch::Receiver<AuthView> {
        self.state.subscribe()
    }

    pub fn dispatch(&self, action: AuthAction) {
        self.state.send_modify(|view| *view = view.reduce(action));
    }

    /// Start the on-mount verification.
    ///
    /// The returned future asks the server for the session status and
    /// applies the answer, to the view and the persisted flag, only while
    /// the guard is alive; the caller drives it on whatever executor the UI
    /// uses. Dropping the guard discards a late answer silently.
    pub fn mount(&self) -> (MountGuard, impl Future<Output = ()> + 'static) {
        let token = CancellationToken::new();
        let guard = MountGuard {
            token: token.clone(),
        };
        let handle = self.clone();

        let verification = async move {
            match handle.service.check_status_until(&token).await {
                Some(authenticated) => handle.dispatch(AuthAction::Verified(authenticated)),
                None => debug!("Unmounted before auth verification finished"),
            }
        };

        (guard, verification)
    }

    /// Mount and drive the verification on the browser's event loop
    #[cfg(target_arch = "wasm32")]
    pub fn mount_local(&self) -> MountGuard {
        let (guard, verification) = self.mount();
        wasm_bindgen_futures::spawn_local(verification);
        guard
    }

    /// Log in; the error is handed back so the view can show it
    ///
    /// # Errors
    ///
    /// Returns the session service's error, state stays logged out
    pub async fn login(&self, email: &str, password: &str) -> Result<(), AuthError> {
        match self.service.login(&Credentials::new(email, password)).await {
            Ok(()) => {
                self.dispatch(AuthAction::LoggedIn);
                Ok(())
            }
            Err(e) => {
                self.dispatch(AuthAction::LoggedOut);
                Err(e)
            }
        }
    }

    /// Log out; always ends logged out even if the server call failed
    pub async fn logout(&self) {
        if let Err(e) = self.service.logout().await {
            debug!("Ignoring logout failure: {e}");
        }
        self.dispatch(AuthAction::LoggedOut);
    }
}
