//! Authentication API service
//!
//! Sole owner of ordinary auth flag writes: every operation leaves the flag
//! consistent with what the server last said about the session.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use wallet_core::AuthFlagStore;
use wallet_http::client::{ApiClient, ClientError};
use wallet_http::types::LoginRequest;

/// Login form input; lives for a single call and is never stored
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Errors surfaced by session operations
#[derive(Debug, Error)]
pub enum AuthError {
    /// The server rejected the email/password pair
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Network, server or decoding failure
    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Authentication API service
#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
    flags: Arc<dyn AuthFlagStore>,
}

impl AuthService {
    /// Create a service writing to the same flag store the client's gate reads
    pub fn new(client: ApiClient) -> Self {
        let flags = Arc::clone(client.flags());
        Self { client, flags }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Current cached belief, without asking the server
    pub fn is_flagged(&self) -> bool {
        self.flags.get()
    }

    /// Log in and mark the client authenticated
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] when the server refuses the
    /// credentials, [`AuthError::Client`] for any other failure. The flag is
    /// cleared in both cases.
    pub async fn login(&self, credentials: &Credentials) -> Result<(), AuthError> {
        let request = LoginRequest {
            email: credentials.email.clone(),
            password: credentials.password.clone(),
        };

        match self.client.login(&request).await {
            Ok(_) => {
                self.flags.set(true);
                info!(email = %credentials.email, "Logged in");
                Ok(())
            }
            Err(e) => {
                self.flags.clear();
                warn!(email = %credentials.email, "Login failed: {e}");
                if is_credential_rejection(&e) {
                    Err(AuthError::InvalidCredentials)
                } else {
                    Err(AuthError::Client(e))
                }
            }
        }
    }

    /// Log out; the flag is cleared whatever the server says
    ///
    /// # Errors
    ///
    /// Returns the remote failure for logging. Local state is already
    /// logged out when it does.
    pub async fn logout(&self) -> Result<(), AuthError> {
        let result = self.client.logout().await;
        self.flags.clear();

        match result {
            Ok(()) => {
                info!("Logged out");
                Ok(())
            }
            Err(e) => {
                warn!("Logout request failed, local session cleared anyway: {e}");
                Err(e.into())
            }
        }
    }

    /// Ask the server and bring the flag in line with its answer.
    ///
    /// Any failure counts as logged out.
    pub async fn check_status(&self) -> bool {
        self.check_status_until(&CancellationToken::new())
            .await
            .unwrap_or(false)
    }

    /// Like [`AuthService::check_status`], but an answer arriving after
    /// `cancel` fired is dropped and the flag is left alone
    pub async fn check_status_until(&self, cancel: &CancellationToken) -> Option<bool> {
        let result = self.client.auth_status().await;
        if cancel.is_cancelled() {
            debug!("Auth status check cancelled, discarding answer");
            return None;
        }

        match result {
            Ok(status) => {
                debug!(authenticated = status.authenticated, "Auth status verified");
                self.flags.set(status.authenticated);
                Some(status.authenticated)
            }
            Err(e) => {
                warn!("Auth status check failed: {e}");
                self.flags.clear();
                Some(false)
            }
        }
    }
}

fn is_credential_rejection(error: &ClientError) -> bool {
    matches!(
        error,
        ClientError::Status { status, .. } if matches!(status.as_u16(), 400 | 401 | 404)
    )
}
