//! Pre-flight check for protected requests

use super::{ClientError, RequestDescriptor};
use std::sync::Arc;
use tracing::debug;
use wallet_core::{AuthFlagStore, PublicEndpoints};

/// Rejects protected requests while the auth flag says the client is
/// logged out, so calls that would certainly fail never hit the network.
#[derive(Clone)]
pub struct RequestGate {
    endpoints: Arc<PublicEndpoints>,
    flags: Arc<dyn AuthFlagStore>,
}

impl RequestGate {
    pub fn new(endpoints: Arc<PublicEndpoints>, flags: Arc<dyn AuthFlagStore>) -> Self {
        Self { endpoints, flags }
    }

    pub fn is_public(&self, request: &RequestDescriptor) -> bool {
        request.public || self.endpoints.is_public(&request.path)
    }

    /// Let the request through or reject it without touching the network
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Unauthenticated`] for a protected request
    /// while the flag is unset
    pub fn check(&self, request: &RequestDescriptor) -> Result<(), ClientError> {
        if self.is_public(request) || self.flags.get() {
            return Ok(());
        }

        debug!(%request, "Skipping protected request, client is not authenticated");
        Err(ClientError::Unauthenticated {
            request: request.clone(),
        })
    }
}
