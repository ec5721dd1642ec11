//! Session API client methods
//!
//! These are plain calls; keeping the auth flag in step with their outcome
//! is the job of the session service built on top of them.

use super::{ApiClient, ClientError, RequestDescriptor};
use crate::types::{AuthStatusResponse, LoginRequest, MessageResponse};
use wallet_core::endpoints::{LOGIN_PATH, LOGOUT_PATH, REFRESH_PATH, STATUS_PATH};

impl ApiClient {
    /// Establish a session; the server answers with session cookies
    pub async fn login(&self, request: &LoginRequest) -> Result<MessageResponse, ClientError> {
        let req = RequestDescriptor::post(LOGIN_PATH).with_json(request)?;
        self.execute(req).await
    }

    /// End the session and drop its cookies
    pub async fn logout(&self) -> Result<(), ClientError> {
        self.post_empty(LOGOUT_PATH).await.map(|_| ())
    }

    /// Exchange the refresh cookie for a renewed session
    pub async fn refresh_session(&self) -> Result<MessageResponse, ClientError> {
        self.execute(RequestDescriptor::post(REFRESH_PATH)).await
    }

    /// Ask the server whether the current session is authenticated
    pub async fn auth_status(&self) -> Result<AuthStatusResponse, ClientError> {
        self.execute(RequestDescriptor::get(STATUS_PATH)).await
    }
}
