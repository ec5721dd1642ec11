//! API wrapper utilities for handling authentication errors

use crate::auth::{AuthAction, AuthHandle};
use std::future::Future;
use wallet_http::client::ClientError;

/// Mirror an auth failure into the view state.
///
/// The client has already cleared the persisted flag by the time such an
/// error surfaces; this only keeps the UI from showing a stale session.
pub fn handle_api_error(error: &ClientError, auth: &AuthHandle) {
    if error.is_auth_failure() {
        auth.dispatch(AuthAction::LoggedOut);
    }
}

/// Wrapper for API calls that handles auth errors
pub async fn with_auth_error_handling<T, F>(auth: &AuthHandle, api_call: F) -> Result<T, ClientError>
where
    F: Future<Output = Result<T, ClientError>>,
{
    match api_call.await {
        Ok(result) => Ok(result),
        Err(error) => {
            handle_api_error(&error, auth);
            Err(error)
        }
    }
}
