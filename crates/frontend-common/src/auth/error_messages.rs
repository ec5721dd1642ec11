//! User-friendly error message mappings

use crate::services::auth::AuthError;
use wallet_http::client::ClientError;

/// Convert session errors to messages a login form can show
pub fn get_user_friendly_error(error: &AuthError) -> String {
    match error {
        AuthError::InvalidCredentials => "Invalid email or password".to_string(),
        AuthError::Client(ClientError::Transport(e)) if e.is_timeout() => {
            "The server took too long to respond. Please try again.".to_string()
        }
        AuthError::Client(ClientError::Transport(_)) => {
            "Unable to reach the server. Check your connection and try again.".to_string()
        }
        AuthError::Client(
            ClientError::Unauthenticated { .. }
            | ClientError::RefreshFailed(_)
            | ClientError::SessionExpired,
        ) => {
            "Your session has expired. Please log in again.".to_string()
        }
        AuthError::Client(ClientError::Status { status, .. }) if status.is_server_error() => {
            "The server ran into a problem. Please try again later.".to_string()
        }
        // Server should provide user-friendly messages for the rest
        AuthError::Client(e) => e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_credentials_message() {
        assert_eq!(
            get_user_friendly_error(&AuthError::InvalidCredentials),
            "Invalid email or password"
        );
    }

    #[test]
    fn test_configuration_error_passes_through() {
        let error = AuthError::Client(ClientError::Configuration("base_url is required".into()));
        assert_eq!(
            get_user_friendly_error(&error),
            "Invalid configuration: base_url is required"
        );
    }
}
