//! User API client methods

use super::{ApiClient, ClientError, RequestDescriptor};
use crate::types::{CreateUserRequest, CreateUserResponse, UserDto};

/// Registration is `POST`, listing is `GET` and needs a session
const USERS_PATH: &str = "/users";

impl ApiClient {
    /// Create an account; public although `/users` itself is not
    pub async fn register(
        &self,
        request: &CreateUserRequest,
    ) -> Result<CreateUserResponse, ClientError> {
        let req = RequestDescriptor::post(USERS_PATH)
            .as_public()
            .with_json(request)?;
        self.execute(req).await
    }

    /// List users (requires authentication)
    pub async fn list_users(&self) -> Result<Vec<UserDto>, ClientError> {
        self.execute(RequestDescriptor::get(USERS_PATH)).await
    }
}
