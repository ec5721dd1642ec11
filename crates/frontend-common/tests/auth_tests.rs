//! Session service and auth facade against a mock wallet API

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wallet_core::{AuthFlagStore, MemoryFlagStore};
use wallet_frontend_common::{
    AuthError, AuthHandle, AuthService, AuthView, get_user_friendly_error,
    with_auth_error_handling,
};
use wallet_http::client::{ApiClient, ClientError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn handle_for(base_url: &str, authenticated: bool) -> (AuthHandle, Arc<MemoryFlagStore>) {
    let flags = Arc::new(MemoryFlagStore::new());
    flags.set(authenticated);
    let client = ApiClient::builder()
        .base_url(base_url)
        .flag_store(flags.clone())
        .build()
        .unwrap();
    (AuthHandle::new(AuthService::new(client)), flags)
}

async fn mount_status(server: &MockServer, authenticated: bool, delay: Duration) {
    Mock::given(method("GET"))
        .and(path("/auth/status"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"authenticated": authenticated}))
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_initial_view_reflects_flag_before_verification() {
    let (handle, _flags) = handle_for("http://127.0.0.1:1", true);
    assert_eq!(
        handle.view(),
        AuthView {
            is_logged_in: true,
            is_loading: true
        }
    );
}

#[tokio::test]
async fn test_mount_applies_server_answer() {
    let server = MockServer::start().await;
    mount_status(&server, true, Duration::ZERO).await;

    let (handle, flags) = handle_for(&server.uri(), false);
    let mut changes = handle.subscribe();

    let (guard, verification) = handle.mount();
    verification.await;

    assert!(guard.is_mounted());
    assert!(changes.has_changed().unwrap());
    assert_eq!(
        *changes.borrow_and_update(),
        AuthView {
            is_logged_in: true,
            is_loading: false
        }
    );
    assert!(flags.get());
}

#[tokio::test]
async fn test_mount_with_expired_session() {
    let server = MockServer::start().await;
    mount_status(&server, false, Duration::ZERO).await;

    let (handle, flags) = handle_for(&server.uri(), true);
    let (_guard, verification) = handle.mount();
    verification.await;

    assert!(!handle.is_logged_in());
    assert!(!handle.is_loading());
    assert!(!flags.get());
}

#[tokio::test]
async fn test_unmount_before_answer_discards_it() {
    let server = MockServer::start().await;
    mount_status(&server, true, Duration::from_millis(200)).await;

    let (handle, flags) = handle_for(&server.uri(), false);
    let (guard, verification) = handle.mount();
    let pending = tokio::spawn(verification);

    drop(guard);
    pending.await.unwrap();

    assert_eq!(handle.view(), AuthView::initial(false));
    assert!(!flags.get());
}

#[tokio::test]
async fn test_unmount_keeps_flag_of_logged_in_client() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/status"))
        .respond_with(ResponseTemplate::new(500).set_delay(Duration::from_millis(200)))
        .mount(&server)
        .await;

    let (handle, flags) = handle_for(&server.uri(), true);
    let (guard, verification) = handle.mount();
    let pending = tokio::spawn(verification);

    guard.unmount();
    pending.await.unwrap();

    assert!(handle.is_loading());
    assert!(flags.get());
}

#[tokio::test]
async fn test_cancelled_status_check_reports_nothing() {
    let server = MockServer::start().await;
    mount_status(&server, true, Duration::ZERO).await;

    let (handle, flags) = handle_for(&server.uri(), false);
    let cancel = tokio_util::sync::CancellationToken::new();
    cancel.cancel();

    assert_eq!(handle.service().check_status_until(&cancel).await, None);
    assert!(!flags.get());

    let live = tokio_util::sync::CancellationToken::new();
    assert_eq!(handle.service().check_status_until(&live).await, Some(true));
    assert!(flags.get());
}

#[tokio::test]
async fn test_mount_when_server_unreachable() {
    let (handle, flags) = handle_for("http://127.0.0.1:1", true);
    let (_guard, verification) = handle.mount();
    verification.await;

    assert!(!handle.is_logged_in());
    assert!(!handle.is_loading());
    assert!(!flags.get());
}

#[tokio::test]
async fn test_login_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let (handle, flags) = handle_for(&server.uri(), false);
    handle.login("ada@example.com", "correct").await.unwrap();

    assert!(handle.is_logged_in());
    assert!(flags.get());
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "nope"})))
        .mount(&server)
        .await;
    // A rejected login must not attempt a refresh
    Mock::given(method("POST"))
        .and(path("/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (handle, flags) = handle_for(&server.uri(), true);
    let err = handle.login("ada@example.com", "wrong").await.unwrap_err();

    assert!(matches!(err, AuthError::InvalidCredentials));
    assert_eq!(get_user_friendly_error(&err), "Invalid email or password");
    assert!(!handle.is_logged_in());
    assert!(!flags.get());
}

#[tokio::test]
async fn test_login_server_error_is_not_invalid_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let (handle, _flags) = handle_for(&server.uri(), false);
    let err = handle.login("ada@example.com", "pw").await.unwrap_err();

    assert!(matches!(err, AuthError::Client(ClientError::Status { .. })));
    assert_eq!(
        get_user_friendly_error(&err),
        "The server ran into a problem. Please try again later."
    );
}

#[tokio::test]
async fn test_logout_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/logout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "bye"})))
        .expect(1)
        .mount(&server)
        .await;

    let (handle, flags) = handle_for(&server.uri(), true);
    handle.dispatch(wallet_frontend_common::AuthAction::LoggedIn);
    handle.logout().await;

    assert!(!handle.is_logged_in());
    assert!(!flags.get());
}

#[tokio::test]
async fn test_logout_is_fail_safe() {
    let (handle, flags) = handle_for("http://127.0.0.1:1", true);

    handle.logout().await;

    assert!(!handle.is_logged_in());
    assert!(!flags.get());
}

#[tokio::test]
async fn test_service_logout_reports_remote_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/logout"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (handle, flags) = handle_for(&server.uri(), true);
    let result = handle.service().logout().await;

    assert!(result.is_err());
    assert!(!flags.get());
}

#[tokio::test]
async fn test_check_status_failure_clears_flag() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/status"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (handle, flags) = handle_for(&server.uri(), true);
    assert!(!handle.service().check_status().await);
    assert!(!flags.get());
}

#[tokio::test]
async fn test_wrapper_mirrors_failed_refresh() {
    let server = MockServer::start().await;
    mount_status(&server, true, Duration::ZERO).await;
    Mock::given(method("GET"))
        .and(path("/wallets/w-1"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/refresh"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let (handle, flags) = handle_for(&server.uri(), true);
    let (_guard, verification) = handle.mount();
    verification.await;
    assert!(handle.is_logged_in());

    let client = handle.service().client().clone();
    let result = with_auth_error_handling(&handle, client.get_wallet("w-1")).await;

    assert!(matches!(result, Err(ClientError::RefreshFailed(_))));
    assert!(!handle.is_logged_in());
    assert!(!flags.get());
}

#[tokio::test]
async fn test_wrapper_ignores_non_auth_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wallets/w-1"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let (handle, flags) = handle_for(&server.uri(), true);
    handle.dispatch(wallet_frontend_common::AuthAction::LoggedIn);

    let client = handle.service().client().clone();
    let result = with_auth_error_handling(&handle, client.get_wallet("w-1")).await;

    assert!(matches!(result, Err(ClientError::Status { .. })));
    assert!(handle.is_logged_in());
    assert!(flags.get());
}

#[tokio::test]
async fn test_unreachable_server_message() {
    let (handle, _flags) = handle_for("http://127.0.0.1:1", false);
    let err = handle.login("ada@example.com", "pw").await.unwrap_err();

    assert_eq!(
        get_user_friendly_error(&err),
        "Unable to reach the server. Check your connection and try again."
    );
}
