//! Authentication against the mock API: token refresh, login, logout and
//! profile lookups.

mod support;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use energy_monitor::auth::{AuthContext, AuthService, AuthState, REGISTRATION_FAILED};
use energy_monitor::{ClientError, LoginRequest, MemorySessionStore, RegisterForm, SessionStore};
use support::{fresh_token, mint_token, now, session_with, Calls, MockApi};

#[tokio::test]
async fn test_valid_token_is_used_without_refresh() {
    let mock = MockApi::start().await;
    let token = mint_token(now() + 600);
    let client = mock.client(session_with(token.clone()));

    let centros = client.get_centros().await.unwrap();
    assert_eq!(centros.len(), 2);
    assert_eq!(Calls::count(&mock.calls.refresh), 0);
    assert_eq!(mock.calls.authorization(), Some(format!("Bearer {}", token)));
}

#[tokio::test]
async fn test_token_close_to_expiry_is_refreshed_once() {
    let mock = MockApi::start().await;
    let session = session_with(mint_token(now() + 120));
    let client = mock.client(session.clone());

    let centros = client.get_centros().await;
    assert!(centros.is_some());
    assert_eq!(Calls::count(&mock.calls.refresh), 1);

    let body = mock.calls.last_refresh_body.lock().unwrap().clone().unwrap();
    assert_eq!(body["refreshToken"], support::REFRESH_TOKEN);

    // The new pair is persisted and sent
    let stored = session.load().unwrap();
    assert_eq!(stored.refresh_token, support::ROTATED_REFRESH_TOKEN);
    assert_eq!(
        mock.calls.authorization(),
        Some(format!("Bearer {}", stored.access_token))
    );

    // And the next call needs no refresh
    client.get_centros().await.unwrap();
    assert_eq!(Calls::count(&mock.calls.refresh), 1);
}

#[tokio::test]
async fn test_failed_refresh_clears_session() {
    let mock = MockApi::start().await;
    mock.calls.refresh_fails.store(true, Ordering::SeqCst);
    let session = session_with(mint_token(now() - 10));
    let client = mock.client(session.clone());

    assert!(client.access_token().await.is_none());
    assert!(session.load().is_none());

    // Without a token the request goes out unauthenticated and fails
    assert!(client.get_centros().await.is_none());
    assert_eq!(mock.calls.authorization(), None);
    assert_eq!(Calls::count(&mock.calls.refresh), 1);
}

#[tokio::test]
async fn test_malformed_token_triggers_refresh() {
    let mock = MockApi::start().await;
    let client = mock.client(session_with("not-a-jwt".to_string()));

    assert!(client.get_centros().await.is_some());
    assert_eq!(Calls::count(&mock.calls.refresh), 1);
}

#[tokio::test]
async fn test_no_session_means_no_token_and_no_refresh() {
    let mock = MockApi::start().await;
    let client = mock.client(Arc::new(MemorySessionStore::new()));

    assert!(client.access_token().await.is_none());
    assert_eq!(Calls::count(&mock.calls.refresh), 0);
}

#[tokio::test]
async fn test_login_stores_session_and_user() {
    let mock = MockApi::start().await;
    let session = Arc::new(MemorySessionStore::new());
    let auth = AuthService::new(mock.client(session.clone()));

    let tokens = auth
        .login(&LoginRequest {
            email: "ana@example.com".to_string(),
            password: support::PASSWORD.to_string(),
        })
        .await
        .unwrap();

    assert_eq!(session.load(), Some(tokens));
    assert!(auth.is_authenticated());
    assert_eq!(auth.current_user().unwrap().full_name(), "Ana Ruiz");
}

#[tokio::test]
async fn test_login_failure_surfaces_server_message() {
    let mock = MockApi::start().await;
    let session = Arc::new(MemorySessionStore::new());
    let context = AuthContext::new(AuthService::new(mock.client(session.clone())));

    let err = context
        .login(&LoginRequest {
            email: "ana@example.com".to_string(),
            password: "wrong".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert_eq!(
        context.state(),
        AuthState::Error {
            message: "Credenciales inválidas".to_string(),
            user: None,
        }
    );
    assert!(session.load().is_none());

    // Clearing the error goes back to where we were before the attempt
    context.clear_error();
    assert!(!context.state().is_authenticated());
    assert!(context.state().error().is_none());
}

#[tokio::test]
async fn test_register_without_user_fetches_profile() {
    let mock = MockApi::start().await;
    let session = Arc::new(MemorySessionStore::new());
    let context = AuthContext::new(AuthService::new(mock.client(session.clone())));

    let form = RegisterForm {
        first_name: "Ana".to_string(),
        last_name: "Ruiz".to_string(),
        email: "ana@example.com".to_string(),
        password: "secreto".to_string(),
        confirm_password: "secreto".to_string(),
    };
    context.register(&form.validate().unwrap()).await.unwrap();

    assert_eq!(Calls::count(&mock.calls.profile), 1);
    assert_eq!(context.state().user().map(|u| u.id), Some(1));
    // Profile is cached in the session record
    assert!(session.current_user().is_some());
}

#[tokio::test]
async fn test_register_failure_without_message_uses_fallback() {
    let mock = MockApi::start().await;
    let auth = AuthService::new(mock.client(Arc::new(MemorySessionStore::new())));

    let form = RegisterForm {
        first_name: "Ana".to_string(),
        last_name: "Ruiz".to_string(),
        email: "taken@example.com".to_string(),
        password: "secreto".to_string(),
        confirm_password: "secreto".to_string(),
    };
    match auth.register(&form.validate().unwrap()).await {
        Err(ClientError::Http { status, message }) => {
            assert_eq!(status, 409);
            assert_eq!(message, REGISTRATION_FAILED);
        }
        other => panic!("expected HTTP error, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_logout_posts_refresh_token_and_clears() {
    let mock = MockApi::start().await;
    let token = fresh_token();
    let session = session_with(token.clone());
    let auth = AuthService::new(mock.client(session.clone()));

    auth.logout().await;

    assert_eq!(Calls::count(&mock.calls.logout), 1);
    assert_eq!(mock.calls.authorization(), Some(format!("Bearer {}", token)));
    assert!(session.load().is_none());

    // Nothing stored, nothing sent
    auth.logout().await;
    assert_eq!(Calls::count(&mock.calls.logout), 1);
}

#[tokio::test]
async fn test_profile_401_refreshes_and_retries() {
    let mock = MockApi::start().await;
    // Expired, but get_profile sends it as-is first
    let session = session_with(mint_token(now() - 60));
    let auth = AuthService::new(mock.client(session.clone()));

    let user = auth.get_profile().await.unwrap();
    assert_eq!(user.email, "ana@example.com");
    assert_eq!(Calls::count(&mock.calls.profile), 2);
    assert_eq!(Calls::count(&mock.calls.refresh), 1);

    // Cached now
    auth.get_profile().await.unwrap();
    assert_eq!(Calls::count(&mock.calls.profile), 2);
}

#[tokio::test]
async fn test_mount_with_dead_session_signs_out() {
    let mock = MockApi::start().await;
    mock.calls.refresh_fails.store(true, Ordering::SeqCst);
    let session = session_with(mint_token(now() - 60));
    let context = AuthContext::new(AuthService::new(mock.client(session.clone())));
    let mut states = context.subscribe();

    assert!(context.state().is_loading());
    context.mount().await;

    assert_eq!(context.state(), AuthState::Unauthenticated);
    assert!(states.has_changed().unwrap());
    assert_eq!(*states.borrow_and_update(), AuthState::Unauthenticated);
    assert!(session.load().is_none());
}
