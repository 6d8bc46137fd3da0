//! Integration tests for the email verification login against a mock server

use drydotai::{
    ApiError, AuthError, AuthState, Authenticator, ClientConfig, DryClient, StaticPrompt,
    TokenStore,
};
use mockito::{Matcher, Server};
use serde_json::json;
use tempfile::TempDir;

fn authenticator(server: &Server, dir: &TempDir, env_key: &str) -> Authenticator {
    std::env::remove_var(env_key);
    let config = ClientConfig::default().with_server(server.url());
    let client = DryClient::new(config).expect("Failed to build client");
    let store = TokenStore::new(dir.path().join(".env"), env_key);
    Authenticator::new(client, store)
}

#[tokio::test]
async fn authenticate_stores_token_on_success() {
    //* Given
    let mut server = Server::new_async().await;
    let dir = TempDir::new().unwrap();
    let env_key = "DRYDOTAI_IT_TOKEN_SUCCESS";

    let register_mock = server
        .mock("POST", "/api/crud-gpt/register-user")
        .match_body(Matcher::Json(json!({"email": "a@b.com"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success": true, "userId": "u1", "isExistingUser": false}"#)
        .expect(1)
        .create_async()
        .await;

    let verify_mock = server
        .mock("POST", "/api/crud-gpt/verify-email")
        .match_body(Matcher::Json(
            json!({"code": "123456", "userId": "u1", "email": "a@b.com"}),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success": true, "verified": true, "mcpToken": "tok-abc"}"#)
        .expect(1)
        .create_async()
        .await;

    let mut auth = authenticator(&server, &dir, env_key);

    //* When
    let token = auth
        .authenticate("a@b.com", &StaticPrompt::code("123456"))
        .await
        .expect("authentication should succeed");

    //* Then
    register_mock.assert_async().await;
    verify_mock.assert_async().await;
    assert_eq!(token, "tok-abc");
    assert_eq!(auth.state(), AuthState::Authenticated);
    assert_eq!(auth.store().get().as_deref(), Some("tok-abc"));

    let file = std::fs::read_to_string(dir.path().join(".env")).unwrap();
    assert_eq!(file, format!("{}=tok-abc\n", env_key));
    std::env::remove_var(env_key);
}

#[tokio::test]
async fn register_then_verify_step_by_step() {
    //* Given
    let mut server = Server::new_async().await;
    let dir = TempDir::new().unwrap();
    let env_key = "DRYDOTAI_IT_TOKEN_STEPS";

    let _post_register_user = server
        .mock("POST", "/api/crud-gpt/register-user")
        .with_status(200)
        .with_body(r#"{"success": true, "userId": "u7", "isExistingUser": true}"#)
        .create_async()
        .await;
    let _post_verify_email = server
        .mock("POST", "/api/crud-gpt/verify-email")
        .with_status(200)
        .with_body(r#"{"success": true, "verified": true, "mcpToken": "tok-7", "userCreated": false}"#)
        .create_async()
        .await;

    let mut auth = authenticator(&server, &dir, env_key);
    assert_eq!(auth.state(), AuthState::Unregistered);

    //* When
    let pending = auth.register_or_login("  u7@example.com ").await.unwrap();

    //* Then
    assert_eq!(auth.state(), AuthState::PendingVerification);
    assert_eq!(pending.user_id, "u7");
    assert_eq!(pending.email, "u7@example.com");
    assert!(pending.is_existing_user);

    let token = auth
        .verify("111111", &pending.user_id, &pending.email)
        .await
        .unwrap();
    assert_eq!(token, "tok-7");
    assert_eq!(auth.state(), AuthState::Authenticated);
    std::env::remove_var(env_key);
}

#[tokio::test]
async fn rejected_code_writes_nothing() {
    //* Given
    let mut server = Server::new_async().await;
    let dir = TempDir::new().unwrap();
    let env_key = "DRYDOTAI_IT_TOKEN_BAD_CODE";

    let _post_register_user = server
        .mock("POST", "/api/crud-gpt/register-user")
        .with_status(200)
        .with_body(r#"{"success": true, "userId": "u1", "isExistingUser": false}"#)
        .create_async()
        .await;
    let _post_verify_email = server
        .mock("POST", "/api/crud-gpt/verify-email")
        .with_status(200)
        .with_body(r#"{"success": false, "message": "bad code"}"#)
        .create_async()
        .await;

    let mut auth = authenticator(&server, &dir, env_key);

    //* When
    let err = auth
        .authenticate("a@b.com", &StaticPrompt::code("000000"))
        .await
        .unwrap_err();

    //* Then
    assert!(err.to_string().contains("bad code"), "got: {}", err);
    assert!(matches!(err, AuthError::Api(ApiError::Rejected(_))));
    assert_eq!(auth.state(), AuthState::Unregistered);
    assert_eq!(auth.store().get(), None);
    assert!(!dir.path().join(".env").exists());
}

#[tokio::test]
async fn verified_without_token_is_invalid_response() {
    //* Given
    let mut server = Server::new_async().await;
    let dir = TempDir::new().unwrap();
    let env_key = "DRYDOTAI_IT_TOKEN_MISSING_TOKEN";

    let _post_verify_email = server
        .mock("POST", "/api/crud-gpt/verify-email")
        .with_status(200)
        .with_body(r#"{"success": true, "verified": true}"#)
        .create_async()
        .await;

    let mut auth = authenticator(&server, &dir, env_key);

    //* When
    let err = auth.verify("123456", "u1", "a@b.com").await.unwrap_err();

    //* Then
    assert!(matches!(err, AuthError::Api(ApiError::InvalidResponse(_))));
    assert!(err.to_string().contains("mcpToken"));
    assert_eq!(auth.store().get(), None);
}

#[tokio::test]
async fn registration_failure_uses_server_message() {
    //* Given
    let mut server = Server::new_async().await;
    let dir = TempDir::new().unwrap();

    let _post_register_user = server
        .mock("POST", "/api/crud-gpt/register-user")
        .with_status(200)
        .with_body(r#"{"success": false, "message": "email domain blocked"}"#)
        .create_async()
        .await;

    let mut auth = authenticator(&server, &dir, "DRYDOTAI_IT_TOKEN_REG_FAIL");

    //* When
    let err = auth.register_or_login("a@b.com").await.unwrap_err();

    //* Then
    assert!(err.to_string().contains("email domain blocked"));
    assert_eq!(auth.state(), AuthState::Unregistered);
}

#[tokio::test]
async fn registration_http_error_is_reported() {
    //* Given
    let mut server = Server::new_async().await;
    let dir = TempDir::new().unwrap();

    let _post_register_user = server
        .mock("POST", "/api/crud-gpt/register-user")
        .with_status(500)
        .with_body(r#"{"error": "database unavailable"}"#)
        .create_async()
        .await;

    let mut auth = authenticator(&server, &dir, "DRYDOTAI_IT_TOKEN_REG_500");

    //* When
    let err = auth.register_or_login("a@b.com").await.unwrap_err();

    //* Then
    assert!(matches!(err, AuthError::Api(ApiError::ServerError(ref m)) if m == "database unavailable"));
}

#[tokio::test]
async fn missing_code_ends_attempt_without_verifying() {
    //* Given
    let mut server = Server::new_async().await;
    let dir = TempDir::new().unwrap();

    let _post_register_user = server
        .mock("POST", "/api/crud-gpt/register-user")
        .with_status(200)
        .with_body(r#"{"success": true, "userId": "u1"}"#)
        .create_async()
        .await;
    let verify_mock = server
        .mock("POST", "/api/crud-gpt/verify-email")
        .expect(0)
        .create_async()
        .await;

    let mut auth = authenticator(&server, &dir, "DRYDOTAI_IT_TOKEN_NO_CODE");

    //* When
    let result = auth
        .authenticate_user("a@b.com", &StaticPrompt::default())
        .await;

    //* Then
    verify_mock.assert_async().await;
    assert_eq!(result, None);
    assert_eq!(auth.state(), AuthState::Unregistered);
}

#[tokio::test]
async fn empty_email_is_rejected_locally() {
    let server = Server::new_async().await;
    let dir = TempDir::new().unwrap();
    let mut auth = authenticator(&server, &dir, "DRYDOTAI_IT_TOKEN_NO_EMAIL");

    let err = auth.register_or_login("   ").await.unwrap_err();
    assert!(matches!(err, AuthError::MissingEmail));
}

#[tokio::test]
async fn verify_client_error_status_is_http_error() {
    //* Given
    let mut server = Server::new_async().await;
    let dir = TempDir::new().unwrap();
    let env_key = "DRYDOTAI_IT_TOKEN_VERIFY_400";

    let verify_mock = server
        .mock("POST", "/api/crud-gpt/verify-email")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success": false, "message": "bad code"}"#)
        .expect(1)
        .create_async()
        .await;

    let mut auth = authenticator(&server, &dir, env_key);

    //* When
    let err = auth.verify("000000", "u1", "a@b.com").await.unwrap_err();

    //* Then
    verify_mock.assert_async().await;
    assert!(
        matches!(err, AuthError::Api(ApiError::Http { status: 400, ref message }) if message == "bad code"),
        "got: {:?}",
        err
    );
    assert!(!matches!(err, AuthError::Api(ApiError::InvalidResponse(_))));
    assert_eq!(auth.state(), AuthState::Unregistered);
    assert_eq!(auth.store().get(), None);
    assert!(!dir.path().join(".env").exists());
}
