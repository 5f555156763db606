use argon2::PasswordVerifier;
use axum::http::{header::AUTHORIZATION, HeaderMap, HeaderValue, StatusCode};
use pretty_assertions::assert_eq;
use rstest::rstest;
use slotbook_api::middleware::{auth, error_handling::map_error};
use slotbook_core::errors::BookError;

#[rstest]
#[case(BookError::NotFound("Resource not found".to_string()), StatusCode::NOT_FOUND)]
#[case(BookError::Validation("Invalid input".to_string()), StatusCode::BAD_REQUEST)]
#[case(BookError::Authentication("Invalid password".to_string()), StatusCode::UNAUTHORIZED)]
#[case(BookError::Authorization("Not authorized".to_string()), StatusCode::FORBIDDEN)]
#[case(BookError::Conflict("Already cancelled".to_string()), StatusCode::CONFLICT)]
#[case(BookError::Database(eyre::eyre!("Database error")), StatusCode::INTERNAL_SERVER_ERROR)]
fn test_error_status_mapping(#[case] error: BookError, #[case] expected: StatusCode) {
    assert_eq!(map_error(error).status(), expected);
}

#[tokio::test]
async fn test_error_handling_internal() {
    let error = BookError::Internal(Box::new(std::io::Error::new(
        std::io::ErrorKind::Other,
        "Internal error",
    )));

    let response = map_error(error);

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_error_body_carries_message() {
    let response = map_error(BookError::Conflict(
        "Cannot move a booking from 'completed' to 'cancelled'".to_string(),
    ));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(
        body["error"],
        "Conflict: Cannot move a booking from 'completed' to 'cancelled'"
    );
}

#[tokio::test]
async fn test_hash_password() {
    let password = "test_password";
    let hashed = auth::hash_password(password).unwrap();

    assert_ne!(hashed, password);
    assert!(hashed.starts_with("$argon2"));

    let argon2 = argon2::Argon2::default();
    let parsed_hash = argon2::PasswordHash::new(&hashed).unwrap();

    assert!(argon2.verify_password(password.as_bytes(), &parsed_hash).is_ok());
    assert!(argon2
        .verify_password("wrong_password".as_bytes(), &parsed_hash)
        .is_err());
}

#[test]
fn test_hash_password_salts_each_call() {
    let first = auth::hash_password("same password").unwrap();
    let second = auth::hash_password("same password").unwrap();

    assert_ne!(first, second);
}

#[test]
fn test_session_tokens_are_random_alphanumeric() {
    let first = auth::generate_session_token();
    let second = auth::generate_session_token();

    assert_eq!(first.len(), auth::SESSION_TOKEN_LENGTH);
    assert!(first.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_ne!(first, second);
}

fn headers_with(value: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
    headers
}

#[test]
fn test_bearer_token_parsing() {
    assert_eq!(auth::bearer_token(&headers_with("Bearer abc123")).unwrap(), "abc123");
    assert_eq!(auth::bearer_token(&headers_with("Bearer  padded ")).unwrap(), "padded");
}

#[rstest]
#[case("Basic dXNlcjpwYXNz")]
#[case("Bearer ")]
#[case("bearer abc123")]
#[case("abc123")]
fn test_bearer_token_rejects_other_schemes(#[case] value: &str) {
    assert!(matches!(
        auth::bearer_token(&headers_with(value)),
        Err(BookError::Authentication(_))
    ));
}

#[test]
fn test_bearer_token_missing_header() {
    assert!(matches!(
        auth::bearer_token(&HeaderMap::new()),
        Err(BookError::Authentication(_))
    ));
}
