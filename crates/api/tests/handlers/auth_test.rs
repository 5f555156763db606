use axum::http::{header::AUTHORIZATION, HeaderMap, HeaderValue};
use chrono::{Duration, Utc};
use mockall::predicate;
use pretty_assertions::assert_eq;
use slotbook_api::middleware::{auth, error_handling::AppError};
use slotbook_core::{
    errors::BookError,
    models::profile::{Profile, Role},
};
use slotbook_db::models::DbSession;

use crate::test_utils::{db_profile, TestContext};

// Mirrors the AuthProfile extractor with the repositories mocked.
async fn authenticate_with_mocks(ctx: &TestContext, headers: &HeaderMap) -> Result<Profile, AppError> {
    let token = auth::bearer_token(headers)?;

    let session = ctx
        .profile_repo
        .get_active_session(token.to_string())
        .await?
        .ok_or_else(|| BookError::Authentication("Session expired or invalid".to_string()))?;

    let profile = ctx
        .profile_repo
        .get_profile_by_id(session.profile_id)
        .await?
        .ok_or_else(|| BookError::Authentication("Profile no longer exists".to_string()))?;

    Ok(Profile::try_from(profile)?)
}

fn bearer(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );
    headers
}

#[tokio::test]
async fn test_valid_session_resolves_profile() {
    let token = auth::generate_session_token();
    let row = db_profile(Role::Provider);
    let profile_id = row.id;

    let mut ctx = TestContext::new();
    let session = DbSession {
        token: token.clone(),
        profile_id,
        created_at: Utc::now(),
        expires_at: Utc::now() + Duration::hours(1),
    };
    ctx.profile_repo
        .expect_get_active_session()
        .with(predicate::eq(token.clone()))
        .returning(move |_| Ok(Some(session.clone())));
    ctx.profile_repo
        .expect_get_profile_by_id()
        .with(predicate::eq(profile_id))
        .returning(move |_| Ok(Some(row.clone())));

    let profile = authenticate_with_mocks(&ctx, &bearer(&token)).await.unwrap();

    assert_eq!(profile.id, profile_id);
    assert_eq!(profile.role, Role::Provider);
}

#[tokio::test]
async fn test_unknown_session_is_unauthenticated() {
    let mut ctx = TestContext::new();
    ctx.profile_repo
        .expect_get_active_session()
        .returning(|_| Ok(None));

    let result = authenticate_with_mocks(&ctx, &bearer("expired-token")).await;

    assert!(matches!(result, Err(AppError(BookError::Authentication(_)))));
}

#[tokio::test]
async fn test_database_failure_surfaces_as_server_error() {
    let mut ctx = TestContext::new();
    ctx.profile_repo
        .expect_get_active_session()
        .returning(|_| Err(eyre::eyre!("connection refused")));

    let result = authenticate_with_mocks(&ctx, &bearer("any-token")).await;

    let err = result.unwrap_err();
    assert_eq!(err.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
}
