use uuid::Uuid;

use fifahub_auth::error::AuthServiceError;
use fifahub_auth::usecase::token::{RefreshTokenUseCase, issue_token_pair};
use fifahub_auth_types::token::validate_access_token;

use crate::helpers::{MockCredentialStore, TEST_JWT_SECRET, test_user};

// ── issue_token_pair ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_issue_access_token_that_validates_successfully() {
    let user = test_user();
    let pair = issue_token_pair(user.id, true, TEST_JWT_SECRET).unwrap();

    assert!(!pair.access_token.is_empty());
    let info = validate_access_token(&pair.access_token, TEST_JWT_SECRET).unwrap();
    assert_eq!(info.user_id, user.id);
    assert_eq!(info.access_token_exp, pair.access_token_exp);
}

#[tokio::test]
async fn should_reject_token_signed_with_wrong_secret() {
    let pair = issue_token_pair(Uuid::new_v4(), true, TEST_JWT_SECRET).unwrap();
    assert!(validate_access_token(&pair.access_token, "wrong-secret").is_err());
}

// ── RefreshTokenUseCase ──────────────────────────────────────────────────────

#[tokio::test]
async fn should_refresh_token_pair_and_keep_remember_flag() {
    let user = test_user();
    let issued = issue_token_pair(user.id, false, TEST_JWT_SECRET).unwrap();

    let usecase = RefreshTokenUseCase {
        users: MockCredentialStore::new(vec![user.clone()]),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    let out = usecase.execute(&issued.refresh_token).await.unwrap();

    assert_eq!(out.user_id, user.id);
    assert!(!out.remember);
    let info = validate_access_token(&out.tokens.access_token, TEST_JWT_SECRET).unwrap();
    assert_eq!(info.user_id, user.id);
}

#[tokio::test]
async fn should_reject_refresh_with_garbage_token() {
    let usecase = RefreshTokenUseCase {
        users: MockCredentialStore::new(vec![test_user()]),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let result = usecase.execute("not-a-jwt").await;
    assert!(
        matches!(result, Err(AuthServiceError::InvalidRefreshToken)),
        "expected InvalidRefreshToken, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_refresh_for_deleted_user() {
    let issued = issue_token_pair(Uuid::new_v4(), true, TEST_JWT_SECRET).unwrap();
    let usecase = RefreshTokenUseCase {
        users: MockCredentialStore::empty(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let result = usecase.execute(&issued.refresh_token).await;
    assert!(
        matches!(result, Err(AuthServiceError::InvalidRefreshToken)),
        "expected InvalidRefreshToken, got {result:?}"
    );
}
