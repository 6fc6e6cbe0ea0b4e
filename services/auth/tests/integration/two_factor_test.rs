use chrono::Utc;

use fifahub_auth::domain::challenge::PendingTwoFactorChallenge;
use fifahub_auth::domain::types::{DisableMethod, VerificationMethod};
use fifahub_auth::error::AuthServiceError;
use fifahub_auth::usecase::challenge::VerifyTwoFactorInput;
use fifahub_auth::usecase::two_factor::{
    BeginTwoFactorSetupUseCase, CompleteTwoFactorSetupUseCase, DisableTwoFactorInput,
    DisableTwoFactorUseCase, RegenerateRecoveryCodesUseCase,
};

use crate::helpers::{
    MockCredentialStore, TEST_PASSWORD, TEST_TOTP_SECRET, current_code, test_cipher, test_user,
    two_factor_user, verify_usecase, wrong_code,
};

fn begin(store: &MockCredentialStore) -> BeginTwoFactorSetupUseCase<MockCredentialStore> {
    BeginTwoFactorSetupUseCase {
        users: store.clone(),
        cipher: test_cipher(),
        issuer: "FifaHub".to_owned(),
    }
}

fn complete(store: &MockCredentialStore) -> CompleteTwoFactorSetupUseCase<MockCredentialStore> {
    CompleteTwoFactorSetupUseCase {
        users: store.clone(),
        cipher: test_cipher(),
    }
}

fn regenerate(store: &MockCredentialStore) -> RegenerateRecoveryCodesUseCase<MockCredentialStore> {
    RegenerateRecoveryCodesUseCase {
        users: store.clone(),
        cipher: test_cipher(),
    }
}

fn disable(store: &MockCredentialStore) -> DisableTwoFactorUseCase<MockCredentialStore> {
    DisableTwoFactorUseCase {
        users: store.clone(),
        cipher: test_cipher(),
    }
}

// ── Setup ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_store_encrypted_secret_without_enabling() {
    let user = test_user();
    let store = MockCredentialStore::new(vec![user.clone()]);

    let out = begin(&store).execute(user.id).await.unwrap();
    assert_eq!(out.secret.len(), 32);
    assert!(out.otpauth_url.starts_with("otpauth://totp/FifaHub:user@example.com?secret="));
    assert!(out.otpauth_url.contains(&out.secret));

    let stored = store.user(user.id);
    assert!(!stored.two_factor_enabled);
    let ciphertext = stored.two_factor_secret.unwrap();
    assert_ne!(ciphertext, out.secret);
    assert_eq!(test_cipher().decrypt(&ciphertext).unwrap(), out.secret);
}

#[tokio::test]
async fn should_enable_and_issue_eight_recovery_codes() {
    let user = test_user();
    let store = MockCredentialStore::new(vec![user.clone()]);
    let setup = begin(&store).execute(user.id).await.unwrap();

    let codes = complete(&store)
        .execute(user.id, &current_code(&setup.secret))
        .await
        .unwrap();

    assert_eq!(codes.len(), 8);
    assert!(codes.iter().all(|c| c.len() == 10));
    assert!(store.user(user.id).two_factor_enabled);
    assert_eq!(store.code_count(user.id), 8);
}

#[tokio::test]
async fn should_reject_setup_with_wrong_code() {
    let user = test_user();
    let store = MockCredentialStore::new(vec![user.clone()]);
    let setup = begin(&store).execute(user.id).await.unwrap();

    let result = complete(&store)
        .execute(user.id, &wrong_code(&setup.secret))
        .await;
    assert!(
        matches!(result, Err(AuthServiceError::InvalidCode { attempts: None })),
        "expected InvalidCode, got {result:?}"
    );
    assert!(!store.user(user.id).two_factor_enabled);
}

#[tokio::test]
async fn should_reject_malformed_setup_code() {
    let user = test_user();
    let store = MockCredentialStore::new(vec![user.clone()]);
    begin(&store).execute(user.id).await.unwrap();

    let result = complete(&store).execute(user.id, "12345").await;
    assert!(
        matches!(result, Err(AuthServiceError::InvalidCode { .. })),
        "expected InvalidCode, got {result:?}"
    );
}

#[tokio::test]
async fn should_require_setup_before_completing() {
    let user = test_user();
    let store = MockCredentialStore::new(vec![user.clone()]);

    let result = complete(&store).execute(user.id, "123456").await;
    assert!(
        matches!(result, Err(AuthServiceError::NoSecretConfigured)),
        "expected NoSecretConfigured, got {result:?}"
    );
}

// ── Recovery codes ───────────────────────────────────────────────────────────

#[tokio::test]
async fn should_invalidate_old_codes_on_regenerate() {
    let user = test_user();
    let store = MockCredentialStore::new(vec![user.clone()]);
    let setup = begin(&store).execute(user.id).await.unwrap();
    let old_codes = complete(&store)
        .execute(user.id, &current_code(&setup.secret))
        .await
        .unwrap();

    let new_codes = regenerate(&store).execute(user.id).await.unwrap();
    assert_eq!(new_codes.len(), 8);
    assert_eq!(store.code_count(user.id), 8);

    let verify = verify_usecase(store.clone());
    let mut pending = Some(PendingTwoFactorChallenge::begin(user.id, true, Utc::now()));
    let token = pending.as_ref().unwrap().token.clone();
    let result = verify
        .execute(
            &mut pending,
            VerifyTwoFactorInput {
                token: token.clone(),
                code: None,
                recovery_code: Some(old_codes[0].clone()),
            },
        )
        .await;
    assert!(
        matches!(result, Err(AuthServiceError::InvalidCode { .. })),
        "expected InvalidCode, got {result:?}"
    );

    let verified = verify
        .execute(
            &mut pending,
            VerifyTwoFactorInput {
                token,
                code: None,
                recovery_code: Some(new_codes[0].clone()),
            },
        )
        .await
        .unwrap();
    assert_eq!(verified.method, VerificationMethod::Recovery);
    assert_eq!(store.code_count(user.id), 7);
}

#[tokio::test]
async fn should_not_regenerate_when_disabled() {
    let user = test_user();
    let store = MockCredentialStore::new(vec![user.clone()]);

    let result = regenerate(&store).execute(user.id).await;
    assert!(
        matches!(result, Err(AuthServiceError::TwoFactorNotEnabled)),
        "expected TwoFactorNotEnabled, got {result:?}"
    );
}

// ── Disable ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_disable_with_password() {
    let user = two_factor_user();
    let store = MockCredentialStore::new(vec![user.clone()]);
    store.seed_recovery_codes(user.id, &["aaaaa11111"]);

    let method = disable(&store)
        .execute(
            user.id,
            DisableTwoFactorInput {
                password: Some(TEST_PASSWORD.to_owned()),
                code: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(method, DisableMethod::Password);
    let stored = store.user(user.id);
    assert!(!stored.two_factor_enabled);
    assert!(stored.two_factor_secret.is_none());
    assert_eq!(store.code_count(user.id), 0);
}

#[tokio::test]
async fn should_disable_with_totp_code() {
    let user = two_factor_user();
    let store = MockCredentialStore::new(vec![user.clone()]);

    let method = disable(&store)
        .execute(
            user.id,
            DisableTwoFactorInput {
                password: None,
                code: Some(current_code(TEST_TOTP_SECRET)),
            },
        )
        .await
        .unwrap();
    assert_eq!(method, DisableMethod::Totp);
}

#[tokio::test]
async fn should_reject_disable_without_proof() {
    let user = two_factor_user();
    let store = MockCredentialStore::new(vec![user.clone()]);

    let result = disable(&store)
        .execute(user.id, DisableTwoFactorInput::default())
        .await;
    assert!(
        matches!(result, Err(AuthServiceError::ValidationError(_))),
        "expected ValidationError, got {result:?}"
    );
    assert!(store.user(user.id).two_factor_enabled);
}

#[tokio::test]
async fn should_reject_disable_with_wrong_password() {
    let user = two_factor_user();
    let store = MockCredentialStore::new(vec![user.clone()]);

    let result = disable(&store)
        .execute(
            user.id,
            DisableTwoFactorInput {
                password: Some("not the password".to_owned()),
                code: Some(current_code(TEST_TOTP_SECRET)),
            },
        )
        .await;
    assert!(
        matches!(result, Err(AuthServiceError::ValidationError(_))),
        "expected ValidationError, got {result:?}"
    );
    assert!(store.user(user.id).two_factor_enabled);
}

#[tokio::test]
async fn should_reject_disable_with_malformed_code() {
    let user = two_factor_user();
    let store = MockCredentialStore::new(vec![user.clone()]);

    let result = disable(&store)
        .execute(
            user.id,
            DisableTwoFactorInput {
                password: None,
                code: Some("abc".to_owned()),
            },
        )
        .await;
    assert!(
        matches!(result, Err(AuthServiceError::ValidationError(_))),
        "expected ValidationError, got {result:?}"
    );
}

#[tokio::test]
async fn should_not_disable_when_not_enabled() {
    let user = test_user();
    let store = MockCredentialStore::new(vec![user.clone()]);

    let result = disable(&store)
        .execute(
            user.id,
            DisableTwoFactorInput {
                password: Some(TEST_PASSWORD.to_owned()),
                code: None,
            },
        )
        .await;
    assert!(
        matches!(result, Err(AuthServiceError::TwoFactorNotEnabled)),
        "expected TwoFactorNotEnabled, got {result:?}"
    );
}
