use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use fifahub_auth_types::identity::IdentityHeaders;

use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::two_factor::{
    BeginTwoFactorSetupUseCase, CompleteTwoFactorSetupUseCase, DisableTwoFactorInput,
    DisableTwoFactorUseCase, RegenerateRecoveryCodesUseCase,
};

#[derive(Serialize)]
pub struct RecoveryCodesResponse {
    pub recovery_codes: Vec<String>,
}

// ── POST /auth/2fa/setup ──────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct SetupResponse {
    pub secret: String,
    pub otpauth_url: String,
}

pub async fn begin_setup(
    State(state): State<AppState>,
    identity: IdentityHeaders,
) -> Result<Json<SetupResponse>, AuthServiceError> {
    let usecase = BeginTwoFactorSetupUseCase {
        users: state.credential_store(),
        cipher: state.cipher.clone(),
        issuer: state.issuer.clone(),
    };
    let out = usecase.execute(identity.user_id).await?;
    Ok(Json(SetupResponse {
        secret: out.secret,
        otpauth_url: out.otpauth_url,
    }))
}

// ── POST /auth/2fa/setup/verify ───────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CompleteSetupRequest {
    #[serde(default)]
    pub code: String,
}

pub async fn complete_setup(
    State(state): State<AppState>,
    identity: IdentityHeaders,
    Json(body): Json<CompleteSetupRequest>,
) -> Result<Json<RecoveryCodesResponse>, AuthServiceError> {
    let usecase = CompleteTwoFactorSetupUseCase {
        users: state.credential_store(),
        cipher: state.cipher.clone(),
    };
    let recovery_codes = usecase.execute(identity.user_id, &body.code).await?;
    Ok(Json(RecoveryCodesResponse { recovery_codes }))
}

// ── POST /auth/2fa/recovery-codes ─────────────────────────────────────────────

pub async fn regenerate_recovery_codes(
    State(state): State<AppState>,
    identity: IdentityHeaders,
) -> Result<Json<RecoveryCodesResponse>, AuthServiceError> {
    let usecase = RegenerateRecoveryCodesUseCase {
        users: state.credential_store(),
        cipher: state.cipher.clone(),
    };
    let recovery_codes = usecase.execute(identity.user_id).await?;
    Ok(Json(RecoveryCodesResponse { recovery_codes }))
}

// ── POST /auth/2fa/disable ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct DisableRequest {
    pub password: Option<String>,
    pub code: Option<String>,
}

#[derive(Serialize)]
pub struct DisableResponse {
    pub message: &'static str,
    pub method: &'static str,
}

pub async fn disable(
    State(state): State<AppState>,
    identity: IdentityHeaders,
    Json(body): Json<DisableRequest>,
) -> Result<Json<DisableResponse>, AuthServiceError> {
    let usecase = DisableTwoFactorUseCase {
        users: state.credential_store(),
        cipher: state.cipher.clone(),
    };
    let method = usecase
        .execute(
            identity.user_id,
            DisableTwoFactorInput {
                password: body.password,
                code: body.code,
            },
        )
        .await?;
    Ok(Json(DisableResponse {
        message: "Two-factor authentication disabled",
        method: method.as_str(),
    }))
}
