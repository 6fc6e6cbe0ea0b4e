use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use fifahub_auth_types::cookie::{
    CookieLifetime, FIFAHUB_2FA_SESSION, clear_two_factor_session_cookie,
    set_access_token_cookie, set_refresh_token_cookie, set_two_factor_session_cookie,
};

use crate::domain::repository::PendingChallengeStore;
use crate::domain::types::{PENDING_CHALLENGE_TTL_SECS, TokenPair};
use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::challenge::{VerifyTwoFactorInput, VerifyTwoFactorUseCase};
use crate::usecase::login::{LoginInput, LoginOutcome, LoginUseCase};
use crate::usecase::signup::{SignupInput, SignupUseCase};

pub const X_FIFAHUB_ACCESS_TOKEN_EXPIRES: &str = "x-fifahub-access-token-expires";

pub(crate) fn token_expires_header(exp: u64) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static(X_FIFAHUB_ACCESS_TOKEN_EXPIRES),
        HeaderValue::from(exp),
    );
    headers
}

pub(crate) fn set_token_cookies(
    jar: CookieJar,
    tokens: TokenPair,
    domain: &str,
    remember: bool,
) -> CookieJar {
    let lifetime = CookieLifetime::from_remember(remember);
    let jar = set_access_token_cookie(jar, tokens.access_token, domain.to_owned(), lifetime);
    set_refresh_token_cookie(jar, tokens.refresh_token, domain.to_owned(), lifetime)
}

// ── POST /auth/signup ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct SignupResponse {
    pub user_id: Uuid,
}

pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<SignupRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = SignupUseCase {
        users: state.credential_store(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let out = usecase
        .execute(SignupInput {
            email: body.email,
            password: body.password,
        })
        .await?;

    let headers = token_expires_header(out.tokens.access_token_exp);
    let jar = set_token_cookies(jar, out.tokens, &state.cookie_domain, true);
    Ok((
        StatusCode::CREATED,
        jar,
        headers,
        Json(SignupResponse {
            user_id: out.user_id,
        }),
    ))
}

// ── POST /auth/login ──────────────────────────────────────────────────────────

fn default_remember() -> bool {
    true
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(default = "default_remember")]
    pub remember: bool,
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoginResponse {
    Authenticated,
    TwoFactorRequired { token: String },
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = LoginUseCase {
        users: state.credential_store(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let outcome = usecase
        .execute(LoginInput {
            email: body.email,
            password: body.password,
            remember: body.remember,
        })
        .await?;

    match outcome {
        LoginOutcome::Authenticated {
            remember, tokens, ..
        } => {
            let headers = token_expires_header(tokens.access_token_exp);
            let jar = set_token_cookies(jar, tokens, &state.cookie_domain, remember);
            Ok((StatusCode::OK, jar, headers, Json(LoginResponse::Authenticated)))
        }
        LoginOutcome::TwoFactorRequired(challenge) => {
            // One challenge per session id; a new login replaces the old one.
            let session_id = jar
                .get(FIFAHUB_2FA_SESSION)
                .map(|c| c.value().to_owned())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| Uuid::new_v4().simple().to_string());
            state.challenge_store().put(&session_id, &challenge).await?;

            let jar = set_two_factor_session_cookie(
                jar,
                session_id,
                state.cookie_domain.clone(),
                PENDING_CHALLENGE_TTL_SECS as i64,
            );
            Ok((
                StatusCode::OK,
                jar,
                HeaderMap::new(),
                Json(LoginResponse::TwoFactorRequired {
                    token: challenge.token,
                }),
            ))
        }
    }
}

// ── POST /auth/2fa/verify ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyTwoFactorRequest {
    #[serde(default)]
    pub token: String,
    pub code: Option<String>,
    pub recovery_code: Option<String>,
}

#[derive(Serialize)]
pub struct VerifyTwoFactorResponse {
    pub message: &'static str,
    pub method: &'static str,
}

pub async fn verify_two_factor(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<VerifyTwoFactorRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let session_id = jar
        .get(FIFAHUB_2FA_SESSION)
        .map(|c| c.value().to_owned())
        .ok_or(AuthServiceError::NoPendingChallenge)?;

    let usecase = VerifyTwoFactorUseCase {
        users: state.credential_store(),
        cipher: state.cipher.clone(),
        limiter: state.limiter.clone(),
        policy: state.policy,
        jwt_secret: state.jwt_secret.clone(),
    };
    let verified = usecase
        .execute_session(
            &state.challenge_store(),
            &session_id,
            VerifyTwoFactorInput {
                token: body.token,
                code: body.code,
                recovery_code: body.recovery_code,
            },
        )
        .await?;

    let jar = clear_two_factor_session_cookie(jar, state.cookie_domain.clone());
    let headers = token_expires_header(verified.tokens.access_token_exp);
    let jar = set_token_cookies(jar, verified.tokens, &state.cookie_domain, verified.remember);
    Ok((
        StatusCode::OK,
        jar,
        headers,
        Json(VerifyTwoFactorResponse {
            message: "Two-factor authentication successful",
            method: verified.method.as_str(),
        }),
    ))
}
