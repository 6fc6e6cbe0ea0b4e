use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};

/// Auth service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("user not found")]
    UserNotFound,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("email already registered")]
    EmailInUse,
    #[error("{0}")]
    ValidationError(String),
    #[error("invalid token")]
    InvalidToken,
    #[error("invalid refresh token")]
    InvalidRefreshToken,

    // ── Second factor ──
    #[error("No pending 2FA challenge")]
    NoPendingChallenge,
    #[error("2FA challenge expired, please log in again")]
    ChallengeExpired,
    #[error("Invalid or expired 2FA session")]
    TokenMismatch,
    #[error("Too many attempts. Please wait and try again.")]
    RateLimited { retry_after_secs: u64 },
    #[error("Too many invalid codes. Please log in again.")]
    AttemptsLocked { attempts: u32 },
    #[error("Invalid code")]
    InvalidCode { attempts: Option<u32> },
    #[error("no 2FA secret configured")]
    NoSecretConfigured,
    #[error("invalid 2FA secret")]
    InvalidSecret,
    #[error("2FA is not enabled")]
    TwoFactorNotEnabled,
    #[error("unable to verify")]
    VerificationUnavailable,

    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AuthServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::EmailInUse => "EMAIL_IN_USE",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::InvalidRefreshToken => "INVALID_REFRESH_TOKEN",
            Self::NoPendingChallenge => "NO_PENDING_CHALLENGE",
            Self::ChallengeExpired => "CHALLENGE_EXPIRED",
            Self::TokenMismatch => "TOKEN_MISMATCH",
            Self::RateLimited { .. } => "RATE_LIMITED",
            Self::AttemptsLocked { .. } => "ATTEMPTS_LOCKED",
            Self::InvalidCode { .. } => "INVALID_CODE",
            Self::NoSecretConfigured => "NO_SECRET_CONFIGURED",
            Self::InvalidSecret => "INVALID_SECRET",
            Self::TwoFactorNotEnabled => "TWO_FACTOR_NOT_ENABLED",
            Self::VerificationUnavailable => "VERIFICATION_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Whether a pending challenge must be thrown away after this error.
    /// The caller has to restart login for these.
    pub fn ends_challenge(&self) -> bool {
        matches!(
            self,
            Self::NoPendingChallenge
                | Self::ChallengeExpired
                | Self::TokenMismatch
                | Self::AttemptsLocked { .. }
        )
    }
}

impl IntoResponse for AuthServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::UserNotFound => StatusCode::NOT_FOUND,
            Self::InvalidCredentials | Self::InvalidToken | Self::InvalidRefreshToken => {
                StatusCode::UNAUTHORIZED
            }
            Self::EmailInUse => StatusCode::CONFLICT,
            Self::ValidationError(_)
            | Self::NoPendingChallenge
            | Self::ChallengeExpired
            | Self::TokenMismatch
            | Self::InvalidCode { .. }
            | Self::NoSecretConfigured
            | Self::InvalidSecret
            | Self::TwoFactorNotEnabled => StatusCode::BAD_REQUEST,
            Self::RateLimited { .. } | Self::AttemptsLocked { .. } => {
                StatusCode::TOO_MANY_REQUESTS
            }
            Self::VerificationUnavailable | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        // 4xx are expected client outcomes; only the 500 chain is worth a log line.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
        }

        let mut body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        match &self {
            Self::RateLimited { retry_after_secs } => {
                body["retry_after"] = (*retry_after_secs).into();
            }
            Self::AttemptsLocked { attempts } => {
                body["attempts"] = (*attempts).into();
                body["locked"] = true.into();
            }
            Self::InvalidCode {
                attempts: Some(attempts),
            } => {
                body["attempts"] = (*attempts).into();
            }
            _ => {}
        }

        let mut response = (status, axum::Json(body)).into_response();
        if let Self::RateLimited { retry_after_secs } = self {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
        }
        response
    }
}
