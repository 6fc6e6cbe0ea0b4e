use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use fifahub_core::health::{healthz, readyz};
use fifahub_core::middleware::{propagate_request_id_layer, request_id_layer, trace_layer};

use crate::handlers::{
    session::{login, signup, verify_two_factor},
    token::{check_token, refresh_token, revoke_token},
    two_factor::{begin_setup, complete_setup, disable, regenerate_recovery_codes},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Account + login
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/2fa/verify", post(verify_two_factor))
        // 2FA management
        .route("/auth/2fa/setup", post(begin_setup))
        .route("/auth/2fa/setup/verify", post(complete_setup))
        .route("/auth/2fa/recovery-codes", post(regenerate_recovery_codes))
        .route("/auth/2fa/disable", post(disable))
        // Token
        .route("/auth/token", get(check_token))
        .route("/auth/token", patch(refresh_token))
        .route("/auth/token", delete(revoke_token))
        .layer(propagate_request_id_layer())
        .layer(trace_layer())
        .layer(request_id_layer())
        .with_state(state)
}
