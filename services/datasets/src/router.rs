use axum::{
    Router,
    routing::{get, post, put},
};

use fifahub_core::health::{healthz, readyz};
use fifahub_core::middleware::{propagate_request_id_layer, request_id_layer, trace_layer};

use crate::handlers::{
    datasets::{get_related, get_stats, get_trending, record_download},
    follow::{
        follow_author, follow_community, list_followed_authors, list_followed_communities,
        unfollow_author, unfollow_community,
    },
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Recommendations
        .route("/datasets/trending", get(get_trending))
        .route("/datasets/{id}/related", get(get_related))
        // Download stats
        .route("/datasets/{id}/downloads", post(record_download))
        .route("/datasets/{id}/stats", get(get_stats))
        // Follows
        .route("/users/@me/follows/authors", get(list_followed_authors))
        .route(
            "/users/@me/follows/authors/{author_user_id}",
            put(follow_author).delete(unfollow_author),
        )
        .route("/users/@me/follows/communities", get(list_followed_communities))
        .route(
            "/users/@me/follows/communities/{community_id}",
            put(follow_community).delete(unfollow_community),
        )
        .layer(propagate_request_id_layer())
        .layer(trace_layer())
        .layer(request_id_layer())
        .with_state(state)
}
