pub mod applications;
pub mod auth;
pub mod docs;
pub mod health;
pub mod hr;
pub mod jobs;
pub mod saved_jobs;
pub mod users;

use axum::{
    extract::DefaultBodyLimit,
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::config::Config;
use crate::middleware::{
    auth::{require_admin, require_bearer_auth, require_member, require_staff},
    cors::frontend_cors,
    rate_limit::{rps_middleware, RateLimiter},
};
use crate::AppState;

const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Full HTTP surface: public, authenticated, member and staff route groups.
pub fn api_router(state: AppState, config: &Config) -> Router {
    let public_api = Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/exchange-token", post(auth::exchange_token))
        .route("/api/jobs", get(jobs::list_jobs))
        .route("/api/jobs/:id", get(jobs::get_job))
        .route("/api/openapi.json", get(docs::openapi_json))
        .layer(from_fn_with_state(
            RateLimiter::new(config.public_rps),
            rps_middleware,
        ));

    // Any valid bearer token.
    let authenticated_api = Router::new()
        .route("/api/auth/me", get(auth::me))
        .route("/api/applications", get(applications::list_applications))
        .route("/api/applications/:id", get(applications::get_application))
        .route(
            "/api/users/profile",
            get(users::get_profile).put(users::update_profile),
        )
        .route("/api/users/resume", post(users::upload_resume))
        .route_layer(from_fn_with_state(state.clone(), require_bearer_auth));

    let member_api = Router::new()
        .route("/api/applications", post(applications::create_application))
        .route(
            "/api/saved-jobs",
            get(saved_jobs::list_saved_jobs).post(saved_jobs::save_job),
        )
        .route("/api/saved-jobs/:job_id", delete(saved_jobs::unsave_job))
        .route_layer(from_fn(require_member))
        .route_layer(from_fn_with_state(state.clone(), require_bearer_auth));

    let staff_api = Router::new()
        .route("/api/jobs", post(jobs::create_job))
        .route(
            "/api/jobs/:id",
            put(jobs::update_job).delete(jobs::delete_job),
        )
        .route(
            "/api/applications/:id/status",
            put(applications::update_application_status),
        )
        .route(
            "/api/applications/:id/notes",
            post(applications::add_application_notes),
        )
        .route("/api/hr/stats", get(hr::get_stats))
        .route("/api/hr/analytics", get(hr::get_analytics))
        .route("/api/hr/candidates", get(hr::get_candidates))
        .route_layer(from_fn(require_staff))
        .route_layer(from_fn_with_state(state.clone(), require_bearer_auth));

    let admin_api = Router::new()
        .route("/api/users/staff", post(users::create_staff_account))
        .route_layer(from_fn(require_admin))
        .route_layer(from_fn_with_state(state.clone(), require_bearer_auth));

    let protected_api = authenticated_api
        .merge(member_api)
        .merge(staff_api)
        .merge(admin_api)
        .layer(from_fn_with_state(
            RateLimiter::new(config.api_rps),
            rps_middleware,
        ));

    Router::new()
        .route("/health", get(health::health))
        .merge(public_api)
        .merge(protected_api)
        .fallback(health::not_found)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(frontend_cors(&config.frontend_url))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
