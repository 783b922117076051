use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::error::{Error, Result};
use crate::models::user::Role;
use crate::AppState;

pub use crate::utils::token::Claims;

pub const STAFF_ROLES: &[Role] = &[Role::Hr, Role::Admin];
pub const ALL_ROLES: &[Role] = &[Role::Applicant, Role::Hr, Role::Admin];

fn bearer_token(req: &Request) -> Result<&str> {
    req.headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| Error::Unauthorized("No token provided".to_string()))
}

/// Verifies the bearer JWT and stores its [`Claims`] in the request extensions.
pub async fn require_bearer_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response> {
    let claims = state.auth_service.verify_token(bearer_token(&req)?)?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Must run inside [`require_bearer_auth`].
pub async fn require_roles(req: Request, next: Next, allowed: &[Role]) -> Result<Response> {
    let role = req
        .extensions()
        .get::<Claims>()
        .map(|claims| claims.role)
        .ok_or_else(|| Error::Unauthorized("No token provided".to_string()))?;
    if !allowed.contains(&role) {
        tracing::debug!(%role, "role rejected by gate");
        return Err(Error::Forbidden("Insufficient permissions".to_string()));
    }
    Ok(next.run(req).await)
}

pub async fn require_staff(req: Request, next: Next) -> Result<Response> {
    require_roles(req, next, STAFF_ROLES).await
}

pub async fn require_admin(req: Request, next: Next) -> Result<Response> {
    require_roles(req, next, &[Role::Admin]).await
}

pub async fn require_member(req: Request, next: Next) -> Result<Response> {
    require_roles(req, next, ALL_ROLES).await
}
