use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
    Extension,
};
use validator::Validate;

use crate::{
    dto::auth_dto::{
        AuthResponse, CurrentUserResponse, ExchangeTokenPayload, LoginPayload, RegisterPayload,
    },
    dto::common_dto::ErrorResponse,
    error::Result,
    utils::token::Claims,
    AppState,
};

pub const EXCHANGE_SIGNATURE_HEADER: &str = "x-exchange-signature";

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterPayload,
    responses(
        (status = 201, description = "User registered", body = AuthResponse),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 403, description = "Role other than applicant requested", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let response = state.auth_service.register(payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 401, description = "Invalid email or password", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let response = state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = CurrentUserResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let user = state.auth_service.me(claims.sub).await?;
    Ok(Json(CurrentUserResponse::from(user)))
}

/// Server-to-server: the frontend signs the identity with the shared exchange secret.
#[utoipa::path(
    post,
    path = "/api/auth/exchange-token",
    request_body = ExchangeTokenPayload,
    params(
        ("X-Exchange-Signature" = String, Header, description = "hex HMAC-SHA256 of userId:email:role:issuedAt")
    ),
    responses(
        (status = 200, description = "Backend token issued", body = AuthResponse),
        (status = 400, description = "Missing required fields", body = ErrorResponse),
        (status = 401, description = "Bad signature, stale assertion or identity mismatch", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn exchange_token(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ExchangeTokenPayload>,
) -> Result<impl IntoResponse> {
    let signature = headers
        .get(EXCHANGE_SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());
    let response = state
        .auth_service
        .exchange_token(payload, signature)
        .await?;
    Ok(Json(response))
}
