use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use validator::Validate;

use crate::{
    dto::auth_dto::{CreateStaffPayload, UserSummary},
    dto::common_dto::ErrorResponse,
    dto::user_dto::{ProfileResponse, ResumePayload, ResumeResponse, UpdateProfilePayload},
    error::Result,
    utils::token::Claims,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/users/profile",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User with applicant profile", body = ProfileResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let profile = state.user_service.get_profile(claims.sub).await?;
    Ok(Json(profile))
}

#[utoipa::path(
    put,
    path = "/api/users/profile",
    request_body = UpdateProfilePayload,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Updated profile", body = ProfileResponse),
        (status = 400, description = "Invalid payload", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdateProfilePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let profile = state
        .user_service
        .update_profile(claims.sub, payload)
        .await?;
    Ok(Json(profile))
}

#[utoipa::path(
    post,
    path = "/api/users/resume",
    request_body = ResumePayload,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Resume URL recorded", body = ResumeResponse),
        (status = 400, description = "Invalid URL", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn upload_resume(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<ResumePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let profile = state
        .user_service
        .set_resume(claims.sub, &payload.resume_url)
        .await?;
    Ok(Json(ResumeResponse {
        resume_url: profile.resume_url.unwrap_or(payload.resume_url),
        message: "Resume uploaded successfully".to_string(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/users/staff",
    request_body = CreateStaffPayload,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Staff account created", body = UserSummary),
        (status = 400, description = "Invalid payload or non-staff role", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn create_staff_account(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateStaffPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let user = state.auth_service.create_staff(payload).await?;
    tracing::info!(admin_id = %claims.sub, user_id = %user.id, role = %user.role, "staff account created");
    Ok((StatusCode::CREATED, Json(user)))
}
