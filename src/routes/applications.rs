use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::application_dto::{
        AddNotesPayload, ApplicationDetailResponse, ApplicationListQuery, ApplicationListResponse,
        ApplicationResponse, CreateApplicationPayload, UpdateStatusPayload,
    },
    dto::common_dto::ErrorResponse,
    error::Result,
    models::application::Application,
    utils::token::Claims,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/applications",
    request_body = CreateApplicationPayload,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Application submitted", body = ApplicationResponse),
        (status = 400, description = "Invalid payload or job not accepting applications", body = ErrorResponse),
        (status = 404, description = "Job not found", body = ErrorResponse),
        (status = 409, description = "Already applied", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn create_application(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateApplicationPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let application = state
        .application_service
        .create(payload, claims.sub)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApplicationResponse::from(application)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/applications",
    params(
        ("page" = Option<i64>, Query, description = "Page number, from 1"),
        ("limit" = Option<i64>, Query, description = "Items per page, 1 to 100"),
        ("jobId" = Option<Uuid>, Query, description = "Staff only: filter by job"),
        ("status" = Option<String>, Query, description = "Filter by application status")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Paginated applications", body = ApplicationListResponse),
        (status = 400, description = "Invalid status filter", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn list_applications(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<ApplicationListQuery>,
) -> Result<impl IntoResponse> {
    let page = state.application_service.list(query, &claims).await?;
    Ok(Json(ApplicationListResponse::from(page)))
}

#[utoipa::path(
    get,
    path = "/api/applications/{id}",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Application with job, applicant and history", body = ApplicationDetailResponse),
        (status = 403, description = "Not the applicant or staff", body = ErrorResponse),
        (status = 404, description = "Application not found", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn get_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let detail = state.application_service.get_detail(id, &claims).await?;
    Ok(Json(detail))
}

#[utoipa::path(
    put,
    path = "/api/applications/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    request_body = UpdateStatusPayload,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Status changed", body = Application),
        (status = 400, description = "Unknown status or illegal transition", body = ErrorResponse),
        (status = 404, description = "Application not found", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn update_application_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdateStatusPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let application = state
        .application_service
        .update_status(id, &payload.status, payload.notes, &claims)
        .await?;
    Ok(Json(application))
}

#[utoipa::path(
    post,
    path = "/api/applications/{id}/notes",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    request_body = AddNotesPayload,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Notes replaced", body = Application),
        (status = 404, description = "Application not found", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn add_application_notes(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddNotesPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let application = state
        .application_service
        .add_notes(id, &payload.notes)
        .await?;
    Ok(Json(application))
}
