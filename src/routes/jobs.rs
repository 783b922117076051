use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::common_dto::{ErrorResponse, MessageResponse},
    dto::job_dto::{CreateJobPayload, JobListQuery, JobListResponse, JobResponse, UpdateJobPayload},
    error::Result,
    utils::token::Claims,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/jobs",
    params(
        ("page" = Option<i64>, Query, description = "Page number, from 1"),
        ("limit" = Option<i64>, Query, description = "Items per page, 1 to 100"),
        ("status" = Option<String>, Query, description = "Job status, defaults to published"),
        ("department" = Option<String>, Query, description = "Case-insensitive substring"),
        ("location" = Option<String>, Query, description = "Case-insensitive substring"),
        ("jobType" = Option<String>, Query, description = "full_time, part_time, contract or internship"),
        ("search" = Option<String>, Query, description = "Matches title, description or department")
    ),
    responses(
        (status = 200, description = "Paginated jobs", body = JobListResponse),
        (status = 400, description = "Invalid filter", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobListQuery>,
) -> Result<impl IntoResponse> {
    let page = state.job_service.list(query).await?;
    Ok(Json(JobListResponse::from(page)))
}

#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Job found", body = JobResponse),
        (status = 404, description = "Job not found", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let job = state.job_service.get_by_id(id).await?;
    Ok(Json(JobResponse::from(job)))
}

#[utoipa::path(
    post,
    path = "/api/jobs",
    request_body = CreateJobPayload,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Job created", body = JobResponse),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 403, description = "Insufficient permissions", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn create_job(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateJobPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let job = state.job_service.create(payload, claims.sub).await?;
    Ok((StatusCode::CREATED, Json(JobResponse::from(job))))
}

#[utoipa::path(
    put,
    path = "/api/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    request_body = UpdateJobPayload,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Job updated", body = JobResponse),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 403, description = "Not the poster or staff", body = ErrorResponse),
        (status = 404, description = "Job not found", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn update_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdateJobPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let job = state.job_service.update(id, payload, &claims).await?;
    Ok(Json(JobResponse::from(job)))
}

#[utoipa::path(
    delete,
    path = "/api/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Job deleted", body = MessageResponse),
        (status = 403, description = "Not the poster or staff", body = ErrorResponse),
        (status = 404, description = "Job not found", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn delete_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    state.job_service.delete(id, &claims).await?;
    Ok(Json(MessageResponse::new("Job deleted successfully")))
}
