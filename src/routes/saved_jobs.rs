use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;

use crate::{
    dto::common_dto::{ErrorResponse, MessageResponse, PageQuery},
    dto::saved_job_dto::{SaveJobPayload, SavedJobListResponse, SavedJobResponse},
    error::Result,
    utils::pagination::PageRequest,
    utils::token::Claims,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/saved-jobs",
    params(
        ("page" = Option<i64>, Query, description = "Page number, from 1"),
        ("limit" = Option<i64>, Query, description = "Items per page, 1 to 100")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Saved jobs, newest first", body = SavedJobListResponse)
    )
)]
#[axum::debug_handler]
pub async fn list_saved_jobs(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse> {
    let page = state
        .saved_job_service
        .list(claims.sub, PageRequest::new(query.page, query.limit))
        .await?;
    Ok(Json(SavedJobListResponse::from(page)))
}

#[utoipa::path(
    post,
    path = "/api/saved-jobs",
    request_body = SaveJobPayload,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Job saved", body = SavedJobResponse),
        (status = 404, description = "Job not found", body = ErrorResponse),
        (status = 409, description = "Job already saved", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn save_job(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<SaveJobPayload>,
) -> Result<impl IntoResponse> {
    let saved = state
        .saved_job_service
        .save(claims.sub, payload.job_id)
        .await?;
    Ok((StatusCode::CREATED, Json(SavedJobResponse::from(saved))))
}

#[utoipa::path(
    delete,
    path = "/api/saved-jobs/{job_id}",
    params(
        ("job_id" = Uuid, Path, description = "ID of the saved job")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Job unsaved", body = MessageResponse),
        (status = 404, description = "Saved job not found", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn unsave_job(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.saved_job_service.unsave(claims.sub, job_id).await?;
    Ok(Json(MessageResponse::new("Job unsaved successfully")))
}
