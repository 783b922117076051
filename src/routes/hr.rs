use axum::{
    extract::{Query, State},
    response::{IntoResponse, Json},
};

use crate::{
    dto::common_dto::ErrorResponse,
    dto::hr_dto::{
        AnalyticsQuery, AnalyticsResponse, CandidateListResponse, CandidateQuery, DashboardStats,
    },
    error::Result,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/hr/stats",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dashboard counters", body = DashboardStats),
        (status = 403, description = "Insufficient permissions", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn get_stats(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let stats = state.hr_service.dashboard_stats().await?;
    Ok(Json(stats))
}

#[utoipa::path(
    get,
    path = "/api/hr/analytics",
    params(
        ("startDate" = Option<String>, Query, description = "RFC 3339 or YYYY-MM-DD (midnight UTC)"),
        ("endDate" = Option<String>, Query, description = "RFC 3339 or YYYY-MM-DD (midnight UTC)")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Application analytics", body = AnalyticsResponse),
        (status = 400, description = "Unparseable date", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn get_analytics(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<impl IntoResponse> {
    let analytics = state.hr_service.analytics(query).await?;
    Ok(Json(analytics))
}

#[utoipa::path(
    get,
    path = "/api/hr/candidates",
    params(
        ("search" = Option<String>, Query, description = "Matches full name or email"),
        ("page" = Option<i64>, Query, description = "Page number, from 1"),
        ("limit" = Option<i64>, Query, description = "Items per page, 1 to 100")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Paginated candidates", body = CandidateListResponse)
    )
)]
#[axum::debug_handler]
pub async fn get_candidates(
    State(state): State<AppState>,
    Query(query): Query<CandidateQuery>,
) -> Result<impl IntoResponse> {
    let page = state.hr_service.candidates(query).await?;
    Ok(Json(CandidateListResponse {
        items: page.items,
        pagination: page.pagination,
    }))
}
