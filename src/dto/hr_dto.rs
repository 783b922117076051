use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::applicant_profile::ApplicantProfile;
use crate::models::application::ApplicationStatus;
use crate::utils::pagination::Pagination;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_jobs: i64,
    pub total_applications: i64,
    pub pending_applications: i64,
    pub total_candidates: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyticsQuery {
    /// RFC 3339 timestamp or `YYYY-MM-DD`.
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct StatusCount {
    pub status: ApplicationStatus,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobApplicationCount {
    pub job_id: Uuid,
    pub title: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct DepartmentCount {
    pub department: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse {
    pub applications_by_status: Vec<StatusCount>,
    pub applications_by_job: Vec<JobApplicationCount>,
    pub applications_by_department: Vec<DepartmentCount>,
    /// Mean whole days from application to hire, rounded.
    pub avg_time_to_hire: i64,
    pub total_hired: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CandidateQuery {
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CandidateApplicationSummary {
    pub id: Uuid,
    #[serde(skip)]
    pub applicant_id: Uuid,
    pub status: ApplicationStatus,
    pub job_title: String,
    pub job_department: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CandidateResponse {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub applicant_profile: Option<ApplicantProfile>,
    pub applications: Vec<CandidateApplicationSummary>,
    pub application_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CandidateListResponse {
    pub items: Vec<CandidateResponse>,
    pub pagination: Pagination,
}
