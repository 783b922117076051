use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::dto::job_dto::JobResponse;
use crate::models::applicant_profile::ApplicantProfile;
use crate::models::application::{ApplicationStatus, ApplicationWithMeta};
use crate::models::status_history::StatusHistoryEntry;
use crate::models::user::{Role, User};
use crate::utils::pagination::{Paginated, Pagination};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateApplicationPayload {
    pub job_id: Uuid,
    pub cover_letter: Option<String>,
    #[validate(url)]
    pub resume_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplicationListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub job_id: Option<Uuid>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateStatusPayload {
    #[validate(length(min = 1))]
    pub status: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AddNotesPayload {
    #[validate(length(min = 1))]
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationJobSummary {
    pub id: Uuid,
    pub title: String,
    pub department: String,
    pub location: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantSummary {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub linkedin_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationResponse {
    pub id: Uuid,
    pub job_id: Uuid,
    pub applicant_id: Uuid,
    pub status: ApplicationStatus,
    pub cover_letter: Option<String>,
    pub resume_url: Option<String>,
    pub notes: Option<String>,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub job: ApplicationJobSummary,
    pub applicant: ApplicantSummary,
}

impl From<ApplicationWithMeta> for ApplicationResponse {
    fn from(value: ApplicationWithMeta) -> Self {
        let app = value.application;
        Self {
            id: app.id,
            job_id: app.job_id,
            applicant_id: app.applicant_id,
            status: app.status,
            cover_letter: app.cover_letter,
            resume_url: app.resume_url,
            notes: app.notes,
            applied_at: app.applied_at,
            updated_at: app.updated_at,
            job: ApplicationJobSummary {
                id: app.job_id,
                title: value.job_title,
                department: value.job_department,
                location: value.job_location,
            },
            applicant: ApplicantSummary {
                id: app.applicant_id,
                full_name: value.applicant_name,
                email: value.applicant_email,
                phone: value.applicant_phone,
                linkedin_url: value.applicant_linkedin_url,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApplicationListResponse {
    pub items: Vec<ApplicationResponse>,
    pub pagination: Pagination,
}

impl From<Paginated<ApplicationWithMeta>> for ApplicationListResponse {
    fn from(value: Paginated<ApplicationWithMeta>) -> Self {
        let page = value.map(ApplicationResponse::from);
        Self {
            items: page.items,
            pagination: page.pagination,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantDetail {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub avatar_url: Option<String>,
    pub applicant_profile: Option<ApplicantProfile>,
}

impl ApplicantDetail {
    pub fn new(user: User, profile: Option<ApplicantProfile>) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            role: user.role,
            avatar_url: user.avatar_url,
            applicant_profile: profile,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDetailResponse {
    pub id: Uuid,
    pub job_id: Uuid,
    pub applicant_id: Uuid,
    pub status: ApplicationStatus,
    pub cover_letter: Option<String>,
    pub resume_url: Option<String>,
    pub notes: Option<String>,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub job: JobResponse,
    pub applicant: ApplicantDetail,
    /// Newest first.
    pub status_history: Vec<StatusHistoryEntry>,
}
