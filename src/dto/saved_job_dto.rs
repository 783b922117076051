use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::job::{JobStatus, JobType};
use crate::models::saved_job::SavedJobRow;
use crate::utils::pagination::{Paginated, Pagination};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveJobPayload {
    pub job_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavedJobSummary {
    pub id: Uuid,
    pub title: String,
    pub department: String,
    pub location: String,
    pub job_type: JobType,
    pub salary_range_min: Option<Decimal>,
    pub salary_range_max: Option<Decimal>,
    pub status: JobStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavedJobResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_id: Uuid,
    pub saved_at: DateTime<Utc>,
    pub job: SavedJobSummary,
}

impl From<SavedJobRow> for SavedJobResponse {
    fn from(row: SavedJobRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            job_id: row.job_id,
            saved_at: row.saved_at,
            job: SavedJobSummary {
                id: row.job_id,
                title: row.job_title,
                department: row.job_department,
                location: row.job_location,
                job_type: row.job_type,
                salary_range_min: row.job_salary_range_min,
                salary_range_max: row.job_salary_range_max,
                status: row.job_status,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SavedJobListResponse {
    pub items: Vec<SavedJobResponse>,
    pub pagination: Pagination,
}

impl From<Paginated<SavedJobRow>> for SavedJobListResponse {
    fn from(value: Paginated<SavedJobRow>) -> Self {
        let page = value.map(SavedJobResponse::from);
        Self {
            items: page.items,
            pagination: page.pagination,
        }
    }
}
