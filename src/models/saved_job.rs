use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use super::job::{JobStatus, JobType};

#[derive(Debug, Clone, FromRow)]
pub struct SavedJobRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_id: Uuid,
    pub saved_at: DateTime<Utc>,
    pub job_title: String,
    pub job_department: String,
    pub job_location: String,
    pub job_type: JobType,
    pub job_salary_range_min: Option<Decimal>,
    pub job_salary_range_max: Option<Decimal>,
    pub job_status: JobStatus,
}
