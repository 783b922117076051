use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::job::{Job, JobStatus, JobType, JobWithMeta};
use crate::utils::pagination::{Paginated, Pagination};

fn check_salary_range(min: Option<Decimal>, max: Option<Decimal>) -> Result<(), ValidationError> {
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            let mut err = ValidationError::new("salary_range");
            err.message = Some("salaryRangeMin must not exceed salaryRangeMax".into());
            return Err(err);
        }
    }
    Ok(())
}

fn validate_create_salary(payload: &CreateJobPayload) -> Result<(), ValidationError> {
    check_salary_range(payload.salary_range_min, payload.salary_range_max)
}

fn validate_update_salary(payload: &UpdateJobPayload) -> Result<(), ValidationError> {
    check_salary_range(payload.salary_range_min, payload.salary_range_max)
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_create_salary"))]
pub struct CreateJobPayload {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub department: String,
    #[validate(length(min = 1))]
    pub location: String,
    pub job_type: JobType,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(length(min = 1))]
    pub requirements: String,
    pub salary_range_min: Option<Decimal>,
    pub salary_range_max: Option<Decimal>,
    pub expires_at: Option<DateTime<Utc>>,
    /// Defaults to `draft`.
    pub status: Option<JobStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_update_salary"))]
pub struct UpdateJobPayload {
    #[validate(length(min = 1))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub department: Option<String>,
    #[validate(length(min = 1))]
    pub location: Option<String>,
    pub job_type: Option<JobType>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    #[validate(length(min = 1))]
    pub requirements: Option<String>,
    pub salary_range_min: Option<Decimal>,
    pub salary_range_max: Option<Decimal>,
    pub expires_at: Option<DateTime<Utc>>,
    pub status: Option<JobStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct JobListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<String>,
    pub department: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PosterSummary {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobResponse {
    pub id: Uuid,
    pub title: String,
    pub department: String,
    pub location: String,
    pub job_type: JobType,
    pub description: String,
    pub requirements: String,
    pub salary_range_min: Option<Decimal>,
    pub salary_range_max: Option<Decimal>,
    pub status: JobStatus,
    pub posted_by: Uuid,
    pub posted_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub poster: PosterSummary,
    pub application_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct JobListResponse {
    pub items: Vec<JobResponse>,
    pub pagination: Pagination,
}

impl From<JobWithMeta> for JobResponse {
    fn from(value: JobWithMeta) -> Self {
        let Job {
            id,
            title,
            department,
            location,
            job_type,
            description,
            requirements,
            salary_range_min,
            salary_range_max,
            status,
            posted_by,
            posted_at,
            expires_at,
            created_at,
            updated_at,
        } = value.job;
        Self {
            id,
            title,
            department,
            location,
            job_type,
            description,
            requirements,
            salary_range_min,
            salary_range_max,
            status,
            posted_by,
            posted_at,
            expires_at,
            created_at,
            updated_at,
            poster: PosterSummary {
                id: posted_by,
                full_name: value.poster_name,
                email: value.poster_email,
            },
            application_count: value.application_count,
        }
    }
}

impl From<Paginated<JobWithMeta>> for JobListResponse {
    fn from(value: Paginated<JobWithMeta>) -> Self {
        let page = value.map(JobResponse::from);
        Self {
            items: page.items,
            pagination: page.pagination,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(v: i64) -> Decimal {
        Decimal::from(v)
    }

    fn create_payload() -> CreateJobPayload {
        CreateJobPayload {
            title: "Backend Engineer".into(),
            department: "Engineering".into(),
            location: "Remote".into(),
            job_type: JobType::FullTime,
            description: "Build APIs".into(),
            requirements: "Rust".into(),
            salary_range_min: Some(dec(90_000)),
            salary_range_max: Some(dec(120_000)),
            expires_at: None,
            status: None,
        }
    }

    #[test]
    fn valid_create_payload_passes() {
        assert!(create_payload().validate().is_ok());
    }

    #[test]
    fn inverted_salary_range_is_rejected() {
        let mut payload = create_payload();
        payload.salary_range_min = Some(dec(200_000));
        assert!(payload.validate().is_err());

        let update = UpdateJobPayload {
            salary_range_min: Some(dec(10)),
            salary_range_max: Some(dec(5)),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn blank_title_is_rejected() {
        let mut payload = create_payload();
        payload.title = String::new();
        assert!(payload.validate().is_err());
    }

    #[test]
    fn create_payload_parses_camel_case() {
        let payload: CreateJobPayload = serde_json::from_value(serde_json::json!({
            "title": "Intern",
            "department": "Design",
            "location": "Berlin",
            "jobType": "internship",
            "description": "Learn",
            "requirements": "Curiosity",
            "expiresAt": "2030-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(payload.job_type, JobType::Internship);
        assert!(payload.expires_at.is_some());
        assert!(payload.status.is_none());
    }
}
