use serde::de::DeserializeOwned;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::job_dto::{CreateJobPayload, JobListQuery, UpdateJobPayload};
use crate::error::{Error, Result};
use crate::models::job::{JobStatus, JobType, JobWithMeta};
use crate::services::access_policy::AccessPolicy;
use crate::utils::pagination::{PageRequest, Paginated};
use crate::utils::token::Claims;

const JOB_WITH_META_SELECT: &str = r#"
    SELECT
        j.id, j.title, j.department, j.location, j.job_type, j.description, j.requirements,
        j.salary_range_min, j.salary_range_max, j.status, j.posted_by, j.posted_at,
        j.expires_at, j.created_at, j.updated_at,
        u.full_name AS poster_name,
        u.email AS poster_email,
        (SELECT COUNT(*) FROM applications a WHERE a.job_id = j.id) AS application_count
    FROM jobs j
    JOIN users u ON u.id = j.posted_by
"#;

/// Parses a snake_case enum value from a query string, e.g. `?jobType=full_time`.
pub fn parse_filter<T: DeserializeOwned>(field: &str, raw: &str) -> Result<T> {
    serde_json::from_value(serde_json::Value::String(raw.to_string()))
        .map_err(|_| Error::BadRequest(format!("Invalid {}: {}", field, raw)))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Clone)]
pub struct JobService {
    pool: PgPool,
}

impl JobService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: CreateJobPayload, posted_by: Uuid) -> Result<JobWithMeta> {
        let status = payload.status.unwrap_or_default();
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO jobs (
                title, department, location, job_type, description, requirements,
                salary_range_min, salary_range_max, status, posted_by, expires_at, posted_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6,
                $7, $8, $9, $10, $11,
                CASE WHEN $9 = 'published'::job_status THEN NOW() ELSE NULL END
            )
            RETURNING id
            "#,
        )
        .bind(&payload.title)
        .bind(&payload.department)
        .bind(&payload.location)
        .bind(payload.job_type)
        .bind(&payload.description)
        .bind(&payload.requirements)
        .bind(payload.salary_range_min)
        .bind(payload.salary_range_max)
        .bind(status)
        .bind(posted_by)
        .bind(payload.expires_at)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(job_id = %id, %posted_by, ?status, "job created");
        self.get_by_id(id).await
    }

    pub async fn list(&self, query: JobListQuery) -> Result<Paginated<JobWithMeta>> {
        let page = PageRequest::new(query.page, query.limit);

        let mut filters = Vec::new();
        let mut args: Vec<String> = Vec::new();

        let status = match non_blank(query.status) {
            Some(raw) => parse_filter::<JobStatus>("status", &raw)?,
            None => JobStatus::Published,
        };
        filters.push(format!("j.status = ${}::job_status", args.len() + 1));
        args.push(status.as_str().to_string());

        if let Some(department) = non_blank(query.department) {
            filters.push(format!("j.department ILIKE ${}", args.len() + 1));
            args.push(format!("%{}%", department));
        }
        if let Some(location) = non_blank(query.location) {
            filters.push(format!("j.location ILIKE ${}", args.len() + 1));
            args.push(format!("%{}%", location));
        }
        if let Some(raw) = non_blank(query.job_type) {
            let job_type = parse_filter::<JobType>("jobType", &raw)?;
            filters.push(format!("j.job_type = ${}::job_type", args.len() + 1));
            args.push(job_type.as_str().to_string());
        }
        if let Some(search) = non_blank(query.search) {
            let n = args.len() + 1;
            filters.push(format!(
                "(j.title ILIKE ${n} OR j.description ILIKE ${n} OR j.department ILIKE ${n})"
            ));
            args.push(format!("%{}%", search));
        }

        let where_clause = format!("WHERE {}", filters.join(" AND "));

        let items_query = format!(
            "{} {} ORDER BY j.created_at DESC LIMIT ${} OFFSET ${}",
            JOB_WITH_META_SELECT,
            where_clause,
            args.len() + 1,
            args.len() + 2
        );
        let total_query = format!("SELECT COUNT(*) FROM jobs j {}", where_clause);

        let mut items_statement = sqlx::query_as::<_, JobWithMeta>(&items_query);
        for value in &args {
            items_statement = items_statement.bind(value);
        }
        let items = items_statement
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        let mut total_statement = sqlx::query_scalar::<_, i64>(&total_query);
        for value in &args {
            total_statement = total_statement.bind(value);
        }
        let total = total_statement.fetch_one(&self.pool).await?;

        Ok(Paginated::new(items, page, total))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<JobWithMeta> {
        sqlx::query_as::<_, JobWithMeta>(&format!("{} WHERE j.id = $1", JOB_WITH_META_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".to_string()))
    }

    pub async fn update(
        &self,
        id: Uuid,
        payload: UpdateJobPayload,
        actor: &Claims,
    ) -> Result<JobWithMeta> {
        let existing = self.get_by_id(id).await?;
        AccessPolicy::ensure_owner_or_staff(actor, existing.job.posted_by)?;

        let min = payload.salary_range_min.or(existing.job.salary_range_min);
        let max = payload.salary_range_max.or(existing.job.salary_range_max);
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Err(Error::BadRequest(
                    "salaryRangeMin must not exceed salaryRangeMax".to_string(),
                ));
            }
        }

        sqlx::query(
            r#"
            UPDATE jobs
            SET
                title = COALESCE($2, title),
                department = COALESCE($3, department),
                location = COALESCE($4, location),
                job_type = COALESCE($5, job_type),
                description = COALESCE($6, description),
                requirements = COALESCE($7, requirements),
                salary_range_min = COALESCE($8, salary_range_min),
                salary_range_max = COALESCE($9, salary_range_max),
                expires_at = COALESCE($10, expires_at),
                posted_at = CASE
                    WHEN $11 = 'published'::job_status AND status <> 'published'::job_status
                        THEN NOW()
                    ELSE posted_at
                END,
                status = COALESCE($11, status),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(payload.title)
        .bind(payload.department)
        .bind(payload.location)
        .bind(payload.job_type)
        .bind(payload.description)
        .bind(payload.requirements)
        .bind(payload.salary_range_min)
        .bind(payload.salary_range_max)
        .bind(payload.expires_at)
        .bind(payload.status)
        .execute(&self.pool)
        .await?;

        tracing::info!(job_id = %id, actor = %actor.sub, "job updated");
        self.get_by_id(id).await
    }

    /// Cascades to applications, their history and saved-job rows.
    pub async fn delete(&self, id: Uuid, actor: &Claims) -> Result<()> {
        let existing = self.get_by_id(id).await?;
        AccessPolicy::ensure_owner_or_staff(actor, existing.job.posted_by)?;

        sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        tracing::info!(job_id = %id, actor = %actor.sub, "job deleted");
        Ok(())
    }
}
