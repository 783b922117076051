use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::saved_job::SavedJobRow;
use crate::utils::pagination::{PageRequest, Paginated};

const SAVED_JOB_SELECT: &str = r#"
    SELECT
        s.id, s.user_id, s.job_id, s.saved_at,
        j.title AS job_title,
        j.department AS job_department,
        j.location AS job_location,
        j.job_type,
        j.salary_range_min AS job_salary_range_min,
        j.salary_range_max AS job_salary_range_max,
        j.status AS job_status
    FROM saved_jobs s
    JOIN jobs j ON j.id = s.job_id
"#;

#[derive(Clone)]
pub struct SavedJobService {
    pool: PgPool,
}

impl SavedJobService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn save(&self, user_id: Uuid, job_id: Uuid) -> Result<SavedJobRow> {
        let job_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM jobs WHERE id = $1)")
                .bind(job_id)
                .fetch_one(&self.pool)
                .await?;
        if !job_exists {
            return Err(Error::NotFound("Job not found".to_string()));
        }

        let id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO saved_jobs (user_id, job_id) VALUES ($1, $2) RETURNING id",
        )
        .bind(user_id)
        .bind(job_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match Error::from(e) {
            Error::Conflict(_) => Error::Conflict("Job already saved".to_string()),
            other => other,
        })?;

        let row = sqlx::query_as::<_, SavedJobRow>(&format!("{} WHERE s.id = $1", SAVED_JOB_SELECT))
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        tracing::debug!(%user_id, %job_id, "job saved");
        Ok(row)
    }

    pub async fn unsave(&self, user_id: Uuid, job_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM saved_jobs WHERE user_id = $1 AND job_id = $2")
            .bind(user_id)
            .bind(job_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Saved job not found".to_string()));
        }
        Ok(())
    }

    pub async fn list(&self, user_id: Uuid, page: PageRequest) -> Result<Paginated<SavedJobRow>> {
        let items = sqlx::query_as::<_, SavedJobRow>(&format!(
            "{} WHERE s.user_id = $1 ORDER BY s.saved_at DESC LIMIT $2 OFFSET $3",
            SAVED_JOB_SELECT
        ))
        .bind(user_id)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM saved_jobs WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(Paginated::new(items, page, total))
    }
}
