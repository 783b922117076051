use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::hr_dto::{
    AnalyticsQuery, AnalyticsResponse, CandidateApplicationSummary, CandidateQuery,
    CandidateResponse, DashboardStats, DepartmentCount, JobApplicationCount, StatusCount,
};
use crate::error::{Error, Result};
use crate::models::applicant_profile::ApplicantProfile;
use crate::models::user::User;
use crate::utils::pagination::{PageRequest, Paginated};
use crate::utils::time::{parse_datetime_param, rounded_mean, whole_days_between};

/// Date window applied to `applications.applied_at` in every analytics query.
const APPLIED_WINDOW: &str = "($1::timestamptz IS NULL OR a.applied_at >= $1)
     AND ($2::timestamptz IS NULL OR a.applied_at <= $2)";

fn parse_bound(field: &str, raw: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => parse_datetime_param(value)
            .map(Some)
            .ok_or_else(|| Error::BadRequest(format!("Invalid {}: {}", field, value))),
    }
}

/// Mean whole days from application to hire, rounded; 0 with no hires.
pub fn average_time_to_hire(hires: &[(DateTime<Utc>, DateTime<Utc>)]) -> i64 {
    let days: Vec<i64> = hires
        .iter()
        .map(|(applied_at, hired_at)| whole_days_between(*applied_at, *hired_at))
        .collect();
    rounded_mean(&days)
}

#[derive(Clone)]
pub struct HrService {
    pool: PgPool,
}

impl HrService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats> {
        let (total_jobs, total_applications, pending_applications, total_candidates) =
            sqlx::query_as::<_, (i64, i64, i64, i64)>(
                r#"
                SELECT
                    (SELECT COUNT(*) FROM jobs WHERE status IN ('published', 'draft')),
                    (SELECT COUNT(*) FROM applications),
                    (SELECT COUNT(*) FROM applications WHERE status = 'pending'),
                    (SELECT COUNT(*) FROM users WHERE role = 'applicant')
                "#,
            )
            .fetch_one(&self.pool)
            .await?;

        Ok(DashboardStats {
            total_jobs,
            total_applications,
            pending_applications,
            total_candidates,
        })
    }

    pub async fn analytics(&self, query: AnalyticsQuery) -> Result<AnalyticsResponse> {
        let start = parse_bound("startDate", query.start_date.as_deref())?;
        let end = parse_bound("endDate", query.end_date.as_deref())?;

        let applications_by_status = sqlx::query_as::<_, StatusCount>(&format!(
            "SELECT a.status, COUNT(*) AS count
             FROM applications a
             WHERE {APPLIED_WINDOW}
             GROUP BY a.status
             ORDER BY a.status"
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        let applications_by_job = sqlx::query_as::<_, JobApplicationCount>(&format!(
            "SELECT a.job_id, j.title, COUNT(*) AS count
             FROM applications a
             JOIN jobs j ON j.id = a.job_id
             WHERE {APPLIED_WINDOW}
             GROUP BY a.job_id, j.title
             ORDER BY count DESC, j.title
             LIMIT 10"
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        let applications_by_department = sqlx::query_as::<_, DepartmentCount>(&format!(
            "SELECT j.department, COUNT(a.id) AS count
             FROM applications a
             JOIN jobs j ON j.id = a.job_id
             WHERE {APPLIED_WINDOW}
             GROUP BY j.department
             ORDER BY count DESC, j.department"
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        let hires = sqlx::query_as::<_, (DateTime<Utc>, DateTime<Utc>)>(&format!(
            "SELECT a.applied_at, a.updated_at
             FROM applications a
             WHERE a.status = 'hired' AND {APPLIED_WINDOW}"
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(AnalyticsResponse {
            applications_by_status,
            applications_by_job,
            applications_by_department,
            avg_time_to_hire: average_time_to_hire(&hires),
            total_hired: hires.len() as i64,
        })
    }

    pub async fn candidates(&self, query: CandidateQuery) -> Result<Paginated<CandidateResponse>> {
        let page = PageRequest::new(query.page, query.limit);
        let pattern = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s));

        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, full_name, role, avatar_url, created_at, updated_at
            FROM users u
            WHERE u.role = 'applicant'
              AND ($1::text IS NULL OR u.full_name ILIKE $1 OR u.email ILIKE $1)
            ORDER BY u.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(pattern.as_deref())
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM users u
            WHERE u.role = 'applicant'
              AND ($1::text IS NULL OR u.full_name ILIKE $1 OR u.email ILIKE $1)
            "#,
        )
        .bind(pattern.as_deref())
        .fetch_one(&self.pool)
        .await?;

        let ids: Vec<Uuid> = users.iter().map(|u| u.id).collect();

        let mut profiles: HashMap<Uuid, ApplicantProfile> = sqlx::query_as::<_, ApplicantProfile>(
            r#"
            SELECT id, user_id, phone, address, linkedin_url, portfolio_url, bio, skills,
                   education, experience_years, current_position, resume_url, created_at, updated_at
            FROM applicant_profiles
            WHERE user_id = ANY($1)
            "#,
        )
        .bind(ids.as_slice())
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(|profile| (profile.user_id, profile))
        .collect();

        let mut applications: HashMap<Uuid, Vec<CandidateApplicationSummary>> = HashMap::new();
        let rows = sqlx::query_as::<_, CandidateApplicationSummary>(
            r#"
            SELECT a.id, a.applicant_id, a.status,
                   j.title AS job_title, j.department AS job_department
            FROM applications a
            JOIN jobs j ON j.id = a.job_id
            WHERE a.applicant_id = ANY($1)
            ORDER BY a.applied_at DESC
            "#,
        )
        .bind(ids.as_slice())
        .fetch_all(&self.pool)
        .await?;
        for row in rows {
            applications.entry(row.applicant_id).or_default().push(row);
        }

        let items = users
            .into_iter()
            .map(|user| {
                let apps = applications.remove(&user.id).unwrap_or_default();
                CandidateResponse {
                    id: user.id,
                    email: user.email,
                    full_name: user.full_name,
                    avatar_url: user.avatar_url,
                    created_at: user.created_at,
                    applicant_profile: profiles.remove(&user.id),
                    application_count: apps.len() as i64,
                    applications: apps,
                }
            })
            .collect();

        Ok(Paginated::new(items, page, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn average_time_to_hire_floors_each_hire_then_rounds() {
        let t0 = Utc::now();
        let hires = [
            (t0, t0 + Duration::hours(24 * 3 + 23)), // 3 days
            (t0, t0 + Duration::days(4)),            // 4 days
        ];
        assert_eq!(average_time_to_hire(&hires), 4);
        assert_eq!(average_time_to_hire(&[]), 0);
    }

    #[test]
    fn bounds_accept_dates_and_reject_garbage() {
        assert!(parse_bound("startDate", None).unwrap().is_none());
        assert!(parse_bound("startDate", Some("  ")).unwrap().is_none());
        assert!(parse_bound("startDate", Some("2024-01-01")).unwrap().is_some());
        let err = parse_bound("endDate", Some("soon")).unwrap_err();
        assert!(matches!(err, Error::BadRequest(msg) if msg == "Invalid endDate: soon"));
    }
}
