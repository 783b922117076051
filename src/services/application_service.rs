use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::dto::application_dto::{
    ApplicantDetail, ApplicationDetailResponse, ApplicationListQuery, CreateApplicationPayload,
};
use crate::dto::job_dto::JobResponse;
use crate::error::{Error, Result};
use crate::models::application::{Application, ApplicationStatus, ApplicationWithMeta};
use crate::models::job::JobStatus;
use crate::models::status_history::StatusHistoryEntry;
use crate::services::access_policy::AccessPolicy;
use crate::services::email_service::EmailService;
use crate::services::job_service::JobService;
use crate::services::user_service::UserService;
use crate::utils::pagination::{PageRequest, Paginated};
use crate::utils::token::Claims;

const APPLICATION_COLUMNS: &str =
    "id, job_id, applicant_id, status, cover_letter, resume_url, notes, applied_at, updated_at";

const APPLICATION_WITH_META_SELECT: &str = r#"
    SELECT
        a.id, a.job_id, a.applicant_id, a.status, a.cover_letter, a.resume_url, a.notes,
        a.applied_at, a.updated_at,
        j.title AS job_title,
        j.department AS job_department,
        j.location AS job_location,
        u.full_name AS applicant_name,
        u.email AS applicant_email,
        p.phone AS applicant_phone,
        p.linkedin_url AS applicant_linkedin_url
    FROM applications a
    JOIN jobs j ON j.id = a.job_id
    JOIN users u ON u.id = a.applicant_id
    LEFT JOIN applicant_profiles p ON p.user_id = a.applicant_id
"#;

/// Default history note when the reviewer leaves none.
pub fn default_status_note(status: ApplicationStatus) -> String {
    format!("Status changed to {}", status)
}

/// Validates a requested status change against the workflow graph.
pub fn check_transition(current: ApplicationStatus, next: ApplicationStatus) -> Result<()> {
    if current.can_transition_to(next) {
        Ok(())
    } else {
        Err(Error::BadRequest(format!(
            "Cannot change status from {} to {}",
            current, next
        )))
    }
}

#[derive(Clone)]
pub struct ApplicationService {
    pool: PgPool,
    jobs: JobService,
    users: UserService,
    email: EmailService,
}

impl ApplicationService {
    pub fn new(pool: PgPool, jobs: JobService, users: UserService, email: EmailService) -> Self {
        Self {
            pool,
            jobs,
            users,
            email,
        }
    }

    pub async fn create(
        &self,
        payload: CreateApplicationPayload,
        applicant_id: Uuid,
    ) -> Result<ApplicationWithMeta> {
        let job = sqlx::query_as::<_, (JobStatus, String)>(
            "SELECT status, title FROM jobs WHERE id = $1",
        )
        .bind(payload.job_id)
        .fetch_optional(&self.pool)
        .await?;
        let Some((job_status, job_title)) = job else {
            return Err(Error::NotFound("Job not found".to_string()));
        };
        if !job_status.accepts_applications() {
            return Err(Error::BadRequest(
                "Job is not accepting applications".to_string(),
            ));
        }

        let already_applied = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM applications WHERE job_id = $1 AND applicant_id = $2)",
        )
        .bind(payload.job_id)
        .bind(applicant_id)
        .fetch_one(&self.pool)
        .await?;
        if already_applied {
            return Err(already_applied_error());
        }

        let mut tx = self.pool.begin().await?;

        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO applications (job_id, applicant_id, cover_letter, resume_url)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(payload.job_id)
        .bind(applicant_id)
        .bind(payload.cover_letter.as_deref())
        .bind(payload.resume_url.as_deref())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match Error::from(e) {
            Error::Conflict(_) => already_applied_error(),
            other => other,
        })?;

        sqlx::query(
            r#"
            INSERT INTO application_status_history (application_id, status, changed_by, notes)
            VALUES ($1, $2, $3, 'Application submitted')
            "#,
        )
        .bind(id)
        .bind(ApplicationStatus::Pending)
        .bind(applicant_id)
        .execute(&mut *tx)
        .await?;

        let created = fetch_with_meta(&mut *tx, id).await?;
        tx.commit().await?;
        tracing::info!(application_id = %id, job_id = %payload.job_id, %applicant_id, "application submitted");

        self.email
            .dispatch_application_received(created.applicant_email.clone(), job_title);

        Ok(created)
    }

    /// Applicants only ever see their own rows; `jobId` narrows staff listings.
    pub async fn list(
        &self,
        query: ApplicationListQuery,
        actor: &Claims,
    ) -> Result<Paginated<ApplicationWithMeta>> {
        let page = PageRequest::new(query.page, query.limit);

        let mut filters = Vec::new();
        let mut args: Vec<String> = Vec::new();

        match AccessPolicy::applicant_scope(actor) {
            Some(applicant_id) => {
                filters.push(format!("a.applicant_id = ${}::uuid", args.len() + 1));
                args.push(applicant_id.to_string());
            }
            None => {
                if let Some(job_id) = query.job_id {
                    filters.push(format!("a.job_id = ${}::uuid", args.len() + 1));
                    args.push(job_id.to_string());
                }
            }
        }

        if let Some(raw) = query.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let status = raw.parse::<ApplicationStatus>().map_err(Error::BadRequest)?;
            filters.push(format!(
                "a.status = ${}::application_status",
                args.len() + 1
            ));
            args.push(status.as_str().to_string());
        }

        let where_clause = if filters.is_empty() {
            "".to_string()
        } else {
            format!("WHERE {}", filters.join(" AND "))
        };

        let items_query = format!(
            "{} {} ORDER BY a.applied_at DESC LIMIT ${} OFFSET ${}",
            APPLICATION_WITH_META_SELECT,
            where_clause,
            args.len() + 1,
            args.len() + 2
        );
        let total_query = format!("SELECT COUNT(*) FROM applications a {}", where_clause);

        let mut items_statement = sqlx::query_as::<_, ApplicationWithMeta>(&items_query);
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

    pub async fn get_detail(&self, id: Uuid, actor: &Claims) -> Result<ApplicationDetailResponse> {
        let application = self.find(id).await?;
        AccessPolicy::ensure_owner_or_staff(actor, application.applicant_id)?;

        let job = self.jobs.get_by_id(application.job_id).await?;
        let applicant = self.users.find_user(application.applicant_id).await?;
        let profile = self.users.find_profile(application.applicant_id).await?;
        let status_history = self.history(id).await?;

        Ok(ApplicationDetailResponse {
            id: application.id,
            job_id: application.job_id,
            applicant_id: application.applicant_id,
            status: application.status,
            cover_letter: application.cover_letter,
            resume_url: application.resume_url,
            notes: application.notes,
            applied_at: application.applied_at,
            updated_at: application.updated_at,
            job: JobResponse::from(job),
            applicant: ApplicantDetail::new(applicant, profile),
            status_history,
        })
    }

    /// Moves the application along the workflow and appends one history row, atomically.
    pub async fn update_status(
        &self,
        id: Uuid,
        raw_status: &str,
        notes: Option<String>,
        actor: &Claims,
    ) -> Result<Application> {
        let next = raw_status
            .trim()
            .parse::<ApplicationStatus>()
            .map_err(Error::BadRequest)?;

        let mut tx = self.pool.begin().await?;

        let (current, applicant_email, job_title) =
            sqlx::query_as::<_, (ApplicationStatus, String, String)>(
                r#"
                SELECT a.status, u.email, j.title
                FROM applications a
                JOIN users u ON u.id = a.applicant_id
                JOIN jobs j ON j.id = a.job_id
                WHERE a.id = $1
                FOR UPDATE OF a
                "#,
            )
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| Error::NotFound("Application not found".to_string()))?;
        check_transition(current, next)?;

        let updated = sqlx::query_as::<_, Application>(&format!(
            "UPDATE applications SET status = $2, updated_at = NOW() WHERE id = $1
             RETURNING {APPLICATION_COLUMNS}"
        ))
        .bind(id)
        .bind(next)
        .fetch_one(&mut *tx)
        .await?;

        let note = notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| default_status_note(next));
        sqlx::query(
            r#"
            INSERT INTO application_status_history (application_id, status, changed_by, notes)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(id)
        .bind(next)
        .bind(actor.sub)
        .bind(&note)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::info!(application_id = %id, from = %current, to = %next, actor = %actor.sub, "application status changed");

        self.email
            .dispatch_status_update(applicant_email, job_title, next);

        Ok(updated)
    }

    /// Replaces the reviewer notes on the application.
    pub async fn add_notes(&self, id: Uuid, notes: &str) -> Result<Application> {
        sqlx::query_as::<_, Application>(&format!(
            "UPDATE applications SET notes = $2, updated_at = NOW() WHERE id = $1
             RETURNING {APPLICATION_COLUMNS}"
        ))
        .bind(id)
        .bind(notes)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Application not found".to_string()))
    }

    async fn find(&self, id: Uuid) -> Result<Application> {
        sqlx::query_as::<_, Application>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Application not found".to_string()))
    }

    /// Newest first.
    pub async fn history(&self, application_id: Uuid) -> Result<Vec<StatusHistoryEntry>> {
        let rows = sqlx::query_as::<_, StatusHistoryEntry>(
            r#"
            SELECT h.id, h.application_id, h.status, h.changed_by,
                   u.full_name AS changed_by_name, h.notes, h.changed_at
            FROM application_status_history h
            JOIN users u ON u.id = h.changed_by
            WHERE h.application_id = $1
            ORDER BY h.changed_at DESC
            "#,
        )
        .bind(application_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

async fn fetch_with_meta<'e, E: PgExecutor<'e>>(
    executor: E,
    id: Uuid,
) -> Result<ApplicationWithMeta> {
    sqlx::query_as::<_, ApplicationWithMeta>(&format!(
        "{} WHERE a.id = $1",
        APPLICATION_WITH_META_SELECT
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| Error::NotFound("Application not found".to_string()))
}

fn already_applied_error() -> Error {
    Error::Conflict("You have already applied for this job".to_string())
}
