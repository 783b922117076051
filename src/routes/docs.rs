use axum::response::{IntoResponse, Json};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::dto::{
    application_dto::{
        AddNotesPayload, ApplicantDetail, ApplicantSummary, ApplicationDetailResponse,
        ApplicationJobSummary, ApplicationListResponse, ApplicationResponse,
        CreateApplicationPayload, UpdateStatusPayload,
    },
    auth_dto::{
        AuthResponse, CreateStaffPayload, CurrentUserResponse, ExchangeTokenPayload, LoginPayload,
        RegisterPayload, UserSummary,
    },
    common_dto::{ErrorResponse, MessageResponse},
    hr_dto::{
        AnalyticsResponse, CandidateApplicationSummary, CandidateListResponse, CandidateResponse,
        DashboardStats, DepartmentCount, JobApplicationCount, StatusCount,
    },
    job_dto::{CreateJobPayload, JobListResponse, JobResponse, PosterSummary, UpdateJobPayload},
    saved_job_dto::{SaveJobPayload, SavedJobListResponse, SavedJobResponse, SavedJobSummary},
    user_dto::{ProfileResponse, ResumePayload, ResumeResponse, UpdateProfilePayload},
};
use crate::models::{
    applicant_profile::ApplicantProfile,
    application::{Application, ApplicationStatus},
    job::{JobStatus, JobType},
    status_history::StatusHistoryEntry,
    user::Role,
};
use crate::routes;
use crate::utils::pagination::Pagination;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::health::health,
        routes::auth::register,
        routes::auth::login,
        routes::auth::me,
        routes::auth::exchange_token,
        routes::jobs::list_jobs,
        routes::jobs::get_job,
        routes::jobs::create_job,
        routes::jobs::update_job,
        routes::jobs::delete_job,
        routes::applications::create_application,
        routes::applications::list_applications,
        routes::applications::get_application,
        routes::applications::update_application_status,
        routes::applications::add_application_notes,
        routes::users::get_profile,
        routes::users::update_profile,
        routes::users::upload_resume,
        routes::users::create_staff_account,
        routes::hr::get_stats,
        routes::hr::get_analytics,
        routes::hr::get_candidates,
        routes::saved_jobs::list_saved_jobs,
        routes::saved_jobs::save_job,
        routes::saved_jobs::unsave_job,
    ),
    components(schemas(
        Role, JobType, JobStatus, ApplicationStatus, Pagination,
        ErrorResponse, MessageResponse,
        RegisterPayload, LoginPayload, ExchangeTokenPayload, UserSummary, AuthResponse,
        CreateStaffPayload,
        CurrentUserResponse,
        CreateJobPayload, UpdateJobPayload, PosterSummary, JobResponse, JobListResponse,
        CreateApplicationPayload, UpdateStatusPayload, AddNotesPayload, Application,
        ApplicationJobSummary, ApplicantSummary, ApplicationResponse, ApplicationListResponse,
        ApplicantDetail, ApplicationDetailResponse, StatusHistoryEntry, ApplicantProfile,
        UpdateProfilePayload, ResumePayload, ResumeResponse, ProfileResponse,
        DashboardStats, StatusCount, JobApplicationCount, DepartmentCount, AnalyticsResponse,
        CandidateApplicationSummary, CandidateResponse, CandidateListResponse,
        SaveJobPayload, SavedJobSummary, SavedJobResponse, SavedJobListResponse,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "jobboard", description = "Job board and applicant tracking API")
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
