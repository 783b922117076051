pub mod client;
pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::config::Config;
use crate::services::{
    application_service::ApplicationService, auth_service::AuthService,
    email_service::EmailService, hr_service::HrService, job_service::JobService,
    saved_job_service::SavedJobService, user_service::UserService,
};
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub auth_service: AuthService,
    pub job_service: JobService,
    pub application_service: ApplicationService,
    pub saved_job_service: SavedJobService,
    pub user_service: UserService,
    pub hr_service: HrService,
    pub email_service: EmailService,
}

impl AppState {
    pub fn new(pool: PgPool, config: &Config) -> Self {
        let auth_service = AuthService::new(
            pool.clone(),
            config.jwt_secret.clone(),
            config.jwt_expires_in,
            config.exchange_secret.clone(),
        );
        let job_service = JobService::new(pool.clone());
        let user_service = UserService::new(pool.clone());
        let email_service = EmailService::from_config(
            pool.clone(),
            config.smtp.as_ref(),
            config.company_name.clone(),
        );
        let application_service = ApplicationService::new(
            pool.clone(),
            job_service.clone(),
            user_service.clone(),
            email_service.clone(),
        );
        let saved_job_service = SavedJobService::new(pool.clone());
        let hr_service = HrService::new(pool.clone());

        Self {
            pool,
            auth_service,
            job_service,
            application_service,
            saved_job_service,
            user_service,
            hr_service,
            email_service,
        }
    }
}
