pub mod access_policy;
pub mod application_service;
pub mod auth_service;
pub mod email_service;
pub mod hr_service;
pub mod job_service;
pub mod saved_job_service;
pub mod user_service;
