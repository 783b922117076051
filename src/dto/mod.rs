pub mod application_dto;
pub mod auth_dto;
pub mod common_dto;
pub mod hr_dto;
pub mod job_dto;
pub mod saved_job_dto;
pub mod user_dto;
