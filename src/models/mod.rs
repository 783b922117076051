pub mod applicant_profile;
pub mod application;
pub mod email_notification;
pub mod job;
pub mod saved_job;
pub mod status_history;
pub mod user;
