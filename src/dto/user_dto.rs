use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::applicant_profile::ApplicantProfile;
use crate::models::user::{Role, User};

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfilePayload {
    #[validate(length(min = 2))]
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[validate(url)]
    pub linkedin_url: Option<String>,
    #[validate(url)]
    pub portfolio_url: Option<String>,
    pub bio: Option<String>,
    pub skills: Option<Vec<String>>,
    #[validate(range(min = 0, max = 80))]
    pub experience_years: Option<i32>,
    pub current_position: Option<String>,
    #[schema(value_type = Option<Vec<Object>>)]
    pub education: Option<Vec<JsonValue>>,
}

impl UpdateProfilePayload {
    /// True when any applicant-profile column (anything but `fullName`) is present.
    pub fn touches_profile(&self) -> bool {
        self.phone.is_some()
            || self.address.is_some()
            || self.linkedin_url.is_some()
            || self.portfolio_url.is_some()
            || self.bio.is_some()
            || self.skills.is_some()
            || self.experience_years.is_some()
            || self.current_position.is_some()
            || self.education.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResumePayload {
    #[validate(url)]
    pub resume_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResumeResponse {
    pub resume_url: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub applicant_profile: Option<ApplicantProfile>,
}

impl ProfileResponse {
    pub fn new(user: User, profile: Option<ApplicantProfile>) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            role: user.role,
            avatar_url: user.avatar_url,
            created_at: user.created_at,
            updated_at: user.updated_at,
            applicant_profile: profile,
        }
    }
}
