use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::application::ApplicationStatus;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusHistoryEntry {
    pub id: Uuid,
    pub application_id: Uuid,
    pub status: ApplicationStatus,
    pub changed_by: Uuid,
    pub changed_by_name: String,
    pub notes: Option<String>,
    pub changed_at: DateTime<Utc>,
}
