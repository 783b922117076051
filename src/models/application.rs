use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "application_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Shortlisted,
    Rejected,
    InterviewScheduled,
    OfferExtended,
    Hired,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 6] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Shortlisted,
        ApplicationStatus::Rejected,
        ApplicationStatus::InterviewScheduled,
        ApplicationStatus::OfferExtended,
        ApplicationStatus::Hired,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::InterviewScheduled => "interview_scheduled",
            ApplicationStatus::OfferExtended => "offer_extended",
            ApplicationStatus::Hired => "hired",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ApplicationStatus::Rejected | ApplicationStatus::Hired)
    }

    /// Statuses reachable in one step from `self`.
    pub fn next_statuses(self) -> &'static [ApplicationStatus] {
        use ApplicationStatus::*;
        match self {
            Pending => &[Shortlisted, Rejected, InterviewScheduled],
            Shortlisted => &[InterviewScheduled, OfferExtended, Rejected],
            InterviewScheduled => &[OfferExtended, Rejected],
            OfferExtended => &[Hired, Rejected],
            Rejected | Hired => &[],
        }
    }

    pub fn can_transition_to(self, next: ApplicationStatus) -> bool {
        self.next_statuses().contains(&next)
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Invalid status: {}", s))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: Uuid,
    pub job_id: Uuid,
    pub applicant_id: Uuid,
    pub status: ApplicationStatus,
    pub cover_letter: Option<String>,
    pub resume_url: Option<String>,
    pub notes: Option<String>,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An application joined with the job summary and applicant contact details.
#[derive(Debug, Clone, FromRow)]
pub struct ApplicationWithMeta {
    #[sqlx(flatten)]
    pub application: Application,
    pub job_title: String,
    pub job_department: String,
    pub job_location: String,
    pub applicant_name: String,
    pub applicant_email: String,
    pub applicant_phone: Option<String>,
    pub applicant_linkedin_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::ApplicationStatus::*;
    use super::*;

    #[test]
    fn happy_path_reaches_hired() {
        let path = [Pending, Shortlisted, InterviewScheduled, OfferExtended, Hired];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn terminal_states_have_no_exits() {
        for status in ApplicationStatus::ALL {
            assert!(!Rejected.can_transition_to(status));
            assert!(!Hired.can_transition_to(status));
        }
        assert!(Rejected.is_terminal());
        assert!(Hired.is_terminal());
        assert!(!OfferExtended.is_terminal());
    }

    #[test]
    fn rejects_skips_and_self_loops() {
        assert!(!Pending.can_transition_to(Hired));
        assert!(!Pending.can_transition_to(OfferExtended));
        assert!(!InterviewScheduled.can_transition_to(Shortlisted));
        for status in ApplicationStatus::ALL {
            assert!(!status.can_transition_to(status));
        }
    }

    #[test]
    fn every_open_state_can_be_rejected() {
        for status in ApplicationStatus::ALL.into_iter().filter(|s| !s.is_terminal()) {
            assert!(status.can_transition_to(Rejected));
        }
    }

    #[test]
    fn parses_wire_names() {
        assert_eq!("interview_scheduled".parse(), Ok(InterviewScheduled));
        assert!("archived".parse::<ApplicationStatus>().is_err());
    }
}
