use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::user::Role;
use crate::utils::token::Claims;

/// Ownership and role checks shared by every service that guards a row.
#[derive(Clone, Copy, Debug, Default)]
pub struct AccessPolicy;

impl AccessPolicy {
    pub fn is_staff(role: Role) -> bool {
        role.is_staff()
    }

    /// Passes when `actor` owns the row or holds a staff role.
    pub fn ensure_owner_or_staff(actor: &Claims, owner_id: Uuid) -> Result<()> {
        if actor.sub == owner_id || Self::is_staff(actor.role) {
            return Ok(());
        }
        tracing::debug!(actor = %actor.sub, owner = %owner_id, "ownership check failed");
        Err(Error::Forbidden("Access denied".to_string()))
    }

    /// Applicants are scoped to their own rows; staff see everything.
    pub fn applicant_scope(actor: &Claims) -> Option<Uuid> {
        if Self::is_staff(actor.role) {
            None
        } else {
            Some(actor.sub)
        }
    }
}
