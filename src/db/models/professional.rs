use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ServiceError;

/// Account state gating authentication and matching eligibility.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type, ToSchema)]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Blocked,
}

/// Admin actions that move a professional between approval states.
/// Rejection is not listed: it removes the account instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalAction {
    Approve,
    Block,
    Unblock,
}

impl ApprovalStatus {
    /// Next status after `action`, or `InvalidState` if the edge does not exist.
    /// Repeating an action that already holds is a no-op.
    pub fn apply(self, action: ApprovalAction) -> Result<ApprovalStatus, ServiceError> {
        use ApprovalAction::*;
        use ApprovalStatus::*;

        match (self, action) {
            (Pending | Approved | Blocked, Approve) => Ok(Approved),
            (Approved | Blocked, Block) => Ok(Blocked),
            (Approved | Blocked, Unblock) => Ok(Approved),
            (Pending, Block) => Err(ServiceError::invalid_state(
                "a pending professional must be approved or rejected, not blocked",
            )),
            (Pending, Unblock) => Err(ServiceError::invalid_state(
                "a pending professional is not blocked",
            )),
        }
    }

    pub fn is_approved(self) -> bool {
        self == ApprovalStatus::Approved
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow, ToSchema)]
pub struct Professional {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub description: String,
    pub service_type: String,
    pub experience_years: i64,
    pub resume: Option<String>,
    pub contact: String,
    pub pin_code: String,
    pub approval_status: ApprovalStatus,
    pub avg_rating: f64,
    pub created_on: NaiveDate,
}

/// Registration fields, collected from the multipart form.
#[derive(Debug, Clone, Default)]
pub struct NewProfessional {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub description: String,
    pub service_type: String,
    pub experience_years: i64,
    pub contact: String,
    pub pin_code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approval_table() {
        use ApprovalAction::*;
        use ApprovalStatus::*;

        assert_eq!(Pending.apply(Approve).ok(), Some(Approved));
        assert_eq!(Blocked.apply(Approve).ok(), Some(Approved));
        assert_eq!(Approved.apply(Approve).ok(), Some(Approved));
        assert_eq!(Approved.apply(Block).ok(), Some(Blocked));
        assert_eq!(Blocked.apply(Block).ok(), Some(Blocked));
        assert_eq!(Blocked.apply(Unblock).ok(), Some(Approved));
        assert_eq!(Approved.apply(Unblock).ok(), Some(Approved));
        assert!(matches!(Pending.apply(Block), Err(ServiceError::InvalidState(_))));
        assert!(matches!(Pending.apply(Unblock), Err(ServiceError::InvalidState(_))));
    }
}
