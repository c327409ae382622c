use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ServiceError;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Customer,
    Professional,
    Admin,
}

/// The authenticated caller, passed explicitly into every operation.
///
/// The admin is a configured identity and has no database id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    Customer { id: i64, username: String },
    Professional { id: i64, username: String },
    Admin { username: String },
}

impl Principal {
    pub fn role(&self) -> Role {
        match self {
            Principal::Customer { .. } => Role::Customer,
            Principal::Professional { .. } => Role::Professional,
            Principal::Admin { .. } => Role::Admin,
        }
    }

    pub fn username(&self) -> &str {
        match self {
            Principal::Customer { username, .. }
            | Principal::Professional { username, .. }
            | Principal::Admin { username } => username,
        }
    }

    pub fn customer_id(&self) -> Result<i64, ServiceError> {
        match self {
            Principal::Customer { id, .. } => Ok(*id),
            _ => Err(ServiceError::unauthorized("customer access required")),
        }
    }

    pub fn professional_id(&self) -> Result<i64, ServiceError> {
        match self {
            Principal::Professional { id, .. } => Ok(*id),
            _ => Err(ServiceError::unauthorized("professional access required")),
        }
    }

    pub fn require_admin(&self) -> Result<(), ServiceError> {
        match self {
            Principal::Admin { .. } => Ok(()),
            _ => Err(ServiceError::unauthorized("admin access required")),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct UserInfo {
    pub id: Option<i64>,
    pub username: String,
    pub role: Role,
}

impl From<&Principal> for UserInfo {
    fn from(principal: &Principal) -> Self {
        let id = match principal {
            Principal::Customer { id, .. } | Principal::Professional { id, .. } => Some(*id),
            Principal::Admin { .. } => None,
        };
        UserInfo {
            id,
            username: principal.username().to_string(),
            role: principal.role(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_guards_reject_other_principals() {
        let admin = Principal::Admin {
            username: "admin".to_string(),
        };
        let customer = Principal::Customer {
            id: 7,
            username: "carol".to_string(),
        };

        assert!(admin.require_admin().is_ok());
        assert!(customer.require_admin().is_err());
        assert_eq!(customer.customer_id().ok(), Some(7));
        assert!(matches!(
            customer.professional_id(),
            Err(ServiceError::Unauthorized(_))
        ));
        assert_eq!(UserInfo::from(&admin).id, None);
    }
}
