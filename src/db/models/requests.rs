// src/db/models/requests.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Lifecycle status of a service request.
///
/// `Requested → Accepted → Closed` and `Requested → Rejected`; `Closed` and
/// `Rejected` are terminal.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type, ToSchema)]
pub enum RequestStatus {
    Requested,
    Accepted,
    Rejected,
    Closed,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 4] = [
        RequestStatus::Requested,
        RequestStatus::Accepted,
        RequestStatus::Rejected,
        RequestStatus::Closed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Requested => "Requested",
            RequestStatus::Accepted => "Accepted",
            RequestStatus::Rejected => "Rejected",
            RequestStatus::Closed => "Closed",
        }
    }

    pub fn can_transition_to(self, next: RequestStatus) -> bool {
        matches!(
            (self, next),
            (RequestStatus::Requested, RequestStatus::Accepted)
                | (RequestStatus::Requested, RequestStatus::Rejected)
                | (RequestStatus::Accepted, RequestStatus::Closed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, RequestStatus::Rejected | RequestStatus::Closed)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, sqlx::FromRow, ToSchema)]
pub struct ServiceRequest {
    pub id: i64,
    pub service_id: i64,
    pub customer_id: i64,
    pub professional_id: Option<i64>,
    pub status: RequestStatus,
    pub date_of_request: NaiveDate,
    pub date_of_completion: Option<NaiveDate>,
    pub rating: Option<i64>,
    pub remarks: Option<String>,
}

impl ServiceRequest {
    pub fn is_public(&self) -> bool {
        self.professional_id.is_none()
    }
}

/// A request joined with the names a dashboard needs to show it.
#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow, ToSchema)]
pub struct RequestOverview {
    pub id: i64,
    pub service_id: i64,
    pub service_name: String,
    pub customer_id: i64,
    pub customer_username: String,
    pub customer_address: String,
    pub customer_contact: String,
    pub professional_id: Option<i64>,
    pub professional_username: Option<String>,
    pub professional_contact: Option<String>,
    pub status: RequestStatus,
    pub date_of_request: NaiveDate,
    pub date_of_completion: Option<NaiveDate>,
    pub rating: Option<i64>,
    pub remarks: Option<String>,
}

/// Payload for `POST /customer/requests`. Omitting `professional_id`
/// creates a public request.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NewServiceRequest {
    pub service_id: i64,
    pub professional_id: Option<i64>,
}

/// The only two edits a customer may make, depending on status.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RequestEdit {
    Reschedule { date_of_request: NaiveDate },
    Remarks { remarks: String },
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CloseServiceRequest {
    pub rating: i64,
    pub remarks: Option<String>,
}

/// Count of requests in one status.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
pub struct StatusCount {
    pub status: RequestStatus,
    pub count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_lifecycle_edges_are_allowed() {
        let allowed = [
            (RequestStatus::Requested, RequestStatus::Accepted),
            (RequestStatus::Requested, RequestStatus::Rejected),
            (RequestStatus::Accepted, RequestStatus::Closed),
        ];
        for from in RequestStatus::ALL {
            for to in RequestStatus::ALL {
                assert_eq!(
                    from.can_transition_to(to),
                    allowed.contains(&(from, to)),
                    "{from:?} -> {to:?}"
                );
            }
        }
    }

    #[test]
    fn terminal_states_have_no_exits() {
        for from in RequestStatus::ALL.into_iter().filter(|s| s.is_terminal()) {
            assert!(RequestStatus::ALL.iter().all(|to| !from.can_transition_to(*to)));
        }
    }

    #[test]
    fn edit_payload_is_tagged() {
        let edit: RequestEdit =
            serde_json::from_str(r#"{"kind":"remarks","remarks":"great job"}"#).expect("parses");
        assert_eq!(
            edit,
            RequestEdit::Remarks {
                remarks: "great job".to_string()
            }
        );
    }
}
