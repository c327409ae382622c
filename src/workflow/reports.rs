//! Read models for dashboards, status summaries and search.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use utoipa::{IntoParams, ToSchema};

use crate::db::models::professional::Professional;
use crate::db::models::requests::{RequestOverview, RequestStatus, StatusCount};
use crate::db::models::service::Service;
use crate::db::models::user::Principal;
use crate::db::queries::catalog;
use crate::db::queries::professional::{self, ProfessionalFilter};
use crate::db::queries::reports::{self, RequestFilter};
use crate::error::ServiceError;

/// Statuses shown on the customer summary; rejections are left out.
const CUSTOMER_SUMMARY: [RequestStatus; 3] = [
    RequestStatus::Requested,
    RequestStatus::Accepted,
    RequestStatus::Closed,
];

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerDashboard {
    pub services: Vec<Service>,
    pub requests: Vec<RequestOverview>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfessionalDashboard {
    /// Unassigned requests in the professional's trade.
    pub public_requests: Vec<RequestOverview>,
    /// Requests addressed to the professional, not yet answered.
    pub private_requests: Vec<RequestOverview>,
    pub accepted_requests: Vec<RequestOverview>,
    pub closed_requests: Vec<RequestOverview>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminDashboard {
    pub services: Vec<Service>,
    pub professionals: Vec<Professional>,
    pub requests: Vec<RequestOverview>,
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RequestSearchField {
    ServiceName,
    DateOfRequest,
    ProfessionalName,
    CustomerName,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RequestSearch {
    /// Field to match against.
    pub by: RequestSearchField,
    /// Substring to look for.
    pub term: String,
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProfessionalSearchField {
    ServiceName,
    PinCode,
    Username,
    /// Minimum average rating.
    Rating,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProfessionalSearch {
    pub by: ProfessionalSearchField,
    pub term: String,
}

/// Request counts per status for the caller: every request for the admin,
/// the professional's own requests, or the customer's own open and closed
/// requests. Statuses without requests are reported as zero.
pub async fn request_summary(
    pool: &SqlitePool,
    principal: &Principal,
) -> Result<Vec<StatusCount>, ServiceError> {
    let (rows, statuses) = match principal {
        Principal::Admin { .. } => (
            reports::status_counts(pool, None, None).await?,
            RequestStatus::ALL.as_slice(),
        ),
        Principal::Professional { id, .. } => (
            reports::status_counts(pool, None, Some(*id)).await?,
            RequestStatus::ALL.as_slice(),
        ),
        Principal::Customer { id, .. } => (
            reports::status_counts(pool, Some(*id), None).await?,
            CUSTOMER_SUMMARY.as_slice(),
        ),
    };
    Ok(zero_filled(&rows, statuses))
}

fn zero_filled(rows: &[(RequestStatus, i64)], statuses: &[RequestStatus]) -> Vec<StatusCount> {
    statuses
        .iter()
        .map(|status| StatusCount {
            status: *status,
            count: rows
                .iter()
                .find(|(row_status, _)| row_status == status)
                .map_or(0, |(_, count)| *count),
        })
        .collect()
}

pub async fn customer_dashboard(
    pool: &SqlitePool,
    principal: &Principal,
) -> Result<CustomerDashboard, ServiceError> {
    let customer_id = principal.customer_id()?;
    let services = catalog::list_services(pool).await?;
    let requests = reports::request_overviews(
        pool,
        &RequestFilter {
            customer_id: Some(customer_id),
            ..Default::default()
        },
    )
    .await?;
    Ok(CustomerDashboard { services, requests })
}

pub async fn professional_dashboard(
    pool: &SqlitePool,
    principal: &Principal,
) -> Result<ProfessionalDashboard, ServiceError> {
    let professional_id = principal.professional_id()?;
    let me = professional::find_professional(pool, professional_id)
        .await?
        .ok_or(ServiceError::NotFound("Professional"))?;

    let public_requests = match catalog::find_service_by_name(pool, &me.service_type).await? {
        Some(trade) => {
            reports::request_overviews(
                pool,
                &RequestFilter {
                    service_id: Some(trade.id),
                    unassigned: true,
                    status: Some(RequestStatus::Requested),
                    ..Default::default()
                },
            )
            .await?
        }
        None => Vec::new(),
    };
    let own = |status| RequestFilter {
        professional_id: Some(professional_id),
        status: Some(status),
        ..Default::default()
    };

    Ok(ProfessionalDashboard {
        public_requests,
        private_requests: reports::request_overviews(pool, &own(RequestStatus::Requested)).await?,
        accepted_requests: reports::request_overviews(pool, &own(RequestStatus::Accepted)).await?,
        closed_requests: reports::request_overviews(pool, &own(RequestStatus::Closed)).await?,
    })
}

pub async fn admin_dashboard(
    pool: &SqlitePool,
    principal: &Principal,
) -> Result<AdminDashboard, ServiceError> {
    principal.require_admin()?;
    Ok(AdminDashboard {
        services: catalog::list_services(pool).await?,
        professionals: professional::all_professionals(pool).await?,
        requests: reports::request_overviews(pool, &RequestFilter::default()).await?,
    })
}

/// Admin search over every request.
pub async fn search_requests(
    pool: &SqlitePool,
    principal: &Principal,
    search: &RequestSearch,
) -> Result<Vec<RequestOverview>, ServiceError> {
    principal.require_admin()?;
    let term = Some(search.term.trim().to_string());
    let filter = match search.by {
        RequestSearchField::ServiceName => RequestFilter {
            service_name: term,
            ..Default::default()
        },
        RequestSearchField::DateOfRequest => RequestFilter {
            date_of_request: term,
            ..Default::default()
        },
        RequestSearchField::ProfessionalName => RequestFilter {
            professional_name: term,
            ..Default::default()
        },
        RequestSearchField::CustomerName => RequestFilter {
            customer_name: term,
            ..Default::default()
        },
    };
    Ok(reports::request_overviews(pool, &filter).await?)
}

/// Customer search over approved professionals.
pub async fn search_professionals(
    pool: &SqlitePool,
    principal: &Principal,
    search: &ProfessionalSearch,
) -> Result<Vec<Professional>, ServiceError> {
    principal.customer_id()?;
    let term = search.term.trim().to_string();
    let filter = match search.by {
        ProfessionalSearchField::ServiceName => ProfessionalFilter {
            service_name: Some(term),
            ..Default::default()
        },
        ProfessionalSearchField::PinCode => ProfessionalFilter {
            pin_code: Some(term),
            ..Default::default()
        },
        ProfessionalSearchField::Username => ProfessionalFilter {
            username: Some(term),
            ..Default::default()
        },
        ProfessionalSearchField::Rating => {
            let min_rating = term.parse::<f64>().map_err(|_| {
                ServiceError::Validation(format!("{term} is not a valid rating"))
            })?;
            ProfessionalFilter {
                min_rating: Some(min_rating),
                ..Default::default()
            }
        }
    };
    Ok(professional::search_approved(pool, &filter).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_statuses_count_as_zero() {
        let rows = vec![(RequestStatus::Closed, 2), (RequestStatus::Rejected, 1)];
        let summary = zero_filled(&rows, &CUSTOMER_SUMMARY);
        assert_eq!(
            summary,
            vec![
                StatusCount { status: RequestStatus::Requested, count: 0 },
                StatusCount { status: RequestStatus::Accepted, count: 0 },
                StatusCount { status: RequestStatus::Closed, count: 2 },
            ]
        );
    }
}
