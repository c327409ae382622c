//! Request lifecycle: creation, matching, completion and customer edits.
//!
//! Every transition out of `Requested` or `Accepted` is a conditional
//! `UPDATE ... WHERE status = <expected>`; a zero row count means somebody
//! else moved the request first and the caller gets `InvalidState`.

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::info;

use crate::db::models::professional::Professional;
use crate::db::models::requests::{RequestEdit, RequestStatus, ServiceRequest};
use crate::db::models::user::Principal;
use crate::db::pool::begin_write;
use crate::db::queries::{catalog, customer, professional, requests};
use crate::error::ServiceError;
use crate::workflow::{rating, today};

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

/// Open a request any approved professional of the service's trade may claim.
pub async fn create_public_request(
    pool: &SqlitePool,
    principal: &Principal,
    service_id: i64,
) -> Result<ServiceRequest, ServiceError> {
    let customer_id = principal.customer_id()?;
    create_request(pool, customer_id, service_id, None, today()).await
}

/// Open a request addressed to one professional.
pub async fn create_private_request(
    pool: &SqlitePool,
    principal: &Principal,
    service_id: i64,
    professional_id: i64,
) -> Result<ServiceRequest, ServiceError> {
    let customer_id = principal.customer_id()?;
    create_request(pool, customer_id, service_id, Some(professional_id), today()).await
}

async fn create_request(
    pool: &SqlitePool,
    customer_id: i64,
    service_id: i64,
    professional_id: Option<i64>,
    date_of_request: NaiveDate,
) -> Result<ServiceRequest, ServiceError> {
    let mut tx = begin_write(pool).await?;

    customer::find_customer(&mut *tx, customer_id)
        .await?
        .ok_or(ServiceError::NotFound("Customer"))?;
    let service = catalog::find_service(&mut *tx, service_id)
        .await?
        .ok_or(ServiceError::NotFound("Service"))?;

    let duplicate = match professional_id {
        None => requests::open_public_request_exists(&mut *tx, customer_id, service_id).await?,
        Some(professional_id) => {
            let target = professional::find_professional(&mut *tx, professional_id)
                .await?
                .ok_or(ServiceError::NotFound("Professional"))?;
            if target.service_type != service.name {
                return Err(ServiceError::Validation(format!(
                    "{} does not offer {}",
                    target.username, service.name
                )));
            }
            if !target.approval_status.is_approved() {
                return Err(ServiceError::invalid_state(format!(
                    "{} is not accepting requests",
                    target.username
                )));
            }
            requests::open_private_request_exists(&mut *tx, customer_id, service_id, professional_id)
                .await?
        }
    };
    if duplicate {
        return Err(ServiceError::DuplicateRequest);
    }

    let request =
        requests::insert_request(&mut *tx, service_id, customer_id, professional_id, date_of_request)
            .await?;
    tx.commit().await?;

    info!(
        request_id = request.id,
        customer_id,
        service_id,
        public = request.is_public(),
        "service request created"
    );
    Ok(request)
}

/// Accept a request. For a public request this is the matching step: the
/// first approved professional of the right trade to accept claims it.
pub async fn accept_request(
    pool: &SqlitePool,
    principal: &Principal,
    request_id: i64,
) -> Result<ServiceRequest, ServiceError> {
    respond(pool, principal, request_id, RequestStatus::Accepted).await
}

/// Reject a request. Terminal; the customer has to request again.
pub async fn reject_request(
    pool: &SqlitePool,
    principal: &Principal,
    request_id: i64,
) -> Result<ServiceRequest, ServiceError> {
    respond(pool, principal, request_id, RequestStatus::Rejected).await
}

async fn respond(
    pool: &SqlitePool,
    principal: &Principal,
    request_id: i64,
    next: RequestStatus,
) -> Result<ServiceRequest, ServiceError> {
    let professional_id = principal.professional_id()?;
    let mut tx = begin_write(pool).await?;

    let actor = professional::find_professional(&mut *tx, professional_id)
        .await?
        .ok_or_else(|| ServiceError::unauthorized("professional account no longer exists"))?;
    if !actor.approval_status.is_approved() {
        return Err(ServiceError::unauthorized(
            "only approved professionals can respond to requests",
        ));
    }

    let request = requests::find_request(&mut *tx, request_id)
        .await?
        .ok_or(ServiceError::NotFound("Request"))?;
    if !request.status.can_transition_to(next) {
        return Err(ServiceError::invalid_state(format!(
            "request is {} and cannot become {}",
            request.status.as_str(),
            next.as_str()
        )));
    }
    ensure_eligible(&mut tx, &actor, &request).await?;

    let claimed = requests::transition_requested(&mut *tx, request_id, actor.id, next).await?;
    if claimed == 0 {
        return Err(ServiceError::invalid_state(
            "request was already taken by another professional",
        ));
    }

    let updated = requests::find_request(&mut *tx, request_id)
        .await?
        .ok_or(ServiceError::NotFound("Request"))?;
    tx.commit().await?;

    info!(
        request_id,
        professional_id = actor.id,
        status = next.as_str(),
        "service request answered"
    );
    Ok(updated)
}

/// A professional may act on requests assigned to them, or on public
/// requests of their own trade.
async fn ensure_eligible(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    actor: &Professional,
    request: &ServiceRequest,
) -> Result<(), ServiceError> {
    match request.professional_id {
        Some(assigned) if assigned == actor.id => Ok(()),
        Some(_) => Err(ServiceError::unauthorized(
            "request is assigned to another professional",
        )),
        None => {
            let service = catalog::find_service(&mut **tx, request.service_id)
                .await?
                .ok_or(ServiceError::NotFound("Service"))?;
            if service.name == actor.service_type {
                Ok(())
            } else {
                Err(ServiceError::unauthorized("request is outside your trade"))
            }
        }
    }
}

/// Close an accepted request with a 1–5 rating and refresh the
/// professional's average in the same transaction.
pub async fn close_request(
    pool: &SqlitePool,
    principal: &Principal,
    request_id: i64,
    rating: i64,
    remarks: Option<String>,
) -> Result<ServiceRequest, ServiceError> {
    let customer_id = principal.customer_id()?;
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(ServiceError::Validation(format!(
            "rating must be between {MIN_RATING} and {MAX_RATING}"
        )));
    }

    let mut tx = begin_write(pool).await?;
    let request = owned_request(&mut tx, customer_id, request_id).await?;
    if !request.status.can_transition_to(RequestStatus::Closed) {
        return Err(ServiceError::invalid_state(format!(
            "only accepted requests can be closed, this one is {}",
            request.status.as_str()
        )));
    }
    let professional_id = request
        .professional_id
        .ok_or_else(|| ServiceError::invalid_state("accepted request has no professional"))?;

    let closed =
        requests::close_request(&mut *tx, request_id, rating, remarks.as_deref(), today()).await?;
    if closed == 0 {
        return Err(ServiceError::invalid_state("request is no longer accepted"));
    }
    let avg_rating = rating::recompute_rating(&mut tx, professional_id).await?;

    let updated = requests::find_request(&mut *tx, request_id)
        .await?
        .ok_or(ServiceError::NotFound("Request"))?;
    tx.commit().await?;

    info!(request_id, professional_id, rating, avg_rating, "service request closed");
    Ok(updated)
}

/// Closed requests accept new remarks only; every other status accepts a new
/// date only.
pub async fn edit_request(
    pool: &SqlitePool,
    principal: &Principal,
    request_id: i64,
    edit: RequestEdit,
) -> Result<ServiceRequest, ServiceError> {
    let customer_id = principal.customer_id()?;
    let mut tx = begin_write(pool).await?;
    let request = owned_request(&mut tx, customer_id, request_id).await?;

    let changed = match (request.status, &edit) {
        (RequestStatus::Closed, RequestEdit::Remarks { remarks }) => {
            requests::update_remarks(&mut *tx, request_id, remarks).await?
        }
        (RequestStatus::Closed, RequestEdit::Reschedule { .. }) => {
            return Err(ServiceError::invalid_state(
                "a closed request can only have its remarks edited",
            ))
        }
        (_, RequestEdit::Reschedule { date_of_request }) => {
            requests::reschedule_request(&mut *tx, request_id, *date_of_request).await?
        }
        (status, RequestEdit::Remarks { .. }) => {
            return Err(ServiceError::invalid_state(format!(
                "remarks can be edited once the request is closed, this one is {}",
                status.as_str()
            )))
        }
    };
    if changed == 0 {
        return Err(ServiceError::invalid_state("request changed while editing"));
    }

    let updated = requests::find_request(&mut *tx, request_id)
        .await?
        .ok_or(ServiceError::NotFound("Request"))?;
    tx.commit().await?;
    Ok(updated)
}

/// Withdraw a request that nobody is working on. Accepted requests are in
/// progress and closed ones feed the rating average, so both are kept.
pub async fn delete_request(
    pool: &SqlitePool,
    principal: &Principal,
    request_id: i64,
) -> Result<(), ServiceError> {
    let customer_id = principal.customer_id()?;
    let mut tx = begin_write(pool).await?;
    let request = owned_request(&mut tx, customer_id, request_id).await?;

    if matches!(request.status, RequestStatus::Accepted | RequestStatus::Closed) {
        return Err(ServiceError::invalid_state(format!(
            "{} requests cannot be deleted",
            request.status.as_str().to_lowercase()
        )));
    }
    if requests::delete_request(&mut *tx, request_id).await? == 0 {
        return Err(ServiceError::invalid_state("request changed while deleting"));
    }
    tx.commit().await?;

    info!(request_id, customer_id, "service request deleted");
    Ok(())
}

async fn owned_request(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    customer_id: i64,
    request_id: i64,
) -> Result<ServiceRequest, ServiceError> {
    let request = requests::find_request(&mut **tx, request_id)
        .await?
        .ok_or(ServiceError::NotFound("Request"))?;
    if request.customer_id != customer_id {
        return Err(ServiceError::unauthorized("request belongs to another customer"));
    }
    Ok(request)
}
