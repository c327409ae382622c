use serde::Serialize;
use sqlx::SqlitePool;
use tracing::info;
use utoipa::ToSchema;

use crate::db::models::professional::Professional;
use crate::db::models::service::{NewService, Service, UpdateService};
use crate::db::models::user::Principal;
use crate::db::pool::begin_write;
use crate::db::queries::{catalog, professional, requests};
use crate::error::{is_unique_violation, ServiceError};

/// A service together with the approved professionals offering it.
#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceOffer {
    pub service: Service,
    pub professionals: Vec<Professional>,
}

pub async fn list_services(pool: &SqlitePool) -> Result<Vec<Service>, ServiceError> {
    Ok(catalog::list_services(pool).await?)
}

pub async fn get_service(pool: &SqlitePool, service_id: i64) -> Result<Service, ServiceError> {
    catalog::find_service(pool, service_id)
        .await?
        .ok_or(ServiceError::NotFound("Service"))
}

/// Approved professionals of the service's trade, best rated first.
pub async fn professionals_for_service(
    pool: &SqlitePool,
    service_id: i64,
) -> Result<ServiceOffer, ServiceError> {
    let service = get_service(pool, service_id).await?;
    let professionals = professional::approved_for_service_type(pool, &service.name).await?;
    Ok(ServiceOffer {
        service,
        professionals,
    })
}

pub async fn create_service(
    pool: &SqlitePool,
    principal: &Principal,
    new: NewService,
) -> Result<Service, ServiceError> {
    principal.require_admin()?;
    let new = NewService {
        name: new.name.trim().to_string(),
        ..new
    };
    validate(&new.name, new.price, new.duration_minutes)?;

    let service = catalog::insert_service(pool, &new)
        .await
        .map_err(|err| duplicate_name(err, &new.name))?;
    info!(service_id = service.id, name = %service.name, "service created");
    Ok(service)
}

/// Apply the set fields of `changes`. Renaming carries the new name over to
/// every professional of that trade.
pub async fn update_service(
    pool: &SqlitePool,
    principal: &Principal,
    service_id: i64,
    changes: UpdateService,
) -> Result<Service, ServiceError> {
    principal.require_admin()?;
    if changes.is_empty() {
        return Err(ServiceError::Validation("no fields to update".to_string()));
    }

    let mut tx = begin_write(pool).await?;
    let mut service = catalog::find_service(&mut *tx, service_id)
        .await?
        .ok_or(ServiceError::NotFound("Service"))?;

    if let Some(name) = changes.name {
        let name = name.trim().to_string();
        if name != service.name {
            if catalog::find_service_by_name(&mut *tx, &name).await?.is_some() {
                return Err(ServiceError::Conflict(format!("service {name} already exists")));
            }
            service.name = name;
        }
    }
    if let Some(price) = changes.price {
        service.price = price;
    }
    if let Some(duration_minutes) = changes.duration_minutes {
        service.duration_minutes = duration_minutes;
    }
    if let Some(description) = changes.description {
        service.description = description;
    }
    validate(&service.name, service.price, service.duration_minutes)?;

    catalog::update_service(&mut *tx, &service)
        .await
        .map_err(|err| duplicate_name(err, &service.name))?;
    tx.commit().await?;

    info!(service_id, name = %service.name, "service updated");
    Ok(service)
}

/// Delete a service nobody depends on. Professionals of the trade or any
/// request for it make this a `Conflict`.
pub async fn delete_service(
    pool: &SqlitePool,
    principal: &Principal,
    service_id: i64,
) -> Result<(), ServiceError> {
    principal.require_admin()?;
    let mut tx = begin_write(pool).await?;

    let service = catalog::find_service(&mut *tx, service_id)
        .await?
        .ok_or(ServiceError::NotFound("Service"))?;

    let professionals = professional::count_for_service_type(&mut *tx, &service.name).await?;
    if professionals > 0 {
        return Err(ServiceError::Conflict(format!(
            "{} still has {professionals} registered professional(s)",
            service.name
        )));
    }
    let open = requests::count_requests_for_service(&mut *tx, service_id).await?;
    if open > 0 {
        return Err(ServiceError::Conflict(format!(
            "{} still has {open} request(s)",
            service.name
        )));
    }

    catalog::delete_service(&mut *tx, service_id).await?;
    tx.commit().await?;

    info!(service_id, name = %service.name, "service deleted");
    Ok(())
}

fn validate(name: &str, price: i64, duration_minutes: i64) -> Result<(), ServiceError> {
    if name.is_empty() {
        return Err(ServiceError::Validation("service name is required".to_string()));
    }
    if price < 0 {
        return Err(ServiceError::Validation("price cannot be negative".to_string()));
    }
    if duration_minutes <= 0 {
        return Err(ServiceError::Validation(
            "duration must be at least one minute".to_string(),
        ));
    }
    Ok(())
}

fn duplicate_name(err: sqlx::Error, name: &str) -> ServiceError {
    if is_unique_violation(&err) {
        ServiceError::Conflict(format!("service {name} already exists"))
    } else {
        ServiceError::Database(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_catalog_fields() {
        assert!(validate("Plumbing", 500, 60).is_ok());
        assert!(matches!(validate("", 500, 60), Err(ServiceError::Validation(_))));
        assert!(matches!(validate("Plumbing", -1, 60), Err(ServiceError::Validation(_))));
        assert!(matches!(validate("Plumbing", 500, 0), Err(ServiceError::Validation(_))));
    }
}
