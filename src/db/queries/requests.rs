use chrono::NaiveDate;
use sqlx::SqliteExecutor;

use crate::db::models::requests::{RequestStatus, ServiceRequest};

const REQUEST_COLUMNS: &str = "id, service_id, customer_id, professional_id, status, \
    date_of_request, date_of_completion, rating, remarks";

pub async fn find_request<'e, E>(executor: E, request_id: i64) -> Result<Option<ServiceRequest>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, ServiceRequest>(&format!(
        "SELECT {REQUEST_COLUMNS} FROM service_requests WHERE id = ?"
    ))
    .bind(request_id)
    .fetch_optional(executor)
    .await
}

/// Open public request: `Requested` with nobody assigned yet.
pub async fn open_public_request_exists<'e, E>(
    executor: E,
    customer_id: i64,
    service_id: i64,
) -> Result<bool, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let count: i64 = sqlx::query_scalar(
        r#"SELECT COUNT(*) FROM service_requests
           WHERE customer_id = ? AND service_id = ? AND professional_id IS NULL AND status = ?"#,
    )
    .bind(customer_id)
    .bind(service_id)
    .bind(RequestStatus::Requested)
    .fetch_one(executor)
    .await?;
    Ok(count > 0)
}

/// Open private request: `Requested` or `Accepted` for the same triple.
pub async fn open_private_request_exists<'e, E>(
    executor: E,
    customer_id: i64,
    service_id: i64,
    professional_id: i64,
) -> Result<bool, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let count: i64 = sqlx::query_scalar(
        r#"SELECT COUNT(*) FROM service_requests
           WHERE customer_id = ? AND service_id = ? AND professional_id = ? AND status IN (?, ?)"#,
    )
    .bind(customer_id)
    .bind(service_id)
    .bind(professional_id)
    .bind(RequestStatus::Requested)
    .bind(RequestStatus::Accepted)
    .fetch_one(executor)
    .await?;
    Ok(count > 0)
}

pub async fn insert_request<'e, E>(
    executor: E,
    service_id: i64,
    customer_id: i64,
    professional_id: Option<i64>,
    date_of_request: NaiveDate,
) -> Result<ServiceRequest, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, ServiceRequest>(&format!(
        r#"INSERT INTO service_requests (service_id, customer_id, professional_id, status, date_of_request)
           VALUES (?, ?, ?, ?, ?)
           RETURNING {REQUEST_COLUMNS}"#
    ))
    .bind(service_id)
    .bind(customer_id)
    .bind(professional_id)
    .bind(RequestStatus::Requested)
    .bind(date_of_request)
    .fetch_one(executor)
    .await
}

/// Move a `Requested` row to `next` on behalf of `professional_id`, assigning
/// it if it was public. Single conditional statement: of any number of
/// concurrent callers at most one sees `1` row affected.
pub async fn transition_requested<'e, E>(
    executor: E,
    request_id: i64,
    professional_id: i64,
    next: RequestStatus,
) -> Result<u64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query(
        r#"UPDATE service_requests
           SET status = ?, professional_id = ?
           WHERE id = ? AND status = ? AND (professional_id IS NULL OR professional_id = ?)"#,
    )
    .bind(next)
    .bind(professional_id)
    .bind(request_id)
    .bind(RequestStatus::Requested)
    .bind(professional_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

pub async fn close_request<'e, E>(
    executor: E,
    request_id: i64,
    rating: i64,
    remarks: Option<&str>,
    date_of_completion: NaiveDate,
) -> Result<u64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query(
        r#"UPDATE service_requests
           SET status = ?, rating = ?, remarks = ?, date_of_completion = ?
           WHERE id = ? AND status = ?"#,
    )
    .bind(RequestStatus::Closed)
    .bind(rating)
    .bind(remarks)
    .bind(date_of_completion)
    .bind(request_id)
    .bind(RequestStatus::Accepted)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

pub async fn reschedule_request<'e, E>(
    executor: E,
    request_id: i64,
    date_of_request: NaiveDate,
) -> Result<u64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query(
        "UPDATE service_requests SET date_of_request = ? WHERE id = ? AND status <> ?",
    )
    .bind(date_of_request)
    .bind(request_id)
    .bind(RequestStatus::Closed)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

pub async fn update_remarks<'e, E>(executor: E, request_id: i64, remarks: &str) -> Result<u64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query("UPDATE service_requests SET remarks = ? WHERE id = ? AND status = ?")
        .bind(remarks)
        .bind(request_id)
        .bind(RequestStatus::Closed)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

/// Deletes only while the request is `Requested` or `Rejected`.
pub async fn delete_request<'e, E>(executor: E, request_id: i64) -> Result<u64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM service_requests WHERE id = ? AND status IN (?, ?)")
        .bind(request_id)
        .bind(RequestStatus::Requested)
        .bind(RequestStatus::Rejected)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

pub async fn delete_requests_for_professional<'e, E>(
    executor: E,
    professional_id: i64,
) -> Result<u64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM service_requests WHERE professional_id = ?")
        .bind(professional_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

pub async fn count_requests_for_service<'e, E>(executor: E, service_id: i64) -> Result<i64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_scalar("SELECT COUNT(*) FROM service_requests WHERE service_id = ?")
        .bind(service_id)
        .fetch_one(executor)
        .await
}
