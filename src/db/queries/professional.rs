use chrono::NaiveDate;
use sqlx::SqliteExecutor;

use crate::db::models::professional::{ApprovalStatus, NewProfessional, Professional};
use crate::db::models::requests::RequestStatus;

const PROFESSIONAL_COLUMNS: &str = "id, username, password_hash, first_name, last_name, description, \
    service_type, experience_years, resume, contact, pin_code, approval_status, avg_rating, created_on";

pub async fn find_professional<'e, E>(executor: E, professional_id: i64) -> Result<Option<Professional>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Professional>(&format!(
        "SELECT {PROFESSIONAL_COLUMNS} FROM professionals WHERE id = ?"
    ))
    .bind(professional_id)
    .fetch_optional(executor)
    .await
}

pub async fn find_professional_by_username<'e, E>(
    executor: E,
    username: &str,
) -> Result<Option<Professional>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Professional>(&format!(
        "SELECT {PROFESSIONAL_COLUMNS} FROM professionals WHERE username = ?"
    ))
    .bind(username)
    .fetch_optional(executor)
    .await
}

pub async fn approval_status<'e, E>(executor: E, professional_id: i64) -> Result<Option<ApprovalStatus>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_scalar("SELECT approval_status FROM professionals WHERE id = ?")
        .bind(professional_id)
        .fetch_optional(executor)
        .await
}

pub async fn insert_professional<'e, E>(
    executor: E,
    new: &NewProfessional,
    password_hash: &str,
    resume: Option<&str>,
    created_on: NaiveDate,
) -> Result<Professional, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Professional>(&format!(
        r#"INSERT INTO professionals
               (username, password_hash, first_name, last_name, description, service_type,
                experience_years, resume, contact, pin_code, approval_status, avg_rating, created_on)
           VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?)
           RETURNING {PROFESSIONAL_COLUMNS}"#
    ))
    .bind(&new.username)
    .bind(password_hash)
    .bind(&new.first_name)
    .bind(&new.last_name)
    .bind(&new.description)
    .bind(&new.service_type)
    .bind(new.experience_years)
    .bind(resume)
    .bind(&new.contact)
    .bind(&new.pin_code)
    .bind(ApprovalStatus::Pending)
    .bind(created_on)
    .fetch_one(executor)
    .await
}

pub async fn set_approval_status<'e, E>(
    executor: E,
    professional_id: i64,
    status: ApprovalStatus,
) -> Result<u64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query("UPDATE professionals SET approval_status = ? WHERE id = ?")
        .bind(status)
        .bind(professional_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

pub async fn delete_professional<'e, E>(executor: E, professional_id: i64) -> Result<u64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM professionals WHERE id = ?")
        .bind(professional_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

/// Set `avg_rating` to the mean rating of the professional's closed requests,
/// or 0 when none are closed.
pub async fn recompute_avg_rating<'e, E>(executor: E, professional_id: i64) -> Result<u64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query(
        r#"UPDATE professionals
           SET avg_rating = COALESCE(
               (SELECT AVG(rating) FROM service_requests
                WHERE professional_id = ? AND status = ? AND rating IS NOT NULL),
               0)
           WHERE id = ?"#,
    )
    .bind(professional_id)
    .bind(RequestStatus::Closed)
    .bind(professional_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

/// Approved professionals of one trade, best rated first.
pub async fn approved_for_service_type<'e, E>(
    executor: E,
    service_type: &str,
) -> Result<Vec<Professional>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Professional>(&format!(
        r#"SELECT {PROFESSIONAL_COLUMNS} FROM professionals
           WHERE service_type = ? AND approval_status = ?
           ORDER BY avg_rating DESC, id"#
    ))
    .bind(service_type)
    .bind(ApprovalStatus::Approved)
    .fetch_all(executor)
    .await
}

/// Every professional, best rated first (admin dashboard).
pub async fn all_professionals<'e, E>(executor: E) -> Result<Vec<Professional>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Professional>(&format!(
        "SELECT {PROFESSIONAL_COLUMNS} FROM professionals ORDER BY avg_rating DESC, id"
    ))
    .fetch_all(executor)
    .await
}

pub async fn count_for_service_type<'e, E>(executor: E, service_type: &str) -> Result<i64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_scalar("SELECT COUNT(*) FROM professionals WHERE service_type = ?")
        .bind(service_type)
        .fetch_one(executor)
        .await
}

/// Filters for the customer-side professional search. All set filters must
/// match; only approved professionals are returned.
#[derive(Debug, Default, Clone)]
pub struct ProfessionalFilter {
    pub service_name: Option<String>,
    pub pin_code: Option<String>,
    pub username: Option<String>,
    pub min_rating: Option<f64>,
}

pub async fn search_approved<'e, E>(
    executor: E,
    filter: &ProfessionalFilter,
) -> Result<Vec<Professional>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let mut builder = sqlx::QueryBuilder::<sqlx::Sqlite>::new(format!(
        "SELECT {PROFESSIONAL_COLUMNS} FROM professionals WHERE approval_status = "
    ));
    builder.push_bind(ApprovalStatus::Approved);

    if let Some(service_name) = &filter.service_name {
        builder
            .push(" AND service_type LIKE ")
            .push_bind(format!("%{service_name}%"));
    }
    if let Some(pin_code) = &filter.pin_code {
        builder.push(" AND pin_code LIKE ").push_bind(format!("%{pin_code}%"));
    }
    if let Some(username) = &filter.username {
        builder.push(" AND username LIKE ").push_bind(format!("%{username}%"));
    }
    if let Some(min_rating) = filter.min_rating {
        builder.push(" AND avg_rating >= ").push_bind(min_rating);
    }
    builder.push(" ORDER BY avg_rating DESC, id");

    builder.build_query_as::<Professional>().fetch_all(executor).await
}
