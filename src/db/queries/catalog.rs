use sqlx::SqliteExecutor;

use crate::db::models::service::{NewService, Service};

pub async fn list_services<'e, E>(executor: E) -> Result<Vec<Service>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Service>(
        "SELECT id, name, price, duration_minutes, description FROM services ORDER BY name",
    )
    .fetch_all(executor)
    .await
}

pub async fn find_service<'e, E>(executor: E, service_id: i64) -> Result<Option<Service>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Service>(
        "SELECT id, name, price, duration_minutes, description FROM services WHERE id = ?",
    )
    .bind(service_id)
    .fetch_optional(executor)
    .await
}

pub async fn find_service_by_name<'e, E>(executor: E, name: &str) -> Result<Option<Service>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Service>(
        "SELECT id, name, price, duration_minutes, description FROM services WHERE name = ?",
    )
    .bind(name)
    .fetch_optional(executor)
    .await
}

pub async fn insert_service<'e, E>(executor: E, new: &NewService) -> Result<Service, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Service>(
        r#"INSERT INTO services (name, price, duration_minutes, description)
           VALUES (?, ?, ?, ?)
           RETURNING id, name, price, duration_minutes, description"#,
    )
    .bind(&new.name)
    .bind(new.price)
    .bind(new.duration_minutes)
    .bind(&new.description)
    .fetch_one(executor)
    .await
}

/// Overwrite every field; a rename cascades to `professionals.service_type`.
pub async fn update_service<'e, E>(executor: E, service: &Service) -> Result<u64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query(
        r#"UPDATE services SET name = ?, price = ?, duration_minutes = ?, description = ?
           WHERE id = ?"#,
    )
    .bind(&service.name)
    .bind(service.price)
    .bind(service.duration_minutes)
    .bind(&service.description)
    .bind(service.id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

pub async fn delete_service<'e, E>(executor: E, service_id: i64) -> Result<u64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM services WHERE id = ?")
        .bind(service_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}
