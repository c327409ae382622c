use sqlx::{QueryBuilder, Sqlite, SqliteExecutor};

use crate::db::models::requests::{RequestOverview, RequestStatus};

/// Conditions for request listings; unset fields do not filter.
#[derive(Debug, Default, Clone)]
pub struct RequestFilter {
    pub customer_id: Option<i64>,
    pub professional_id: Option<i64>,
    pub service_id: Option<i64>,
    pub unassigned: bool,
    pub status: Option<RequestStatus>,
    pub service_name: Option<String>,
    pub date_of_request: Option<String>,
    pub professional_name: Option<String>,
    pub customer_name: Option<String>,
}

pub async fn request_overviews<'e, E>(
    executor: E,
    filter: &RequestFilter,
) -> Result<Vec<RequestOverview>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let mut builder = QueryBuilder::<Sqlite>::new(
        r#"SELECT r.id, r.service_id, s.name AS service_name,
                  r.customer_id, c.username AS customer_username,
                  c.address AS customer_address, c.contact AS customer_contact,
                  r.professional_id, p.username AS professional_username,
                  p.contact AS professional_contact,
                  r.status, r.date_of_request, r.date_of_completion, r.rating, r.remarks
           FROM service_requests r
           JOIN services s ON s.id = r.service_id
           JOIN customers c ON c.id = r.customer_id
           LEFT JOIN professionals p ON p.id = r.professional_id
           WHERE 1 = 1"#,
    );

    if let Some(customer_id) = filter.customer_id {
        builder.push(" AND r.customer_id = ").push_bind(customer_id);
    }
    if let Some(professional_id) = filter.professional_id {
        builder.push(" AND r.professional_id = ").push_bind(professional_id);
    }
    if let Some(service_id) = filter.service_id {
        builder.push(" AND r.service_id = ").push_bind(service_id);
    }
    if filter.unassigned {
        builder.push(" AND r.professional_id IS NULL");
    }
    if let Some(status) = filter.status {
        builder.push(" AND r.status = ").push_bind(status);
    }
    if let Some(service_name) = &filter.service_name {
        builder.push(" AND s.name LIKE ").push_bind(format!("%{service_name}%"));
    }
    if let Some(date) = &filter.date_of_request {
        builder.push(" AND r.date_of_request LIKE ").push_bind(format!("%{date}%"));
    }
    if let Some(name) = &filter.professional_name {
        let pattern = format!("%{name}%");
        builder
            .push(" AND (p.first_name LIKE ")
            .push_bind(pattern.clone())
            .push(" OR p.last_name LIKE ")
            .push_bind(pattern.clone())
            .push(" OR p.username LIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(name) = &filter.customer_name {
        let pattern = format!("%{name}%");
        builder
            .push(" AND (c.first_name LIKE ")
            .push_bind(pattern.clone())
            .push(" OR c.last_name LIKE ")
            .push_bind(pattern.clone())
            .push(" OR c.username LIKE ")
            .push_bind(pattern)
            .push(")");
    }
    builder.push(" ORDER BY r.date_of_request DESC, r.id DESC");

    builder
        .build_query_as::<RequestOverview>()
        .fetch_all(executor)
        .await
}

/// Raw `(status, count)` rows; statuses with no requests are absent.
pub async fn status_counts<'e, E>(
    executor: E,
    customer_id: Option<i64>,
    professional_id: Option<i64>,
) -> Result<Vec<(RequestStatus, i64)>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let mut builder =
        QueryBuilder::<Sqlite>::new("SELECT status, COUNT(*) FROM service_requests WHERE 1 = 1");
    if let Some(customer_id) = customer_id {
        builder.push(" AND customer_id = ").push_bind(customer_id);
    }
    if let Some(professional_id) = professional_id {
        builder.push(" AND professional_id = ").push_bind(professional_id);
    }
    builder.push(" GROUP BY status");

    builder
        .build_query_as::<(RequestStatus, i64)>()
        .fetch_all(executor)
        .await
}
