use sqlx::SqliteConnection;

use crate::db::queries::professional;
use crate::error::ServiceError;

/// Recompute a professional's average over their closed requests and return
/// the new value. Callers closing a request pass their open transaction so the
/// average never disagrees with the ledger.
pub async fn recompute_rating(
    conn: &mut SqliteConnection,
    professional_id: i64,
) -> Result<f64, ServiceError> {
    if professional::recompute_avg_rating(&mut *conn, professional_id).await? == 0 {
        return Err(ServiceError::NotFound("Professional"));
    }
    let refreshed = professional::find_professional(&mut *conn, professional_id)
        .await?
        .ok_or(ServiceError::NotFound("Professional"))?;
    Ok(refreshed.avg_rating)
}
