use std::path::Path;

use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::db::models::professional::{ApprovalAction, Professional};
use crate::db::models::user::Principal;
use crate::db::pool::begin_write;
use crate::db::queries::{professional, requests};
use crate::error::ServiceError;

pub async fn approve_professional(
    pool: &SqlitePool,
    principal: &Principal,
    professional_id: i64,
) -> Result<Professional, ServiceError> {
    change_approval(pool, principal, professional_id, ApprovalAction::Approve).await
}

pub async fn block_professional(
    pool: &SqlitePool,
    principal: &Principal,
    professional_id: i64,
) -> Result<Professional, ServiceError> {
    change_approval(pool, principal, professional_id, ApprovalAction::Block).await
}

pub async fn unblock_professional(
    pool: &SqlitePool,
    principal: &Principal,
    professional_id: i64,
) -> Result<Professional, ServiceError> {
    change_approval(pool, principal, professional_id, ApprovalAction::Unblock).await
}

async fn change_approval(
    pool: &SqlitePool,
    principal: &Principal,
    professional_id: i64,
    action: ApprovalAction,
) -> Result<Professional, ServiceError> {
    principal.require_admin()?;
    let mut tx = begin_write(pool).await?;

    let mut current = professional::find_professional(&mut *tx, professional_id)
        .await?
        .ok_or(ServiceError::NotFound("Professional"))?;
    let next = current.approval_status.apply(action)?;
    if next != current.approval_status {
        professional::set_approval_status(&mut *tx, professional_id, next).await?;
        tx.commit().await?;
        info!(professional_id, from = ?current.approval_status, to = ?next, "approval status changed");
        current.approval_status = next;
    }
    Ok(current)
}

/// Remove a professional together with every request that references them.
/// The stored résumé is deleted afterwards; failing to delete it is logged
/// and does not undo the removal.
pub async fn reject_professional(
    pool: &SqlitePool,
    principal: &Principal,
    professional_id: i64,
    resume_dir: &Path,
) -> Result<Professional, ServiceError> {
    principal.require_admin()?;
    let mut tx = begin_write(pool).await?;

    let removed = professional::find_professional(&mut *tx, professional_id)
        .await?
        .ok_or(ServiceError::NotFound("Professional"))?;
    let dropped_requests = requests::delete_requests_for_professional(&mut *tx, professional_id).await?;
    professional::delete_professional(&mut *tx, professional_id).await?;
    tx.commit().await?;

    info!(
        professional_id,
        username = %removed.username,
        dropped_requests,
        "professional rejected and removed"
    );

    if let Some(resume) = &removed.resume {
        let path = resume_dir.join(resume);
        if let Err(err) = tokio::fs::remove_file(&path).await {
            warn!("could not remove résumé {}: {err}", path.display());
        }
    }
    Ok(removed)
}
