use std::path::Path;

use bcrypt::{hash, verify};
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::config::Config;
use crate::db::models::customer::{Customer, NewCustomer};
use crate::db::models::professional::{ApprovalStatus, NewProfessional, Professional};
use crate::db::models::user::Principal;
use crate::db::pool::begin_write;
use crate::db::queries::{catalog, customer, professional};
use crate::error::{is_unique_violation, ServiceError};
use crate::workflow::today;

const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// An uploaded résumé as received from the registration form.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ResumeUpload {
    fn is_pdf(&self) -> bool {
        Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
    }
}

/// File name a professional's résumé is stored under.
pub fn resume_file_name(username: &str) -> String {
    format!("{username}_resume.pdf")
}

pub async fn register_customer(
    pool: &SqlitePool,
    bcrypt_cost: u32,
    new: NewCustomer,
) -> Result<Customer, ServiceError> {
    require_credentials(&new.username, &new.password)?;
    let password_hash = hash(&new.password, bcrypt_cost)?;

    let created = customer::insert_customer(pool, &new, &password_hash, today())
        .await
        .map_err(|err| username_taken(err, &new.username))?;
    info!(customer_id = created.id, username = %created.username, "customer registered");
    Ok(created)
}

/// Register a professional in `Pending`. The trade must be a catalog service
/// and the résumé a PDF. The file is written to `resume_dir` after the
/// account row commits; if that write fails the row is removed again.
pub async fn register_professional(
    pool: &SqlitePool,
    bcrypt_cost: u32,
    resume_dir: &Path,
    new: NewProfessional,
    resume: ResumeUpload,
) -> Result<Professional, ServiceError> {
    require_credentials(&new.username, &new.password)?;
    if !resume.is_pdf() {
        return Err(ServiceError::Validation("Only PDF files are allowed".to_string()));
    }
    if new.experience_years < 0 {
        return Err(ServiceError::Validation("experience cannot be negative".to_string()));
    }
    let password_hash = hash(&new.password, bcrypt_cost)?;
    let file_name = resume_file_name(&new.username);

    let mut tx = begin_write(pool).await?;
    catalog::find_service_by_name(&mut *tx, &new.service_type)
        .await?
        .ok_or(ServiceError::NotFound("Service"))?;
    let created = professional::insert_professional(
        &mut *tx,
        &new,
        &password_hash,
        Some(&file_name),
        today(),
    )
    .await
    .map_err(|err| username_taken(err, &new.username))?;
    tx.commit().await?;

    if let Err(err) = store_resume(resume_dir, &file_name, &resume.bytes).await {
        warn!(
            professional_id = created.id,
            "storing résumé failed, removing account: {err}"
        );
        professional::delete_professional(pool, created.id).await?;
        return Err(err.into());
    }

    info!(
        professional_id = created.id,
        username = %created.username,
        service_type = %created.service_type,
        "professional registered, awaiting approval"
    );
    Ok(created)
}

async fn store_resume(resume_dir: &Path, file_name: &str, bytes: &[u8]) -> std::io::Result<()> {
    tokio::fs::create_dir_all(resume_dir).await?;
    tokio::fs::write(resume_dir.join(file_name), bytes).await
}

pub async fn authenticate_customer(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> Result<Principal, ServiceError> {
    let Some(account) = customer::find_customer_by_username(pool, username).await? else {
        warn!("login attempt for unknown customer: {username}");
        return Err(ServiceError::unauthorized(INVALID_CREDENTIALS));
    };
    check_password(password, &account.password_hash, username)?;

    Ok(Principal::Customer {
        id: account.id,
        username: account.username,
    })
}

/// Only approved professionals may sign in; pending and blocked accounts are
/// told why.
pub async fn authenticate_professional(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> Result<Principal, ServiceError> {
    let Some(account) = professional::find_professional_by_username(pool, username).await? else {
        warn!("login attempt for unknown professional: {username}");
        return Err(ServiceError::unauthorized(INVALID_CREDENTIALS));
    };
    check_password(password, &account.password_hash, username)?;

    match account.approval_status {
        ApprovalStatus::Approved => Ok(Principal::Professional {
            id: account.id,
            username: account.username,
        }),
        ApprovalStatus::Blocked => {
            warn!("login attempt for blocked professional: {username}");
            Err(ServiceError::unauthorized(
                "Your account is blocked, please contact administrator",
            ))
        }
        ApprovalStatus::Pending => Err(ServiceError::unauthorized(
            "Your account is pending for approval",
        )),
    }
}

/// The admin is a configured identity, not a stored account.
pub fn authenticate_admin(
    config: &Config,
    username: &str,
    password: &str,
) -> Result<Principal, ServiceError> {
    if username == config.admin_username && password == config.admin_password {
        Ok(Principal::Admin {
            username: config.admin_username.clone(),
        })
    } else {
        warn!("failed admin login for: {username}");
        Err(ServiceError::unauthorized(INVALID_CREDENTIALS))
    }
}

fn check_password(password: &str, password_hash: &str, username: &str) -> Result<(), ServiceError> {
    if verify(password, password_hash)? {
        Ok(())
    } else {
        warn!("invalid password attempt for user: {username}");
        Err(ServiceError::unauthorized(INVALID_CREDENTIALS))
    }
}

fn require_credentials(username: &str, password: &str) -> Result<(), ServiceError> {
    if username.trim().is_empty() || password.is_empty() {
        return Err(ServiceError::Validation(
            "username and password are required".to_string(),
        ));
    }
    if !is_valid_username(username) {
        return Err(ServiceError::Validation(
            "username may only contain letters, digits, '_', '-' and '.', and cannot start with '.'"
                .to_string(),
        ));
    }
    Ok(())
}

/// Usernames name the stored résumé file, so they must stay a single plain
/// path component.
fn is_valid_username(username: &str) -> bool {
    !username.starts_with('.')
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

fn username_taken(err: sqlx::Error, username: &str) -> ServiceError {
    if is_unique_violation(&err) {
        ServiceError::Conflict(format!("Username {username} already exists"))
    } else {
        ServiceError::Database(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_pdf_resumes_are_accepted() {
        let upload = |name: &str| ResumeUpload {
            file_name: name.to_string(),
            bytes: Vec::new(),
        };
        assert!(upload("cv.pdf").is_pdf());
        assert!(upload("CV.PDF").is_pdf());
        assert!(!upload("cv.docx").is_pdf());
        assert!(!upload("pdf").is_pdf());
        assert_eq!(resume_file_name("bob"), "bob_resume.pdf");
    }

    #[test]
    fn usernames_are_single_path_components() {
        for ok in ["bob", "Bob_99", "anne-marie", "j.doe"] {
            assert!(is_valid_username(ok), "{ok}");
        }
        for bad in ["../escaped", "a/b", "a\\b", ".hidden", "..", "bob smith", "bøb"] {
            assert!(!is_valid_username(bad), "{bad}");
        }
    }
}
