#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use household_services::app_state::AppState;
use household_services::config::Config;
use household_services::db::models::customer::NewCustomer;
use household_services::db::models::professional::NewProfessional;
use household_services::db::models::service::{NewService, Service};
use household_services::db::models::user::Principal;
use household_services::db::pool::{get_db_pool, in_memory_pool};
use household_services::workflow::accounts::{self, ResumeUpload};
use household_services::workflow::{approval, catalog};
use sqlx::SqlitePool;

pub const PASSWORD: &str = "s3cret-pass";
pub const ADMIN_PASSWORD: &str = "admin-test-pass";

static SCRATCH: AtomicU64 = AtomicU64::new(0);

/// Fresh résumé directory per call so parallel tests never share files.
pub fn scratch_dir() -> PathBuf {
    let n = SCRATCH.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!(
        "household_services_test_{}_{n}",
        std::process::id()
    ))
}

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        jwt_secret: "test-secret".to_string(),
        token_ttl_secs: 3600,
        admin_username: "admin".to_string(),
        admin_password: ADMIN_PASSWORD.to_string(),
        resume_storage_path: scratch_dir(),
        bcrypt_cost: 4,
        approval_cache_ttl: Duration::from_secs(60),
        log_level: "warn".to_string(),
        log_dir: None,
    }
}

pub fn admin() -> Principal {
    Principal::Admin {
        username: "admin".to_string(),
    }
}

pub async fn pool() -> SqlitePool {
    in_memory_pool().await.expect("in-memory database")
}

/// File-backed database in a fresh directory, configured like production:
/// several connections, WAL and a busy timeout.
pub async fn file_pool() -> SqlitePool {
    let dir = scratch_dir();
    let config = Config {
        database_url: format!("sqlite://{}", dir.join("marketplace.db").display()),
        ..test_config()
    };
    get_db_pool(&config).await.expect("file database")
}

pub async fn state() -> AppState {
    AppState::new(pool().await, test_config())
}

pub async fn seed_service(pool: &SqlitePool, name: &str) -> Service {
    catalog::create_service(
        pool,
        &admin(),
        NewService {
            name: name.to_string(),
            price: 500,
            duration_minutes: 60,
            description: format!("{name} at home"),
        },
    )
    .await
    .expect("service created")
}

pub async fn seed_customer(pool: &SqlitePool, username: &str) -> Principal {
    let customer = accounts::register_customer(
        pool,
        4,
        NewCustomer {
            username: username.to_string(),
            password: PASSWORD.to_string(),
            first_name: username.to_string(),
            last_name: None,
            address: "12 Elm Street".to_string(),
            pin_code: "560001".to_string(),
            contact: "9876543210".to_string(),
        },
    )
    .await
    .expect("customer registered");
    Principal::Customer {
        id: customer.id,
        username: customer.username,
    }
}

/// Register a professional in `trade`; still `Pending` afterwards.
pub async fn register_professional(
    pool: &SqlitePool,
    username: &str,
    trade: &str,
) -> Principal {
    let professional = accounts::register_professional(
        pool,
        4,
        &scratch_dir(),
        NewProfessional {
            username: username.to_string(),
            password: PASSWORD.to_string(),
            first_name: username.to_string(),
            last_name: None,
            description: format!("{trade} specialist"),
            service_type: trade.to_string(),
            experience_years: 5,
            contact: "9123456780".to_string(),
            pin_code: "560002".to_string(),
        },
        ResumeUpload {
            file_name: "resume.pdf".to_string(),
            bytes: b"%PDF-1.4".to_vec(),
        },
    )
    .await
    .expect("professional registered");
    Principal::Professional {
        id: professional.id,
        username: professional.username,
    }
}

/// Register and approve a professional in `trade`.
pub async fn seed_professional(pool: &SqlitePool, username: &str, trade: &str) -> Principal {
    let principal = register_professional(pool, username, trade).await;
    approval::approve_professional(pool, &admin(), id_of(&principal))
        .await
        .expect("professional approved");
    principal
}

pub fn id_of(principal: &Principal) -> i64 {
    match principal {
        Principal::Customer { id, .. } | Principal::Professional { id, .. } => *id,
        Principal::Admin { .. } => panic!("admin has no id"),
    }
}
