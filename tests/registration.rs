mod common;

use household_services::db::models::professional::NewProfessional;
use household_services::db::queries::professional;
use household_services::error::ServiceError;
use household_services::workflow::accounts::{self, ResumeUpload};

use common::{pool, scratch_dir, seed_service, PASSWORD};

fn plumber(username: &str) -> NewProfessional {
    NewProfessional {
        username: username.to_string(),
        password: PASSWORD.to_string(),
        first_name: "Pat".to_string(),
        service_type: "Plumbing".to_string(),
        ..Default::default()
    }
}

fn resume() -> ResumeUpload {
    ResumeUpload {
        file_name: "cv.pdf".to_string(),
        bytes: b"%PDF-1.4".to_vec(),
    }
}

#[tokio::test]
async fn usernames_cannot_escape_the_resume_directory() {
    let pool = pool().await;
    seed_service(&pool, "Plumbing").await;
    let root = scratch_dir();
    let resume_dir = root.join("pdfs");

    for username in ["../escaped", "nested/bob", ".hidden"] {
        match accounts::register_professional(&pool, 4, &resume_dir, plumber(username), resume())
            .await
        {
            Err(ServiceError::Validation(_)) => {}
            other => panic!("expected Validation for {username}, got {other:?}"),
        }
        let lookup = professional::find_professional_by_username(&pool, username)
            .await
            .expect("query");
        assert!(lookup.is_none());
    }
    assert!(!root.join(accounts::resume_file_name("escaped")).exists());
}

#[tokio::test]
async fn failed_resume_write_leaves_no_account() {
    let pool = pool().await;
    seed_service(&pool, "Plumbing").await;
    let root = scratch_dir();
    std::fs::create_dir_all(&root).expect("scratch dir");
    let not_a_dir = root.join("occupied");
    std::fs::write(&not_a_dir, b"plain file").expect("blocking file");

    match accounts::register_professional(&pool, 4, &not_a_dir, plumber("pat"), resume()).await {
        Err(ServiceError::Io(_)) => {}
        other => panic!("expected Io, got {other:?}"),
    }
    let lookup = professional::find_professional_by_username(&pool, "pat")
        .await
        .expect("query");
    assert!(lookup.is_none());

    let pat = accounts::register_professional(&pool, 4, &root.join("pdfs"), plumber("pat"), resume())
        .await
        .expect("username is free again");
    assert_eq!(pat.username, "pat");
}
