mod common;

use household_services::db::models::professional::ApprovalStatus;
use household_services::db::queries::{professional, requests as request_queries};
use household_services::error::ServiceError;
use household_services::workflow::{accounts, approval, requests};
use tokio_test::assert_ok;

use common::{
    admin, id_of, pool, register_professional, scratch_dir, seed_customer, seed_professional,
    seed_service, PASSWORD,
};

#[tokio::test]
async fn rejecting_a_professional_removes_the_account_and_its_requests() {
    let pool = pool().await;
    let service = seed_service(&pool, "Plumbing").await;
    let carol = seed_customer(&pool, "carol").await;
    let pat = seed_professional(&pool, "pat", "Plumbing").await;
    let pat_id = id_of(&pat);

    let private = assert_ok!(requests::create_private_request(&pool, &carol, service.id, pat_id).await);
    let public = assert_ok!(requests::create_public_request(&pool, &carol, service.id).await);
    assert_ok!(requests::accept_request(&pool, &pat, public.id).await);

    let removed = assert_ok!(approval::reject_professional(&pool, &admin(), pat_id, &scratch_dir()).await);
    assert_eq!(removed.username, "pat");

    assert!(professional::find_professional(&pool, pat_id).await.expect("query").is_none());
    for request_id in [private.id, public.id] {
        assert!(request_queries::find_request(&pool, request_id)
            .await
            .expect("query")
            .is_none());
    }
    match approval::approve_professional(&pool, &admin(), pat_id).await {
        Err(ServiceError::NotFound("Professional")) => {}
        other => panic!("expected NotFound, got {other:?}"),
    }
    match approval::reject_professional(&pool, &admin(), pat_id, &scratch_dir()).await {
        Err(ServiceError::NotFound("Professional")) => {}
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn rejecting_deletes_the_stored_resume() {
    let pool = pool().await;
    seed_service(&pool, "Plumbing").await;
    let resume_dir = scratch_dir();
    let new = household_services::db::models::professional::NewProfessional {
        username: "rita".to_string(),
        password: PASSWORD.to_string(),
        first_name: "Rita".to_string(),
        service_type: "Plumbing".to_string(),
        ..Default::default()
    };
    let upload = accounts::ResumeUpload {
        file_name: "rita.pdf".to_string(),
        bytes: b"%PDF-1.4".to_vec(),
    };
    let rita = assert_ok!(accounts::register_professional(&pool, 4, &resume_dir, new, upload).await);
    let stored = resume_dir.join(accounts::resume_file_name("rita"));
    assert!(stored.exists());

    assert_ok!(approval::reject_professional(&pool, &admin(), rita.id, &resume_dir).await);
    assert!(!stored.exists());
}

#[tokio::test]
async fn block_and_unblock_toggle_eligibility() {
    let pool = pool().await;
    let service = seed_service(&pool, "Plumbing").await;
    let carol = seed_customer(&pool, "carol").await;
    let pat = seed_professional(&pool, "pat", "Plumbing").await;
    let pat_id = id_of(&pat);

    let blocked = assert_ok!(approval::block_professional(&pool, &admin(), pat_id).await);
    assert_eq!(blocked.approval_status, ApprovalStatus::Blocked);

    let request = assert_ok!(requests::create_public_request(&pool, &carol, service.id).await);
    match requests::accept_request(&pool, &pat, request.id).await {
        Err(ServiceError::Unauthorized(_)) => {}
        other => panic!("expected Unauthorized, got {other:?}"),
    }
    match accounts::authenticate_professional(&pool, "pat", PASSWORD).await {
        Err(ServiceError::Unauthorized(message)) => assert!(message.contains("blocked")),
        other => panic!("expected Unauthorized, got {other:?}"),
    }
    let candidates = professional::approved_for_service_type(&pool, "Plumbing")
        .await
        .expect("query");
    assert!(candidates.is_empty());

    let restored = assert_ok!(approval::unblock_professional(&pool, &admin(), pat_id).await);
    assert_eq!(restored.approval_status, ApprovalStatus::Approved);
    assert_ok!(accounts::authenticate_professional(&pool, "pat", PASSWORD).await);
    assert_ok!(requests::accept_request(&pool, &pat, request.id).await);
}

#[tokio::test]
async fn pending_professionals_follow_the_approval_table() {
    let pool = pool().await;
    seed_service(&pool, "Plumbing").await;
    let newbie = register_professional(&pool, "newbie", "Plumbing").await;
    let newbie_id = id_of(&newbie);

    match accounts::authenticate_professional(&pool, "newbie", PASSWORD).await {
        Err(ServiceError::Unauthorized(message)) => assert!(message.contains("pending")),
        other => panic!("expected Unauthorized, got {other:?}"),
    }
    for outcome in [
        approval::block_professional(&pool, &admin(), newbie_id).await,
        approval::unblock_professional(&pool, &admin(), newbie_id).await,
    ] {
        match outcome {
            Err(ServiceError::InvalidState(_)) => {}
            other => panic!("expected InvalidState, got {other:?}"),
        }
    }

    let approved = assert_ok!(approval::approve_professional(&pool, &admin(), newbie_id).await);
    assert_eq!(approved.approval_status, ApprovalStatus::Approved);
    let again = assert_ok!(approval::approve_professional(&pool, &admin(), newbie_id).await);
    assert_eq!(again.approval_status, ApprovalStatus::Approved);
}

#[tokio::test]
async fn curation_requires_the_admin() {
    let pool = pool().await;
    seed_service(&pool, "Plumbing").await;
    let carol = seed_customer(&pool, "carol").await;
    let pat = seed_professional(&pool, "pat", "Plumbing").await;

    match approval::block_professional(&pool, &carol, id_of(&pat)).await {
        Err(ServiceError::Unauthorized(_)) => {}
        other => panic!("expected Unauthorized, got {other:?}"),
    }
    match approval::reject_professional(&pool, &pat, id_of(&pat), &scratch_dir()).await {
        Err(ServiceError::Unauthorized(_)) => {}
        other => panic!("expected Unauthorized, got {other:?}"),
    }
    let status = professional::approval_status(&pool, id_of(&pat)).await.expect("query");
    assert_eq!(status, Some(ApprovalStatus::Approved));
}
