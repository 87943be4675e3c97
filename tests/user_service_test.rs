mod common;

use std::collections::HashSet;

use aurapass::{
    auth,
    config::Settings,
    domain::{CreateUserRequest, Role, UpdateProfileRequest},
    error::AppError,
    service::bootstrap,
};

#[tokio::test]
async fn test_bootstrap_is_idempotent() -> anyhow::Result<()> {
    let context = common::test_context().await?;
    let settings = Settings::default();

    bootstrap::ensure_default_accounts(context.user_repo.as_ref(), &settings.bootstrap).await?;
    bootstrap::ensure_default_accounts(context.user_repo.as_ref(), &settings.bootstrap).await?;

    let admin = context.user_repo.find_by_gid("Organizer").await?.expect("admin exists");
    assert_eq!(admin.role, Role::Admin);

    let students = context.user_service.list_students().await?;
    assert_eq!(students.len(), 1);
    assert_eq!(students[0].gid, "Aurapass-YCP-0001");
    assert_eq!(students[0].email.as_deref(), Some("aarav@student.com"));

    Ok(())
}

#[tokio::test]
async fn test_authenticate() -> anyhow::Result<()> {
    let context = common::test_context().await?;

    let (token, profile) = context.user_service.authenticate("Organizer", "Admin").await?;
    assert_eq!(profile.role, Role::Admin);
    assert_eq!(profile.name.as_deref(), Some("Admin User"));

    let claims = context.token_service.verify(&token)?;
    assert_eq!(claims.sub, "Organizer");
    assert_eq!(claims.role, Role::Admin);

    let wrong = context.user_service.authenticate("Organizer", "admin").await;
    assert!(matches!(wrong, Err(AppError::InvalidCredentials)));

    let unknown = context.user_service.authenticate("Nobody", "Admin").await;
    assert!(matches!(unknown, Err(AppError::InvalidCredentials)));

    Ok(())
}

#[tokio::test]
async fn test_sequential_student_gids() -> anyhow::Result<()> {
    let context = common::test_context().await?;

    let mut gids = Vec::new();
    for _ in 0..5 {
        gids.push(context.user_service.create_student(None).await?.gid);
    }

    assert_eq!(
        gids,
        vec![
            "Aurapass-YCP-0002",
            "Aurapass-YCP-0003",
            "Aurapass-YCP-0004",
            "Aurapass-YCP-0005",
            "Aurapass-YCP-0006",
        ]
    );
    assert_eq!(context.user_service.list_students().await?.len(), 6);

    Ok(())
}

#[tokio::test]
async fn test_gid_numbering_survives_deletions() -> anyhow::Result<()> {
    let context = common::test_context().await?;

    let first = context.user_service.create_student(None).await?;
    let second = context.user_service.create_student(None).await?;
    context.user_service.delete_student(&first.gid).await?;

    // A count-based scheme would hand out the second gid again here.
    let third = context.user_service.create_student(None).await?;
    assert_ne!(third.gid, second.gid);
    assert_ne!(third.gid, first.gid);

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_student_creation_yields_distinct_gids() -> anyhow::Result<()> {
    let (_dir, context) = common::shared_context(8).await?;

    let mut handles = Vec::new();
    for i in 0..8 {
        let context = context.clone();
        handles.push(tokio::spawn(async move {
            context.user_service.create_student(Some(format!("Student {}", i))).await
        }));
    }

    let mut gids = HashSet::new();
    for handle in handles {
        gids.insert(handle.await??.gid);
    }

    assert_eq!(gids.len(), 8);
    assert!(gids.iter().all(|gid| gid.starts_with("Aurapass-YCP-")));
    assert!(!gids.contains("Aurapass-YCP-0001"));
    assert_eq!(context.user_service.list_students().await?.len(), 9);

    Ok(())
}

#[tokio::test]
async fn test_create_student_skips_taken_gid() -> anyhow::Result<()> {
    let context = common::test_context().await?;

    // Occupy the next number the sequence will hand out.
    context.user_repo.create(CreateUserRequest {
        gid: "Aurapass-YCP-0002".to_string(),
        name: None,
        password_hash: auth::hash_password("0000").await?,
        issued_password: None,
        role: Role::Student,
        email: None,
        phone: None,
    }).await?;

    let created = context.user_service.create_student(None).await?;
    assert_eq!(created.gid, "Aurapass-YCP-0003");

    Ok(())
}

#[tokio::test]
async fn test_created_student_can_log_in() -> anyhow::Result<()> {
    let context = common::test_context().await?;

    let issued = context.user_service.create_student(Some("Priya".to_string())).await?;
    assert_eq!(issued.password.len(), 4);
    assert!(issued.password.chars().all(|c| c.is_ascii_digit()));

    let (_, profile) = context.user_service.authenticate(&issued.gid, &issued.password).await?;
    assert_eq!(profile.name.as_deref(), Some("Priya"));
    assert_eq!(profile.role, Role::Student);
    assert!(profile.registrations.is_empty());

    let sheet = context.user_service.list_credentials().await?;
    let line = sheet.iter().find(|c| c.gid == issued.gid).expect("listed");
    assert_eq!(line.password.as_deref(), Some(issued.password.as_str()));

    Ok(())
}

#[tokio::test]
async fn test_profile_update_with_wrong_password() -> anyhow::Result<()> {
    let context = common::test_context().await?;

    let result = context.user_service.update_profile("Aurapass-YCP-0001", UpdateProfileRequest {
        current_password: Some("wrong".to_string()),
        new_password: Some("secret".to_string()),
        new_name: Some("Renamed".to_string()),
        ..Default::default()
    }).await;
    assert!(matches!(result, Err(AppError::WrongPassword)));

    // Nothing changed: old password still works, name untouched
    let (_, profile) = context.user_service.authenticate("Aurapass-YCP-0001", "456").await?;
    assert_eq!(profile.name.as_deref(), Some("Aarav Kulkarni"));
    assert!(context.user_service.authenticate("Aurapass-YCP-0001", "secret").await.is_err());

    Ok(())
}

#[tokio::test]
async fn test_profile_password_change_revokes_credentials() -> anyhow::Result<()> {
    let context = common::test_context().await?;

    let (old_token, _) = context.user_service.authenticate("Aurapass-YCP-0001", "456").await?;

    let new_token = context.user_service.update_profile("Aurapass-YCP-0001", UpdateProfileRequest {
        current_password: Some("456".to_string()),
        new_password: Some("s3cret".to_string()),
        ..Default::default()
    }).await?;
    let new_token = new_token.expect("password change issues a fresh credential");

    let user = context.user_repo.find_by_gid("Aurapass-YCP-0001").await?.expect("user");
    assert_ne!(context.token_service.verify(&old_token)?.ver, user.token_version);
    assert_eq!(context.token_service.verify(&new_token)?.ver, user.token_version);

    assert!(context.user_service.authenticate("Aurapass-YCP-0001", "456").await.is_err());
    context.user_service.authenticate("Aurapass-YCP-0001", "s3cret").await?;

    // The issued password is no longer shown once the student picked their own.
    let sheet = context.user_service.list_credentials().await?;
    assert_eq!(sheet[0].password, None);

    Ok(())
}

#[tokio::test]
async fn test_profile_partial_update() -> anyhow::Result<()> {
    let context = common::test_context().await?;

    let token = context.user_service.update_profile("Aurapass-YCP-0001", UpdateProfileRequest {
        email: Some("new@student.com".to_string()),
        new_name: Some(String::new()),
        ..Default::default()
    }).await?;
    assert!(token.is_none());

    let user = context.user_repo.find_by_gid("Aurapass-YCP-0001").await?.expect("user");
    assert_eq!(user.email.as_deref(), Some("new@student.com"));
    assert_eq!(user.name.as_deref(), Some("Aarav Kulkarni"));
    assert_eq!(user.phone.as_deref(), Some("9876543210"));
    assert_eq!(user.token_version, 0);

    Ok(())
}

#[tokio::test]
async fn test_delete_missing_student_is_noop() -> anyhow::Result<()> {
    let context = common::test_context().await?;

    context.user_service.delete_student("Aurapass-YCP-9999").await?;
    assert_eq!(context.user_service.list_students().await?.len(), 1);

    Ok(())
}
