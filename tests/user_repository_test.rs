mod common;

use aurapass::{
    auth,
    domain::{CreateUserRequest, Role, UpdateUserRequest},
    error::AppError,
    repository::{SqliteUserRepository, UserRepository},
};

#[tokio::test]
async fn test_user_crud() -> anyhow::Result<()> {
    let pool = common::test_pool().await?;
    let repo = SqliteUserRepository::new(pool.clone());

    // Create
    let user = repo.create(CreateUserRequest {
        gid: "Aurapass-YCP-0500".to_string(),
        name: Some("Test User".to_string()),
        password_hash: auth::hash_password("1234").await?,
        issued_password: Some("1234".to_string()),
        role: Role::Student,
        email: Some("test@example.com".to_string()),
        phone: None,
    }).await?;
    assert_eq!(user.gid, "Aurapass-YCP-0500");
    assert_eq!(user.role, Role::Student);
    assert_eq!(user.token_version, 0);

    // Find
    let found = repo.find_by_gid("Aurapass-YCP-0500").await?;
    assert!(found.is_some());
    assert!(repo.find_by_gid("nobody").await?.is_none());

    // List
    let students = repo.list_by_role(Role::Student).await?;
    assert_eq!(students.len(), 1);
    assert!(repo.list_by_role(Role::Admin).await?.is_empty());

    // Update without password keeps credentials valid
    let updated = repo.update("Aurapass-YCP-0500", UpdateUserRequest {
        phone: Some("5550100".to_string()),
        ..Default::default()
    }).await?;
    assert_eq!(updated.phone.as_deref(), Some("5550100"));
    assert_eq!(updated.email.as_deref(), Some("test@example.com"));
    assert_eq!(updated.token_version, 0);

    // Password update bumps the version and clears the issued password
    let updated = repo.update("Aurapass-YCP-0500", UpdateUserRequest {
        password_hash: Some(auth::hash_password("9999").await?),
        ..Default::default()
    }).await?;
    assert_eq!(updated.token_version, 1);
    assert!(updated.password_changed_at.is_some());
    let credentials = repo.list_credentials().await?;
    assert_eq!(credentials[0].password, None);

    // Delete
    assert_eq!(repo.delete_student("Aurapass-YCP-0500").await?, 1);
    assert!(repo.find_by_gid("Aurapass-YCP-0500").await?.is_none());
    assert_eq!(repo.delete_student("Aurapass-YCP-0500").await?, 0);

    Ok(())
}

#[tokio::test]
async fn test_duplicate_gid_is_conflict() -> anyhow::Result<()> {
    let pool = common::test_pool().await?;
    let repo = SqliteUserRepository::new(pool);

    let request = CreateUserRequest {
        gid: "dup".to_string(),
        name: None,
        password_hash: auth::hash_password("1").await?,
        issued_password: None,
        role: Role::Student,
        email: None,
        phone: None,
    };

    repo.create(request.clone()).await?;
    let second = repo.create(request.clone()).await;
    assert!(matches!(second, Err(AppError::Conflict(_))));

    assert!(!repo.insert_if_absent(request).await?);

    Ok(())
}

#[tokio::test]
async fn test_admins_are_not_deleted_as_students() -> anyhow::Result<()> {
    let pool = common::test_pool().await?;
    let repo = SqliteUserRepository::new(pool);

    repo.create(CreateUserRequest {
        gid: "Organizer".to_string(),
        name: None,
        password_hash: auth::hash_password("Admin").await?,
        issued_password: None,
        role: Role::Admin,
        email: None,
        phone: None,
    }).await?;

    assert_eq!(repo.delete_student("Organizer").await?, 0);
    assert!(repo.find_by_gid("Organizer").await?.is_some());

    Ok(())
}

#[tokio::test]
async fn test_student_sequence_starts_after_sample_student() -> anyhow::Result<()> {
    let pool = common::test_pool().await?;
    let repo = SqliteUserRepository::new(pool);

    assert_eq!(repo.next_student_number().await?, 2);
    assert_eq!(repo.next_student_number().await?, 3);
    assert_eq!(repo.next_student_number().await?, 4);

    Ok(())
}
