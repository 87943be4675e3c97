use crate::{
    auth,
    config::BootstrapConfig,
    domain::{CreateUserRequest, Role},
    error::Result,
    repository::UserRepository,
};

/// Makes sure the configured admin and sample student exist. Existing
/// records are left untouched, so this is safe to run on every startup.
pub async fn ensure_default_accounts(repo: &dyn UserRepository, config: &BootstrapConfig) -> Result<()> {
    let admin = CreateUserRequest {
        gid: config.admin_gid.clone(),
        name: Some(config.admin_name.clone()),
        password_hash: auth::hash_password(&config.admin_password).await?,
        issued_password: None,
        role: Role::Admin,
        email: None,
        phone: None,
    };

    if repo.insert_if_absent(admin).await? {
        tracing::info!("Created admin account {}", config.admin_gid);
    }

    let student = CreateUserRequest {
        gid: config.student_gid.clone(),
        name: Some(config.student_name.clone()),
        password_hash: auth::hash_password(&config.student_password).await?,
        issued_password: Some(config.student_password.clone()),
        role: Role::Student,
        email: Some(config.student_email.clone()),
        phone: Some(config.student_phone.clone()),
    };

    if repo.insert_if_absent(student).await? {
        tracing::info!("Created sample student {}", config.student_gid);
    }

    Ok(())
}
