use std::sync::Arc;
use crate::{
    auth::{self, TokenService},
    domain::*,
    error::{AppError, Result},
    repository::{RegistrationRepository, UserRepository},
};

const STUDENT_GID_PREFIX: &str = "Aurapass-YCP";

/// Attempts at finding a free gid before giving up with a conflict.
const MAX_GID_ATTEMPTS: usize = 16;

pub fn format_student_gid(number: i64) -> String {
    format!("{}-{:04}", STUDENT_GID_PREFIX, number)
}

pub struct UserService {
    repo: Arc<dyn UserRepository>,
    registration_repo: Arc<dyn RegistrationRepository>,
    token_service: Arc<TokenService>,
}

impl UserService {
    pub fn new(
        repo: Arc<dyn UserRepository>,
        registration_repo: Arc<dyn RegistrationRepository>,
        token_service: Arc<TokenService>,
    ) -> Self {
        Self { repo, registration_repo, token_service }
    }

    /// Checks a gid/password pair and issues a credential for it.
    pub async fn authenticate(&self, gid: &str, password: &str) -> Result<(String, UserProfile)> {
        let Some(hash) = self.repo.find_password_hash(gid).await? else {
            tracing::warn!("Login attempt for unknown gid {}", gid);
            return Err(AppError::InvalidCredentials);
        };

        if !auth::verify_password(password, &hash).await? {
            tracing::warn!("Wrong password for gid {}", gid);
            return Err(AppError::InvalidCredentials);
        }

        let user = self.repo.find_by_gid(gid).await?
            .ok_or(AppError::InvalidCredentials)?;

        let token = self.token_service.issue(&user)?;
        let profile = self.profile(user).await?;

        Ok((token, profile))
    }

    pub async fn profile(&self, user: User) -> Result<UserProfile> {
        let registrations = self.registration_repo.list_for_user(&user.gid).await?;

        Ok(UserProfile {
            gid: user.gid,
            name: user.name,
            role: user.role,
            email: user.email,
            phone: user.phone,
            registrations,
        })
    }

    pub async fn list_students(&self) -> Result<Vec<User>> {
        self.repo.list_by_role(Role::Student).await
    }

    pub async fn list_credentials(&self) -> Result<Vec<StudentCredential>> {
        self.repo.list_credentials().await
    }

    /// Creates a student with the next sequential gid and a random PIN.
    pub async fn create_student(&self, name: Option<String>) -> Result<IssuedCredential> {
        let password = auth::generate_pin();
        let password_hash = auth::hash_password(&password).await?;

        for _ in 0..MAX_GID_ATTEMPTS {
            let gid = format_student_gid(self.repo.next_student_number().await?);

            let request = CreateUserRequest {
                gid: gid.clone(),
                name: name.clone(),
                password_hash: password_hash.clone(),
                issued_password: Some(password.clone()),
                role: Role::Student,
                email: None,
                phone: None,
            };

            match self.repo.create(request).await {
                Ok(user) => {
                    tracing::info!("Created student {}", user.gid);
                    return Ok(IssuedCredential { gid: user.gid, password });
                }
                Err(AppError::Conflict(_)) => {
                    tracing::warn!("Student gid {} already taken, drawing another", gid);
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::Conflict("Could not allocate a unique student gid".to_string()))
    }

    /// Deleting a gid that does not exist is not an error.
    pub async fn delete_student(&self, gid: &str) -> Result<()> {
        let removed = self.repo.delete_student(gid).await?;
        if removed > 0 {
            tracing::info!("Deleted student {}", gid);
        }
        Ok(())
    }

    /// Applies a self-service profile update. Returns a fresh credential when
    /// the password changed, since that revokes every credential issued before.
    pub async fn update_profile(&self, gid: &str, request: UpdateProfileRequest) -> Result<Option<String>> {
        let mut update = UpdateUserRequest {
            name: non_empty(request.new_name),
            email: non_empty(request.email),
            phone: non_empty(request.phone),
            password_hash: None,
        };

        if let Some(new_password) = non_empty(request.new_password) {
            let hash = self.repo.find_password_hash(gid).await?
                .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

            let current = request.current_password.unwrap_or_default();
            if !auth::verify_password(&current, &hash).await? {
                return Err(AppError::WrongPassword);
            }

            update.password_hash = Some(auth::hash_password(&new_password).await?);
        }

        let password_changed = update.password_hash.is_some();
        let user = self.repo.update(gid, update).await?;

        if password_changed {
            tracing::info!("Password changed for {}", gid);
            return Ok(Some(self.token_service.issue(&user)?));
        }

        Ok(None)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_student_gid() {
        assert_eq!(format_student_gid(2), "Aurapass-YCP-0002");
        assert_eq!(format_student_gid(137), "Aurapass-YCP-0137");
        assert_eq!(format_student_gid(12345), "Aurapass-YCP-12345");
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some(String::new())), None);
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some("x".to_string())), Some("x".to_string()));
    }
}
