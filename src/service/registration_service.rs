use std::sync::Arc;

use crate::{
    domain::{EventStatus, Registration, RegistrationWithEvent},
    error::{AppError, Result},
    repository::{EventRepository, RegistrationRepository, UserRepository},
};

pub struct RegistrationService {
    user_repo: Arc<dyn UserRepository>,
    event_repo: Arc<dyn EventRepository>,
    registration_repo: Arc<dyn RegistrationRepository>,
}

impl RegistrationService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        event_repo: Arc<dyn EventRepository>,
        registration_repo: Arc<dyn RegistrationRepository>,
    ) -> Self {
        Self { user_repo, event_repo, registration_repo }
    }

    pub async fn register(&self, gid: &str, event_id: i64) -> Result<Registration> {
        let user = self.user_repo.find_by_gid(gid).await?;
        let event = self.event_repo.find_by_id(event_id).await?;

        let (Some(user), Some(event)) = (user, event) else {
            return Err(AppError::NotFound("Not found".to_string()));
        };

        if event.status == EventStatus::Closed {
            return Err(AppError::EventClosed);
        }

        if self.registration_repo.find(&user.gid, event.id).await?.is_some() {
            return Err(AppError::AlreadyRegistered);
        }

        // A concurrent duplicate that slips past the check above is rejected
        // by the store with AlreadyRegistered.
        let registration = self.registration_repo.create(&user.gid, event.id).await?;
        tracing::info!("{} registered for event {} ({})", user.gid, event.id, registration.id);

        Ok(registration)
    }

    /// The user's registrations joined with their events, newest first.
    pub async fn list_for_user(&self, gid: &str) -> Result<Vec<RegistrationWithEvent>> {
        if self.user_repo.find_by_gid(gid).await?.is_none() {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        self.registration_repo.list_for_user_with_events(gid).await
    }
}
