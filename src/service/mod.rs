pub mod user_service;
pub mod event_service;
pub mod registration_service;
pub mod announcement_service;
pub mod bootstrap;

use std::sync::Arc;
use chrono::Duration;
use sqlx::SqlitePool;
use crate::auth::TokenService;
use crate::config::Settings;
use crate::repository::*;
use user_service::UserService;
use event_service::EventService;
use registration_service::RegistrationService;
use announcement_service::AnnouncementService;

pub struct ServiceContext {
    pub user_repo: Arc<dyn UserRepository>,
    pub registration_repo: Arc<dyn RegistrationRepository>,
    pub token_service: Arc<TokenService>,
    pub user_service: Arc<UserService>,
    pub event_service: Arc<EventService>,
    pub registration_service: Arc<RegistrationService>,
    pub announcement_service: Arc<AnnouncementService>,
}

impl ServiceContext {
    pub fn new(db_pool: SqlitePool, settings: &Settings) -> Self {
        let user_repo: Arc<dyn UserRepository> = Arc::new(SqliteUserRepository::new(db_pool.clone()));
        let event_repo: Arc<dyn EventRepository> = Arc::new(SqliteEventRepository::new(db_pool.clone()));
        let registration_repo: Arc<dyn RegistrationRepository> =
            Arc::new(SqliteRegistrationRepository::new(db_pool.clone()));
        let announcement_repo: Arc<dyn AnnouncementRepository> =
            Arc::new(SqliteAnnouncementRepository::new(db_pool));

        let token_service = Arc::new(TokenService::new(
            &settings.auth.jwt_secret,
            Duration::hours(settings.auth.token_ttl_hours),
        ));

        let user_service = Arc::new(UserService::new(
            user_repo.clone(),
            registration_repo.clone(),
            token_service.clone(),
        ));
        let event_service = Arc::new(EventService::new(
            event_repo.clone(),
            settings.events.image_base_url.clone(),
        ));
        let registration_service = Arc::new(RegistrationService::new(
            user_repo.clone(),
            event_repo,
            registration_repo.clone(),
        ));
        let announcement_service = Arc::new(AnnouncementService::new(announcement_repo));

        Self {
            user_repo,
            registration_repo,
            token_service,
            user_service,
            event_service,
            registration_service,
            announcement_service,
        }
    }
}
