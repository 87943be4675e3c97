use async_trait::async_trait;
use crate::domain::*;
use crate::error::Result;

pub mod user_repository;
pub mod event_repository;
pub mod registration_repository;
pub mod announcement_repository;

pub use user_repository::SqliteUserRepository;
pub use event_repository::SqliteEventRepository;
pub use registration_repository::SqliteRegistrationRepository;
pub use announcement_repository::SqliteAnnouncementRepository;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `Conflict` when the gid is taken.
    async fn create(&self, user: CreateUserRequest) -> Result<User>;
    /// Returns false when a user with that gid already exists.
    async fn insert_if_absent(&self, user: CreateUserRequest) -> Result<bool>;
    async fn find_by_gid(&self, gid: &str) -> Result<Option<User>>;
    async fn find_password_hash(&self, gid: &str) -> Result<Option<String>>;
    async fn list_by_role(&self, role: Role) -> Result<Vec<User>>;
    async fn list_credentials(&self) -> Result<Vec<StudentCredential>>;
    async fn update(&self, gid: &str, update: UpdateUserRequest) -> Result<User>;
    /// Removes a student and their registrations. Returns the number of users removed.
    async fn delete_student(&self, gid: &str) -> Result<u64>;
    /// Draws the next value of the student gid sequence.
    async fn next_student_number(&self) -> Result<i64>;
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: CreateEventRequest, image_base_url: &str) -> Result<Event>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Event>>;
    async fn list_with_counts(&self) -> Result<Vec<EventSummary>>;
    /// Deletes the event and every registration referencing it. Returns the
    /// number of registrations removed.
    async fn delete(&self, id: i64) -> Result<u64>;
    async fn list_registrants(&self, id: i64) -> Result<Vec<Registrant>>;
}

#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    /// Fails with `AlreadyRegistered` if the user already holds a registration for the event.
    async fn create(&self, user_gid: &str, event_id: i64) -> Result<Registration>;
    async fn find(&self, user_gid: &str, event_id: i64) -> Result<Option<Registration>>;
    /// In registration order.
    async fn list_for_user(&self, user_gid: &str) -> Result<Vec<Registration>>;
    /// Newest first; registrations whose event is gone are omitted.
    async fn list_for_user_with_events(&self, user_gid: &str) -> Result<Vec<RegistrationWithEvent>>;
}

#[async_trait]
pub trait AnnouncementRepository: Send + Sync {
    async fn create(&self, announcement: CreateAnnouncementRequest) -> Result<Announcement>;
    /// Newest first.
    async fn list(&self) -> Result<Vec<Announcement>>;
    async fn delete(&self, id: i64) -> Result<u64>;
}
