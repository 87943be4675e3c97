use std::sync::Arc;
use validator::Validate;

use crate::{
    domain::{Announcement, CreateAnnouncementRequest},
    error::Result,
    repository::AnnouncementRepository,
};

pub struct AnnouncementService {
    repo: Arc<dyn AnnouncementRepository>,
}

impl AnnouncementService {
    pub fn new(repo: Arc<dyn AnnouncementRepository>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<Announcement>> {
        self.repo.list().await
    }

    pub async fn create(&self, request: CreateAnnouncementRequest) -> Result<Announcement> {
        request.validate()?;

        let announcement = self.repo.create(request).await?;
        tracing::info!("Posted announcement {}", announcement.id);

        Ok(announcement)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        if self.repo.delete(id).await? > 0 {
            tracing::info!("Deleted announcement {}", id);
        }
        Ok(())
    }
}
