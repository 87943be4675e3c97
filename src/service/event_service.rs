use std::sync::Arc;
use validator::Validate;

use crate::{
    domain::{CreateEventRequest, Event, EventSummary, Registrant},
    error::Result,
    repository::EventRepository,
};

pub struct EventService {
    repo: Arc<dyn EventRepository>,
    image_base_url: String,
}

impl EventService {
    pub fn new(repo: Arc<dyn EventRepository>, image_base_url: String) -> Self {
        Self { repo, image_base_url }
    }

    /// All events with their current registration counts
    pub async fn list(&self) -> Result<Vec<EventSummary>> {
        self.repo.list_with_counts().await
    }

    pub async fn create(&self, request: CreateEventRequest) -> Result<Event> {
        request.validate()?;

        let event = self.repo.create(request, &self.image_base_url).await?;
        tracing::info!("Created event {} ({})", event.id, event.name);

        Ok(event)
    }

    /// Removes the event along with every registration pointing at it.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let removed = self.repo.delete(id).await?;
        tracing::info!("Deleted event {} and {} registration(s)", id, removed);
        Ok(())
    }

    pub async fn registrants(&self, id: i64) -> Result<(Option<Event>, Vec<Registrant>)> {
        let event = self.repo.find_by_id(id).await?;
        let registrants = self.repo.list_registrants(id).await?;
        Ok((event, registrants))
    }
}
