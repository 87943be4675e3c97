use async_trait::async_trait;
use chrono::{DateTime, Utc, NaiveDateTime};
use sqlx::{SqlitePool, FromRow};

use crate::{
    domain::{CreateEventRequest, Event, EventStatus, EventSummary, Registrant},
    error::{AppError, Result},
    repository::EventRepository,
};

/// Ids handed out when the catalog is empty start right after this value.
const FIRST_EVENT_ID_BASE: i64 = 100;

#[derive(FromRow)]
pub(super) struct EventRow {
    pub(super) id: i64,
    pub(super) name: String,
    pub(super) event_type: Option<String>,
    pub(super) start_date: Option<String>,
    pub(super) status: String,
    pub(super) description: Option<String>,
    pub(super) image_url: Option<String>,
    pub(super) created_at: NaiveDateTime,
}

#[derive(FromRow)]
struct EventSummaryRow {
    #[sqlx(flatten)]
    event: EventRow,
    registration_count: i64,
}

pub struct SqliteEventRepository {
    pool: SqlitePool,
}

impl SqliteEventRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub(super) fn row_to_event(row: EventRow) -> Result<Event> {
        Ok(Event {
            id: row.id,
            name: row.name,
            event_type: row.event_type,
            start_date: row.start_date,
            status: Self::parse_status(&row.status)?,
            description: row.description,
            image_url: row.image_url,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
        })
    }

    fn parse_status(s: &str) -> Result<EventStatus> {
        match s {
            "Open" => Ok(EventStatus::Open),
            "Closed" => Ok(EventStatus::Closed),
            _ => Err(AppError::Database(format!("Invalid event status: {}", s))),
        }
    }
}

#[async_trait]
impl EventRepository for SqliteEventRepository {
    async fn create(&self, event: CreateEventRequest, image_base_url: &str) -> Result<Event> {
        let now = Utc::now().naive_utc();
        let mut tx = self.pool.begin().await?;

        // Id assignment and insert happen in one statement so concurrent
        // creations cannot observe the same MAX(id).
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO events (id, name, event_type, start_date, status, description, created_at)
            SELECT COALESCE(MAX(id), ?) + 1, ?, ?, ?, ?, ?, ?
            FROM events
            RETURNING id
            "#
        )
        .bind(FIRST_EVENT_ID_BASE)
        .bind(&event.name)
        .bind(&event.event_type)
        .bind(&event.start_date)
        .bind(event.status.as_str())
        .bind(&event.description)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        let image_url = format!("{}/{}/400/200", image_base_url.trim_end_matches('/'), id);

        sqlx::query("UPDATE events SET image_url = ? WHERE id = ?")
            .bind(&image_url)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created event".to_string())
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Event>> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, name, event_type, start_date, status, description, image_url, created_at
            FROM events
            WHERE id = ?
            "#
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_event).transpose()
    }

    async fn list_with_counts(&self) -> Result<Vec<EventSummary>> {
        let rows = sqlx::query_as::<_, EventSummaryRow>(
            r#"
            SELECT e.id, e.name, e.event_type, e.start_date, e.status, e.description,
                   e.image_url, e.created_at,
                   COUNT(DISTINCT r.user_gid) AS registration_count
            FROM events e
            LEFT JOIN registrations r ON r.event_id = e.id
            GROUP BY e.id
            ORDER BY e.id ASC
            "#
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(EventSummary {
                    event: Self::row_to_event(row.event)?,
                    registration_count: row.registration_count,
                })
            })
            .collect()
    }

    async fn delete(&self, id: i64) -> Result<u64> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query("DELETE FROM registrations WHERE event_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(removed)
    }

    async fn list_registrants(&self, id: i64) -> Result<Vec<Registrant>> {
        let registrants = sqlx::query_as::<_, Registrant>(
            r#"
            SELECT r.id AS registration_id, u.gid, u.name, u.email, u.phone
            FROM registrations r
            INNER JOIN users u ON u.gid = r.user_gid
            WHERE r.event_id = ?
            ORDER BY r.rowid ASC
            "#
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(registrants)
    }
}
