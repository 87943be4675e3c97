use async_trait::async_trait;
use chrono::{DateTime, Utc, NaiveDateTime};
use sqlx::{SqlitePool, FromRow};

use crate::{
    domain::{Announcement, CreateAnnouncementRequest},
    error::Result,
    repository::AnnouncementRepository,
};

#[derive(FromRow)]
struct AnnouncementRow {
    id: i64,
    title: String,
    content: String,
    date: NaiveDateTime,
}

pub struct SqliteAnnouncementRepository {
    pool: SqlitePool,
}

impl SqliteAnnouncementRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_announcement(row: AnnouncementRow) -> Announcement {
        Announcement {
            id: row.id,
            title: row.title,
            content: row.content,
            date: DateTime::from_naive_utc_and_offset(row.date, Utc),
        }
    }
}

#[async_trait]
impl AnnouncementRepository for SqliteAnnouncementRepository {
    async fn create(&self, announcement: CreateAnnouncementRequest) -> Result<Announcement> {
        let now = Utc::now().naive_utc();

        let row = sqlx::query_as::<_, AnnouncementRow>(
            r#"
            INSERT INTO announcements (id, title, content, date)
            SELECT COALESCE(MAX(id), 0) + 1, ?, ?, ?
            FROM announcements
            RETURNING id, title, content, date
            "#
        )
        .bind(&announcement.title)
        .bind(&announcement.content)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(Self::row_to_announcement(row))
    }

    async fn list(&self) -> Result<Vec<Announcement>> {
        let rows = sqlx::query_as::<_, AnnouncementRow>(
            r#"
            SELECT id, title, content, date
            FROM announcements
            ORDER BY id DESC
            "#
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Self::row_to_announcement).collect())
    }

    async fn delete(&self, id: i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM announcements WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
