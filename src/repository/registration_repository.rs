use async_trait::async_trait;
use chrono::{DateTime, Utc, NaiveDateTime};
use sqlx::{SqlitePool, FromRow};
use uuid::Uuid;

use crate::{
    domain::{Registration, RegistrationWithEvent},
    error::{is_unique_violation, AppError, Result},
    repository::{
        event_repository::{EventRow, SqliteEventRepository},
        RegistrationRepository,
    },
};

#[derive(FromRow)]
struct RegistrationRow {
    id: String,
    event_id: i64,
    reg_date: NaiveDateTime,
}

#[derive(FromRow)]
struct RegistrationWithEventRow {
    registration_id: String,
    reg_date: NaiveDateTime,
    #[sqlx(flatten)]
    event: EventRow,
}

pub struct SqliteRegistrationRepository {
    pool: SqlitePool,
}

impl SqliteRegistrationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_registration(row: RegistrationRow) -> Registration {
        Registration {
            id: row.id,
            event_id: row.event_id,
            reg_date: DateTime::from_naive_utc_and_offset(row.reg_date, Utc),
        }
    }

    fn generate_id() -> String {
        format!("REG-{}", Uuid::new_v4().simple())
    }
}

#[async_trait]
impl RegistrationRepository for SqliteRegistrationRepository {
    async fn create(&self, user_gid: &str, event_id: i64) -> Result<Registration> {
        let id = Self::generate_id();
        let now = Utc::now().naive_utc();

        // UNIQUE (user_gid, event_id) settles concurrent duplicate requests.
        sqlx::query(
            r#"
            INSERT INTO registrations (id, user_gid, event_id, reg_date)
            VALUES (?, ?, ?, ?)
            "#
        )
        .bind(&id)
        .bind(user_gid)
        .bind(event_id)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            _ if is_unique_violation(&e) => AppError::AlreadyRegistered,
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                AppError::NotFound("Not found".to_string())
            }
            _ => AppError::Database(e.to_string()),
        })?;

        Ok(Registration {
            id,
            event_id,
            reg_date: DateTime::from_naive_utc_and_offset(now, Utc),
        })
    }

    async fn find(&self, user_gid: &str, event_id: i64) -> Result<Option<Registration>> {
        let row = sqlx::query_as::<_, RegistrationRow>(
            r#"
            SELECT id, event_id, reg_date
            FROM registrations
            WHERE user_gid = ? AND event_id = ?
            "#
        )
        .bind(user_gid)
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Self::row_to_registration))
    }

    async fn list_for_user(&self, user_gid: &str) -> Result<Vec<Registration>> {
        let rows = sqlx::query_as::<_, RegistrationRow>(
            r#"
            SELECT id, event_id, reg_date
            FROM registrations
            WHERE user_gid = ?
            ORDER BY rowid ASC
            "#
        )
        .bind(user_gid)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Self::row_to_registration).collect())
    }

    async fn list_for_user_with_events(&self, user_gid: &str) -> Result<Vec<RegistrationWithEvent>> {
        let rows = sqlx::query_as::<_, RegistrationWithEventRow>(
            r#"
            SELECT r.id AS registration_id, r.reg_date,
                   e.id, e.name, e.event_type, e.start_date, e.status, e.description,
                   e.image_url, e.created_at
            FROM registrations r
            INNER JOIN events e ON e.id = r.event_id
            WHERE r.user_gid = ?
            ORDER BY r.rowid DESC
            "#
        )
        .bind(user_gid)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let event = SqliteEventRepository::row_to_event(row.event)?;
                Ok(RegistrationWithEvent {
                    registration: Registration {
                        id: row.registration_id,
                        event_id: event.id,
                        reg_date: DateTime::from_naive_utc_and_offset(row.reg_date, Utc),
                    },
                    event,
                })
            })
            .collect()
    }
}
