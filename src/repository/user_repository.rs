use async_trait::async_trait;
use chrono::{DateTime, Utc, NaiveDateTime};
use sqlx::{SqlitePool, FromRow};

use crate::{
    domain::{CreateUserRequest, Role, StudentCredential, UpdateUserRequest, User},
    error::{is_unique_violation, AppError, Result},
    repository::UserRepository,
};

const STUDENT_GID_SEQUENCE: &str = "student_gid";

#[derive(FromRow)]
struct UserRow {
    gid: String,
    name: Option<String>,
    role: String,
    email: Option<String>,
    phone: Option<String>,
    token_version: i64,
    password_changed_at: Option<NaiveDateTime>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

#[derive(FromRow)]
struct CredentialRow {
    gid: String,
    name: Option<String>,
    issued_password: Option<String>,
}

pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: UserRow) -> Result<User> {
        Ok(User {
            gid: row.gid,
            name: row.name,
            role: Self::parse_role(&row.role)?,
            email: row.email,
            phone: row.phone,
            token_version: row.token_version,
            password_changed_at: row.password_changed_at.map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc)),
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }

    fn parse_role(s: &str) -> Result<Role> {
        match s {
            "student" => Ok(Role::Student),
            "admin" => Ok(Role::Admin),
            _ => Err(AppError::Database(format!("Invalid role: {}", s))),
        }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn create(&self, user: CreateUserRequest) -> Result<User> {
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO users (
                gid, name, password_hash, issued_password, role,
                email, phone, token_version, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, 0, ?, ?)
            "#
        )
        .bind(&user.gid)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(&user.issued_password)
        .bind(user.role.as_str())
        .bind(&user.email)
        .bind(&user.phone)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict(format!("User {} already exists", user.gid))
            } else {
                AppError::Database(e.to_string())
            }
        })?;

        self.find_by_gid(&user.gid).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created user".to_string())
        })
    }

    async fn insert_if_absent(&self, user: CreateUserRequest) -> Result<bool> {
        let now = Utc::now().naive_utc();

        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO users (
                gid, name, password_hash, issued_password, role,
                email, phone, token_version, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, 0, ?, ?)
            "#
        )
        .bind(&user.gid)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(&user.issued_password)
        .bind(user.role.as_str())
        .bind(&user.email)
        .bind(&user.phone)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn find_by_gid(&self, gid: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT gid, name, role, email, phone, token_version,
                   password_changed_at, created_at, updated_at
            FROM users
            WHERE gid = ?
            "#
        )
        .bind(gid)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_user).transpose()
    }

    async fn find_password_hash(&self, gid: &str) -> Result<Option<String>> {
        let hash = sqlx::query_scalar::<_, String>(
            "SELECT password_hash FROM users WHERE gid = ?"
        )
        .bind(gid)
        .fetch_optional(&self.pool)
        .await?;

        Ok(hash)
    }

    async fn list_by_role(&self, role: Role) -> Result<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT gid, name, role, email, phone, token_version,
                   password_changed_at, created_at, updated_at
            FROM users
            WHERE role = ?
            ORDER BY gid ASC
            "#
        )
        .bind(role.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(Self::row_to_user)
            .collect()
    }

    async fn list_credentials(&self) -> Result<Vec<StudentCredential>> {
        let rows = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT gid, name, issued_password
            FROM users
            WHERE role = ?
            ORDER BY gid ASC
            "#
        )
        .bind(Role::Student.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| StudentCredential {
                gid: row.gid,
                name: row.name,
                password: row.issued_password,
            })
            .collect())
    }

    async fn update(&self, gid: &str, update: UpdateUserRequest) -> Result<User> {
        let now = Utc::now().naive_utc();

        // A new password clears the issued one and bumps the token version.
        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = COALESCE(?, name),
                email = COALESCE(?, email),
                phone = COALESCE(?, phone),
                password_hash = COALESCE(?, password_hash),
                issued_password = CASE WHEN ? IS NULL THEN issued_password ELSE NULL END,
                token_version = CASE WHEN ? IS NULL THEN token_version ELSE token_version + 1 END,
                password_changed_at = CASE WHEN ? IS NULL THEN password_changed_at ELSE ? END,
                updated_at = ?
            WHERE gid = ?
            "#
        )
        .bind(&update.name)
        .bind(&update.email)
        .bind(&update.phone)
        .bind(&update.password_hash)
        .bind(&update.password_hash)
        .bind(&update.password_hash)
        .bind(&update.password_hash)
        .bind(now)
        .bind(now)
        .bind(gid)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        self.find_by_gid(gid).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated user".to_string())
        })
    }

    async fn delete_student(&self, gid: &str) -> Result<u64> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            DELETE FROM registrations
            WHERE user_gid IN (SELECT gid FROM users WHERE gid = ? AND role = ?)
            "#
        )
        .bind(gid)
        .bind(Role::Student.as_str())
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query("DELETE FROM users WHERE gid = ? AND role = ?")
            .bind(gid)
            .bind(Role::Student.as_str())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected())
    }

    async fn next_student_number(&self) -> Result<i64> {
        let value = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE id_sequences
            SET next_value = next_value + 1
            WHERE name = ?
            RETURNING next_value - 1
            "#
        )
        .bind(STUDENT_GID_SEQUENCE)
        .fetch_one(&self.pool)
        .await?;

        Ok(value)
    }
}
