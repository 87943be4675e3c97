use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub gid: String,
    pub name: Option<String>,
    pub role: Role,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Must match the `ver` claim of any credential presented for this user.
    pub token_version: i64,
    pub password_changed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Student,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Admin => "admin",
        }
    }
}

/// The profile returned at login: everything but secrets and storage timestamps.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub gid: String,
    pub name: Option<String>,
    pub role: Role,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub registrations: Vec<super::Registration>,
}

#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub gid: String,
    pub name: Option<String>,
    pub password_hash: String,
    /// Plain auto-generated password, kept so the admin can hand it out.
    pub issued_password: Option<String>,
    pub role: Role,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Setting this also clears the issued password and revokes existing credentials.
    pub password_hash: Option<String>,
}

/// Self-service profile update as sent by the client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
    pub new_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// A gid/password pair handed out when a student account is created.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedCredential {
    pub gid: String,
    pub password: String,
}

/// One line of the admin credential sheet. `password` is `None` once the
/// student has chosen their own.
#[derive(Debug, Clone, Serialize)]
pub struct StudentCredential {
    pub gid: String,
    pub name: Option<String>,
    pub password: Option<String>,
}
