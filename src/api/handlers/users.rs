use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    api::{extract::AppPath, handlers::MessageResponse, state::AppState},
    domain::{IssuedCredential, Role, StudentCredential, User},
    error::Result,
};

#[derive(Debug, Serialize)]
pub struct UserDto {
    gid: String,
    name: Option<String>,
    role: Role,
    email: Option<String>,
    phone: Option<String>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            gid: user.gid,
            name: user.name,
            role: user.role,
            email: user.email,
            phone: user.phone,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    success: bool,
    users: Vec<UserDto>,
}

pub async fn list(State(state): State<AppState>) -> Result<Json<ListResponse>> {
    let users = state.service_context.user_service.list_students().await?;

    Ok(Json(ListResponse {
        success: true,
        users: users.into_iter().map(Into::into).collect(),
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateStudentDto {
    name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateResponse {
    success: bool,
    message: String,
    user: IssuedCredential,
}

pub async fn create(
    State(state): State<AppState>,
    body: Option<Json<CreateStudentDto>>,
) -> Result<(StatusCode, Json<CreateResponse>)> {
    let Json(dto) = body.unwrap_or_default();

    let user = state.service_context.user_service
        .create_student(dto.name.filter(|n| !n.is_empty()))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateResponse {
            success: true,
            message: "User created".to_string(),
            user,
        }),
    ))
}

pub async fn delete(
    State(state): State<AppState>,
    AppPath(gid): AppPath<String>,
) -> Result<Json<MessageResponse>> {
    state.service_context.user_service.delete_student(&gid).await?;

    Ok(Json(MessageResponse::ok("User deleted")))
}

#[derive(Debug, Serialize)]
pub struct CredentialsResponse {
    success: bool,
    credentials: Vec<StudentCredential>,
}

pub async fn credentials(State(state): State<AppState>) -> Result<Json<CredentialsResponse>> {
    let credentials = state.service_context.user_service.list_credentials().await?;

    Ok(Json(CredentialsResponse {
        success: true,
        credentials,
    }))
}
