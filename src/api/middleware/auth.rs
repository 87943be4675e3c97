use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    typed_header::{TypedHeaderRejection, TypedHeaderRejectionReason},
    TypedHeader,
};

use crate::{
    api::state::AppState,
    domain::User,
    error::AppError,
};

#[derive(Clone)]
pub struct CurrentUser {
    pub user: User,
}

type BearerHeader = Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>;

/// Resolves the bearer credential to a live user record.
///
/// A missing header is `Unauthorized`. A header that is not a bearer
/// credential, or a credential that fails to decode, has expired, names a
/// deleted user, or predates the user's last password change is `Forbidden`.
async fn authenticate(state: &AppState, bearer: BearerHeader) -> Result<User, AppError> {
    let TypedHeader(Authorization(bearer)) = bearer.map_err(|rejection| {
        match rejection.reason() {
            TypedHeaderRejectionReason::Missing => AppError::Unauthorized,
            _ => AppError::Forbidden,
        }
    })?;

    let claims = state.service_context.token_service.verify(bearer.token())?;

    let user = state.service_context.user_repo
        .find_by_gid(&claims.sub)
        .await?
        .ok_or(AppError::Forbidden)?;

    if user.token_version != claims.ver {
        tracing::debug!("Revoked credential presented for {}", user.gid);
        return Err(AppError::Forbidden);
    }

    Ok(user)
}

pub async fn require_auth(
    State(state): State<AppState>,
    bearer: BearerHeader,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = authenticate(&state, bearer).await?;

    request.extensions_mut().insert(CurrentUser { user });

    Ok(next.run(request).await)
}

pub async fn require_admin(
    State(state): State<AppState>,
    bearer: BearerHeader,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = authenticate(&state, bearer).await?;

    if !user.is_admin() {
        return Err(AppError::Forbidden);
    }

    request.extensions_mut().insert(CurrentUser { user });

    Ok(next.run(request).await)
}
