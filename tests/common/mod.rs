#![allow(dead_code)]

use std::sync::Arc;

use aurapass::{
    api,
    config::Settings,
    service::{bootstrap, ServiceContext},
};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tempfile::TempDir;
use tower::ServiceExt;

/// In-memory database with migrations applied. A single connection keeps
/// every query on the same in-memory database.
pub async fn test_pool() -> anyhow::Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await?;

    Ok(pool)
}

/// File-backed database behind a multi-connection pool, so concurrent
/// callers really hit SQLite in parallel. Keep the `TempDir` alive for as
/// long as the pool is used.
pub async fn shared_pool(max_connections: u32) -> anyhow::Result<(TempDir, SqlitePool)> {
    let dir = tempfile::tempdir()?;
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("aurapass.db").display());

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(&url)
        .await?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await?;

    Ok((dir, pool))
}

async fn bootstrapped(pool: SqlitePool) -> anyhow::Result<Arc<ServiceContext>> {
    let settings = Settings::default();
    let context = Arc::new(ServiceContext::new(pool, &settings));

    bootstrap::ensure_default_accounts(context.user_repo.as_ref(), &settings.bootstrap).await?;

    Ok(context)
}

/// Services over a fresh database with the default admin and sample student.
pub async fn test_context() -> anyhow::Result<Arc<ServiceContext>> {
    bootstrapped(test_pool().await?).await
}

/// Like [`test_context`], but over [`shared_pool`].
pub async fn shared_context(max_connections: u32) -> anyhow::Result<(TempDir, Arc<ServiceContext>)> {
    let (dir, pool) = shared_pool(max_connections).await?;
    Ok((dir, bootstrapped(pool).await?))
}

pub async fn test_app() -> anyhow::Result<(Router, Arc<ServiceContext>)> {
    let context = test_context().await?;
    let app = api::create_app(context.clone());
    Ok((app, context))
}

/// Sends one request through the router and decodes the JSON body.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> anyhow::Result<(StatusCode, Value)> {
    let authorization = token.map(|token| format!("Bearer {}", token));
    send_with_authorization(app, method, uri, authorization.as_deref(), body).await
}

/// Like [`send`], with the `Authorization` header value given verbatim.
pub async fn send_with_authorization(
    app: &Router,
    method: &str,
    uri: &str,
    authorization: Option<&str>,
    body: Option<Value>,
) -> anyhow::Result<(StatusCode, Value)> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(authorization) = authorization {
        builder = builder.header("authorization", authorization);
    }

    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))?,
        None => builder.body(Body::empty())?,
    };

    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;

    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };

    Ok((status, json))
}

/// Logs in through the API and returns the issued credential.
pub async fn login(app: &Router, gid: &str, password: &str) -> anyhow::Result<String> {
    let (status, body) = send(
        app,
        "POST",
        "/api/login",
        None,
        Some(serde_json::json!({ "gid": gid, "password": password })),
    )
    .await?;

    anyhow::ensure!(status == StatusCode::OK, "login failed with {}: {}", status, body);

    body["token"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("login response had no token"))
}
