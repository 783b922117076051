#![allow(dead_code)]

use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use jobboard_backend::{config::Config, database::pool::lazy_pool, routes, AppState};
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use tower::ServiceExt;

pub const JWT_SECRET: &str = "test_jwt_secret";
pub const EXCHANGE_SECRET: &str = "test_exchange_secret";

pub fn test_config(database_url: &str) -> Config {
    Config {
        server_address: "127.0.0.1:0".into(),
        database_url: database_url.into(),
        database_max_connections: 5,
        jwt_secret: JWT_SECRET.into(),
        jwt_expires_in: Duration::from_secs(3600),
        exchange_secret: EXCHANGE_SECRET.into(),
        frontend_url: "http://localhost:3000".into(),
        public_rps: 1000,
        api_rps: 1000,
        company_name: "Acme".into(),
        smtp: None,
        bootstrap_admin: None,
    }
}

pub fn app_with_pool(pool: PgPool, config: &Config) -> Router {
    routes::api_router(AppState::new(pool, config), config)
}

/// Router over a pool that never connects; only routes that skip the database work.
pub fn offline_app(config: &Config) -> Router {
    let pool = lazy_pool(&config.database_url).expect("lazy pool");
    app_with_pool(pool, config)
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<JsonValue>,
) -> (StatusCode, JsonValue) {
    send_with_headers(app, method, uri, token, body, &[]).await
}

pub async fn send_with_headers(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<JsonValue>,
    headers: &[(&str, &str)],
) -> (StatusCode, JsonValue) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let resp = app
        .clone()
        .oneshot(builder.body(body).expect("request"))
        .await
        .expect("response");
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.expect("body");
    let json = serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null);
    (status, json)
}
