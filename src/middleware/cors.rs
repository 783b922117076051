use axum::http::{header, HeaderValue, Method};
use tower_http::cors::CorsLayer;

/// CORS for the single frontend origin, with cookies/credentials allowed.
pub fn frontend_cors(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true);

    match HeaderValue::from_str(origin) {
        Ok(value) => layer.allow_origin(value),
        Err(_) => {
            tracing::warn!(%origin, "FRONTEND_URL is not a valid origin; CORS will reject browsers");
            layer
        }
    }
}
