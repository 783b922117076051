use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use reqwest::{Client, Method, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tokio::sync::RwLock;
use url::Url;
use uuid::Uuid;

use crate::models::user::Role;
use crate::utils::exchange_signature::sign_exchange;
use crate::utils::time::unix_now;

/// A cached token is reused only while it has more than this many seconds left.
pub const TOKEN_SKEW_SECS: i64 = 30;

const SIGNATURE_HEADER: &str = "X-Exchange-Signature";

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Failed to sign exchange assertion")]
    Signing,

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },
}

/// The signed-in frontend user whose identity is traded for a backend token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExchangeRequest<'a> {
    user_id: Uuid,
    email: &'a str,
    role: Role,
    issued_at: i64,
}

#[derive(Deserialize)]
struct ExchangeReply {
    token: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// `exp` claim read from the unverified JWT payload.
pub fn token_expiry(token: &str) -> Option<i64> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .ok()?;
    let claims: JsonValue = serde_json::from_slice(&bytes).ok()?;
    claims.get("exp")?.as_i64()
}

pub fn is_fresh(token: &str, now: i64) -> bool {
    token_expiry(token).is_some_and(|exp| exp - TOKEN_SKEW_SECS > now)
}

fn api_error(status: StatusCode, body: &str) -> ClientError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .unwrap_or_else(|| "Request failed".to_string());
    ClientError::Api {
        status: status.as_u16(),
        message,
    }
}

#[derive(Clone)]
pub struct SessionBridge {
    client: Client,
    base_url: Url,
    exchange_secret: String,
    cached: Arc<RwLock<Option<String>>>,
}

impl SessionBridge {
    /// `api_base_url` is the API root, e.g. `http://localhost:8000/api`.
    pub fn new(api_base_url: &str, exchange_secret: impl Into<String>) -> Result<Self, ClientError> {
        let mut base_url = Url::parse(api_base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            client: Client::new(),
            base_url,
            exchange_secret: exchange_secret.into(),
            cached: Arc::new(RwLock::new(None)),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    pub async fn cached_token(&self) -> Option<String> {
        self.cached.read().await.clone()
    }

    /// Forgets the cached token, e.g. on logout.
    pub async fn clear(&self) {
        *self.cached.write().await = None;
    }

    pub async fn backend_token(&self, identity: &SessionIdentity) -> Result<String, ClientError> {
        {
            let mut cached = self.cached.write().await;
            if let Some(token) = cached.as_deref() {
                if is_fresh(token, unix_now()) {
                    return Ok(token.to_string());
                }
                tracing::debug!("cached backend token expired or malformed; discarding");
            }
            *cached = None;
        }

        let token = self.exchange(identity).await?;
        *self.cached.write().await = Some(token.clone());
        Ok(token)
    }

    async fn exchange(&self, identity: &SessionIdentity) -> Result<String, ClientError> {
        let issued_at = unix_now();
        let signature = sign_exchange(
            &self.exchange_secret,
            identity.user_id,
            &identity.email,
            identity.role,
            issued_at,
        )
        .ok_or(ClientError::Signing)?;

        let resp = self
            .client
            .post(self.endpoint("auth/exchange-token")?)
            .header(SIGNATURE_HEADER, signature)
            .json(&ExchangeRequest {
                user_id: identity.user_id,
                email: &identity.email,
                role: identity.role,
                issued_at,
            })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(%status, user_id = %identity.user_id, "token exchange rejected");
            return Err(api_error(status, &body));
        }
        let reply: ExchangeReply = resp.json().await?;
        Ok(reply.token)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&JsonValue>,
        token: &str,
    ) -> Result<Response, ClientError> {
        let mut request = self
            .client
            .request(method, self.endpoint(path)?)
            .bearer_auth(token);
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(request.send().await?)
    }

    /// Calls the API as `identity`; a 401 triggers one re-exchange and retry.
    pub async fn send_authorized(
        &self,
        identity: &SessionIdentity,
        method: Method,
        path: &str,
        body: Option<&JsonValue>,
    ) -> Result<JsonValue, ClientError> {
        let token = self.backend_token(identity).await?;
        let mut resp = self.send(method.clone(), path, body, &token).await?;

        if resp.status() == StatusCode::UNAUTHORIZED {
            tracing::debug!(%path, "backend rejected cached token; re-exchanging");
            self.clear().await;
            let token = self.backend_token(identity).await?;
            resp = self.send(method, path, body, &token).await?;
        }

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(api_error(status, &text));
        }
        if text.trim().is_empty() {
            return Ok(JsonValue::Null);
        }
        serde_json::from_str(&text).map_err(|_| ClientError::Api {
            status: status.as_u16(),
            message: "Response was not valid JSON".to_string(),
        })
    }
}
