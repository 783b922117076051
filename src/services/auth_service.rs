use std::time::Duration;

use sqlx::PgPool;
use uuid::Uuid;

use crate::config::AdminSeed;
use crate::dto::auth_dto::{
    AuthResponse, CreateStaffPayload, ExchangeTokenPayload, RegisterPayload, UserSummary,
};
use crate::error::{Error, Result};
use crate::models::user::{Role, User};
use crate::utils::crypto::{hash_password_blocking, verify_password_blocking};
use crate::utils::exchange_signature::verify_exchange;
use crate::utils::time::unix_now;
use crate::utils::token::{decode_token, issue_token, Claims};

const USER_COLUMNS: &str =
    "id, email, password_hash, full_name, role, avatar_url, created_at, updated_at";

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Clone)]
pub struct AuthService {
    pool: PgPool,
    jwt_secret: String,
    token_ttl: Duration,
    exchange_secret: String,
}

impl AuthService {
    pub fn new(
        pool: PgPool,
        jwt_secret: String,
        token_ttl: Duration,
        exchange_secret: String,
    ) -> Self {
        Self {
            pool,
            jwt_secret,
            token_ttl,
            exchange_secret,
        }
    }

    pub fn issue(&self, user: &User) -> Result<String> {
        issue_token(user.id, user.role, &self.jwt_secret, self.token_ttl)
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        decode_token(token, &self.jwt_secret)
    }

    /// Public sign-up. Only applicant accounts can be created this way.
    pub async fn register(&self, payload: RegisterPayload) -> Result<AuthResponse> {
        if payload.role.is_some_and(|role| role != Role::Applicant) {
            return Err(Error::Forbidden(
                "Public registration is limited to applicant accounts".to_string(),
            ));
        }

        let user = self
            .create_account(
                &payload.email,
                payload.password,
                &payload.full_name,
                Role::Applicant,
            )
            .await?;
        let token = self.issue(&user)?;
        Ok(AuthResponse {
            user: UserSummary::from(&user),
            token,
        })
    }

    /// Admin-only creation of HR and admin accounts.
    pub async fn create_staff(&self, payload: CreateStaffPayload) -> Result<UserSummary> {
        if !payload.role.is_staff() {
            return Err(Error::BadRequest(
                "Staff accounts must have the hr or admin role".to_string(),
            ));
        }
        let user = self
            .create_account(
                &payload.email,
                payload.password,
                &payload.full_name,
                payload.role,
            )
            .await?;
        Ok(UserSummary::from(&user))
    }

    /// Creates the configured admin account on startup unless the email is already taken.
    pub async fn ensure_admin(&self, seed: &AdminSeed) -> Result<()> {
        if self.find_by_email(&seed.email).await?.is_some() {
            tracing::debug!(email = %seed.email, "bootstrap admin already present");
            return Ok(());
        }
        match self
            .create_account(&seed.email, seed.password.clone(), &seed.full_name, Role::Admin)
            .await
        {
            // Another instance created it first.
            Ok(_) | Err(Error::Conflict(_)) => Ok(()),
            Err(err) => Err(err),
        }
    }

    pub async fn create_account(
        &self,
        email: &str,
        password: String,
        full_name: &str,
        role: Role,
    ) -> Result<User> {
        let existing = sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(Error::Conflict("Email already registered".to_string()));
        }

        let password_hash = hash_password_blocking(password).await?;

        // The pre-check races with concurrent registrations; the unique index
        // still turns a lost race into a 409.
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (email, password_hash, full_name, role)
             VALUES ($1, $2, $3, $4)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(email)
        .bind(&password_hash)
        .bind(full_name)
        .bind(role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match Error::from(e) {
            Error::Conflict(_) => Error::Conflict("Email already registered".to_string()),
            other => other,
        })?;

        tracing::info!(user_id = %user.id, %role, "account created");
        Ok(user)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        let user = self
            .find_by_email(email)
            .await?
            .ok_or_else(|| Error::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

        let Some(hash) = user.password_hash.clone() else {
            return Err(Error::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };
        if !verify_password_blocking(password.to_string(), hash).await? {
            tracing::debug!(user_id = %user.id, "password mismatch");
            return Err(Error::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let token = self.issue(&user)?;
        Ok(AuthResponse {
            user: UserSummary::from(&user),
            token,
        })
    }

    pub async fn me(&self, user_id: Uuid) -> Result<User> {
        self.find_by_id(user_id)
            .await?
            .ok_or_else(|| Error::NotFound("User not found".to_string()))
    }

    /// Trades a signed frontend assertion for a backend token.
    pub async fn exchange_token(
        &self,
        payload: ExchangeTokenPayload,
        signature: Option<&str>,
    ) -> Result<AuthResponse> {
        let (Some(user_id), Some(email), Some(role), Some(issued_at)) = (
            payload.user_id,
            payload.email.as_deref(),
            payload.role,
            payload.issued_at,
        ) else {
            return Err(Error::BadRequest("Missing required fields".to_string()));
        };

        let signature = signature
            .ok_or_else(|| Error::Unauthorized("Missing exchange signature".to_string()))?;
        if !verify_exchange(
            &self.exchange_secret,
            user_id,
            email,
            role,
            issued_at,
            signature,
            unix_now(),
        ) {
            tracing::warn!(%user_id, "rejected token exchange with bad or stale signature");
            return Err(Error::Unauthorized("Invalid exchange signature".to_string()));
        }

        let user = self
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| Error::NotFound("User not found".to_string()))?;
        if user.email != email || user.role != role {
            tracing::warn!(%user_id, "token exchange identity mismatch");
            return Err(Error::Unauthorized("Identity mismatch".to_string()));
        }

        let token = self.issue(&user)?;
        Ok(AuthResponse {
            user: UserSummary::from(&user),
            token,
        })
    }

    pub async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}
