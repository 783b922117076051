use serde_json::Value as JsonValue;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::user_dto::{ProfileResponse, UpdateProfilePayload};
use crate::error::{Error, Result};
use crate::models::applicant_profile::ApplicantProfile;
use crate::models::user::User;

const PROFILE_COLUMNS: &str = "id, user_id, phone, address, linkedin_url, portfolio_url, bio, \
     skills, education, experience_years, current_position, resume_url, created_at, updated_at";

#[derive(Clone)]
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_user(&self, user_id: Uuid) -> Result<User> {
        sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, full_name, role, avatar_url, created_at, updated_at
             FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("User not found".to_string()))
    }

    pub async fn find_profile(&self, user_id: Uuid) -> Result<Option<ApplicantProfile>> {
        let profile = sqlx::query_as::<_, ApplicantProfile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM applicant_profiles WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(profile)
    }

    pub async fn get_profile(&self, user_id: Uuid) -> Result<ProfileResponse> {
        let user = self.find_user(user_id).await?;
        let profile = self.find_profile(user_id).await?;
        Ok(ProfileResponse::new(user, profile))
    }

    /// `fullName` goes to the user row; everything else is upserted into the applicant profile.
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        payload: UpdateProfilePayload,
    ) -> Result<ProfileResponse> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            "UPDATE users
             SET full_name = COALESCE($2, full_name), updated_at = NOW()
             WHERE id = $1",
        )
        .bind(user_id)
        .bind(payload.full_name.as_deref())
        .execute(&mut *tx)
        .await?;
        if updated.rows_affected() == 0 {
            return Err(Error::NotFound("User not found".to_string()));
        }

        if payload.touches_profile() {
            let education = payload.education.clone().map(JsonValue::Array);
            sqlx::query(
                r#"
                INSERT INTO applicant_profiles (
                    user_id, phone, address, linkedin_url, portfolio_url, bio,
                    skills, education, experience_years, current_position
                ) VALUES (
                    $1, $2, $3, $4, $5, $6,
                    COALESCE($7, '{}'::text[]), COALESCE($8, '[]'::jsonb), $9, $10
                )
                ON CONFLICT (user_id) DO UPDATE SET
                    phone = COALESCE($2, applicant_profiles.phone),
                    address = COALESCE($3, applicant_profiles.address),
                    linkedin_url = COALESCE($4, applicant_profiles.linkedin_url),
                    portfolio_url = COALESCE($5, applicant_profiles.portfolio_url),
                    bio = COALESCE($6, applicant_profiles.bio),
                    skills = COALESCE($7, applicant_profiles.skills),
                    education = COALESCE($8, applicant_profiles.education),
                    experience_years = COALESCE($9, applicant_profiles.experience_years),
                    current_position = COALESCE($10, applicant_profiles.current_position),
                    updated_at = NOW()
                "#,
            )
            .bind(user_id)
            .bind(payload.phone.as_deref())
            .bind(payload.address.as_deref())
            .bind(payload.linkedin_url.as_deref())
            .bind(payload.portfolio_url.as_deref())
            .bind(payload.bio.as_deref())
            .bind(payload.skills.as_deref())
            .bind(education)
            .bind(payload.experience_years)
            .bind(payload.current_position.as_deref())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        tracing::info!(%user_id, "profile updated");
        self.get_profile(user_id).await
    }

    /// Stores the resume URL on the applicant profile, creating the profile if needed.
    pub async fn set_resume(&self, user_id: Uuid, resume_url: &str) -> Result<ApplicantProfile> {
        let profile = sqlx::query_as::<_, ApplicantProfile>(&format!(
            r#"
            INSERT INTO applicant_profiles (user_id, resume_url)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE SET
                resume_url = EXCLUDED.resume_url,
                updated_at = NOW()
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(resume_url)
        .fetch_one(&self.pool)
        .await?;
        Ok(profile)
    }
}
