use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::UserRepository;
use crate::domain::User;
use crate::error::{ServiceError, ServiceResult, EMAIL_TAKEN};

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn get_user(&self, user_id: Uuid) -> ServiceResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, image, role, premium_until, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn upsert_user(
        &self,
        user_id: Uuid,
        email: &str,
        name: Option<&str>,
        image: Option<&str>,
    ) -> ServiceResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, name, image)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE
            SET email = EXCLUDED.email,
                name = COALESCE(EXCLUDED.name, users.name),
                image = COALESCE(EXCLUDED.image, users.image),
                updated_at = NOW()
            RETURNING id, name, email, image, role, premium_until, created_at
            "#,
        )
        .bind(user_id)
        .bind(email)
        .bind(name)
        .bind(image)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                ServiceError::InvalidInput(EMAIL_TAKEN.to_string())
            }
            other => ServiceError::Database(other),
        })?;

        Ok(user)
    }

    async fn set_premium(
        &self,
        user_id: Uuid,
        role: &str,
        premium_until: DateTime<Utc>,
    ) -> ServiceResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET role = $2, premium_until = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, email, image, role, premium_until, created_at
            "#,
        )
        .bind(user_id)
        .bind(role)
        .bind(premium_until)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}
