use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::FollowRepository;
use crate::domain::UserSummary;
use crate::error::ServiceResult;

#[derive(Clone)]
pub struct PgFollowRepository {
    pool: PgPool,
}

impl PgFollowRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Idempotent delete; returns true if a row was removed.
    async fn delete_follow(&self, follower_id: Uuid, following_id: Uuid) -> ServiceResult<bool> {
        let affected = sqlx::query(
            r#"
            DELETE FROM follows
            WHERE follower_id = $1 AND following_id = $2
            "#,
        )
        .bind(follower_id)
        .bind(following_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(affected > 0)
    }

    /// Idempotent create; returns true if a new row was inserted.
    async fn create_follow(&self, follower_id: Uuid, following_id: Uuid) -> ServiceResult<bool> {
        let inserted = sqlx::query_as::<_, (Uuid,)>(
            r#"
            INSERT INTO follows (id, follower_id, following_id, created_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (follower_id, following_id) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(follower_id)
        .bind(following_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(inserted.is_some())
    }
}

#[async_trait]
impl FollowRepository for PgFollowRepository {
    async fn toggle_follow(&self, follower_id: Uuid, following_id: Uuid) -> ServiceResult<bool> {
        if self.delete_follow(follower_id, following_id).await? {
            return Ok(false);
        }
        self.create_follow(follower_id, following_id).await?;
        Ok(true)
    }

    async fn is_following(&self, follower_id: Uuid, following_id: Uuid) -> ServiceResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM follows
                WHERE follower_id = $1 AND following_id = $2
            )
            "#,
        )
        .bind(follower_id)
        .bind(following_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn get_followers(&self, user_id: Uuid) -> ServiceResult<Vec<UserSummary>> {
        let users = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT u.id, u.name, u.image
            FROM follows f
            JOIN users u ON u.id = f.follower_id
            WHERE f.following_id = $1
            ORDER BY f.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn get_following(&self, user_id: Uuid) -> ServiceResult<Vec<UserSummary>> {
        let users = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT u.id, u.name, u.image
            FROM follows f
            JOIN users u ON u.id = f.following_id
            WHERE f.follower_id = $1
            ORDER BY f.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn get_follow_counts(&self, user_id: Uuid) -> ServiceResult<(i64, i64)> {
        let counts = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM follows WHERE following_id = $1),
                (SELECT COUNT(*) FROM follows WHERE follower_id = $1)
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(counts)
    }
}
