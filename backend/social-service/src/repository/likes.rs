use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::LikeRepository;
use crate::domain::LikeTarget;
use crate::error::ServiceResult;

/// Repository for Like operations
#[derive(Clone)]
pub struct PgLikeRepository {
    pool: PgPool,
}

impl PgLikeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LikeRepository for PgLikeRepository {
    async fn toggle_like(&self, user_id: Uuid, target: &LikeTarget) -> ServiceResult<bool> {
        let removed = sqlx::query(
            r#"
            DELETE FROM likes
            WHERE user_id = $1 AND target_type = $2 AND target_id = $3
            "#,
        )
        .bind(user_id)
        .bind(target.kind())
        .bind(target.id())
        .execute(&self.pool)
        .await?;

        if removed.rows_affected() > 0 {
            return Ok(false);
        }

        sqlx::query(
            r#"
            INSERT INTO likes (user_id, target_type, target_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, target_type, target_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(target.kind())
        .bind(target.id())
        .execute(&self.pool)
        .await?;

        Ok(true)
    }

    async fn has_liked(&self, user_id: Uuid, target: &LikeTarget) -> ServiceResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM likes
                WHERE user_id = $1 AND target_type = $2 AND target_id = $3
            )
            "#,
        )
        .bind(user_id)
        .bind(target.kind())
        .bind(target.id())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn get_comment_likes(&self, comment_ids: &[Uuid]) -> ServiceResult<Vec<(Uuid, Uuid)>> {
        if comment_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = comment_ids.iter().map(Uuid::to_string).collect();
        let rows = sqlx::query_as::<_, (String, Uuid)>(
            r#"
            SELECT target_id, user_id
            FROM likes
            WHERE target_type = 'comment' AND target_id = ANY($1)
            ORDER BY created_at ASC
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(target_id, user_id)| {
                Uuid::parse_str(&target_id)
                    .ok()
                    .map(|comment_id| (comment_id, user_id))
            })
            .collect())
    }
}
