use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::PollRepository;
use crate::domain::{Poll, PollVote};
use crate::error::ServiceResult;

/// Repository for Poll operations
#[derive(Clone)]
pub struct PgPollRepository {
    pool: PgPool,
}

impl PgPollRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PollRepository for PgPollRepository {
    async fn create_poll(&self, poll: &Poll) -> ServiceResult<Poll> {
        let poll = sqlx::query_as::<_, Poll>(
            r#"
            INSERT INTO polls (id, movie_id, question, options, created_at, ends_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, movie_id, question, options, created_at, ends_at
            "#,
        )
        .bind(poll.id)
        .bind(&poll.movie_id)
        .bind(&poll.question)
        .bind(&poll.options)
        .bind(poll.created_at)
        .bind(poll.ends_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(poll)
    }

    async fn get_poll(&self, poll_id: Uuid) -> ServiceResult<Option<Poll>> {
        let poll = sqlx::query_as::<_, Poll>(
            r#"
            SELECT id, movie_id, question, options, created_at, ends_at
            FROM polls
            WHERE id = $1
            "#,
        )
        .bind(poll_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(poll)
    }

    async fn get_active_polls(
        &self,
        movie_id: &str,
        now: DateTime<Utc>,
    ) -> ServiceResult<Vec<Poll>> {
        let polls = sqlx::query_as::<_, Poll>(
            r#"
            SELECT id, movie_id, question, options, created_at, ends_at
            FROM polls
            WHERE movie_id = $1 AND ends_at > $2
            ORDER BY created_at DESC
            "#,
        )
        .bind(movie_id)
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(polls)
    }

    async fn get_vote_indices(&self, poll_ids: &[Uuid]) -> ServiceResult<Vec<(Uuid, i32)>> {
        if poll_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, (Uuid, i32)>(
            r#"
            SELECT poll_id, option_index
            FROM poll_votes
            WHERE poll_id = ANY($1)
            "#,
        )
        .bind(poll_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn upsert_vote(
        &self,
        poll_id: Uuid,
        user_id: Uuid,
        option_index: i32,
        now: DateTime<Utc>,
    ) -> ServiceResult<PollVote> {
        // UNIQUE (poll_id, user_id) makes concurrent first votes converge on one row
        let vote = sqlx::query_as::<_, PollVote>(
            r#"
            INSERT INTO poll_votes (id, poll_id, user_id, option_index, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            ON CONFLICT (poll_id, user_id) DO UPDATE
            SET option_index = EXCLUDED.option_index,
                updated_at = EXCLUDED.updated_at
            RETURNING id, poll_id, user_id, option_index, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(poll_id)
        .bind(user_id)
        .bind(option_index)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(vote)
    }
}
