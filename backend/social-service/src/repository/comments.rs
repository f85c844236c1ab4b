use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::CommentRepository;
use crate::domain::{Comment, CommentAuthor, CommentWithAuthor};
use crate::error::ServiceResult;

/// Repository for Comment operations
#[derive(Clone)]
pub struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: Uuid,
    movie_id: String,
    user_id: Uuid,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    author_name: Option<String>,
    author_image: Option<String>,
}

impl From<CommentRow> for CommentWithAuthor {
    fn from(row: CommentRow) -> Self {
        CommentWithAuthor {
            comment: Comment {
                id: row.id,
                movie_id: row.movie_id,
                user_id: row.user_id,
                content: row.content,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            author: CommentAuthor {
                name: row.author_name,
                image: row.author_image,
            },
        }
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    async fn create_comment(&self, comment: &Comment) -> ServiceResult<Comment> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (id, movie_id, user_id, content, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, movie_id, user_id, content, created_at, updated_at
            "#,
        )
        .bind(comment.id)
        .bind(&comment.movie_id)
        .bind(comment.user_id)
        .bind(&comment.content)
        .bind(comment.created_at)
        .bind(comment.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn get_comments_for_movie(
        &self,
        movie_id: &str,
    ) -> ServiceResult<Vec<CommentWithAuthor>> {
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT c.id, c.movie_id, c.user_id, c.content, c.created_at, c.updated_at,
                   u.name AS author_name, u.image AS author_image
            FROM comments c
            JOIN users u ON u.id = c.user_id
            WHERE c.movie_id = $1
            ORDER BY c.created_at DESC
            "#,
        )
        .bind(movie_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CommentWithAuthor::from).collect())
    }
}
