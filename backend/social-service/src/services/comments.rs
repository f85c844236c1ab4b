/// Comment service - movie comments with their authors and likes
use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::domain::{Comment, CommentAuthor, CommentView, LikeRef, User};
use crate::error::{ServiceError, ServiceResult};
use crate::repository::{CommentRepository, LikeRepository};

#[derive(Clone)]
pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    likes: Arc<dyn LikeRepository>,
}

impl CommentService {
    pub fn new(comments: Arc<dyn CommentRepository>, likes: Arc<dyn LikeRepository>) -> Self {
        Self { comments, likes }
    }

    pub async fn create_comment(
        &self,
        author: &User,
        movie_id: &str,
        content: &str,
        now: DateTime<Utc>,
    ) -> ServiceResult<CommentView> {
        let movie_id = movie_id.trim();
        let content = content.trim();
        if movie_id.is_empty() || content.is_empty() {
            return Err(ServiceError::InvalidInput(
                "Movie ID and content are required".to_string(),
            ));
        }

        let comment = Comment::new(movie_id.to_string(), author.id, content.to_string(), now);
        let comment = self.comments.create_comment(&comment).await?;
        info!(comment_id = %comment.id, movie_id = %comment.movie_id, "Comment created");

        Ok(CommentView {
            comment,
            user: CommentAuthor {
                name: author.name.clone(),
                image: author.image.clone(),
            },
            likes: Vec::new(),
        })
    }

    /// Comments on a movie, newest first, each with the users who liked it
    pub async fn list_comments(&self, movie_id: &str) -> ServiceResult<Vec<CommentView>> {
        if movie_id.trim().is_empty() {
            return Err(ServiceError::InvalidInput("Movie ID is required".to_string()));
        }

        let comments = self.comments.get_comments_for_movie(movie_id.trim()).await?;
        let ids: Vec<Uuid> = comments.iter().map(|c| c.comment.id).collect();

        let mut likes_by_comment: HashMap<Uuid, Vec<LikeRef>> = HashMap::new();
        for (comment_id, user_id) in self.likes.get_comment_likes(&ids).await? {
            likes_by_comment
                .entry(comment_id)
                .or_default()
                .push(LikeRef { user_id });
        }

        Ok(comments
            .into_iter()
            .map(|c| CommentView {
                likes: likes_by_comment.remove(&c.comment.id).unwrap_or_default(),
                comment: c.comment,
                user: c.author,
            })
            .collect())
    }
}
