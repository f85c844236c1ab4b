use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::domain::LikeTarget;
use crate::error::{ServiceError, ServiceResult};
use crate::repository::{LikeRepository, UserRepository};

#[derive(Clone)]
pub struct LikeService {
    likes: Arc<dyn LikeRepository>,
    users: Arc<dyn UserRepository>,
}

impl LikeService {
    pub fn new(likes: Arc<dyn LikeRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { likes, users }
    }

    /// Like or unlike; returns whether `user_id` likes the target afterwards.
    pub async fn toggle_like(&self, user_id: Uuid, target: &LikeTarget) -> ServiceResult<bool> {
        if self.users.get_user(user_id).await?.is_none() {
            return Err(ServiceError::NotFound("User not found".to_string()));
        }

        let liked = self.likes.toggle_like(user_id, target).await?;
        info!(user_id = %user_id, target_type = target.kind(), target_id = target.id(), liked, "Like toggled");
        Ok(liked)
    }

    /// Anonymous callers like nothing
    pub async fn is_liked(&self, user_id: Option<Uuid>, target: &LikeTarget) -> ServiceResult<bool> {
        match user_id {
            Some(user_id) => self.likes.has_liked(user_id, target).await,
            None => Ok(false),
        }
    }
}
