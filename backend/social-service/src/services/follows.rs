use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::domain::{FollowListKind, UserSummary};
use crate::error::{ServiceError, ServiceResult};
use crate::repository::{FollowRepository, UserRepository};

#[derive(Clone)]
pub struct FollowService {
    follows: Arc<dyn FollowRepository>,
    users: Arc<dyn UserRepository>,
}

impl FollowService {
    pub fn new(follows: Arc<dyn FollowRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { follows, users }
    }

    /// Follow or unfollow; returns whether `follower_id` follows the target afterwards.
    pub async fn toggle_follow(&self, follower_id: Uuid, target_id: Uuid) -> ServiceResult<bool> {
        if follower_id == target_id {
            return Err(ServiceError::InvalidInput(
                "You cannot follow yourself".to_string(),
            ));
        }
        if self.users.get_user(target_id).await?.is_none() {
            return Err(ServiceError::NotFound("Target user not found".to_string()));
        }

        let following = self.follows.toggle_follow(follower_id, target_id).await?;
        info!(follower_id = %follower_id, target_id = %target_id, following, "Follow toggled");
        Ok(following)
    }

    pub async fn is_following(&self, follower_id: Uuid, target_id: Uuid) -> ServiceResult<bool> {
        self.follows.is_following(follower_id, target_id).await
    }

    /// Followers or followees of `user_id`; unknown users have none.
    pub async fn list(&self, user_id: Uuid, kind: FollowListKind) -> ServiceResult<Vec<UserSummary>> {
        match kind {
            FollowListKind::Followers => self.follows.get_followers(user_id).await,
            FollowListKind::Following => self.follows.get_following(user_id).await,
        }
    }
}
