//! User accounts: profile provisioning and premium membership

use std::sync::Arc;

use chrono::{DateTime, Months, Utc};
use tracing::info;
use uuid::Uuid;

use crate::domain::{PremiumStatus, PremiumSubscription, ProfileView, User, ROLE_PREMIUM};
use crate::error::{ServiceError, ServiceResult};
use crate::repository::{FollowRepository, UserRepository};

#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    follows: Arc<dyn FollowRepository>,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserRepository>, follows: Arc<dyn FollowRepository>) -> Self {
        Self { users, follows }
    }

    /// Look up the caller's stored account.
    pub async fn require_user(&self, user_id: Uuid) -> ServiceResult<User> {
        self.users
            .get_user(user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))
    }

    /// Create or refresh the caller's account from their token.
    pub async fn upsert_profile(
        &self,
        user_id: Uuid,
        email: &str,
        name: Option<&str>,
        image: Option<&str>,
        now: DateTime<Utc>,
    ) -> ServiceResult<ProfileView> {
        if email.trim().is_empty() {
            return Err(ServiceError::InvalidInput("Email is required".to_string()));
        }
        let name = name.map(str::trim).filter(|n| !n.is_empty());
        let image = image.map(str::trim).filter(|i| !i.is_empty());

        let user = self.users.upsert_user(user_id, email, name, image).await?;
        info!(user_id = %user.id, "Profile saved");
        self.view(user, now).await
    }

    pub async fn profile(&self, user_id: Uuid, now: DateTime<Utc>) -> ServiceResult<ProfileView> {
        let user = self.require_user(user_id).await?;
        self.view(user, now).await
    }

    /// Grant premium for one calendar month from `now`.
    pub async fn subscribe_premium(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> ServiceResult<PremiumSubscription> {
        let premium_until = now
            .checked_add_months(Months::new(1))
            .ok_or_else(|| ServiceError::Internal("premium expiry out of range".to_string()))?;

        let user = self
            .users
            .set_premium(user_id, ROLE_PREMIUM, premium_until)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;

        info!(user_id = %user.id, premium_until = %premium_until, "Premium activated");
        Ok(PremiumSubscription {
            role: user.role,
            premium_until: user.premium_until,
        })
    }

    pub async fn premium_status(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> ServiceResult<PremiumStatus> {
        let user = self.require_user(user_id).await?;
        Ok(PremiumStatus {
            is_premium: user.is_premium(now),
            premium_until: user.premium_until,
        })
    }

    async fn view(&self, user: User, now: DateTime<Utc>) -> ServiceResult<ProfileView> {
        let (follower_count, following_count) = self.follows.get_follow_counts(user.id).await?;
        Ok(ProfileView {
            is_premium: user.is_premium(now),
            id: user.id,
            name: user.name,
            email: user.email,
            image: user.image,
            role: user.role,
            premium_until: user.premium_until,
            follower_count,
            following_count,
        })
    }
}
