//! Storage seams.
//!
//! Each trait has a PostgreSQL implementation in its own module; the
//! in-memory store implements all of them for local runs and tests.

pub mod comments;
pub mod follows;
pub mod likes;
pub mod memory;
pub mod polls;
pub mod users;

pub use comments::PgCommentRepository;
pub use follows::PgFollowRepository;
pub use likes::PgLikeRepository;
pub use memory::InMemoryStore;
pub use polls::PgPollRepository;
pub use users::PgUserRepository;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Comment, CommentWithAuthor, LikeTarget, Poll, PollVote, User, UserSummary};
use crate::error::ServiceResult;

/// Poll and vote persistence
#[async_trait::async_trait]
pub trait PollRepository: Send + Sync {
    /// Persist a new poll
    async fn create_poll(&self, poll: &Poll) -> ServiceResult<Poll>;

    /// Get poll by ID
    async fn get_poll(&self, poll_id: Uuid) -> ServiceResult<Option<Poll>>;

    /// Polls for a movie with `ends_at` strictly after `now`, newest first
    async fn get_active_polls(&self, movie_id: &str, now: DateTime<Utc>)
        -> ServiceResult<Vec<Poll>>;

    /// `(poll_id, option_index)` for every vote cast on the given polls
    async fn get_vote_indices(&self, poll_ids: &[Uuid]) -> ServiceResult<Vec<(Uuid, i32)>>;

    /// Record the user's choice, replacing any earlier vote on the same poll.
    /// Must be atomic per (poll, user): concurrent calls leave exactly one row.
    async fn upsert_vote(
        &self,
        poll_id: Uuid,
        user_id: Uuid,
        option_index: i32,
        now: DateTime<Utc>,
    ) -> ServiceResult<PollVote>;
}

/// User accounts
#[async_trait::async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_user(&self, user_id: Uuid) -> ServiceResult<Option<User>>;

    /// Insert or refresh a user from identity claims. `None` fields keep
    /// their stored value.
    async fn upsert_user(
        &self,
        user_id: Uuid,
        email: &str,
        name: Option<&str>,
        image: Option<&str>,
    ) -> ServiceResult<User>;

    /// Set role and premium expiry; returns `None` for unknown users
    async fn set_premium(
        &self,
        user_id: Uuid,
        role: &str,
        premium_until: DateTime<Utc>,
    ) -> ServiceResult<Option<User>>;
}

/// Likes on movies, comments and reviews
#[async_trait::async_trait]
pub trait LikeRepository: Send + Sync {
    /// Flip the like; returns whether the user likes the target afterwards
    async fn toggle_like(&self, user_id: Uuid, target: &LikeTarget) -> ServiceResult<bool>;

    async fn has_liked(&self, user_id: Uuid, target: &LikeTarget) -> ServiceResult<bool>;

    /// `(comment_id, user_id)` for every like on the given comments
    async fn get_comment_likes(&self, comment_ids: &[Uuid]) -> ServiceResult<Vec<(Uuid, Uuid)>>;
}

/// Follow graph
#[async_trait::async_trait]
pub trait FollowRepository: Send + Sync {
    /// Flip the follow edge; returns whether it exists afterwards
    async fn toggle_follow(&self, follower_id: Uuid, following_id: Uuid) -> ServiceResult<bool>;

    async fn is_following(&self, follower_id: Uuid, following_id: Uuid) -> ServiceResult<bool>;

    /// Users following `user_id`
    async fn get_followers(&self, user_id: Uuid) -> ServiceResult<Vec<UserSummary>>;

    /// Users `user_id` follows
    async fn get_following(&self, user_id: Uuid) -> ServiceResult<Vec<UserSummary>>;

    /// `(followers, following)` counts
    async fn get_follow_counts(&self, user_id: Uuid) -> ServiceResult<(i64, i64)>;
}

/// Movie comments
#[async_trait::async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create_comment(&self, comment: &Comment) -> ServiceResult<Comment>;

    /// Comments on a movie with their authors, newest first
    async fn get_comments_for_movie(&self, movie_id: &str)
        -> ServiceResult<Vec<CommentWithAuthor>>;
}
