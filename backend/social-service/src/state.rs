use std::sync::Arc;

use sqlx::PgPool;

use crate::repository::{
    CommentRepository, FollowRepository, InMemoryStore, LikeRepository, PgCommentRepository,
    PgFollowRepository, PgLikeRepository, PgPollRepository, PgUserRepository, PollRepository,
    UserRepository,
};
use crate::services::{
    AccountService, CatalogClient, CommentService, FollowService, LikeService, PollService,
};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub polls: Arc<dyn PollRepository>,
    pub users: Arc<dyn UserRepository>,
    pub likes: Arc<dyn LikeRepository>,
    pub follows: Arc<dyn FollowRepository>,
    pub comments: Arc<dyn CommentRepository>,
    /// Absent when no TMDB key is configured
    pub catalog: Option<Arc<CatalogClient>>,
}

impl AppState {
    pub fn postgres(pool: PgPool, catalog: Option<CatalogClient>) -> Self {
        Self {
            polls: Arc::new(PgPollRepository::new(pool.clone())),
            users: Arc::new(PgUserRepository::new(pool.clone())),
            likes: Arc::new(PgLikeRepository::new(pool.clone())),
            follows: Arc::new(PgFollowRepository::new(pool.clone())),
            comments: Arc::new(PgCommentRepository::new(pool)),
            catalog: catalog.map(Arc::new),
        }
    }

    pub fn in_memory(catalog: Option<CatalogClient>) -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            polls: store.clone(),
            users: store.clone(),
            likes: store.clone(),
            follows: store.clone(),
            comments: store,
            catalog: catalog.map(Arc::new),
        }
    }

    pub fn poll_service(&self) -> PollService {
        PollService::new(self.polls.clone())
    }

    pub fn account_service(&self) -> AccountService {
        AccountService::new(self.users.clone(), self.follows.clone())
    }

    pub fn follow_service(&self) -> FollowService {
        FollowService::new(self.follows.clone(), self.users.clone())
    }

    pub fn like_service(&self) -> LikeService {
        LikeService::new(self.likes.clone(), self.users.clone())
    }

    pub fn comment_service(&self) -> CommentService {
        CommentService::new(self.comments.clone(), self.likes.clone())
    }
}
