//! Process-local store behind the same repository traits as PostgreSQL.
//!
//! One lock guards all tables, so every trait call is atomic with respect to
//! every other. Nothing survives a restart.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CommentRepository, FollowRepository, LikeRepository, PollRepository, UserRepository};
use crate::domain::{
    Comment, CommentAuthor, CommentWithAuthor, LikeTarget, Poll, PollVote, User, UserSummary,
    ROLE_USER,
};
use crate::error::{ServiceError, ServiceResult, EMAIL_TAKEN};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    // insertion order doubles as the tie-breaker for "newest first"
    polls: Vec<Poll>,
    votes: HashMap<(Uuid, Uuid), PollVote>,
    comments: Vec<Comment>,
    likes: Vec<(Uuid, LikeTarget)>,
    follows: Vec<(Uuid, Uuid)>,
}

impl Tables {
    fn summary(&self, user_id: Uuid) -> Option<UserSummary> {
        self.users.get(&user_id).map(|user| UserSummary {
            id: user.id,
            name: user.name.clone(),
            image: user.image.clone(),
        })
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PollRepository for InMemoryStore {
    async fn create_poll(&self, poll: &Poll) -> ServiceResult<Poll> {
        self.tables.write().await.polls.push(poll.clone());
        Ok(poll.clone())
    }

    async fn get_poll(&self, poll_id: Uuid) -> ServiceResult<Option<Poll>> {
        let tables = self.tables.read().await;
        Ok(tables.polls.iter().find(|p| p.id == poll_id).cloned())
    }

    async fn get_active_polls(
        &self,
        movie_id: &str,
        now: DateTime<Utc>,
    ) -> ServiceResult<Vec<Poll>> {
        let tables = self.tables.read().await;
        let mut polls: Vec<Poll> = tables
            .polls
            .iter()
            .rev()
            .filter(|p| p.movie_id == movie_id && p.is_active(now))
            .cloned()
            .collect();
        polls.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(polls)
    }

    async fn get_vote_indices(&self, poll_ids: &[Uuid]) -> ServiceResult<Vec<(Uuid, i32)>> {
        let tables = self.tables.read().await;
        Ok(tables
            .votes
            .values()
            .filter(|v| poll_ids.contains(&v.poll_id))
            .map(|v| (v.poll_id, v.option_index))
            .collect())
    }

    async fn upsert_vote(
        &self,
        poll_id: Uuid,
        user_id: Uuid,
        option_index: i32,
        now: DateTime<Utc>,
    ) -> ServiceResult<PollVote> {
        let mut tables = self.tables.write().await;
        let vote = tables
            .votes
            .entry((poll_id, user_id))
            .and_modify(|vote| {
                vote.option_index = option_index;
                vote.updated_at = now;
            })
            .or_insert_with(|| PollVote {
                id: Uuid::new_v4(),
                poll_id,
                user_id,
                option_index,
                created_at: now,
                updated_at: now,
            });
        Ok(vote.clone())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn get_user(&self, user_id: Uuid) -> ServiceResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&user_id).cloned())
    }

    async fn upsert_user(
        &self,
        user_id: Uuid,
        email: &str,
        name: Option<&str>,
        image: Option<&str>,
    ) -> ServiceResult<User> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .values()
            .any(|u| u.id != user_id && u.email == email)
        {
            return Err(ServiceError::InvalidInput(EMAIL_TAKEN.to_string()));
        }
        let user = tables.users.entry(user_id).or_insert_with(|| User {
            id: user_id,
            name: None,
            email: email.to_string(),
            image: None,
            role: ROLE_USER.to_string(),
            premium_until: None,
            created_at: Utc::now(),
        });
        user.email = email.to_string();
        if let Some(name) = name {
            user.name = Some(name.to_string());
        }
        if let Some(image) = image {
            user.image = Some(image.to_string());
        }
        Ok(user.clone())
    }

    async fn set_premium(
        &self,
        user_id: Uuid,
        role: &str,
        premium_until: DateTime<Utc>,
    ) -> ServiceResult<Option<User>> {
        let mut tables = self.tables.write().await;
        Ok(tables.users.get_mut(&user_id).map(|user| {
            user.role = role.to_string();
            user.premium_until = Some(premium_until);
            user.clone()
        }))
    }
}

#[async_trait]
impl LikeRepository for InMemoryStore {
    async fn toggle_like(&self, user_id: Uuid, target: &LikeTarget) -> ServiceResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.likes.len();
        tables
            .likes
            .retain(|(uid, t)| !(*uid == user_id && t == target));
        if tables.likes.len() < before {
            return Ok(false);
        }
        tables.likes.push((user_id, target.clone()));
        Ok(true)
    }

    async fn has_liked(&self, user_id: Uuid, target: &LikeTarget) -> ServiceResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables
            .likes
            .iter()
            .any(|(uid, t)| *uid == user_id && t == target))
    }

    async fn get_comment_likes(&self, comment_ids: &[Uuid]) -> ServiceResult<Vec<(Uuid, Uuid)>> {
        let tables = self.tables.read().await;
        Ok(tables
            .likes
            .iter()
            .filter_map(|(user_id, target)| match target {
                LikeTarget::Comment(id) => Uuid::parse_str(id)
                    .ok()
                    .filter(|comment_id| comment_ids.contains(comment_id))
                    .map(|comment_id| (comment_id, *user_id)),
                _ => None,
            })
            .collect())
    }
}

#[async_trait]
impl FollowRepository for InMemoryStore {
    async fn toggle_follow(&self, follower_id: Uuid, following_id: Uuid) -> ServiceResult<bool> {
        let mut tables = self.tables.write().await;
        let edge = (follower_id, following_id);
        if let Some(pos) = tables.follows.iter().position(|e| *e == edge) {
            tables.follows.remove(pos);
            return Ok(false);
        }
        tables.follows.push(edge);
        Ok(true)
    }

    async fn is_following(&self, follower_id: Uuid, following_id: Uuid) -> ServiceResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables.follows.contains(&(follower_id, following_id)))
    }

    async fn get_followers(&self, user_id: Uuid) -> ServiceResult<Vec<UserSummary>> {
        let tables = self.tables.read().await;
        Ok(tables
            .follows
            .iter()
            .rev()
            .filter(|(_, following)| *following == user_id)
            .filter_map(|(follower, _)| tables.summary(*follower))
            .collect())
    }

    async fn get_following(&self, user_id: Uuid) -> ServiceResult<Vec<UserSummary>> {
        let tables = self.tables.read().await;
        Ok(tables
            .follows
            .iter()
            .rev()
            .filter(|(follower, _)| *follower == user_id)
            .filter_map(|(_, following)| tables.summary(*following))
            .collect())
    }

    async fn get_follow_counts(&self, user_id: Uuid) -> ServiceResult<(i64, i64)> {
        let tables = self.tables.read().await;
        let followers = tables.follows.iter().filter(|(_, f)| *f == user_id).count();
        let following = tables.follows.iter().filter(|(f, _)| *f == user_id).count();
        Ok((followers as i64, following as i64))
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn create_comment(&self, comment: &Comment) -> ServiceResult<Comment> {
        self.tables.write().await.comments.push(comment.clone());
        Ok(comment.clone())
    }

    async fn get_comments_for_movie(
        &self,
        movie_id: &str,
    ) -> ServiceResult<Vec<CommentWithAuthor>> {
        let tables = self.tables.read().await;
        let mut comments: Vec<CommentWithAuthor> = tables
            .comments
            .iter()
            .rev()
            .filter(|c| c.movie_id == movie_id)
            .filter_map(|c| {
                tables.users.get(&c.user_id).map(|user| CommentWithAuthor {
                    comment: c.clone(),
                    author: CommentAuthor {
                        name: user.name.clone(),
                        image: user.image.clone(),
                    },
                })
            })
            .collect();
        comments.sort_by(|a, b| b.comment.created_at.cmp(&a.comment.created_at));
        Ok(comments)
    }
}
