use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};

pub const ROLE_USER: &str = "USER";
pub const ROLE_PREMIUM: &str = "PREMIUM";

/// User entity - provisioned from the identity provider's token claims
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
    pub image: Option<String>,
    pub role: String,
    pub premium_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Premium requires both the role and an unexpired `premium_until`.
    pub fn is_premium(&self, now: DateTime<Utc>) -> bool {
        self.role == ROLE_PREMIUM && self.premium_until.map_or(false, |until| until > now)
    }
}

/// Public user card used in follower lists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: Option<String>,
    pub image: Option<String>,
}

// ============================================================================
// Poll Models
// ============================================================================

/// Poll entity - a question about a movie with a fixed list of options
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Poll {
    pub id: Uuid,
    pub movie_id: String,
    pub question: String,
    pub options: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

impl Poll {
    /// Polls close a fixed seven days after creation.
    pub const DURATION_DAYS: i64 = 7;

    pub fn new(movie_id: String, question: String, options: Vec<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            movie_id,
            question,
            options,
            created_at: now,
            ends_at: now + Duration::days(Self::DURATION_DAYS),
        }
    }

    /// Closure is computed, never stored.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        now < self.ends_at
    }
}

/// Poll vote - at most one per (poll, user)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PollVote {
    pub id: Uuid,
    pub poll_id: Uuid,
    pub user_id: Uuid,
    pub option_index: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Comment / Like / Follow Models
// ============================================================================

/// Comment entity - a user's comment on a movie
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub movie_id: String,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(movie_id: String, user_id: Uuid, content: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            movie_id,
            user_id,
            content,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentAuthor {
    pub name: Option<String>,
    pub image: Option<String>,
}

/// Comment joined with its author, as stored
#[derive(Debug, Clone)]
pub struct CommentWithAuthor {
    pub comment: Comment,
    pub author: CommentAuthor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeRef {
    pub user_id: Uuid,
}

/// Comment as returned to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    #[serde(flatten)]
    pub comment: Comment,
    pub user: CommentAuthor,
    pub likes: Vec<LikeRef>,
}

/// What a like points at
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LikeTarget {
    Movie(String),
    Comment(String),
    Review(String),
}

impl LikeTarget {
    /// First non-blank id wins, in the order movie, comment, review.
    ///
    /// Ids are trimmed and comment ids are stored in canonical UUID form, so
    /// `ABC…` and `abc…` name the same comment.
    pub fn from_ids(
        movie_id: Option<String>,
        comment_id: Option<String>,
        review_id: Option<String>,
    ) -> ServiceResult<Self> {
        let present = |id: Option<String>| {
            id.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        };

        if let Some(id) = present(movie_id) {
            return Ok(LikeTarget::Movie(id));
        }
        if let Some(id) = present(comment_id) {
            let comment_id = Uuid::parse_str(&id)
                .map_err(|_| ServiceError::InvalidInput("Invalid comment ID".to_string()))?;
            return Ok(LikeTarget::Comment(comment_id.to_string()));
        }
        if let Some(id) = present(review_id) {
            return Ok(LikeTarget::Review(id));
        }

        Err(ServiceError::InvalidInput(
            "Either movieId, commentId, or reviewId is required".to_string(),
        ))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            LikeTarget::Movie(_) => "movie",
            LikeTarget::Comment(_) => "comment",
            LikeTarget::Review(_) => "review",
        }
    }

    pub fn id(&self) -> &str {
        match self {
            LikeTarget::Movie(id) | LikeTarget::Comment(id) | LikeTarget::Review(id) => id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowListKind {
    Followers,
    Following,
}

impl std::str::FromStr for FollowListKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "followers" => Ok(FollowListKind::Followers),
            "following" => Ok(FollowListKind::Following),
            _ => Err(()),
        }
    }
}

// ============================================================================
// Premium / Profile
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PremiumSubscription {
    pub role: String,
    pub premium_until: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PremiumStatus {
    pub is_premium: bool,
    pub premium_until: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
    pub image: Option<String>,
    pub role: String,
    pub is_premium: bool,
    pub premium_until: Option<DateTime<Utc>>,
    pub follower_count: i64,
    pub following_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_poll_expires_after_seven_days() {
        let poll = Poll::new("550".into(), "Best scene?".into(), vec!["A".into(), "B".into()], at(1));
        assert_eq!(poll.ends_at, at(8));
        assert!(poll.is_active(at(7)));
        assert!(!poll.is_active(at(8)));
        assert!(!poll.is_active(at(9)));
    }

    #[test]
    fn test_like_target_precedence() {
        let comment = Uuid::new_v4();
        let target =
            LikeTarget::from_ids(None, Some(comment.to_string()), Some("r1".into())).unwrap();
        assert_eq!(target, LikeTarget::Comment(comment.to_string()));
        assert_eq!(target.kind(), "comment");

        let target = LikeTarget::from_ids(Some("  ".into()), None, Some(" r1 ".into())).unwrap();
        assert_eq!(target, LikeTarget::Review("r1".into()));

        assert!(matches!(
            LikeTarget::from_ids(None, None, None),
            Err(ServiceError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_comment_target_is_canonical() {
        let comment = Uuid::new_v4();
        let shouted = format!("  {}  ", comment.to_string().to_uppercase());

        let target = LikeTarget::from_ids(None, Some(shouted), None).unwrap();
        assert_eq!(target.id(), comment.to_string());

        let err = LikeTarget::from_ids(None, Some("c1".into()), None).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[test]
    fn test_premium_requires_role_and_future_expiry() {
        let mut user = User {
            id: Uuid::new_v4(),
            name: None,
            email: "a@b.c".into(),
            image: None,
            role: ROLE_PREMIUM.into(),
            premium_until: Some(at(10)),
            created_at: at(1),
        };
        assert!(user.is_premium(at(9)));
        assert!(!user.is_premium(at(10)));

        user.role = ROLE_USER.into();
        assert!(!user.is_premium(at(9)));

        user.role = ROLE_PREMIUM.into();
        user.premium_until = None;
        assert!(!user.is_premium(at(9)));
    }

    #[test]
    fn test_follow_list_kind_parse() {
        assert_eq!("followers".parse(), Ok(FollowListKind::Followers));
        assert_eq!("following".parse(), Ok(FollowListKind::Following));
        assert!("friends".parse::<FollowListKind>().is_err());
    }
}
