use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::{Poll, PollView};
use crate::error::{ServiceError, ServiceResult};
use crate::repository::PollRepository;

const CREATE_REQUIRED: &str = "Movie ID, question and at least 2 options are required";

/// Poll lifecycle and tallying.
///
/// Every operation takes `now` explicitly; expiry is decided against it and
/// never stored.
#[derive(Clone)]
pub struct PollService {
    polls: Arc<dyn PollRepository>,
}

impl PollService {
    pub fn new(polls: Arc<dyn PollRepository>) -> Self {
        Self { polls }
    }

    /// Create a poll that closes seven days after `now`.
    pub async fn create_poll(
        &self,
        movie_id: &str,
        question: &str,
        options: Vec<String>,
        now: DateTime<Utc>,
    ) -> ServiceResult<PollView> {
        let movie_id = movie_id.trim();
        let question = question.trim();
        if movie_id.is_empty() || question.is_empty() || options.len() < 2 {
            return Err(ServiceError::InvalidInput(CREATE_REQUIRED.to_string()));
        }

        let options: Vec<String> = options.iter().map(|o| o.trim().to_string()).collect();
        if options.iter().any(String::is_empty) {
            return Err(ServiceError::InvalidInput(
                "Poll options must not be empty".to_string(),
            ));
        }

        let poll = Poll::new(movie_id.to_string(), question.to_string(), options, now);
        let poll = self.polls.create_poll(&poll).await?;

        info!(poll_id = %poll.id, movie_id = %poll.movie_id, options = poll.options.len(), "Poll created");
        Ok(PollView::new(poll, Vec::new()))
    }

    /// Active polls for a movie, newest first, each with its tally.
    pub async fn list_active_polls(
        &self,
        movie_id: &str,
        now: DateTime<Utc>,
    ) -> ServiceResult<Vec<PollView>> {
        let movie_id = movie_id.trim();
        if movie_id.is_empty() {
            return Err(ServiceError::InvalidInput("Movie ID is required".to_string()));
        }

        let polls = self.polls.get_active_polls(movie_id, now).await?;
        let poll_ids: Vec<Uuid> = polls.iter().map(|p| p.id).collect();

        let mut votes_by_poll: HashMap<Uuid, Vec<i32>> = HashMap::new();
        for (poll_id, option_index) in self.polls.get_vote_indices(&poll_ids).await? {
            votes_by_poll.entry(poll_id).or_default().push(option_index);
        }

        debug!(movie_id = %movie_id, count = polls.len(), "Listed active polls");
        Ok(polls
            .into_iter()
            .map(|poll| {
                let votes = votes_by_poll.remove(&poll.id).unwrap_or_default();
                PollView::new(poll, votes)
            })
            .collect())
    }

    /// Record or replace `user_id`'s vote and return the fresh tally.
    ///
    /// Checks run in order: poll exists, poll still active, index in range.
    pub async fn cast_vote(
        &self,
        poll_id: Uuid,
        user_id: Uuid,
        option_index: i64,
        now: DateTime<Utc>,
    ) -> ServiceResult<PollView> {
        let poll = self
            .polls
            .get_poll(poll_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Poll not found".to_string()))?;

        if !poll.is_active(now) {
            return Err(ServiceError::PollEnded);
        }

        let option_index = usize::try_from(option_index)
            .ok()
            .filter(|&i| i < poll.options.len())
            .and_then(|i| i32::try_from(i).ok())
            .ok_or(ServiceError::InvalidOptionIndex)?;

        self.polls
            .upsert_vote(poll.id, user_id, option_index, now)
            .await?;
        info!(poll_id = %poll.id, user_id = %user_id, option_index, "Vote recorded");

        let votes = self
            .polls
            .get_vote_indices(&[poll.id])
            .await?
            .into_iter()
            .map(|(_, index)| index);
        Ok(PollView::new(poll, votes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryStore;
    use chrono::Duration;

    fn service() -> PollService {
        PollService::new(Arc::new(InMemoryStore::new()))
    }

    fn options(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_create_returns_empty_tally() {
        let now = Utc::now();
        let view = service()
            .create_poll("550", "Best scene?", options(&["A", "B", "C"]), now)
            .await
            .unwrap();

        assert_eq!(view.poll.ends_at, now + Duration::days(7));
        assert_eq!(view.tally.total_votes, 0);
        assert_eq!(view.tally.vote_counts, vec![0, 0, 0]);
        assert_eq!(view.tally.vote_percentages, vec![0, 0, 0]);
    }

    #[tokio::test]
    async fn test_create_validation() {
        let svc = service();
        let now = Utc::now();

        for (movie, question, opts) in [
            ("", "Q?", options(&["A", "B"])),
            ("550", "  ", options(&["A", "B"])),
            ("550", "Q?", options(&["A"])),
            ("550", "Q?", options(&["A", " "])),
        ] {
            let err = svc.create_poll(movie, question, opts, now).await.unwrap_err();
            assert!(matches!(err, ServiceError::InvalidInput(_)));
        }
    }

    #[tokio::test]
    async fn test_two_voters_split() {
        let svc = service();
        let now = Utc::now();
        let poll = svc
            .create_poll("550", "Q?", options(&["A", "B"]), now)
            .await
            .unwrap()
            .poll;

        svc.cast_vote(poll.id, Uuid::new_v4(), 0, now).await.unwrap();
        let view = svc.cast_vote(poll.id, Uuid::new_v4(), 1, now).await.unwrap();
        assert_eq!(view.tally.vote_counts, vec![1, 1]);
        assert_eq!(view.tally.vote_percentages, vec![50, 50]);
    }

    #[tokio::test]
    async fn test_three_voters_then_revote() {
        let svc = service();
        let now = Utc::now();
        let poll = svc
            .create_poll("550", "Q?", options(&["A", "B"]), now)
            .await
            .unwrap()
            .poll;
        let (u1, u2, u3) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        svc.cast_vote(poll.id, u1, 0, now).await.unwrap();
        svc.cast_vote(poll.id, u2, 0, now).await.unwrap();
        let view = svc.cast_vote(poll.id, u3, 1, now).await.unwrap();
        assert_eq!(view.tally.vote_counts, vec![2, 1]);
        assert_eq!(view.tally.total_votes, 3);
        assert_eq!(view.tally.vote_percentages, vec![67, 33]);

        let view = svc.cast_vote(poll.id, u1, 1, now).await.unwrap();
        assert_eq!(view.tally.vote_counts, vec![1, 2]);
        assert_eq!(view.tally.total_votes, 3);

        let listed = svc.list_active_polls("550", now).await.unwrap();
        assert_eq!(listed[0].tally.vote_counts, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_revote_moves_vote() {
        let svc = service();
        let now = Utc::now();
        let poll = svc
            .create_poll("550", "Q?", options(&["A", "B"]), now)
            .await
            .unwrap()
            .poll;
        let user = Uuid::new_v4();

        let view = svc.cast_vote(poll.id, user, 0, now).await.unwrap();
        assert_eq!(view.tally.vote_counts, vec![1, 0]);
        assert_eq!(view.tally.vote_percentages, vec![100, 0]);

        let view = svc.cast_vote(poll.id, user, 1, now).await.unwrap();
        assert_eq!(view.tally.total_votes, 1);
        assert_eq!(view.tally.vote_counts, vec![0, 1]);
        assert_eq!(view.tally.vote_percentages, vec![0, 100]);

        // same option again is a no-op on the tally
        let view = svc.cast_vote(poll.id, user, 1, now).await.unwrap();
        assert_eq!(view.tally.vote_counts, vec![0, 1]);
    }

    #[tokio::test]
    async fn test_vote_on_ended_poll() {
        let svc = service();
        let created = Utc::now() - Duration::days(8);
        let poll = svc
            .create_poll("550", "Q?", options(&["A", "B"]), created)
            .await
            .unwrap()
            .poll;

        let err = svc
            .cast_vote(poll.id, Uuid::new_v4(), 0, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::PollEnded));

        // exactly at ends_at the poll is already closed
        let err = svc
            .cast_vote(poll.id, Uuid::new_v4(), 0, poll.ends_at)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::PollEnded));

        assert!(svc.list_active_polls("550", Utc::now()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ended_check_precedes_index_check() {
        let svc = service();
        let created = Utc::now() - Duration::days(8);
        let poll = svc
            .create_poll("550", "Q?", options(&["A", "B"]), created)
            .await
            .unwrap()
            .poll;

        let err = svc
            .cast_vote(poll.id, Uuid::new_v4(), 9, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::PollEnded));
    }

    #[tokio::test]
    async fn test_invalid_option_index() {
        let svc = service();
        let now = Utc::now();
        let poll = svc
            .create_poll("550", "Q?", options(&["A", "B"]), now)
            .await
            .unwrap()
            .poll;

        for index in [2, -1, i64::MAX] {
            let err = svc
                .cast_vote(poll.id, Uuid::new_v4(), index, now)
                .await
                .unwrap_err();
            assert!(matches!(err, ServiceError::InvalidOptionIndex));
        }

        let view = svc.list_active_polls("550", now).await.unwrap();
        assert_eq!(view[0].tally.total_votes, 0);
    }

    #[tokio::test]
    async fn test_unknown_poll() {
        let err = service()
            .cast_vote(Uuid::new_v4(), Uuid::new_v4(), 0, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_is_scoped_and_newest_first() {
        let svc = service();
        let now = Utc::now();
        let older = svc
            .create_poll("550", "Older?", options(&["A", "B"]), now - Duration::hours(1))
            .await
            .unwrap()
            .poll;
        let newer = svc
            .create_poll("550", "Newer?", options(&["A", "B"]), now)
            .await
            .unwrap()
            .poll;
        svc.create_poll("13", "Other movie?", options(&["A", "B"]), now)
            .await
            .unwrap();

        svc.cast_vote(older.id, Uuid::new_v4(), 1, now).await.unwrap();

        let views = svc.list_active_polls("550", now).await.unwrap();
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].poll.id, newer.id);
        assert_eq!(views[0].tally.total_votes, 0);
        assert_eq!(views[1].poll.id, older.id);
        assert_eq!(views[1].tally.vote_counts, vec![0, 1]);

        assert!(svc.list_active_polls("999", now).await.unwrap().is_empty());
    }
}
