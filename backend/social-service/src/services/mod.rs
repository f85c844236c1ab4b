pub mod accounts;
pub mod catalog;
pub mod comments;
pub mod follows;
pub mod likes;
pub mod polls;

pub use accounts::AccountService;
pub use catalog::{CatalogClient, Mood};
pub use comments::CommentService;
pub use follows::FollowService;
pub use likes::LikeService;
pub use polls::PollService;
