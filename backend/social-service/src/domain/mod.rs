pub mod models;
pub mod tally;

pub use models::*;
pub use tally::{percentage, PollTally, PollView};
