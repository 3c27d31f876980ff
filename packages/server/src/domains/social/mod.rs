pub mod actions;

pub use actions::{follow, unfollow, FollowState};
