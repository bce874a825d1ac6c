//! Post and story retrieval on top of a [`ContentApi`](glimpse_social::instagram::ContentApi).
//!
//! [`FeedService`] owns the two long-lived upstream handles (authenticated and
//! public) and turns upstream items into the flat [`UserResponse`] contract,
//! keeping only items newer than a caller-supplied cutoff ID.
pub mod cutoff;
pub mod models;
mod service;

pub use cutoff::{parse_or_default, story_numeric_id};
pub use models::{Post, Story, UserResponse};
pub use service::FeedService;

#[derive(thiserror::Error, Debug)]
pub enum FeedError {
    /// A story passed the cutoff but carried no media URL.
    #[error("story {id} has no media")]
    StoryWithoutMedia { id: String },
}
