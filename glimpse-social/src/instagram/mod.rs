//! Instagram integration surface.
//!
//! `client` talks HTTP, `types` holds the raw upstream models and the
//! normalized items handed to callers, and `extract` converts between them.
pub mod api;
pub mod client;
pub mod extract;
pub mod types;

pub use api::ContentApi;
pub use client::{InstagramApi, InstagramSettings, Session};
pub use types::{MediaItem, PostInfo, Profile, StoryItem};
