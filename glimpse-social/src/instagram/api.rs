use anyhow::Result;
use async_trait::async_trait;

use crate::instagram::types::{MediaItem, PostInfo, Profile, StoryItem};

/// Everything the feed layer needs from the upstream content service.
///
/// Implementations hold only configuration and a connection pool, so a single
/// instance is shared across concurrent requests without locking.
#[async_trait]
pub trait ContentApi: Send + Sync {
    /// Profile lookup; carries the privacy flag.
    async fn profile(&self, username: &str) -> Result<Profile>;

    /// Every timeline post of `username`, newest first.
    async fn list_media(&self, username: &str) -> Result<Vec<MediaItem>>;

    /// Single-post lookup by shortcode.
    async fn post_info(&self, code: &str) -> Result<PostInfo>;

    /// Resolve a username to the upstream numeric user ID.
    async fn user_id(&self, username: &str) -> Result<String> {
        Ok(self.profile(username).await?.id)
    }

    /// Current story items of a user, in upstream order.
    async fn user_stories(&self, user_id: &str) -> Result<Vec<StoryItem>>;
}
