use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub user_name: String,
    pub posts: Vec<Post>,
    pub stories: Vec<Story>,
}

impl UserResponse {
    pub fn new(user_name: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            ..Default::default()
        }
    }
}

/// A timeline post. Exactly one of `photo_urls` / `video_urls` is filled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Caption text, empty when the post has none.
    pub description: String,
    pub photo_urls: Vec<String>,
    pub video_urls: Vec<String>,
    pub likes: i64,
    pub id: String,
    pub post_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    pub story_url: String,
    /// Upstream `<storyId>_<userId>` identifier.
    pub original_id: String,
    /// Numeric part of `original_id` before the first underscore.
    pub id: String,
    pub media_url: String,
}
