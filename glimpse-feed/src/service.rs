use std::sync::Arc;

use glimpse_social::instagram::{ContentApi, MediaItem};

use crate::FeedError;
use crate::cutoff::{parse_or_default, story_numeric_id};
use crate::models::{Post, Story, UserResponse};

/// Upstream failures are not fatal: the affected field falls back to its
/// zero value and the error is logged.
fn degrade<T: Default>(result: anyhow::Result<T>, call: &'static str, subject: &str) -> T {
    result.unwrap_or_else(|err| {
        tracing::warn!(call, subject, error = %format!("{err:#}"), "feed.upstream_failed");
        T::default()
    })
}

/// Post and story retrieval over two upstream handles.
///
/// `private` carries a logged-in session; `public` is anonymous. Both are
/// shared read-only across requests.
#[derive(Clone)]
pub struct FeedService {
    private: Arc<dyn ContentApi>,
    public: Arc<dyn ContentApi>,
}

impl FeedService {
    pub fn new(private: Arc<dyn ContentApi>, public: Arc<dyn ContentApi>) -> Self {
        Self { private, public }
    }

    /// Posts of `username` newer than `cutoff`.
    ///
    /// Upstream lists newest first, so iteration stops at the first post whose
    /// ID is not above the cutoff.
    pub async fn posts(&self, username: &str, cutoff: i64) -> UserResponse {
        let is_private = match self.public.profile(username).await {
            Ok(profile) => profile.is_private,
            Err(err) => {
                tracing::warn!(
                    username,
                    fallback = "public",
                    error = %format!("{err:#}"),
                    "feed.profile_failed"
                );
                false
            }
        };

        let lister = if is_private {
            &self.private
        } else {
            &self.public
        };
        let medias = degrade(lister.list_media(username).await, "list_media", username);

        let mut resp = UserResponse::new(username);
        for media in medias {
            if parse_or_default(&media.id, 0) <= cutoff {
                break;
            }
            let post = self.post(media).await;
            resp.posts.push(post);
        }

        tracing::info!(
            username,
            cutoff,
            is_private,
            posts = resp.posts.len(),
            "feed.posts"
        );
        resp
    }

    async fn post(&self, media: MediaItem) -> Post {
        let mut post = Post {
            description: media.caption.clone().unwrap_or_default(),
            likes: media.like_count,
            post_url: media.post_url(),
            ..Default::default()
        };

        let code = media.post_code();
        // Anonymous post lookups do not expose video URLs.
        if media.is_video {
            let info = degrade(self.private.post_info(code).await, "post_info", code);
            post.video_urls = info.media_urls();
        } else {
            let info = degrade(self.public.post_info(code).await, "post_info", code);
            post.photo_urls = info.media_urls();
        }

        post.id = media.id;
        post
    }

    /// Stories of `username` whose numeric ID is above `cutoff`.
    ///
    /// Stories carry no ordering guarantee, so older ones are skipped rather
    /// than ending the scan.
    pub async fn stories(&self, username: &str, cutoff: i64) -> Result<UserResponse, FeedError> {
        let mut resp = UserResponse::new(username);

        let user_id = degrade(self.public.user_id(username).await, "user_id", username);
        if user_id.is_empty() {
            return Ok(resp);
        }

        let items = degrade(
            self.private.user_stories(&user_id).await,
            "user_stories",
            &user_id,
        );
        for item in items {
            let story_id = story_numeric_id(&item.id);
            if story_id <= cutoff {
                continue;
            }
            let media_url = item
                .media_urls()
                .first()
                .cloned()
                .ok_or_else(|| FeedError::StoryWithoutMedia {
                    id: item.id.clone(),
                })?;
            resp.stories.push(Story {
                story_url: item.post_url().to_string(),
                original_id: item.id,
                id: story_id.to_string(),
                media_url,
            });
        }

        tracing::info!(
            username,
            cutoff,
            stories = resp.stories.len(),
            "feed.stories"
        );
        Ok(resp)
    }
}
