use std::sync::Arc;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use glimpse_feed::{FeedService, UserResponse};
use glimpse_server::{AppState, FaultBody, router};
use glimpse_social::instagram::{ContentApi, MediaItem, PostInfo, Profile, StoryItem};
use tower::ServiceExt;

/// Deterministic upstream: three photo posts and three stories.
#[derive(Default)]
struct StubApi {
    panic_on_listing: bool,
    story_media: bool,
}

#[async_trait]
impl ContentApi for StubApi {
    async fn profile(&self, username: &str) -> Result<Profile> {
        Ok(Profile {
            id: "789".into(),
            username: username.into(),
            is_private: false,
        })
    }

    async fn list_media(&self, _username: &str) -> Result<Vec<MediaItem>> {
        if self.panic_on_listing {
            panic!("listing exploded");
        }
        Ok(["30", "20", "10"]
            .iter()
            .map(|id| MediaItem {
                id: id.to_string(),
                shortcode: format!("c{id}"),
                caption: None,
                like_count: 1,
                is_video: false,
            })
            .collect())
    }

    async fn post_info(&self, code: &str) -> Result<PostInfo> {
        Ok(PostInfo {
            urls: vec![format!("https://cdn/{code}.jpg")],
        })
    }

    async fn user_stories(&self, user_id: &str) -> Result<Vec<StoryItem>> {
        if user_id != "789" {
            return Err(anyhow!("unknown user"));
        }
        Ok(["10_789", "40_789", "15_789"]
            .iter()
            .map(|id| StoryItem {
                id: id.to_string(),
                story_url: format!("https://www.instagram.com/stories/alice/{id}/"),
                urls: if self.story_media {
                    vec![format!("https://cdn/{id}.jpg")]
                } else {
                    Vec::new()
                },
            })
            .collect())
    }
}

fn app(api: StubApi) -> axum::Router {
    let api: Arc<dyn ContentApi> = Arc::new(api);
    router(AppState::new(FeedService::new(api.clone(), api)))
}

fn healthy() -> StubApi {
    StubApi {
        story_media: true,
        ..Default::default()
    }
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let resp = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

#[tokio::test]
async fn health_is_ok() {
    let (status, body) = get(app(healthy()), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"ok");
}

#[tokio::test]
async fn posts_with_cutoff() {
    let (status, body) = get(app(healthy()), "/posts/alice/15").await;
    assert_eq!(status, StatusCode::OK);

    let resp: UserResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(resp.user_name, "alice");
    let ids: Vec<&str> = resp.posts.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["30", "20"]);
    assert_eq!(resp.posts[0].photo_urls, ["https://cdn/c30.jpg"]);
    assert!(resp.stories.is_empty());
}

#[tokio::test]
async fn posts_without_last_admit_everything() {
    let (status, body) = get(app(healthy()), "/posts/alice").await;
    assert_eq!(status, StatusCode::OK);
    let resp: UserResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(resp.posts.len(), 3);
}

#[tokio::test]
async fn unparseable_last_defaults_to_zero() {
    let (status, body) = get(app(healthy()), "/posts/alice/abc").await;
    assert_eq!(status, StatusCode::OK);
    let resp: UserResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(resp.posts.len(), 3);
}

#[tokio::test]
async fn posts_body_has_flat_shape() {
    let (_, body) = get(app(healthy()), "/posts/alice/25").await;
    let v: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        v,
        serde_json::json!({
            "user_name": "alice",
            "posts": [{
                "description": "",
                "photo_urls": ["https://cdn/c30.jpg"],
                "video_urls": [],
                "likes": 1,
                "id": "30",
                "post_url": "https://www.instagram.com/p/c30/"
            }],
            "stories": []
        })
    );
}

#[tokio::test]
async fn stories_skip_old_ids() {
    let (status, body) = get(app(healthy()), "/stories/alice/20").await;
    assert_eq!(status, StatusCode::OK);

    let resp: UserResponse = serde_json::from_slice(&body).unwrap();
    assert!(resp.posts.is_empty());
    assert_eq!(resp.stories.len(), 1);
    assert_eq!(resp.stories[0].id, "40");
    assert_eq!(resp.stories[0].original_id, "40_789");
    assert_eq!(resp.stories[0].media_url, "https://cdn/40_789.jpg");
}

#[tokio::test]
async fn panic_in_retrieval_becomes_500() {
    let app = app(StubApi {
        panic_on_listing: true,
        story_media: true,
    });

    let (status, body) = get(app.clone(), "/posts/alice").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let fault: FaultBody = serde_json::from_slice(&body).unwrap();
    assert!(fault.error.contains("listing exploded"));

    // Same router keeps serving.
    let (status, _) = get(app, "/stories/alice").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn story_without_media_becomes_500() {
    let (status, body) = get(app(StubApi::default()), "/stories/alice/0").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let v: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(v["Error"], "story 10_789 has no media");
}
