use axum::Json;
use axum::extract::{Path, State};
use glimpse_feed::{UserResponse, parse_or_default};
use serde::Deserialize;

use crate::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct FeedPath {
    username: String,
    #[serde(default)]
    last: Option<String>,
}

impl FeedPath {
    fn cutoff(&self) -> i64 {
        self.last
            .as_deref()
            .map_or(0, |last| parse_or_default(last, 0))
    }
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn posts(
    State(state): State<AppState>,
    Path(path): Path<FeedPath>,
) -> Json<UserResponse> {
    Json(state.feed.posts(&path.username, path.cutoff()).await)
}

pub async fn stories(
    State(state): State<AppState>,
    Path(path): Path<FeedPath>,
) -> Result<Json<UserResponse>, ApiError> {
    let resp = state.feed.stories(&path.username, path.cutoff()).await?;
    Ok(Json(resp))
}
