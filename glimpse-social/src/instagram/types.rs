use serde::{Deserialize, Deserializer, Serialize};

pub const WEB_ORIGIN: &str = "https://www.instagram.com";

// ---------------------------------------------------------------------------
// Normalized items returned by `ContentApi`
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub username: String,
    pub is_private: bool,
}

/// One timeline post as listed on a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    /// Numeric post ID, string-encoded.
    pub id: String,
    pub shortcode: String,
    /// Text of the first caption edge, if any.
    pub caption: Option<String>,
    pub like_count: i64,
    pub is_video: bool,
}

impl MediaItem {
    /// Code used by the single-post lookup.
    pub fn post_code(&self) -> &str {
        &self.shortcode
    }

    pub fn post_url(&self) -> String {
        format!("{WEB_ORIGIN}/p/{}/", self.shortcode)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostInfo {
    pub urls: Vec<String>,
}

impl PostInfo {
    /// Photo or video URLs of the post, one per slide for carousels.
    pub fn media_urls(&self) -> Vec<String> {
        self.urls.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryItem {
    /// Composite `<storyId>_<userId>` identifier.
    pub id: String,
    pub story_url: String,
    pub urls: Vec<String>,
}

impl StoryItem {
    pub fn post_url(&self) -> &str {
        &self.story_url
    }

    pub fn media_urls(&self) -> &[String] {
        &self.urls
    }
}

// ---------------------------------------------------------------------------
// Raw upstream payloads
// ---------------------------------------------------------------------------

/// `api/v1/users/web_profile_info/`
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileEnvelope {
    pub data: ProfileData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileData {
    #[serde(default)]
    pub user: Option<RawUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawUser {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub edge_owner_to_timeline_media: Option<TimelineMedia>,
}

/// `graphql/query/` timeline page.
#[derive(Debug, Clone, Deserialize)]
pub struct TimelineEnvelope {
    pub data: TimelineData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimelineData {
    #[serde(default)]
    pub user: Option<TimelineUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimelineUser {
    #[serde(default)]
    pub edge_owner_to_timeline_media: TimelineMedia,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimelineMedia {
    #[serde(default)]
    pub page_info: PageInfo,
    #[serde(default)]
    pub edges: Vec<Edge<RawMedia>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageInfo {
    #[serde(default)]
    pub has_next_page: bool,
    #[serde(default)]
    pub end_cursor: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMedia {
    pub id: String,
    #[serde(default)]
    pub shortcode: String,
    #[serde(default)]
    pub is_video: bool,
    #[serde(default)]
    pub display_url: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub edge_media_to_caption: CaptionEdges,
    #[serde(default)]
    pub edge_media_preview_like: Counter,
    #[serde(default)]
    pub edge_sidecar_to_children: Option<SidecarEdges>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaptionEdges {
    #[serde(default)]
    pub edges: Vec<Edge<CaptionNode>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CaptionNode {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Counter {
    #[serde(default)]
    pub count: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SidecarEdges {
    #[serde(default)]
    pub edges: Vec<Edge<SidecarNode>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SidecarNode {
    #[serde(default)]
    pub is_video: bool,
    #[serde(default)]
    pub display_url: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
}

/// `p/<code>/?__a=1`
#[derive(Debug, Clone, Deserialize)]
pub struct PostEnvelope {
    pub graphql: PostGraphql,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostGraphql {
    pub shortcode_media: RawMedia,
}

/// `api/v1/feed/user/<id>/reel_media/`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReelEnvelope {
    #[serde(default)]
    pub user: Option<ReelUser>,
    #[serde(default)]
    pub items: Vec<RawStoryItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReelUser {
    pub username: String,
}

pub const MEDIA_TYPE_VIDEO: u8 = 2;
pub const MEDIA_TYPE_CAROUSEL: u8 = 8;

#[derive(Debug, Clone, Deserialize)]
pub struct RawStoryItem {
    pub id: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub pk: Option<String>,
    #[serde(default)]
    pub media_type: u8,
    #[serde(default)]
    pub image_versions2: Option<ImageVersions>,
    #[serde(default)]
    pub video_versions: Vec<VideoVersion>,
    #[serde(default)]
    pub carousel_media: Vec<CarouselMedia>,
    #[serde(default)]
    pub user: Option<ReelUser>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageVersions {
    #[serde(default)]
    pub candidates: Vec<ImageCandidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageCandidate {
    pub url: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoVersion {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CarouselMedia {
    #[serde(default)]
    pub media_type: u8,
    #[serde(default)]
    pub image_versions2: Option<ImageVersions>,
    #[serde(default)]
    pub video_versions: Vec<VideoVersion>,
}

// Upstream sends `pk` as a JSON number on some endpoints and a string on others.
fn string_or_number<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(de)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
