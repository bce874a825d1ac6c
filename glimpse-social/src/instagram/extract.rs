//! Conversion from raw Instagram payloads into the normalized items.
use anyhow::{Context, Result};

use crate::instagram::types::{
    CarouselMedia, ImageVersions, MEDIA_TYPE_CAROUSEL, MEDIA_TYPE_VIDEO, MediaItem, PostInfo,
    Profile, ProfileEnvelope, RawMedia, RawStoryItem, ReelEnvelope, StoryItem, TimelineMedia,
    VideoVersion, WEB_ORIGIN,
};

/// Split a profile payload into the profile itself and its first timeline page.
pub fn profile(envelope: ProfileEnvelope) -> Result<(Profile, TimelineMedia)> {
    let user = envelope.data.user.context("profile payload has no user")?;
    let profile = Profile {
        id: user.id,
        username: user.username,
        is_private: user.is_private,
    };
    Ok((profile, user.edge_owner_to_timeline_media.unwrap_or_default()))
}

pub fn media_items(timeline: &TimelineMedia) -> Vec<MediaItem> {
    timeline.edges.iter().map(|e| media_item(&e.node)).collect()
}

pub fn media_item(raw: &RawMedia) -> MediaItem {
    MediaItem {
        id: raw.id.clone(),
        shortcode: raw.shortcode.clone(),
        caption: raw
            .edge_media_to_caption
            .edges
            .first()
            .map(|e| e.node.text.clone()),
        like_count: raw.edge_media_preview_like.count,
        is_video: raw.is_video,
    }
}

pub fn post_info(raw: &RawMedia) -> PostInfo {
    let urls = match &raw.edge_sidecar_to_children {
        Some(sidecar) if !sidecar.edges.is_empty() => sidecar
            .edges
            .iter()
            .filter_map(|e| {
                let n = &e.node;
                if n.is_video {
                    n.video_url.clone()
                } else {
                    n.display_url.clone()
                }
            })
            .collect(),
        _ if raw.is_video => raw.video_url.iter().cloned().collect(),
        _ => raw.display_url.iter().cloned().collect(),
    };
    PostInfo { urls }
}

pub fn story_items(envelope: ReelEnvelope) -> Vec<StoryItem> {
    let owner = envelope.user.map(|u| u.username);
    envelope
        .items
        .into_iter()
        .map(|raw| story_item(raw, owner.as_deref()))
        .collect()
}

pub fn story_item(raw: RawStoryItem, fallback_owner: Option<&str>) -> StoryItem {
    let urls = story_media_urls(&raw);
    let owner = raw
        .user
        .as_ref()
        .map(|u| u.username.as_str())
        .or(fallback_owner)
        .unwrap_or_default();
    let pk = raw
        .pk
        .clone()
        .unwrap_or_else(|| raw.id.split('_').next().unwrap_or_default().to_string());
    StoryItem {
        story_url: format!("{WEB_ORIGIN}/stories/{owner}/{pk}/"),
        id: raw.id,
        urls,
    }
}

fn story_media_urls(raw: &RawStoryItem) -> Vec<String> {
    if raw.media_type == MEDIA_TYPE_CAROUSEL && !raw.carousel_media.is_empty() {
        return raw.carousel_media.iter().filter_map(carousel_url).collect();
    }
    best_url(
        raw.media_type,
        &raw.video_versions,
        raw.image_versions2.as_ref(),
    )
    .into_iter()
    .collect()
}

fn carousel_url(c: &CarouselMedia) -> Option<String> {
    best_url(c.media_type, &c.video_versions, c.image_versions2.as_ref())
}

fn best_url(
    media_type: u8,
    videos: &[VideoVersion],
    images: Option<&ImageVersions>,
) -> Option<String> {
    if media_type == MEDIA_TYPE_VIDEO {
        if let Some(v) = videos.first() {
            return Some(v.url.clone());
        }
    }
    images
        .and_then(|iv| iv.candidates.iter().max_by_key(|c| u64::from(c.width) * u64::from(c.height)))
        .map(|c| c.url.clone())
}
