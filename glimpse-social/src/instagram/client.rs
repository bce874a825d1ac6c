//! HTTP implementation of [`ContentApi`] against Instagram's web and private hosts.
//!
//! The same type backs both upstream variants: [`InstagramApi::anonymous`] sends
//! no credentials, [`InstagramApi::authenticated`] attaches the session cookies
//! and CSRF header to every call. Timeline pagination follows `end_cursor`
//! until the upstream reports no further page or `max_pages` is reached.
use std::time::Duration;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use glimpse_http::{Auth, HttpClient, RequestOpts};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};

use crate::instagram::api::ContentApi;
use crate::instagram::extract;
use crate::instagram::types::{
    MediaItem, PostEnvelope, PostInfo, Profile, ProfileEnvelope, ReelEnvelope, StoryItem,
    TimelineEnvelope, TimelineMedia,
};

const APP_ID_HEADER: HeaderName = HeaderName::from_static("x-ig-app-id");
const CSRF_HEADER: HeaderName = HeaderName::from_static("x-csrftoken");

/// Host and paging settings shared by both client variants.
#[derive(Debug, Clone)]
pub struct InstagramSettings {
    pub web_base_url: String,
    pub api_base_url: String,
    pub app_id: String,
    pub user_agent: String,
    pub timeline_query_hash: String,
    pub page_size: u32,
    pub max_pages: usize,
    pub timeout: Duration,
}

impl Default for InstagramSettings {
    fn default() -> Self {
        Self {
            web_base_url: "https://www.instagram.com".into(),
            api_base_url: "https://i.instagram.com".into(),
            app_id: "936619743392459".into(),
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36".into(),
            timeline_query_hash: "69cba40317214236af40e7efa697781d".into(),
            page_size: 50,
            max_pages: 20,
            timeout: Duration::from_secs(15),
        }
    }
}

/// Logged-in session used by the authenticated variant.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub ds_user_id: String,
    pub sessionid: String,
    pub csrftoken: String,
}

impl Session {
    fn is_empty(&self) -> bool {
        self.ds_user_id.is_empty() && self.sessionid.is_empty() && self.csrftoken.is_empty()
    }

    fn cookies(&self) -> Vec<(String, String)> {
        vec![
            ("ds_user_id".into(), self.ds_user_id.clone()),
            ("sessionid".into(), self.sessionid.clone()),
            ("csrftoken".into(), self.csrftoken.clone()),
        ]
    }
}

#[derive(Clone)]
pub struct InstagramApi {
    web: HttpClient,
    api: HttpClient,
    cookies: Option<Vec<(String, String)>>,
    csrf: Option<HeaderValue>,
    timeline_query_hash: String,
    page_size: u32,
    max_pages: usize,
}

impl InstagramApi {
    /// Client that sends no credentials.
    pub fn anonymous(settings: &InstagramSettings) -> Result<Self> {
        Self::build(settings, None)
    }

    /// Client that carries `session` on every request.
    pub fn authenticated(settings: &InstagramSettings, session: &Session) -> Result<Self> {
        Self::build(settings, Some(session))
    }

    fn build(settings: &InstagramSettings, session: Option<&Session>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&settings.user_agent).context("invalid user agent")?,
        );
        headers.insert(
            APP_ID_HEADER,
            HeaderValue::from_str(&settings.app_id).context("invalid app id")?,
        );

        let web = HttpClient::new(&settings.web_base_url)?
            .with_timeout(settings.timeout)
            .with_headers(headers.clone());
        let api = HttpClient::new(&settings.api_base_url)?
            .with_timeout(settings.timeout)
            .with_headers(headers);

        let csrf = session
            .filter(|s| !s.csrftoken.is_empty())
            .map(|s| HeaderValue::from_str(&s.csrftoken))
            .transpose()
            .context("invalid csrf token")?;

        Ok(Self {
            web,
            api,
            cookies: session.filter(|s| !s.is_empty()).map(Session::cookies),
            csrf,
            timeline_query_hash: settings.timeline_query_hash.clone(),
            page_size: settings.page_size,
            max_pages: settings.max_pages.max(1),
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.cookies.is_some()
    }

    fn opts<'a>(&'a self, query: Vec<(&'a str, std::borrow::Cow<'a, str>)>) -> RequestOpts<'a> {
        let headers = self.csrf.as_ref().map(|v| {
            let mut h = HeaderMap::new();
            h.insert(CSRF_HEADER, v.clone());
            h
        });
        RequestOpts {
            auth: Some(
                self.cookies
                    .as_deref()
                    .map(Auth::Cookies)
                    .unwrap_or(Auth::None),
            ),
            headers,
            query: (!query.is_empty()).then_some(query),
            ..Default::default()
        }
    }

    async fn fetch_profile(&self, username: &str) -> Result<(Profile, TimelineMedia)> {
        let envelope: ProfileEnvelope = self
            .api
            .get_json(
                "api/v1/users/web_profile_info/",
                self.opts(vec![("username", username.into())]),
            )
            .await
            .with_context(|| format!("profile lookup for {username}"))?;
        extract::profile(envelope)
    }

    async fn timeline_page(&self, user_id: &str, cursor: &str) -> Result<TimelineMedia> {
        let variables = serde_json::json!({
            "id": user_id,
            "first": self.page_size,
            "after": cursor,
        })
        .to_string();
        let envelope: TimelineEnvelope = self
            .web
            .get_json(
                "graphql/query/",
                self.opts(vec![
                    ("query_hash", self.timeline_query_hash.as_str().into()),
                    ("variables", variables.into()),
                ]),
            )
            .await
            .with_context(|| format!("timeline page after {cursor}"))?;
        Ok(envelope
            .data
            .user
            .map(|u| u.edge_owner_to_timeline_media)
            .unwrap_or_default())
    }
}

#[async_trait]
impl ContentApi for InstagramApi {
    async fn profile(&self, username: &str) -> Result<Profile> {
        Ok(self.fetch_profile(username).await?.0)
    }

    async fn list_media(&self, username: &str) -> Result<Vec<MediaItem>> {
        let (profile, mut page) = self.fetch_profile(username).await?;
        let mut items = extract::media_items(&page);
        let mut pages = 1;

        while page.page_info.has_next_page && pages < self.max_pages {
            let Some(cursor) = page.page_info.end_cursor.clone() else {
                break;
            };
            page = match self.timeline_page(&profile.id, &cursor).await {
                Ok(next) => next,
                Err(err) => {
                    tracing::warn!(
                        username,
                        pages,
                        items = items.len(),
                        error = %format!("{err:#}"),
                        "instagram.timeline.page_failed"
                    );
                    break;
                }
            };
            items.extend(extract::media_items(&page));
            pages += 1;
        }

        tracing::debug!(
            username = %profile.username,
            pages,
            items = items.len(),
            authenticated = self.is_authenticated(),
            "instagram.timeline.listed"
        );
        Ok(items)
    }

    async fn post_info(&self, code: &str) -> Result<PostInfo> {
        let envelope: PostEnvelope = self
            .web
            .get_json(
                &format!("p/{code}/"),
                self.opts(vec![("__a", "1".into()), ("__d", "dis".into())]),
            )
            .await
            .with_context(|| format!("post lookup for {code}"))?;
        Ok(extract::post_info(&envelope.graphql.shortcode_media))
    }

    async fn user_stories(&self, user_id: &str) -> Result<Vec<StoryItem>> {
        if user_id.is_empty() {
            bail!("story lookup needs a user id");
        }
        let envelope: ReelEnvelope = self
            .api
            .get_json(
                &format!("api/v1/feed/user/{user_id}/reel_media/"),
                self.opts(Vec::new()),
            )
            .await
            .with_context(|| format!("story lookup for user {user_id}"))?;
        Ok(extract::story_items(envelope))
    }
}
