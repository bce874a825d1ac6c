use std::sync::Arc;

use anyhow::Result;
use glimpse_config::{GlimpseConfig, SessionConfig, UpstreamConfig};
use glimpse_feed::FeedService;
use glimpse_server::AppState;
use glimpse_social::instagram::{ContentApi, InstagramApi, InstagramSettings, Session};

fn settings(upstream: &UpstreamConfig) -> InstagramSettings {
    InstagramSettings {
        web_base_url: upstream.web_base_url.clone(),
        api_base_url: upstream.api_base_url.clone(),
        app_id: upstream.app_id.clone(),
        user_agent: upstream.user_agent.clone(),
        timeline_query_hash: upstream.timeline_query_hash.clone(),
        page_size: upstream.page_size,
        max_pages: upstream.max_pages,
        timeout: upstream.timeout(),
    }
}

fn session(cfg: &SessionConfig) -> Session {
    Session {
        ds_user_id: cfg.ds_user_id.clone(),
        sessionid: cfg.sessionid.clone(),
        csrftoken: cfg.csrftoken.clone(),
    }
}

/// Build both upstream handles once; they are shared by every request.
pub fn build_state(cfg: &GlimpseConfig) -> Result<AppState> {
    let settings = settings(&cfg.upstream);

    if !cfg.session.is_complete() {
        tracing::warn!(
            session = ?cfg.session,
            "incomplete upstream session; private profiles, videos and stories will come back empty"
        );
    }

    let private: Arc<dyn ContentApi> =
        Arc::new(InstagramApi::authenticated(&settings, &session(&cfg.session))?);
    let public: Arc<dyn ContentApi> = Arc::new(InstagramApi::anonymous(&settings)?);

    Ok(AppState::new(FeedService::new(private, public)))
}
