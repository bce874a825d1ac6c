use std::time::Duration;

use glimpse_social::instagram::{ContentApi, InstagramApi, InstagramSettings, Session};
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings(server: &MockServer) -> InstagramSettings {
    InstagramSettings {
        web_base_url: server.uri(),
        api_base_url: server.uri(),
        timeout: Duration::from_secs(2),
        ..InstagramSettings::default()
    }
}

fn node(id: &str, code: &str, is_video: bool) -> Value {
    json!({ "node": {
        "id": id,
        "shortcode": code,
        "is_video": is_video,
        "edge_media_to_caption": { "edges": [ { "node": { "text": format!("caption {id}") } } ] },
        "edge_media_preview_like": { "count": 7 }
    } })
}

fn profile_body(is_private: bool, has_next: bool) -> Value {
    let end_cursor = if has_next { json!("c1") } else { Value::Null };
    json!({
        "data": { "user": {
            "id": "789",
            "username": "alice",
            "is_private": is_private,
            "edge_owner_to_timeline_media": {
                "count": 3,
                "page_info": { "has_next_page": has_next, "end_cursor": end_cursor },
                "edges": [ node("300", "C3", false), node("200", "C2", true) ]
            }
        } },
        "status": "ok"
    })
}

#[tokio::test]
async fn profile_reports_privacy_flag() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users/web_profile_info/"))
        .and(query_param("username", "alice"))
        .and(header("x-ig-app-id", "936619743392459"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_body(true, false)))
        .mount(&server)
        .await;

    let api = InstagramApi::anonymous(&settings(&server)).unwrap();
    let profile = api.profile("alice").await.unwrap();
    assert!(profile.is_private);
    assert_eq!(api.user_id("alice").await.unwrap(), "789");
}

#[tokio::test]
async fn list_media_follows_cursor() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users/web_profile_info/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_body(false, true)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/graphql/query/"))
        .and(query_param("query_hash", "69cba40317214236af40e7efa697781d"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "user": { "edge_owner_to_timeline_media": {
                "page_info": { "has_next_page": false, "end_cursor": null },
                "edges": [ node("100", "C1", false) ]
            } } },
            "status": "ok"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = InstagramApi::anonymous(&settings(&server)).unwrap();
    let items = api.list_media("alice").await.unwrap();
    let ids: Vec<&str> = items.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, ["300", "200", "100"]);
    assert!(items[1].is_video);
    assert_eq!(items[0].caption.as_deref(), Some("caption 300"));
}

#[tokio::test]
async fn list_media_respects_page_cap() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users/web_profile_info/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_body(false, true)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/graphql/query/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let cfg = InstagramSettings {
        max_pages: 1,
        ..settings(&server)
    };
    let api = InstagramApi::anonymous(&cfg).unwrap();
    assert_eq!(api.list_media("alice").await.unwrap().len(), 2);
}

#[tokio::test]
async fn failed_later_page_keeps_earlier_items() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users/web_profile_info/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_body(false, true)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/graphql/query/"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({ "message": "Please wait a few minutes" })))
        .mount(&server)
        .await;

    let api = InstagramApi::anonymous(&settings(&server)).unwrap();
    assert_eq!(api.list_media("alice").await.unwrap().len(), 2);
}

#[tokio::test]
async fn authenticated_client_sends_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/p/C2/"))
        .and(query_param("__a", "1"))
        .and(header("cookie", "ds_user_id=1; sessionid=s; csrftoken=tok"))
        .and(header("x-csrftoken", "tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "graphql": { "shortcode_media": {
                "id": "200",
                "shortcode": "C2",
                "is_video": true,
                "display_url": "https://cdn/thumb.jpg",
                "video_url": "https://cdn/v.mp4"
            } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = Session {
        ds_user_id: "1".into(),
        sessionid: "s".into(),
        csrftoken: "tok".into(),
    };
    let api = InstagramApi::authenticated(&settings(&server), &session).unwrap();
    assert!(api.is_authenticated());
    let info = api.post_info("C2").await.unwrap();
    assert_eq!(info.media_urls(), vec!["https://cdn/v.mp4"]);
}

#[tokio::test]
async fn user_stories_are_normalized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/feed/user/789/reel_media/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "789",
            "user": { "username": "alice" },
            "items": [
                { "id": "123456_789", "pk": 123456, "media_type": 1,
                  "image_versions2": { "candidates": [ { "url": "https://cdn/s1.jpg", "width": 1080, "height": 1920 } ] } },
                { "id": "123457_789", "pk": "123457", "media_type": 2,
                  "video_versions": [ { "url": "https://cdn/s2.mp4" } ] }
            ]
        })))
        .mount(&server)
        .await;

    let api = InstagramApi::anonymous(&settings(&server)).unwrap();
    let stories = api.user_stories("789").await.unwrap();
    assert_eq!(stories.len(), 2);
    assert_eq!(stories[0].id, "123456_789");
    assert_eq!(stories[0].post_url(), "https://www.instagram.com/stories/alice/123456/");
    assert_eq!(stories[1].media_urls(), ["https://cdn/s2.mp4"]);
}

#[tokio::test]
async fn empty_user_id_is_rejected_without_a_request() {
    let server = MockServer::start().await;
    let api = InstagramApi::anonymous(&settings(&server)).unwrap();
    assert!(api.user_stories("").await.is_err());
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn empty_session_sends_no_cookie_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/feed/user/1/reel_media/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let api = InstagramApi::authenticated(&settings(&server), &Session::default()).unwrap();
    assert!(!api.is_authenticated());
    assert!(api.user_stories("1").await.unwrap().is_empty());

    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("cookie").is_none());
    assert!(requests[0].headers.get("x-csrftoken").is_none());
}
