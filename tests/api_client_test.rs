//! Moltbook Client Integration Tests
//!
//! Exercises the reqwest client against a local mock server.

use moltbook_heartbeat::{ApiError, ApiKey, FeedSource, MoltbookApi, MoltbookClient, NewPost};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const KEY: &str = "moltbook_sk_test";

fn client_for(server: &MockServer, timeout: Duration) -> MoltbookClient {
    // Trailing slash must not produce `//` in request paths
    let base_url = format!("{}/api/v1/", server.uri());
    match MoltbookClient::new(&base_url, ApiKey::new(KEY), timeout) {
        Ok(client) => client,
        Err(e) => panic!("failed to build client: {e}"),
    }
}

#[tokio::test]
async fn test_fetch_feed_sends_bearer_and_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/posts"))
        .and(query_param("sort", "new"))
        .and(query_param("limit", "30"))
        .and(header("authorization", format!("Bearer {KEY}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "posts": [
                { "id": "p1", "title": "Memory", "author": { "name": "ada" }, "upvotes": 6 },
                { "id": 7, "title": "Numeric" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Duration::from_secs(5));
    let source = &FeedSource::defaults(&[])[0];
    let posts = client.fetch_feed(source).await.unwrap();

    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].id, "p1");
    assert_eq!(posts[0].author_name, "ada");
    assert_eq!(posts[0].upvote_count, 6);
    assert_eq!(posts[1].id, "7");
}

#[tokio::test]
async fn test_upvote_trims_base_url_slash() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/posts/p1/upvote"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Duration::from_secs(5));
    assert!(client.upvote("p1").await.is_ok());
}

#[tokio::test]
async fn test_comment_and_post_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/posts/p1/comments"))
        .and(body_json(json!({ "content": "Nice one" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/posts"))
        .and(body_json(json!({
            "submolt": "general",
            "title": "Hello",
            "content": "World"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Duration::from_secs(5));
    client.comment("p1", "Nice one").await.unwrap();

    let post = NewPost {
        submolt: "general".to_string(),
        title: "Hello".to_string(),
        content: "World".to_string(),
    };
    client.create_post(&post).await.unwrap();
}

#[tokio::test]
async fn test_client_error_maps_to_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/posts/gone/upvote"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "success": false,
            "error": "Post not found"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, Duration::from_secs(5));
    match client.upvote("gone").await {
        Err(ApiError::Rejected { status, detail }) => {
            assert_eq!(status, 404);
            assert_eq!(detail, "Post not found");
        }
        other => panic!("unexpected: {:?}", other),
    }
}

#[tokio::test]
async fn test_unsuccessful_ok_response_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/posts/p1/comments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "hint": "Wait 20 seconds between comments"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, Duration::from_secs(5));
    match client.comment("p1", "hi").await {
        Err(ApiError::Rejected { status, detail }) => {
            assert_eq!(status, 200);
            assert!(detail.contains("20 seconds"));
        }
        other => panic!("unexpected: {:?}", other),
    }
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/agents/dm/check"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": true }))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, Duration::from_millis(50));
    match client.check_dms().await {
        Err(ApiError::Transport(e)) => assert!(e.is_timeout()),
        other => panic!("unexpected: {:?}", other),
    }
}
