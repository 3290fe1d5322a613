//! CLI command tests against a mock projector backend.

use prism_client::cli::{self, Connection};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn connection(server: &MockServer) -> Connection {
    Connection {
        endpoint: format!("{}/data", server.uri()),
        token: None,
    }
}

#[tokio::test]
async fn runs_command_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/runs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["train"])))
        .mount(&server)
        .await;

    cli::runs_cmd::run(&connection(&server)).await.unwrap();
}

#[tokio::test]
async fn runs_command_surfaces_backend_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/runs"))
        .respond_with(ResponseTemplate::new(500).set_body_string("down for maintenance"))
        .mount(&server)
        .await;

    let err = cli::runs_cmd::run(&connection(&server)).await.unwrap_err();
    let message = err.to_string();
    assert!(message.contains("fetching runs"), "unexpected error: {message}");
    assert!(message.contains("500"), "unexpected error: {message}");
}

#[tokio::test]
async fn metadata_command_writes_sprite_image() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "embeddings": [{
                "tensorName": "word_embedding",
                "tensorShape": [2, 3],
                "sprite": {"imagePath": "sprite.png", "singleImageDim": [16, 16]}
            }]
        })))
        .mount(&server)
        .await;
    let png = vec![0x89u8, b'P', b'N', b'G'];
    Mock::given(method("GET"))
        .and(path("/data/sprite_image"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(png.clone()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("sprite.png");
    cli::metadata_cmd::run(&connection(&server), "train", "word_embedding", Some(&out))
        .await
        .unwrap();

    assert_eq!(std::fs::read(&out).unwrap(), png);
}

#[tokio::test]
async fn bookmarks_command_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/bookmarks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"label": "saved"}])))
        .mount(&server)
        .await;

    cli::bookmarks_cmd::run(&connection(&server), "train", "word_embedding")
        .await
        .unwrap();
}
