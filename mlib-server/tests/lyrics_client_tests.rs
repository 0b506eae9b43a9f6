//! Lyrics client tests against a local stub of the lyrics service

use axum::{extract::Query, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use mlib_common::config::LyricsApiConfig;
use mlib_common::Error;
use mlib_server::services::{LyricsApiClient, LyricsProvider};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct InfoQuery {
    group: String,
    song: String,
}

async fn info(Query(query): Query<InfoQuery>) -> impl IntoResponse {
    match (query.group.as_str(), query.song.as_str()) {
        ("Muse", "Supermassive Black Hole") => (
            StatusCode::OK,
            Json(json!({
                "releaseDate": "16.07.2006",
                "text": "Ooh baby, don't you know I suffer?\nOoh baby, can you hear me moan?",
                "link": "https://www.youtube.com/watch?v=Xsp3_a-PMTw"
            })),
        )
            .into_response(),
        ("Muse", "Starlight") => (
            StatusCode::OK,
            Json(json!({"releaseDate": "2006-10-17", "text": "Far away", "link": ""})),
        )
            .into_response(),
        ("Broken", "Json") => (StatusCode::OK, "{not json").into_response(),
        ("Broken", "Date") => (
            StatusCode::OK,
            Json(json!({"releaseDate": "sometime", "text": "x", "link": "y"})),
        )
            .into_response(),
        ("Slow", "Song") => {
            tokio::time::sleep(Duration::from_secs(3)).await;
            (StatusCode::OK, Json(json!({"text": "too late"}))).into_response()
        }
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "lookup failed").into_response(),
    }
}

/// Serve the stub on an ephemeral port and return its base URL
async fn spawn_stub() -> String {
    let app = Router::new().route("/info", get(info));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn client(base_url: String) -> LyricsApiClient {
    client_with_timeout(base_url, 5)
}

fn client_with_timeout(base_url: String, timeout_secs: u64) -> LyricsApiClient {
    LyricsApiClient::new(&LyricsApiConfig {
        base_url,
        timeout_secs,
    })
    .unwrap()
}

#[tokio::test]
async fn test_fetch_details() {
    let client = client(spawn_stub().await);

    let details = client
        .fetch_song_details("Muse", "Supermassive Black Hole")
        .await
        .unwrap();

    assert_eq!(details.release_date.as_deref(), Some("2006-07-16"));
    assert!(details.text.starts_with("Ooh baby"));
    assert_eq!(details.text.lines().count(), 2);
    assert_eq!(
        details.link.as_deref(),
        Some("https://www.youtube.com/watch?v=Xsp3_a-PMTw")
    );
}

#[tokio::test]
async fn test_blank_link_is_absent() {
    let client = client(format!("{}/", spawn_stub().await));

    let details = client.fetch_song_details("Muse", "Starlight").await.unwrap();

    assert_eq!(details.release_date.as_deref(), Some("2006-10-17"));
    assert_eq!(details.link, None);
}

#[tokio::test]
async fn test_error_status() {
    let client = client(spawn_stub().await);

    let result = client.fetch_song_details("Nobody", "Nothing").await;

    match result {
        Err(Error::ExternalApi(msg)) => assert!(msg.contains("500"), "{}", msg),
        other => panic!("Expected ExternalApi error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_body() {
    let client = client(spawn_stub().await);

    let result = client.fetch_song_details("Broken", "Json").await;

    assert!(matches!(result, Err(Error::ExternalApi(_))));
}

#[tokio::test]
async fn test_malformed_release_date() {
    let client = client(spawn_stub().await);

    let result = client.fetch_song_details("Broken", "Date").await;

    assert!(matches!(result, Err(Error::ExternalApi(_))));
}

#[tokio::test]
async fn test_slow_service_times_out() {
    let client = client_with_timeout(spawn_stub().await, 1);

    let started = std::time::Instant::now();
    let result = client.fetch_song_details("Slow", "Song").await;

    assert!(matches!(result, Err(Error::ExternalApi(_))));
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn test_unreachable_service() {
    // Bind then drop to get a port with nothing listening
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client(format!("http://{}", addr));
    let result = client.fetch_song_details("Muse", "Starlight").await;

    assert!(matches!(result, Err(Error::ExternalApi(_))));
}
