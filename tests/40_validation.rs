//! Input validation that fires before any database access, exercised with a
//! valid session token.

mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

#[tokio::test]
async fn tips_and_boosts_reject_non_positive_amounts() -> Result<()> {
    let server = common::ensure_server().await?;
    let token = common::test_token("fan@example.com");
    let client = reqwest::Client::new();

    for (path, body) in [
        ("/api/tips", json!({ "band_id": Uuid::new_v4(), "amount_cents": 0 })),
        ("/api/tips", json!({ "band_id": Uuid::new_v4(), "amount_cents": -500 })),
        ("/api/boosts", json!({ "band_id": Uuid::new_v4(), "amount_cents": 0 })),
    ] {
        let resp = client
            .post(format!("{}{}", server.base_url, path))
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await?;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{path} {body}");

        let envelope: Value = resp.json().await?;
        assert_eq!(envelope["code"], "BAD_REQUEST");
    }
    Ok(())
}

#[tokio::test]
async fn playlist_names_cannot_be_blank() -> Result<()> {
    let server = common::ensure_server().await?;
    let token = common::test_token("curator@example.com");

    let resp = reqwest::Client::new()
        .post(format!("{}/api/playlists", server.base_url))
        .bearer_auth(&token)
        .json(&json!({ "name": "   " }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn track_submissions_validate_before_touching_storage() -> Result<()> {
    let server = common::ensure_server().await?;
    let token = common::test_token("artist@example.com");
    let client = reqwest::Client::new();
    let url = format!("{}/api/tracks", server.base_url);

    for body in [
        json!({ "album_id": Uuid::new_v4(), "title": "", "audio_key": "tracks/x/1-a.mp3" }),
        json!({ "album_id": Uuid::new_v4(), "title": "Song", "audio_key": "  " }),
    ] {
        let resp = client
            .post(&url)
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await?;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{body}");
    }
    Ok(())
}

#[tokio::test]
async fn user_search_requires_a_query() -> Result<()> {
    let server = common::ensure_server().await?;
    let token = common::test_token("curator@example.com");
    let client = reqwest::Client::new();

    // Blank q fails in the handler; a missing q fails in extraction
    for suffix in ["?q=%20%20", ""] {
        let resp = client
            .get(format!("{}/api/search/users{}", server.base_url, suffix))
            .bearer_auth(&token)
            .send()
            .await?;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "suffix {suffix:?}");
    }
    Ok(())
}
