mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::Value;
use uuid::Uuid;

#[tokio::test]
async fn protected_routes_reject_missing_tokens() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    for path in [
        "/api/library",
        "/api/playlists",
        "/api/notifications",
        "/api/profile",
        "/api/billing/subscription",
        "/api/search/users?q=dana",
    ] {
        let resp = client
            .get(format!("{}{}", server.base_url, path))
            .send()
            .await?;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{path}");

        let body: Value = resp.json().await?;
        assert_eq!(body["error"], true, "{path}");
        assert_eq!(body["code"], "UNAUTHORIZED", "{path}");
    }
    Ok(())
}

#[tokio::test]
async fn malformed_and_foreign_tokens_are_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let url = format!("{}/api/profile", server.base_url);

    for bad in [
        "Bearer not.a.token".to_string(),
        "Bearer ".to_string(),
        "Basic dXNlcjpwYXNz".to_string(),
        format!("Bearer {}", common::foreign_token()),
    ] {
        let resp = client
            .get(&url)
            .header("authorization", &bad)
            .send()
            .await?;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "header {bad:?}");
    }
    Ok(())
}

#[tokio::test]
async fn admin_routes_demand_a_token_first() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    for path in ["/api/admin/settings", "/api/admin/moderation", "/api/admin/stats"] {
        let resp = client
            .get(format!("{}{}", server.base_url, path))
            .send()
            .await?;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{path}");
    }
    Ok(())
}

#[tokio::test]
async fn status_probes_answer_anonymous_callers_with_defaults() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let cases = [
        (format!("/api/follows/status?band_id={}", Uuid::new_v4()), "following"),
        (format!("/api/library/albums/status?album_id={}", Uuid::new_v4()), "saved"),
        (format!("/api/library/tracks/status?track_id={}", Uuid::new_v4()), "liked"),
    ];

    for (path, field) in cases {
        let resp = client
            .get(format!("{}{}", server.base_url, path))
            .send()
            .await?;
        assert_eq!(resp.status(), StatusCode::OK, "{path}");

        let body: Value = resp.json().await?;
        assert_eq!(body[field], false, "{path}");
    }
    Ok(())
}

#[tokio::test]
async fn status_probes_validate_their_query() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!(
            "{}/api/follows/status?band_id=not-a-uuid",
            server.base_url
        ))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    Ok(())
}
