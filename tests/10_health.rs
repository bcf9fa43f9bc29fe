mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn root_describes_the_service() -> Result<()> {
    let server = common::ensure_server().await?;

    let resp = reqwest::get(&server.base_url).await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await?;
    assert_eq!(body["name"], "Sidestage API");
    assert_eq!(body["endpoints"]["health"], "/health");
    Ok(())
}

#[tokio::test]
async fn health_reports_database_state() -> Result<()> {
    let server = common::ensure_server().await?;

    let resp = reqwest::get(format!("{}/health", server.base_url)).await?;
    let status = resp.status();
    let body: Value = resp.json().await?;

    match status {
        StatusCode::OK => assert_eq!(body["status"], "healthy"),
        StatusCode::SERVICE_UNAVAILABLE => assert_eq!(body["error"], true),
        other => panic!("unexpected health status {other}"),
    }
    Ok(())
}

#[tokio::test]
async fn every_allow_listed_doc_is_served_as_markdown() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    for slug in ["readme", "api", "uploads", "moderation", "billing"] {
        let resp = client
            .get(format!("{}/docs/{}", server.base_url, slug))
            .send()
            .await?;
        assert_eq!(resp.status(), StatusCode::OK, "slug {slug}");

        let content_type = resp
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(content_type.starts_with("text/markdown"), "slug {slug}");
        assert!(!resp.text().await?.is_empty(), "slug {slug}");
    }
    Ok(())
}

#[tokio::test]
async fn unknown_doc_slugs_get_the_error_envelope() -> Result<()> {
    let server = common::ensure_server().await?;

    let resp = reqwest::get(format!("{}/docs/deploy-keys", server.base_url)).await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = resp.json().await?;
    assert_eq!(body["error"], true);
    assert_eq!(body["code"], "NOT_FOUND");
    Ok(())
}
