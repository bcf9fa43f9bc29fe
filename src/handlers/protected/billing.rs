use axum::{
    http::{header, HeaderMap},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use url::Url;

use crate::config;
use crate::db::models::SubscriptionRow;
use crate::db::{self, DbError};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::billing::BillingClient;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionStatus {
    pub status: String,
    pub current_period_end: Option<DateTime<Utc>>,
}

/// GET /api/billing/subscription - the caller's subscription as mirrored
/// from the billing provider. No subscription row reads as status "none".
pub async fn subscription(
    Extension(user): Extension<AuthUser>,
) -> Result<Json<SubscriptionStatus>, ApiError> {
    let pool = db::pool().await?;

    let row = sqlx::query_as::<_, SubscriptionRow>(
        "SELECT user_id, billing_customer_id, billing_subscription_id, status, \
                current_period_end \
         FROM subscriptions WHERE user_id = $1",
    )
    .bind(user.id)
    .fetch_optional(&pool)
    .await
    .map_err(DbError::from)?;

    let status = match row {
        Some(row) => SubscriptionStatus {
            status: row.status,
            current_period_end: row.current_period_end,
        },
        None => SubscriptionStatus {
            status: "none".to_string(),
            current_period_end: None,
        },
    };

    Ok(Json(status))
}

/// POST /api/billing/portal - mint a provider-hosted portal session so the
/// caller can manage their subscription. Requires an existing billing
/// customer; users who never subscribed have nothing to manage.
pub async fn portal(
    Extension(user): Extension<AuthUser>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let pool = db::pool().await?;

    let customer: Option<Option<String>> =
        sqlx::query_scalar("SELECT billing_customer_id FROM subscriptions WHERE user_id = $1")
            .bind(user.id)
            .fetch_optional(&pool)
            .await
            .map_err(DbError::from)?;
    let customer = customer
        .flatten()
        .ok_or_else(|| ApiError::not_found("no billing customer on file"))?;

    let client = BillingClient::from_config()?;
    let return_url = portal_return_url(&headers, &config::config().billing.portal_return_path);
    let session = client.create_portal_session(&customer, &return_url).await?;

    Ok(Json(json!({ "url": session.url })))
}

/// The portal sends the user back to the site they came from. Prefer the
/// Origin header, fall back to Host, and keep a dev default so local
/// clients without either still get a working session.
fn portal_return_url(headers: &HeaderMap, path: &str) -> String {
    if let Some(origin) = headers
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok())
    {
        if let Ok(parsed) = Url::parse(origin) {
            if matches!(parsed.scheme(), "http" | "https") {
                return format!("{}{}", origin.trim_end_matches('/'), path);
            }
        }
    }

    if let Some(host) = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
    {
        if !host.is_empty() {
            return format!("https://{}{}", host, path);
        }
    }

    format!("http://localhost:3000{}", path)
}
