//! Bridge to the external billing provider. Subscription lifecycle is
//! provider-hosted; the API's job is to mint portal sessions for existing
//! customers and read the subscription state mirrored into our database.

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::config;

#[derive(Debug, Error)]
pub enum BillingError {
    #[error("billing secret key not configured")]
    MissingSecret,

    #[error("billing provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("billing provider error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("unexpected billing provider response: {0}")]
    Malformed(String),
}

#[derive(Debug, Deserialize)]
pub struct PortalSession {
    pub id: String,
    pub url: String,
}

#[derive(Debug)]
pub struct BillingClient {
    http: Client,
    api_base: String,
    secret_key: String,
}

impl BillingClient {
    pub fn from_config() -> Result<Self, BillingError> {
        let billing = &config::config().billing;
        Self::new(&billing.api_base, &billing.secret_key)
    }

    pub fn new(api_base: &str, secret_key: &str) -> Result<Self, BillingError> {
        if secret_key.is_empty() {
            return Err(BillingError::MissingSecret);
        }
        Ok(BillingClient {
            http: Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            secret_key: secret_key.to_string(),
        })
    }

    /// Create a hosted billing-portal session for an existing customer. The
    /// provider expects form-encoded bodies and returns JSON either way;
    /// error bodies carry the message under `error.message`.
    pub async fn create_portal_session(
        &self,
        customer_id: &str,
        return_url: &str,
    ) -> Result<PortalSession, BillingError> {
        let response = self
            .http
            .post(self.portal_endpoint())
            .bearer_auth(&self.secret_key)
            .form(&[("customer", customer_id), ("return_url", return_url)])
            .send()
            .await?;

        let status = response.status();
        let body: Value = response.json().await?;

        if !status.is_success() {
            return Err(BillingError::Api {
                status: status.as_u16(),
                message: provider_error_message(&body),
            });
        }

        serde_json::from_value(body).map_err(|err| BillingError::Malformed(err.to_string()))
    }

    fn portal_endpoint(&self) -> String {
        format!("{}/v1/billing_portal/sessions", self.api_base)
    }
}

fn provider_error_message(body: &Value) -> String {
    body.get("error")
        .and_then(|err| err.get("message"))
        .and_then(Value::as_str)
        .unwrap_or("unknown billing provider error")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn client_requires_a_secret_key() {
        let err = BillingClient::new("https://api.stripe.com", "").unwrap_err();
        assert!(matches!(err, BillingError::MissingSecret));
    }

    #[test]
    fn portal_endpoint_tolerates_trailing_slashes() {
        let client = BillingClient::new("https://api.stripe.com/", "sk_test_x").unwrap();
        assert_eq!(
            client.portal_endpoint(),
            "https://api.stripe.com/v1/billing_portal/sessions"
        );
    }

    #[test]
    fn provider_errors_are_read_from_the_error_envelope() {
        let body = json!({ "error": { "message": "No such customer: cus_404" } });
        assert_eq!(provider_error_message(&body), "No such customer: cus_404");
    }

    #[test]
    fn unrecognized_error_bodies_get_a_fallback_message() {
        assert_eq!(
            provider_error_message(&json!({ "nope": 1 })),
            "unknown billing provider error"
        );
        assert_eq!(
            provider_error_message(&json!({ "error": "plain string" })),
            "unknown billing provider error"
        );
    }
}
