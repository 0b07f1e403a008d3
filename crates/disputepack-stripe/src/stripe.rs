use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use tracing::warn;

use disputepack_core::Dispute;

use crate::{DisputeGateway, GatewayError, DEFAULT_LIST_LIMIT};

const DEFAULT_BASE_URL: &str = "https://api.stripe.com";

/// Gateway backed by the live Stripe API.
///
/// Authenticates with the secret key as basic-auth username, Stripe's
/// documented scheme. Built without a key it stays inert: every call
/// returns `NotConfigured` before touching the network.
pub struct StripeGateway {
    secret_key: Option<String>,
    base_url: String,
    client: Client,
}

impl StripeGateway {
    pub fn new(secret_key: Option<String>) -> Self {
        Self::with_base_url(secret_key, DEFAULT_BASE_URL)
    }

    /// Point the gateway at a different base URL (a recorded server in
    /// tests, or Stripe's test-mode proxy).
    pub fn with_base_url(secret_key: Option<String>, base_url: &str) -> Self {
        Self {
            secret_key: secret_key.filter(|k| !k.is_empty()),
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.secret_key.is_some()
    }

    fn key(&self) -> Result<&str, GatewayError> {
        self.secret_key.as_deref().ok_or(GatewayError::NotConfigured)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        let key = self.key()?;
        let resp = self
            .client
            .get(format!("{}{path}", self.base_url))
            .basic_auth(key, None::<&str>)
            .send()
            .await
            .map_err(|e| GatewayError::Upstream(format!("request failed: {e}")))?;

        let status = resp.status();
        if status.is_success() {
            resp.json::<T>()
                .await
                .map_err(|e| GatewayError::Upstream(format!("decode response: {e}")))
        } else {
            Err(upstream_error(status, resp).await)
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListEnvelope {
    data: Vec<Dispute>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Debug, Default, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Map a non-2xx Stripe response to a gateway error. `resource_missing`
/// marks a missing dispute; everything else carries the upstream message.
async fn upstream_error(status: StatusCode, resp: Response) -> GatewayError {
    let body = resp.text().await.unwrap_or_default();
    let api_error = serde_json::from_str::<ErrorEnvelope>(&body)
        .map(|e| e.error)
        .unwrap_or_default();

    if api_error.code.as_deref() == Some("resource_missing") {
        return GatewayError::NotFound(
            api_error.message.unwrap_or_else(|| "resource missing".into()),
        );
    }

    let message = api_error
        .message
        .unwrap_or_else(|| format!("unexpected status {status}"));
    warn!("stripe api error ({status}): {message}");
    GatewayError::Upstream(message)
}

#[async_trait]
impl DisputeGateway for StripeGateway {
    async fn list(&self, limit: Option<u32>) -> Result<Vec<Dispute>, GatewayError> {
        let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT);
        let envelope: ListEnvelope = self.get_json(&format!("/v1/disputes?limit={limit}")).await?;
        Ok(envelope.data)
    }

    async fn retrieve(&self, id: &str) -> Result<Dispute, GatewayError> {
        self.get_json(&format!("/v1/disputes/{id}")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unconfigured_gateway_short_circuits() {
        // Base URL that would fail instantly if contacted; NotConfigured
        // must win without any connection attempt.
        let gateway = StripeGateway::with_base_url(None, "http://127.0.0.1:1");
        assert!(matches!(
            gateway.list(None).await,
            Err(GatewayError::NotConfigured)
        ));
        assert!(matches!(
            gateway.retrieve("dp_1").await,
            Err(GatewayError::NotConfigured)
        ));
    }

    #[test]
    fn empty_key_counts_as_unconfigured() {
        let gateway = StripeGateway::new(Some(String::new()));
        assert!(!gateway.is_configured());
        let gateway = StripeGateway::new(Some("sk_test_123".into()));
        assert!(gateway.is_configured());
    }

    #[test]
    fn list_envelope_decodes_stripe_payload() {
        let json = r#"{
            "object": "list",
            "url": "/v1/disputes",
            "has_more": false,
            "data": [{
                "id": "dp_1",
                "charge": "ch_1",
                "reason": "fraudulent",
                "amount": 1000,
                "currency": "usd",
                "status": "needs_response",
                "created": 1700000000
            }]
        }"#;
        let envelope: ListEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.data.len(), 1);
        assert_eq!(envelope.data[0].id, "dp_1");
    }

    #[test]
    fn error_envelope_decodes_resource_missing() {
        let json = r#"{
            "error": {
                "code": "resource_missing",
                "message": "No such dispute: 'dp_missing'",
                "type": "invalid_request_error"
            }
        }"#;
        let envelope: ErrorEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.error.code.as_deref(), Some("resource_missing"));
        assert_eq!(
            envelope.error.message.as_deref(),
            Some("No such dispute: 'dp_missing'")
        );
    }
}
