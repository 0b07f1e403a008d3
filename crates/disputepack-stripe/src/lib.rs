mod mock;
mod stripe;

pub use mock::MockGateway;
pub use stripe::StripeGateway;

use async_trait::async_trait;
use thiserror::Error;

use disputepack_core::Dispute;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// The API credential is absent; no network call was attempted.
    #[error("dispute service is not configured")]
    NotConfigured,

    #[error("dispute not found: {0}")]
    NotFound(String),

    #[error("upstream error: {0}")]
    Upstream(String),
}

/// Read-only adapter over the external dispute API.
///
/// One attempt per call, no retries; callers decide their own retry policy.
/// `StripeGateway` talks to the live API, `MockGateway` serves canned
/// disputes in tests.
#[async_trait]
pub trait DisputeGateway: Send + Sync {
    /// List disputes, newest first, bounded by `limit` (default 50).
    async fn list(&self, limit: Option<u32>) -> Result<Vec<Dispute>, GatewayError>;

    /// Retrieve a single dispute by id.
    async fn retrieve(&self, id: &str) -> Result<Dispute, GatewayError>;
}

pub const DEFAULT_LIST_LIMIT: u32 = 50;
