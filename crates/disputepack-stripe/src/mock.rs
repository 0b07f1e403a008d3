use async_trait::async_trait;

use disputepack_core::Dispute;

use crate::{DisputeGateway, GatewayError, DEFAULT_LIST_LIMIT};

/// In-memory gateway for tests: serves a fixed set of disputes in the
/// order given (callers supply them newest first, as Stripe would).
#[derive(Default)]
pub struct MockGateway {
    disputes: Vec<Dispute>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_disputes(disputes: Vec<Dispute>) -> Self {
        Self { disputes }
    }
}

#[async_trait]
impl DisputeGateway for MockGateway {
    async fn list(&self, limit: Option<u32>) -> Result<Vec<Dispute>, GatewayError> {
        let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT) as usize;
        Ok(self.disputes.iter().take(limit).cloned().collect())
    }

    async fn retrieve(&self, id: &str) -> Result<Dispute, GatewayError> {
        self.disputes
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(format!("No such dispute: '{id}'")))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use disputepack_core::dispute::DisputeStatus;

    use super::*;

    fn dispute(id: &str) -> Dispute {
        Dispute {
            id: id.into(),
            charge: format!("ch_{id}"),
            payment_intent: None,
            reason: "general".into(),
            amount: 1000,
            currency: "usd".into(),
            status: DisputeStatus::NeedsResponse,
            created: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            evidence_details: None,
            evidence: None,
        }
    }

    #[tokio::test]
    async fn list_respects_limit() {
        let gateway =
            MockGateway::with_disputes(vec![dispute("dp_1"), dispute("dp_2"), dispute("dp_3")]);
        assert_eq!(gateway.list(Some(2)).await.unwrap().len(), 2);
        assert_eq!(gateway.list(None).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn retrieve_unknown_id_is_not_found() {
        let gateway = MockGateway::with_disputes(vec![dispute("dp_1")]);
        assert_eq!(gateway.retrieve("dp_1").await.unwrap().id, "dp_1");
        assert!(matches!(
            gateway.retrieve("dp_404").await,
            Err(GatewayError::NotFound(_))
        ));
    }
}
