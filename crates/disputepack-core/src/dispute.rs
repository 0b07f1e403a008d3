use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of a dispute as reported by Stripe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisputeStatus {
    NeedsResponse,
    UnderReview,
    WarningNeedsResponse,
    WarningUnderReview,
    WarningClosed,
    ChargeRefunded,
    Lost,
    Won,
}

impl DisputeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisputeStatus::NeedsResponse => "needs_response",
            DisputeStatus::UnderReview => "under_review",
            DisputeStatus::WarningNeedsResponse => "warning_needs_response",
            DisputeStatus::WarningUnderReview => "warning_under_review",
            DisputeStatus::WarningClosed => "warning_closed",
            DisputeStatus::ChargeRefunded => "charge_refunded",
            DisputeStatus::Lost => "lost",
            DisputeStatus::Won => "won",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "needs_response" => Some(DisputeStatus::NeedsResponse),
            "under_review" => Some(DisputeStatus::UnderReview),
            "warning_needs_response" => Some(DisputeStatus::WarningNeedsResponse),
            "warning_under_review" => Some(DisputeStatus::WarningUnderReview),
            "warning_closed" => Some(DisputeStatus::WarningClosed),
            "charge_refunded" => Some(DisputeStatus::ChargeRefunded),
            "lost" => Some(DisputeStatus::Lost),
            "won" => Some(DisputeStatus::Won),
            _ => None,
        }
    }
}

impl fmt::Display for DisputeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dispute as returned by the Stripe API. Never persisted locally;
/// always fetched fresh through the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dispute {
    pub id: String,
    #[serde(default)]
    pub charge: String,
    #[serde(default)]
    pub payment_intent: Option<String>,
    #[serde(default)]
    pub reason: String,
    pub amount: i64,
    pub currency: String,
    pub status: DisputeStatus,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created: DateTime<Utc>,
    #[serde(default)]
    pub evidence_details: Option<EvidenceDetails>,
    #[serde(default)]
    pub evidence: Option<DisputeEvidence>,
}

impl Dispute {
    pub fn due_by(&self) -> Option<DateTime<Utc>> {
        self.evidence_details.as_ref().and_then(|d| d.due_by)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvidenceDetails {
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub due_by: Option<DateTime<Utc>>,
}

/// The nested evidence payload Stripe attaches to a dispute. Only the
/// transaction/customer fields the packet renders are modelled; everything
/// else upstream is ignored during deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisputeEvidence {
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_email_address: Option<String>,
    #[serde(default)]
    pub customer_billing_address: Option<String>,
    #[serde(default)]
    pub customer_shipping_address: Option<String>,
    #[serde(default)]
    pub product_description: Option<String>,
    #[serde(default)]
    pub customer_purchase_ip: Option<String>,
}
