use serde::Serialize;

/// Checklist of evidence a merchant should gather for a dispute reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvidenceTemplate {
    pub required: Vec<&'static str>,
    pub optional: Vec<&'static str>,
}

/// Map a Stripe dispute reason code to its evidence checklist. Unknown
/// reasons fall back to the general template.
pub fn resolve_template(reason: &str) -> EvidenceTemplate {
    let (required, optional): (&[&str], &[&str]) = match reason {
        "fraudulent" => (
            &["Invoice", "Customer communication", "Proof of delivery"],
            &["Shipping tracking", "Customer login history", "Terms of service"],
        ),
        "product_not_received" => (
            &["Shipping tracking", "Proof of delivery", "Invoice"],
            &["Customer communication", "Return policy"],
        ),
        "unrecognized" => (
            &["Invoice", "Customer communication", "Proof of delivery"],
            &["Customer login history", "Terms of service"],
        ),
        "duplicate" => (
            &["Invoice", "Payment receipt", "Customer communication"],
            &["Order confirmation", "Shipping tracking"],
        ),
        "subscription_canceled" => (
            &["Terms of service", "Cancellation policy", "Customer communication"],
            &["Invoice", "Usage logs"],
        ),
        "product_unacceptable" => (
            &["Product description", "Customer communication", "Return policy"],
            &["Invoice", "Proof of delivery"],
        ),
        "credit_not_processed" => (
            &["Refund receipt", "Customer communication"],
            &["Invoice", "Return tracking"],
        ),
        _ => (
            &["Invoice", "Customer communication"],
            &["Terms of service", "Proof of delivery"],
        ),
    };
    EvidenceTemplate {
        required: required.to_vec(),
        optional: optional.to_vec(),
    }
}
