use chrono::{DateTime, Utc};

use disputepack_core::dispute::Dispute;
use disputepack_core::evidence::{EvidenceFile, EvidenceKind};

use crate::format::{format_amount, format_datetime, humanize};

/// Fallback narrative when the merchant has not written an explanation.
pub const BOILERPLATE_EXPLANATION: &str = "The merchant asserts that this payment was valid \
and fulfilled as agreed. The following exhibits provide supporting documentation.";

pub const NO_EVIDENCE_NOTE: &str = "No evidence has been uploaded for this dispute.";

pub const NO_IMAGE_EXHIBITS_NOTE: &str = "No image-based exhibits were uploaded. See the \
Evidence Index for details of any attached documentation.";

/// Everything the renderer needs, assembled up front so the document
/// structure can be tested without touching printpdf or the filesystem.
#[derive(Debug, Clone)]
pub struct PacketModel {
    pub dispute_id: String,
    pub summary: Vec<(&'static str, String)>,
    pub explanation: String,
    pub customer_details: Vec<(&'static str, String)>,
    pub index: Vec<IndexRow>,
    pub exhibits: Vec<Exhibit>,
}

/// One row of the evidence index table.
#[derive(Debug, Clone)]
pub struct IndexRow {
    pub label: String,
    pub kind: EvidenceKind,
    pub filename: String,
    pub description: &'static str,
}

/// One image exhibit page. Non-image files appear only in the index.
#[derive(Debug, Clone)]
pub struct Exhibit {
    pub label: String,
    pub kind: EvidenceKind,
    pub filename: String,
    pub store_key: String,
    pub uploaded_at: DateTime<Utc>,
    pub size_bytes: i64,
}

/// Sequential exhibit labels: A..Z for the first 26 files, then the
/// 1-based ordinal as a decimal string.
pub fn exhibit_label(index: usize) -> String {
    const LETTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    match LETTERS.get(index) {
        Some(&letter) => (letter as char).to_string(),
        None => (index + 1).to_string(),
    }
}

/// Canned index description per evidence kind.
pub fn kind_description(kind: EvidenceKind) -> &'static str {
    match kind {
        EvidenceKind::Invoice => "Invoice/receipt showing date, amount, and purchased items.",
        EvidenceKind::Tracking => {
            "Shipping/tracking proof showing delivery to cardholder's address."
        }
        EvidenceKind::Chat => "Customer communication relevant to this dispute.",
        EvidenceKind::Tos => "Terms/refund policy as presented to the customer.",
        EvidenceKind::Screenshot => {
            "Screenshot supporting the merchant's position for this dispute."
        }
        EvidenceKind::Other => "Supporting documentation for this dispute.",
    }
}

/// Assemble the packet structure from dispute data, stored evidence
/// (in upload order) and the optional merchant explanation.
pub fn build_model(
    dispute: &Dispute,
    evidence: &[EvidenceFile],
    explanation: Option<&str>,
) -> PacketModel {
    let mut summary: Vec<(&'static str, String)> = Vec::new();
    summary.push((
        "Charge ID",
        if dispute.charge.is_empty() {
            "N/A".to_string()
        } else {
            dispute.charge.clone()
        },
    ));
    if let Some(pi) = &dispute.payment_intent {
        if !pi.is_empty() {
            summary.push(("Payment Intent", pi.clone()));
        }
    }
    summary.push(("Amount", format_amount(dispute.amount, &dispute.currency)));
    summary.push(("Reason", humanize(&dispute.reason)));
    summary.push(("Status", humanize(dispute.status.as_str())));
    summary.push(("Created", format_datetime(dispute.created)));
    if let Some(due_by) = dispute.due_by() {
        summary.push(("Evidence Due By", format_datetime(due_by)));
    }

    let explanation = match explanation {
        Some(text) if !text.trim().is_empty() => text.trim().to_string(),
        _ => BOILERPLATE_EXPLANATION.to_string(),
    };

    let mut customer_details: Vec<(&'static str, String)> = Vec::new();
    if let Some(ev) = &dispute.evidence {
        let fields: [(&'static str, &Option<String>); 6] = [
            ("Customer Name", &ev.customer_name),
            ("Customer Email", &ev.customer_email_address),
            ("Billing Address", &ev.customer_billing_address),
            ("Shipping Address", &ev.customer_shipping_address),
            ("Product / Service", &ev.product_description),
            ("Customer IP", &ev.customer_purchase_ip),
        ];
        for (label, value) in fields {
            if let Some(value) = value {
                if !value.trim().is_empty() {
                    customer_details.push((label, value.clone()));
                }
            }
        }
    }

    let index = evidence
        .iter()
        .enumerate()
        .map(|(i, file)| IndexRow {
            label: exhibit_label(i),
            kind: file.kind,
            filename: file.filename.clone(),
            description: kind_description(file.kind),
        })
        .collect();

    let exhibits = evidence
        .iter()
        .enumerate()
        .filter(|(_, file)| file.is_image())
        .map(|(i, file)| Exhibit {
            label: exhibit_label(i),
            kind: file.kind,
            filename: file.filename.clone(),
            store_key: file.store_key.clone(),
            uploaded_at: file.created_at,
            size_bytes: file.size_bytes,
        })
        .collect();

    PacketModel {
        dispute_id: dispute.id.clone(),
        summary,
        explanation,
        customer_details,
        index,
        exhibits,
    }
}
