use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category of an uploaded evidence file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceKind {
    Invoice,
    Tracking,
    Chat,
    Tos,
    Screenshot,
    Other,
}

impl EvidenceKind {
    pub const ALL: &[EvidenceKind] = &[
        EvidenceKind::Invoice,
        EvidenceKind::Tracking,
        EvidenceKind::Chat,
        EvidenceKind::Tos,
        EvidenceKind::Screenshot,
        EvidenceKind::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EvidenceKind::Invoice => "invoice",
            EvidenceKind::Tracking => "tracking",
            EvidenceKind::Chat => "chat",
            EvidenceKind::Tos => "tos",
            EvidenceKind::Screenshot => "screenshot",
            EvidenceKind::Other => "other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "invoice" => Some(EvidenceKind::Invoice),
            "tracking" => Some(EvidenceKind::Tracking),
            "chat" => Some(EvidenceKind::Chat),
            "tos" => Some(EvidenceKind::Tos),
            "screenshot" => Some(EvidenceKind::Screenshot),
            "other" => Some(EvidenceKind::Other),
            _ => None,
        }
    }
}

impl fmt::Display for EvidenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata for one uploaded evidence file. The blob itself lives in the
/// object store under `store_key`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvidenceFile {
    pub id: String,
    pub user_id: String,
    pub dispute_id: String,
    pub kind: EvidenceKind,
    pub filename: String,
    pub store_key: String,
    pub size_bytes: i64,
    pub created_at: DateTime<Utc>,
}

impl EvidenceFile {
    /// Whether this file can be embedded as an inline image exhibit,
    /// judged by filename extension.
    pub fn is_image(&self) -> bool {
        let lower = self.filename.to_ascii_lowercase();
        lower.ends_with(".png") || lower.ends_with(".jpg") || lower.ends_with(".jpeg")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEvidenceFile {
    pub user_id: String,
    pub dispute_id: String,
    pub kind: EvidenceKind,
    pub filename: String,
    pub store_key: String,
    pub size_bytes: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_str() {
        for kind in EvidenceKind::ALL {
            assert_eq!(EvidenceKind::from_str(kind.as_str()), Some(*kind));
        }
        assert_eq!(EvidenceKind::from_str("receipt"), None);
    }

    #[test]
    fn image_detection_is_extension_based() {
        let mut file = EvidenceFile {
            id: "e1".into(),
            user_id: "u1".into(),
            dispute_id: "dp_1".into(),
            kind: EvidenceKind::Screenshot,
            filename: "proof.PNG".into(),
            store_key: "k".into(),
            size_bytes: 1,
            created_at: Utc::now(),
        };
        assert!(file.is_image());
        file.filename = "delivery.jpeg".into();
        assert!(file.is_image());
        file.filename = "invoice.pdf".into();
        assert!(!file.is_image());
    }
}
