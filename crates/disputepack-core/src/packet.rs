use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata for one generated PDF evidence packet. Immutable once created;
/// several may exist per dispute and "latest" is the newest by `created_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfPacket {
    pub id: String,
    pub user_id: String,
    pub dispute_id: String,
    pub store_key: String,
    pub filename: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePdfPacket {
    pub user_id: String,
    pub dispute_id: String,
    pub store_key: String,
    pub filename: String,
}
