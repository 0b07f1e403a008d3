use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Free-text merchant narrative for a dispute. At most one row exists per
/// (user, dispute) pair; writes go through upsert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisputeExplanation {
    pub id: String,
    pub user_id: String,
    pub dispute_id: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
