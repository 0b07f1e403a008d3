use chrono::Utc;
use rusqlite::{params, Row};

use disputepack_core::explanation::DisputeExplanation;

use crate::{Db, DbError};

fn row_to_explanation(row: &Row) -> rusqlite::Result<DisputeExplanation> {
    Ok(DisputeExplanation {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        dispute_id: row.get("dispute_id")?,
        body: row.get("body")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

impl Db {
    pub fn get_explanation(
        &self,
        user_id: &str,
        dispute_id: &str,
    ) -> Result<Option<DisputeExplanation>, DbError> {
        self.with_conn(|conn| {
            match conn.query_row(
                "SELECT * FROM dispute_explanations
                 WHERE user_id = ?1 AND dispute_id = ?2",
                params![user_id, dispute_id],
                row_to_explanation,
            ) {
                Ok(explanation) => Ok(Some(explanation)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    /// Insert or update the explanation for a (user, dispute) pair.
    ///
    /// Concurrent upserts serialize on the UNIQUE(user_id, dispute_id)
    /// constraint's conflict path; there is no select-then-write race.
    pub fn upsert_explanation(
        &self,
        user_id: &str,
        dispute_id: &str,
        body: &str,
    ) -> Result<DisputeExplanation, DbError> {
        self.with_conn(|conn| {
            let id = uuid::Uuid::new_v4().to_string();
            let now = Utc::now();
            conn.execute(
                "INSERT INTO dispute_explanations
                     (id, user_id, dispute_id, body, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)
                 ON CONFLICT(user_id, dispute_id) DO UPDATE SET
                     body = excluded.body,
                     updated_at = excluded.updated_at",
                params![id, user_id, dispute_id, body, now],
            )?;
            conn.query_row(
                "SELECT * FROM dispute_explanations
                 WHERE user_id = ?1 AND dispute_id = ?2",
                params![user_id, dispute_id],
                row_to_explanation,
            )
            .map_err(DbError::from)
        })
    }
}
