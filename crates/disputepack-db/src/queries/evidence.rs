use chrono::Utc;
use rusqlite::{params, Row};

use disputepack_core::evidence::{CreateEvidenceFile, EvidenceFile, EvidenceKind};

use crate::{Db, DbError};

fn row_to_evidence(row: &Row) -> rusqlite::Result<EvidenceFile> {
    let kind: String = row.get("kind")?;
    Ok(EvidenceFile {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        dispute_id: row.get("dispute_id")?,
        kind: EvidenceKind::from_str(&kind).unwrap_or(EvidenceKind::Other),
        filename: row.get("filename")?,
        store_key: row.get("store_key")?,
        size_bytes: row.get("size_bytes")?,
        created_at: row.get("created_at")?,
    })
}

impl Db {
    /// Evidence files for one (user, dispute) pair, oldest first.
    pub fn list_evidence(
        &self,
        user_id: &str,
        dispute_id: &str,
    ) -> Result<Vec<EvidenceFile>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT * FROM evidence_files
                 WHERE user_id = ?1 AND dispute_id = ?2
                 ORDER BY created_at ASC, rowid ASC",
            )?;
            let files = stmt
                .query_map(params![user_id, dispute_id], row_to_evidence)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(files)
        })
    }

    pub fn create_evidence(&self, input: &CreateEvidenceFile) -> Result<EvidenceFile, DbError> {
        self.with_conn(|conn| {
            let id = uuid::Uuid::new_v4().to_string();
            let now = Utc::now();
            conn.execute(
                "INSERT INTO evidence_files
                     (id, user_id, dispute_id, kind, filename, store_key, size_bytes, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    id,
                    input.user_id,
                    input.dispute_id,
                    input.kind.as_str(),
                    input.filename,
                    input.store_key,
                    input.size_bytes,
                    now
                ],
            )?;
            conn.query_row(
                "SELECT * FROM evidence_files WHERE id = ?1",
                params![id],
                row_to_evidence,
            )
            .map_err(DbError::from)
        })
    }

    pub fn get_evidence(&self, user_id: &str, id: &str) -> Result<Option<EvidenceFile>, DbError> {
        self.with_conn(|conn| {
            match conn.query_row(
                "SELECT * FROM evidence_files WHERE id = ?1 AND user_id = ?2",
                params![id, user_id],
                row_to_evidence,
            ) {
                Ok(file) => Ok(Some(file)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    /// Delete one evidence row, returning it so the caller can clean up the
    /// stored blob. No-op (returns `None`) when the row does not exist or
    /// belongs to a different user.
    pub fn delete_evidence(
        &self,
        user_id: &str,
        id: &str,
    ) -> Result<Option<EvidenceFile>, DbError> {
        self.with_conn(|conn| {
            let existing = match conn.query_row(
                "SELECT * FROM evidence_files WHERE id = ?1 AND user_id = ?2",
                params![id, user_id],
                row_to_evidence,
            ) {
                Ok(file) => file,
                Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
                Err(e) => return Err(e.into()),
            };
            conn.execute(
                "DELETE FROM evidence_files WHERE id = ?1 AND user_id = ?2",
                params![id, user_id],
            )?;
            Ok(Some(existing))
        })
    }
}
