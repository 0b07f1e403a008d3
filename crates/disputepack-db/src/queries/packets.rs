use chrono::Utc;
use rusqlite::{params, Row};

use disputepack_core::packet::{CreatePdfPacket, PdfPacket};

use crate::{Db, DbError};

fn row_to_packet(row: &Row) -> rusqlite::Result<PdfPacket> {
    Ok(PdfPacket {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        dispute_id: row.get("dispute_id")?,
        store_key: row.get("store_key")?,
        filename: row.get("filename")?,
        created_at: row.get("created_at")?,
    })
}

impl Db {
    pub fn create_packet(&self, input: &CreatePdfPacket) -> Result<PdfPacket, DbError> {
        self.with_conn(|conn| {
            let id = uuid::Uuid::new_v4().to_string();
            let now = Utc::now();
            conn.execute(
                "INSERT INTO pdf_packets
                     (id, user_id, dispute_id, store_key, filename, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    id,
                    input.user_id,
                    input.dispute_id,
                    input.store_key,
                    input.filename,
                    now
                ],
            )?;
            conn.query_row(
                "SELECT * FROM pdf_packets WHERE id = ?1",
                params![id],
                row_to_packet,
            )
            .map_err(DbError::from)
        })
    }

    /// Most recently generated packet for a (user, dispute) pair, if any.
    pub fn latest_packet(
        &self,
        user_id: &str,
        dispute_id: &str,
    ) -> Result<Option<PdfPacket>, DbError> {
        self.with_conn(|conn| {
            match conn.query_row(
                "SELECT * FROM pdf_packets
                 WHERE user_id = ?1 AND dispute_id = ?2
                 ORDER BY created_at DESC, rowid DESC
                 LIMIT 1",
                params![user_id, dispute_id],
                row_to_packet,
            ) {
                Ok(packet) => Ok(Some(packet)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    pub fn get_packet(&self, user_id: &str, id: &str) -> Result<Option<PdfPacket>, DbError> {
        self.with_conn(|conn| {
            match conn.query_row(
                "SELECT * FROM pdf_packets WHERE id = ?1 AND user_id = ?2",
                params![id, user_id],
                row_to_packet,
            ) {
                Ok(packet) => Ok(Some(packet)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }
}
