use rusqlite::Connection;

use crate::DbError;

/// Idempotent schema setup, run on every open.
pub fn run(conn: &Connection) -> Result<(), DbError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS evidence_files (
            id          TEXT PRIMARY KEY,
            user_id     TEXT NOT NULL,
            dispute_id  TEXT NOT NULL,
            kind        TEXT NOT NULL
                            CHECK(kind IN (
                                'invoice', 'tracking', 'chat',
                                'tos', 'screenshot', 'other'
                            )),
            filename    TEXT NOT NULL,
            store_key   TEXT NOT NULL,
            size_bytes  INTEGER NOT NULL DEFAULT 0,
            created_at  TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_evidence_user_dispute
            ON evidence_files(user_id, dispute_id, created_at);

        CREATE TABLE IF NOT EXISTS pdf_packets (
            id          TEXT PRIMARY KEY,
            user_id     TEXT NOT NULL,
            dispute_id  TEXT NOT NULL,
            store_key   TEXT NOT NULL,
            filename    TEXT NOT NULL,
            created_at  TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_packets_user_dispute
            ON pdf_packets(user_id, dispute_id, created_at);

        CREATE TABLE IF NOT EXISTS dispute_explanations (
            id          TEXT PRIMARY KEY,
            user_id     TEXT NOT NULL,
            dispute_id  TEXT NOT NULL,
            body        TEXT NOT NULL,
            created_at  TEXT NOT NULL,
            updated_at  TEXT NOT NULL,
            UNIQUE(user_id, dispute_id)
        );
        ",
    )?;

    Ok(())
}
