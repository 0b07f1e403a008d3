use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use tracing::{info, warn};

use disputepack_core::packet::{CreatePdfPacket, PdfPacket};
use disputepack_db::Db;
use disputepack_store::{packet_key, ObjectStore, StoreError};
use disputepack_stripe::DisputeGateway;

use crate::model::build_model;
use crate::render::render_packet;
use crate::PacketError;

/// Builds one PDF evidence packet for a (user, dispute) pair and records
/// it. Fails fast if the dispute cannot be fetched; per-image problems
/// degrade to in-document warnings instead of aborting.
pub struct PacketGenerator {
    db: Db,
    store: Arc<dyn ObjectStore>,
    gateway: Arc<dyn DisputeGateway>,
}

impl PacketGenerator {
    pub fn new(db: Db, store: Arc<dyn ObjectStore>, gateway: Arc<dyn DisputeGateway>) -> Self {
        Self { db, store, gateway }
    }

    pub async fn generate(&self, user_id: &str, dispute_id: &str) -> Result<PdfPacket, PacketError> {
        let dispute = self.gateway.retrieve(dispute_id).await?;
        let evidence = self.db.list_evidence(user_id, dispute_id)?;
        let explanation = self.db.get_explanation(user_id, dispute_id)?;

        let model = build_model(
            &dispute,
            &evidence,
            explanation.as_ref().map(|e| e.body.as_str()),
        );

        // Pull each image exhibit's blob; a missing or unreadable blob
        // renders as a warning page rather than failing generation.
        let mut images: Vec<Option<Bytes>> = Vec::with_capacity(model.exhibits.len());
        for exhibit in &model.exhibits {
            match self.store.get(&exhibit.store_key).await {
                Ok(data) => images.push(Some(data)),
                Err(StoreError::NotFound(key)) => {
                    warn!("exhibit blob missing: {key}");
                    images.push(None);
                }
                Err(e) => {
                    warn!("exhibit blob unreadable ({}): {e}", exhibit.store_key);
                    images.push(None);
                }
            }
        }

        let pdf = render_packet(&model, &images)?;

        // Millisecond timestamp keeps repeated generations for the same
        // dispute under distinct keys.
        let filename = format!("dispute_{dispute_id}_{}.pdf", Utc::now().timestamp_millis());
        let key = packet_key(user_id, &filename);
        self.store.put(&key, Bytes::from(pdf)).await?;

        let packet = self.db.create_packet(&CreatePdfPacket {
            user_id: user_id.to_string(),
            dispute_id: dispute_id.to_string(),
            store_key: key,
            filename,
        })?;

        info!(
            "generated packet {} for dispute {dispute_id} ({} evidence files)",
            packet.id,
            evidence.len()
        );
        Ok(packet)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use disputepack_core::dispute::{Dispute, DisputeStatus};
    use disputepack_core::evidence::{CreateEvidenceFile, EvidenceKind};
    use disputepack_store::LocalStore;
    use disputepack_stripe::{GatewayError, MockGateway};

    use super::*;

    fn dispute(id: &str) -> Dispute {
        Dispute {
            id: id.into(),
            charge: "ch_1".into(),
            payment_intent: None,
            reason: "product_not_received".into(),
            amount: 2550,
            currency: "usd".into(),
            status: DisputeStatus::NeedsResponse,
            created: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            evidence_details: None,
            evidence: None,
        }
    }

    fn png_bytes() -> Bytes {
        use printpdf::image_crate::{DynamicImage, ImageFormat};
        let image = DynamicImage::new_rgb8(8, 8);
        let mut cursor = std::io::Cursor::new(Vec::new());
        image.write_to(&mut cursor, ImageFormat::Png).unwrap();
        Bytes::from(cursor.into_inner())
    }

    fn setup(store_dir: &std::path::Path, disputes: Vec<Dispute>) -> (PacketGenerator, Db) {
        let db = Db::open_in_memory().unwrap();
        let store: Arc<dyn ObjectStore> = Arc::new(LocalStore::new(store_dir));
        let gateway = Arc::new(MockGateway::with_disputes(disputes));
        (PacketGenerator::new(db.clone(), store, gateway), db)
    }

    #[tokio::test]
    async fn generates_packet_and_records_row() {
        let tmp = tempfile::tempdir().unwrap();
        let (generator, db) = setup(tmp.path(), vec![dispute("dp_1")]);

        // One uploaded image whose blob actually exists in the store.
        let key = "uploads/demo-user/dp_1/x/tracking.png";
        let store = LocalStore::new(tmp.path());
        store.put(key, png_bytes()).await.unwrap();
        db.create_evidence(&CreateEvidenceFile {
            user_id: "demo-user".into(),
            dispute_id: "dp_1".into(),
            kind: EvidenceKind::Tracking,
            filename: "tracking.png".into(),
            store_key: key.into(),
            size_bytes: png_bytes().len() as i64,
        })
        .unwrap();

        let packet = generator.generate("demo-user", "dp_1").await.unwrap();
        assert_eq!(packet.dispute_id, "dp_1");
        assert!(packet.filename.starts_with("dispute_dp_1_"));
        assert!(packet.filename.ends_with(".pdf"));

        let stored = store.get(&packet.store_key).await.unwrap();
        assert!(stored.starts_with(b"%PDF"));

        let latest = db.latest_packet("demo-user", "dp_1").unwrap().unwrap();
        assert_eq!(latest.id, packet.id);
    }

    #[tokio::test]
    async fn missing_blob_still_produces_a_packet() {
        let tmp = tempfile::tempdir().unwrap();
        let (generator, db) = setup(tmp.path(), vec![dispute("dp_1")]);

        db.create_evidence(&CreateEvidenceFile {
            user_id: "demo-user".into(),
            dispute_id: "dp_1".into(),
            kind: EvidenceKind::Screenshot,
            filename: "gone.png".into(),
            store_key: "uploads/demo-user/dp_1/x/gone.png".into(),
            size_bytes: 10,
        })
        .unwrap();

        let packet = generator.generate("demo-user", "dp_1").await.unwrap();
        assert!(db.get_packet("demo-user", &packet.id).unwrap().is_some());
    }

    #[tokio::test]
    async fn unknown_dispute_creates_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let (generator, db) = setup(tmp.path(), vec![]);

        let err = generator.generate("demo-user", "dp_404").await.unwrap_err();
        assert!(matches!(
            err,
            PacketError::Gateway(GatewayError::NotFound(_))
        ));
        assert!(db.latest_packet("demo-user", "dp_404").unwrap().is_none());
    }

    #[tokio::test]
    async fn repeated_generation_keeps_history_with_distinct_keys() {
        let tmp = tempfile::tempdir().unwrap();
        let (generator, db) = setup(tmp.path(), vec![dispute("dp_1")]);

        let first = generator.generate("demo-user", "dp_1").await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = generator.generate("demo-user", "dp_1").await.unwrap();

        assert_ne!(first.store_key, second.store_key);
        let latest = db.latest_packet("demo-user", "dp_1").unwrap().unwrap();
        assert_eq!(latest.id, second.id);
    }
}
