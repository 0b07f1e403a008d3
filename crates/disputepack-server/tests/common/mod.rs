use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use chrono::{TimeZone, Utc};

use disputepack_core::dispute::{Dispute, DisputeEvidence, DisputeStatus, EvidenceDetails};
use disputepack_db::Db;
use disputepack_server::auth::StubIdentity;
use disputepack_server::{app_state, build_router};
use disputepack_store::{LocalStore, ObjectStore};
use disputepack_stripe::{DisputeGateway, MockGateway, StripeGateway};

/// In-memory database, temp-dir object store, mock gateway, stub identity.
pub struct TestApp {
    pub router: Router,
    pub db: Db,
    pub store_dir: PathBuf,
}

pub fn test_app(disputes: Vec<Dispute>) -> TestApp {
    let db = Db::open_in_memory().unwrap();
    let store_dir = tempfile::tempdir().unwrap().keep();
    let router = router_for_user(&db, &store_dir, "demo-user", mock_gateway(disputes));
    TestApp {
        router,
        db,
        store_dir,
    }
}

/// App whose gateway has no credential: dispute and packet endpoints
/// must degrade to 503.
pub fn test_app_unconfigured() -> TestApp {
    let db = Db::open_in_memory().unwrap();
    let store_dir = tempfile::tempdir().unwrap().keep();
    let gateway: Arc<dyn DisputeGateway> = Arc::new(StripeGateway::new(None));
    let router = router_for_user(&db, &store_dir, "demo-user", gateway);
    TestApp {
        router,
        db,
        store_dir,
    }
}

pub fn mock_gateway(disputes: Vec<Dispute>) -> Arc<dyn DisputeGateway> {
    Arc::new(MockGateway::with_disputes(disputes))
}

/// A second router over the same database and store but resolving to a
/// different caller, for cross-user isolation tests.
pub fn router_for_user(
    db: &Db,
    store_dir: &std::path::Path,
    user_id: &str,
    gateway: Arc<dyn DisputeGateway>,
) -> Router {
    let store: Arc<dyn ObjectStore> = Arc::new(LocalStore::new(store_dir));
    let state = app_state(
        db.clone(),
        store,
        gateway,
        Arc::new(StubIdentity::new(user_id)),
    );
    build_router(state)
}

pub fn dispute(id: &str, reason: &str) -> Dispute {
    Dispute {
        id: id.into(),
        charge: format!("ch_{id}"),
        payment_intent: Some(format!("pi_{id}")),
        reason: reason.into(),
        amount: 2550,
        currency: "usd".into(),
        status: DisputeStatus::NeedsResponse,
        created: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        evidence_details: Some(EvidenceDetails {
            due_by: Some(Utc.timestamp_opt(1_700_600_000, 0).unwrap()),
        }),
        evidence: Some(DisputeEvidence {
            customer_name: Some("Jane Doe".into()),
            customer_email_address: Some("jane@example.com".into()),
            ..Default::default()
        }),
    }
}

pub fn png_bytes() -> Vec<u8> {
    use printpdf::image_crate::{DynamicImage, ImageFormat};
    let image = DynamicImage::new_rgb8(8, 8);
    let mut cursor = std::io::Cursor::new(Vec::new());
    image.write_to(&mut cursor, ImageFormat::Png).unwrap();
    cursor.into_inner()
}

pub const BOUNDARY: &str = "X-DISPUTEPACK-TEST-BOUNDARY";

/// Hand-rolled multipart body with `kind` and `file` fields.
pub fn multipart_body(kind: &str, filename: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    use std::io::Write;
    let mut body = Vec::new();
    write!(
        body,
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"kind\"\r\n\r\n{kind}\r\n"
    )
    .unwrap();
    write!(
        body,
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; \
         filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
    )
    .unwrap();
    body.extend_from_slice(data);
    write!(body, "\r\n--{BOUNDARY}--\r\n").unwrap();
    body
}
