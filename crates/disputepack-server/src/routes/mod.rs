pub mod disputes;
pub mod evidence;
pub mod health;
pub mod packets;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit, middleware, routing::get, Extension, Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;

use disputepack_db::Db;
use disputepack_packet::PacketGenerator;
use disputepack_store::ObjectStore;
use disputepack_stripe::DisputeGateway;

use crate::auth::{identity_middleware, Identity, IdentityResolver};

/// Per-file upload ceiling. Kept at 2 MiB so a full packet stays under
/// Stripe's submission size limits.
pub const MAX_UPLOAD_BYTES: usize = 2 * 1024 * 1024;

// Whole-request ceiling sits above the per-file one so the explicit size
// check decides, not the transport.
const MAX_BODY_BYTES: usize = 3 * 1024 * 1024;

pub struct InnerAppState {
    pub db: Db,
    pub store: Arc<dyn ObjectStore>,
    pub gateway: Arc<dyn DisputeGateway>,
    pub generator: PacketGenerator,
    pub identity: Arc<dyn IdentityResolver>,
}

pub type AppState = Arc<InnerAppState>;

pub fn app_state(
    db: Db,
    store: Arc<dyn ObjectStore>,
    gateway: Arc<dyn DisputeGateway>,
    identity: Arc<dyn IdentityResolver>,
) -> AppState {
    let generator = PacketGenerator::new(db.clone(), store.clone(), gateway.clone());
    Arc::new(InnerAppState {
        db,
        store,
        gateway,
        generator,
        identity,
    })
}

pub fn build_router(state: AppState) -> Router {
    let public = Router::new().merge(health::routes());

    let protected = Router::new()
        .merge(disputes::routes())
        .merge(evidence::routes())
        .merge(packets::routes())
        .route("/api/auth/user", get(auth_user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            identity_middleware,
        ))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES));

    public
        .merge(protected)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Stub profile for the resolved caller. Replaced together with the
/// identity resolver once real authentication lands.
async fn auth_user(Extension(identity): Extension<Identity>) -> Json<Value> {
    Json(json!({
        "id": identity.user_id,
        "email": "demo@example.com",
        "name": "Demo User",
    }))
}
