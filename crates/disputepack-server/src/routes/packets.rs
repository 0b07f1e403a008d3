use axum::{
    body::Body,
    extract::{Path, State},
    http::header,
    response::Response,
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::{json, Value};

use crate::auth::Identity;
use crate::error::ApiError;

use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/packets/{dispute_id}", post(generate_packet))
        .route("/api/packets/latest/{dispute_id}", get(latest_packet))
        .route("/api/packets/download/{packet_id}", get(download_packet))
}

async fn generate_packet(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(dispute_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let packet = state
        .generator
        .generate(&identity.user_id, &dispute_id)
        .await?;
    Ok(Json(json!({
        "ok": true,
        "packet_id": packet.id,
        "download_url": format!("/api/packets/download/{}", packet.id),
    })))
}

async fn latest_packet(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(dispute_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    match state.db.latest_packet(&identity.user_id, &dispute_id)? {
        Some(packet) => Ok(Json(json!({
            "packet": {
                "id": packet.id,
                "dispute_id": packet.dispute_id,
                "filename": packet.filename,
                "created_at": packet.created_at,
            }
        }))),
        None => Ok(Json(json!({ "packet": null }))),
    }
}

/// Binary download, always looked up by (owner, id): a packet belonging
/// to someone else is indistinguishable from a missing one.
async fn download_packet(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(packet_id): Path<String>,
) -> Result<Response, ApiError> {
    let packet = state
        .db
        .get_packet(&identity.user_id, &packet_id)?
        .ok_or_else(|| ApiError::NotFound("packet not found".into()))?;

    let data = state
        .store
        .get(&packet.store_key)
        .await
        .map_err(|e| match e {
            disputepack_store::StoreError::NotFound(_) => {
                ApiError::NotFound("packet file missing on server".into())
            }
            other => other.into(),
        })?;

    Ok(Response::builder()
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", packet.filename),
        )
        .body(Body::from(data))
        .unwrap())
}
