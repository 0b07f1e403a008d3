use axum::{
    extract::{Multipart, Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use bytes::Bytes;
use serde_json::{json, Value};
use tracing::warn;

use disputepack_core::evidence::{CreateEvidenceFile, EvidenceKind};
use disputepack_store::{evidence_key, sanitize_filename};

use crate::auth::Identity;
use crate::error::ApiError;

use super::{AppState, MAX_UPLOAD_BYTES};

pub fn routes() -> Router<AppState> {
    // GET takes a dispute id, DELETE an evidence id; they share the one
    // single-segment route below.
    Router::new()
        .route(
            "/api/evidence/{id}",
            get(list_evidence).delete(delete_evidence),
        )
        .route("/api/evidence/{id}/upload", post(upload_evidence))
}

async fn list_evidence(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(dispute_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let evidence = state.db.list_evidence(&identity.user_id, &dispute_id)?;
    Ok(Json(json!({ "evidence": evidence })))
}

struct UploadedFile {
    filename: String,
    content_type: String,
    data: Bytes,
}

/// Multipart upload with fields `file` and `kind`. Everything is
/// validated before any byte reaches the store, so a rejected upload
/// leaves neither a blob nor a row behind.
async fn upload_evidence(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(dispute_id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let mut file: Option<UploadedFile> = None;
    let mut kind: Option<EvidenceKind> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("invalid multipart body: {e}")))?
    {
        match field.name() {
            Some("file") => {
                let filename = sanitize_filename(field.file_name().unwrap_or("upload"));
                let content_type = field.content_type().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::Validation(format!("failed to read upload: {e}")))?;
                file = Some(UploadedFile {
                    filename,
                    content_type,
                    data,
                });
            }
            Some("kind") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::Validation(format!("failed to read kind: {e}")))?;
                kind = Some(EvidenceKind::from_str(text.trim()).ok_or_else(|| {
                    ApiError::Validation(format!("unknown evidence kind: {}", text.trim()))
                })?);
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| ApiError::Validation("no file uploaded".into()))?;
    let kind = kind.ok_or_else(|| ApiError::Validation("evidence kind is required".into()))?;

    if !matches!(
        file.content_type.as_str(),
        "image/png" | "image/jpeg" | "image/jpg"
    ) {
        return Err(ApiError::Validation(
            "Only PNG and JPEG images are allowed. Please convert other documents to \
             screenshots before uploading."
                .into(),
        ));
    }
    if file.data.is_empty() {
        return Err(ApiError::Validation("uploaded file is empty".into()));
    }
    if file.data.len() > MAX_UPLOAD_BYTES {
        return Err(ApiError::Validation(
            "file exceeds the 2 MB upload limit".into(),
        ));
    }

    let upload_id = uuid::Uuid::new_v4().to_string();
    let key = evidence_key(&identity.user_id, &dispute_id, &upload_id, &file.filename);
    let size_bytes = file.data.len() as i64;
    state.store.put(&key, file.data).await?;

    let created = state.db.create_evidence(&CreateEvidenceFile {
        user_id: identity.user_id.clone(),
        dispute_id,
        kind,
        filename: file.filename,
        store_key: key.clone(),
        size_bytes,
    });

    match created {
        Ok(evidence) => Ok(Json(json!({ "evidence": evidence }))),
        Err(e) => {
            // The blob was already written; take it back out so a failed
            // upload leaves nothing behind.
            if let Err(del) = state.store.delete(&key).await {
                warn!("failed to clean up blob {key} after insert error: {del}");
            }
            Err(e.into())
        }
    }
}

async fn delete_evidence(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    // Row first, then best-effort blob removal; a stale blob is logged,
    // never surfaced to the caller.
    if let Some(file) = state.db.delete_evidence(&identity.user_id, &id)? {
        if let Err(e) = state.store.delete(&file.store_key).await {
            warn!("failed to remove evidence blob {}: {e}", file.store_key);
        }
    }
    Ok(Json(json!({ "ok": true })))
}
