use axum::{
    extract::{Path, Query, State},
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use disputepack_core::dispute::{Dispute, DisputeStatus};
use disputepack_core::template::resolve_template;

use crate::auth::Identity;
use crate::error::ApiError;

use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/disputes", get(list_disputes))
        .route("/api/disputes/{id}", get(get_dispute))
        .route("/api/disputes/{id}/template", get(get_template))
        .route(
            "/api/disputes/{id}/explanation",
            get(get_explanation).put(put_explanation),
        )
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    limit: Option<u32>,
}

/// Trimmed dispute for the list view.
#[derive(Debug, Serialize)]
struct DisputeSummary {
    id: String,
    charge: String,
    reason: String,
    amount: i64,
    currency: String,
    status: DisputeStatus,
    created_at: DateTime<Utc>,
    due_by: Option<DateTime<Utc>>,
}

impl From<Dispute> for DisputeSummary {
    fn from(d: Dispute) -> Self {
        let due_by = d.due_by();
        Self {
            id: d.id,
            charge: d.charge,
            reason: d.reason,
            amount: d.amount,
            currency: d.currency,
            status: d.status,
            created_at: d.created,
            due_by,
        }
    }
}

async fn list_disputes(
    State(state): State<AppState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Value>, ApiError> {
    let disputes = state.gateway.list(q.limit).await?;
    let summaries: Vec<DisputeSummary> = disputes.into_iter().map(Into::into).collect();
    Ok(Json(json!({ "disputes": summaries })))
}

async fn get_dispute(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let dispute = state.gateway.retrieve(&id).await?;
    Ok(Json(json!({ "dispute": dispute })))
}

/// Evidence checklist for the dispute's reason code.
async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let dispute = state.gateway.retrieve(&id).await?;
    let template = resolve_template(&dispute.reason);
    Ok(Json(json!(template)))
}

async fn get_explanation(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    match state.db.get_explanation(&identity.user_id, &id)? {
        Some(explanation) => Ok(Json(json!({
            "explanation": {
                "text": explanation.body,
                "updated_at": explanation.updated_at,
            }
        }))),
        None => Ok(Json(json!({ "explanation": null }))),
    }
}

async fn put_explanation(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    body: String,
) -> Result<Json<Value>, ApiError> {
    let parsed: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
    let text = parsed
        .get("text")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Validation("explanation text is required".into()))?;

    let explanation = state.db.upsert_explanation(&identity.user_id, &id, text)?;
    Ok(Json(json!({
        "explanation": {
            "text": explanation.body,
            "updated_at": explanation.updated_at,
        }
    })))
}
