use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use disputepack_db::DbError;
use disputepack_packet::PacketError;
use disputepack_store::StoreError;
use disputepack_stripe::GatewayError;

/// The one place typed failures become status codes. Every response body
/// is `{ "error": "<message>" }`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    ServiceUnavailable(String),

    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound(msg) => ApiError::NotFound(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<GatewayError> for ApiError {
    fn from(e: GatewayError) -> Self {
        match e {
            GatewayError::NotConfigured => ApiError::ServiceUnavailable(e.to_string()),
            GatewayError::NotFound(msg) => ApiError::NotFound(msg),
            GatewayError::Upstream(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(key) => ApiError::NotFound(format!("object not found: {key}")),
            StoreError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<PacketError> for ApiError {
    fn from(e: PacketError) -> Self {
        match e {
            PacketError::Gateway(g) => g.into(),
            PacketError::Db(d) => d.into(),
            PacketError::Store(s) => s.into(),
            PacketError::Render(msg) => ApiError::Internal(format!("render failed: {msg}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_errors_map_to_expected_statuses() {
        let e: ApiError = GatewayError::NotConfigured.into();
        assert!(matches!(e, ApiError::ServiceUnavailable(_)));

        let e: ApiError = GatewayError::NotFound("dp_1".into()).into();
        assert!(matches!(e, ApiError::NotFound(_)));

        let e: ApiError = GatewayError::Upstream("boom".into()).into();
        assert!(matches!(e, ApiError::Internal(_)));
    }

    #[test]
    fn packet_errors_unwrap_to_their_cause() {
        let e: ApiError = PacketError::Gateway(GatewayError::NotConfigured).into();
        assert!(matches!(e, ApiError::ServiceUnavailable(_)));

        let e: ApiError = PacketError::Render("font".into()).into();
        assert!(matches!(e, ApiError::Internal(_)));
    }
}
