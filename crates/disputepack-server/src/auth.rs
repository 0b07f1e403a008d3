use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;
use crate::routes::AppState;

pub const DEMO_USER_ID: &str = "demo-user";

/// The caller on whose behalf a request runs. Every store and generator
/// call takes the user id from here, never from request parameters.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: String,
}

/// Resolves a request to an identity.
///
/// The shipped implementation is a stub that always yields the demo user.
/// Real credential verification slots in here; handlers and stores already
/// take an explicit user id, so nothing below this seam changes.
pub trait IdentityResolver: Send + Sync {
    fn resolve(&self, headers: &HeaderMap) -> Result<Identity, ApiError>;
}

/// Demo resolver: one fixed identity for every request.
pub struct StubIdentity {
    user_id: String,
}

impl StubIdentity {
    pub fn new(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
        }
    }
}

impl Default for StubIdentity {
    fn default() -> Self {
        Self::new(DEMO_USER_ID)
    }
}

impl IdentityResolver for StubIdentity {
    fn resolve(&self, _headers: &HeaderMap) -> Result<Identity, ApiError> {
        Ok(Identity {
            user_id: self.user_id.clone(),
        })
    }
}

/// Axum middleware that resolves the caller identity and attaches it to
/// the request as an extension.
pub async fn identity_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match state.identity.resolve(request.headers()) {
        Ok(identity) => {
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_always_resolves_the_same_user() {
        let resolver = StubIdentity::default();
        let identity = resolver.resolve(&HeaderMap::new()).unwrap();
        assert_eq!(identity.user_id, DEMO_USER_ID);

        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Bearer whatever".parse().unwrap());
        let identity = resolver.resolve(&headers).unwrap();
        assert_eq!(identity.user_id, DEMO_USER_ID);
    }

    #[test]
    fn stub_can_impersonate_other_users_for_tests() {
        let resolver = StubIdentity::new("other-user");
        let identity = resolver.resolve(&HeaderMap::new()).unwrap();
        assert_eq!(identity.user_id, "other-user");
    }
}
