use axum::http::HeaderMap;
use uuid::Uuid;

use crate::api::ApiError;

/// Header carrying the resolved account identity, set by the dispatch layer.
pub const IDENTITY_HEADER: &str = "X-Identity-Id";
/// Header carrying the caller's role; anything but "admin" is a plain actor.
pub const ROLE_HEADER: &str = "X-Identity-Role";

/// The authenticated caller as resolved by the upstream auth layer. This
/// service never authenticates; it only consumes the identity context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub id: Uuid,
    pub is_admin: bool,
}

/// Read the identity context from the request headers, if present and valid
pub fn identity_from_headers(headers: &HeaderMap) -> Option<Identity> {
    let id = headers.get(IDENTITY_HEADER)?.to_str().ok()?;
    let id = Uuid::parse_str(id).ok()?;
    let is_admin = headers
        .get(ROLE_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|role| role.eq_ignore_ascii_case("admin"))
        .unwrap_or(false);
    Some(Identity { id, is_admin })
}

/// Like [`identity_from_headers`], but absence is an authorization failure
pub fn require_identity(headers: &HeaderMap) -> Result<Identity, ApiError> {
    identity_from_headers(headers).ok_or_else(|| {
        ApiError::Unauthorized("Missing or invalid identity context".to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_reads_identity_and_role() {
        let mut headers = HeaderMap::new();
        let id = Uuid::new_v4();
        headers.insert(IDENTITY_HEADER, HeaderValue::from_str(&id.to_string()).unwrap());

        let identity = identity_from_headers(&headers).unwrap();
        assert_eq!(identity.id, id);
        assert!(!identity.is_admin);

        headers.insert(ROLE_HEADER, HeaderValue::from_static("Admin"));
        assert!(identity_from_headers(&headers).unwrap().is_admin);

        headers.insert(ROLE_HEADER, HeaderValue::from_static("moderator"));
        assert!(!identity_from_headers(&headers).unwrap().is_admin);
    }

    #[test]
    fn test_missing_or_malformed_identity() {
        let headers = HeaderMap::new();
        assert!(identity_from_headers(&headers).is_none());
        assert!(require_identity(&headers).is_err());

        let mut headers = HeaderMap::new();
        headers.insert(IDENTITY_HEADER, HeaderValue::from_static("not-a-uuid"));
        assert!(identity_from_headers(&headers).is_none());
    }
}
