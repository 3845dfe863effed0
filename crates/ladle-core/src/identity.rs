//! Gateway-injected identity headers extractors.

use axum::extract::FromRequestParts;
use http::StatusCode;
use http::request::Parts;

pub const USER_ID_HEADER: &str = "x-ladle-user-id";
pub const USER_ROLE_HEADER: &str = "x-ladle-user-role";

/// User identity injected by the gateway via `x-ladle-user-id` and
/// `x-ladle-user-role` headers.
///
/// Returns 401 if either header is absent or cannot be parsed.
/// Role enforcement (403) is done by handlers after extraction.
#[derive(Debug, Clone, Copy)]
pub struct Identity {
    pub user_id: i64,
    pub user_role: u8,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.user_role >= 1
    }
}

fn parse_identity(parts: &Parts) -> Option<Identity> {
    let user_id = parts
        .headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<i64>().ok())?;

    let user_role = parts
        .headers
        .get(USER_ROLE_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u8>().ok())?;

    Some(Identity { user_id, user_role })
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    // axum-core 0.5 defines this as `fn -> impl Future + Send` (not `async fn`).
    // Extract values synchronously and return a 'static async move block to
    // avoid E0195 from precise lifetime capturing.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let identity = parse_identity(parts);
        async move { identity.ok_or(StatusCode::UNAUTHORIZED) }
    }
}

/// Optional identity for endpoints that serve anonymous callers too.
/// Absent or malformed headers yield `None` instead of a rejection.
#[derive(Debug, Clone, Copy)]
pub struct MaybeIdentity(pub Option<Identity>);

impl MaybeIdentity {
    pub fn user_id(&self) -> Option<i64> {
        self.0.map(|i| i.user_id)
    }
}

impl<S> FromRequestParts<S> for MaybeIdentity
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let identity = parse_identity(parts);
        async move { Ok(Self(identity)) }
    }
}
