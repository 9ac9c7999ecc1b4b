//! Gateway-injected identity header extractor.

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use http::request::Parts;
use uuid::Uuid;

use crate::error::AppError;

/// Authenticated user identity injected by the gateway via the
/// `x-inkwell-user-id` header after it has resolved the session token.
///
/// Returns 401 if the header is absent or cannot be parsed as UUID.
/// Ownership checks (403) are done by handlers and use-cases after extraction.
#[derive(Debug, Clone, Copy)]
pub struct Identity {
    pub user_id: Uuid,
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    // axum-core 0.5 defines this as `fn -> impl Future + Send` (not `async fn`).
    // In Rust 1.82+ precise capturing, `async fn` captures lifetimes differently,
    // causing E0195. Fix: extract values synchronously, return a 'static async move block.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let user_id = parts
            .headers
            .get("x-inkwell-user-id")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<Uuid>().ok());

        async move {
            let user_id = user_id.ok_or(AppError::Unauthorized)?;
            Ok(Self { user_id })
        }
    }
}

/// `Option<Identity>` for endpoints that serve anonymous reads: an absent
/// header yields `None`, a malformed one is still rejected with 401.
impl<S> OptionalFromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Option<Self>, Self::Rejection>> + Send {
        let header = parts
            .headers
            .get("x-inkwell-user-id")
            .map(|v| v.to_str().ok().and_then(|s| s.parse::<Uuid>().ok()));

        async move {
            match header {
                None => Ok(None),
                Some(Some(user_id)) => Ok(Some(Self { user_id })),
                Some(None) => Err(AppError::Unauthorized),
            }
        }
    }
}
