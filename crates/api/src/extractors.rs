//! Request extractors.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use campusflow_core::Actor;
use campusflow_db::entities::user::Role;

/// Authenticated actor extractor.
#[derive(Debug, Clone)]
pub struct AuthActor(pub Actor);

impl<S> FromRequestParts<S> for AuthActor
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by the auth middleware when the bearer credential verified
        parts
            .extensions
            .get::<Actor>()
            .cloned()
            .map(AuthActor)
            .ok_or((StatusCode::UNAUTHORIZED, "Unauthorized"))
    }
}

/// Authenticated admin extractor.
#[derive(Debug, Clone)]
pub struct AdminActor(pub Actor);

impl<S> FromRequestParts<S> for AdminActor
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let actor = parts
            .extensions
            .get::<Actor>()
            .cloned()
            .ok_or((StatusCode::UNAUTHORIZED, "Unauthorized"))?;

        if actor.role != Role::Admin {
            return Err((StatusCode::FORBIDDEN, "Forbidden: admin only"));
        }

        Ok(Self(actor))
    }
}
