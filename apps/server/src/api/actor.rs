use axum::{extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;

/// Header set by the upstream authentication layer.
pub const ACTOR_HEADER: &str = "x-actor-id";

/// The acting user, if the request carried one. Services reject mutations
/// without an actor, so a missing header is not an extractor failure.
#[derive(Debug, Clone, Default)]
pub struct Actor(pub Option<String>);

impl Actor {
    pub fn into_inner(self) -> Option<String> {
        self.0
    }
}

impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let actor = parts
            .headers
            .get(ACTOR_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);
        Ok(Actor(actor))
    }
}
