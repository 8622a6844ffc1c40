//! Explicit caller identity.
//!
//! Every admin command takes the acting administrator as a parameter
//! instead of reading it from ambient request context, so the workflows
//! stay independent of the HTTP runtime.

use std::convert::Infallible;
use std::fmt;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

/// Header the REST surface reads the actor from.
///
/// Session middleware is expected to populate it; without one the actor
/// is recorded as anonymous.
pub const ACTOR_HEADER: &str = "x-actor";

/// The administrator performing a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor(String);

impl Actor {
    /// Creates an actor with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The unauthenticated placeholder actor.
    #[must_use]
    pub fn anonymous() -> Self {
        Self("anonymous".to_string())
    }

    /// The actor's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
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
            .filter(|v| !v.trim().is_empty())
            .map_or_else(Self::anonymous, Self::new);

        Ok(actor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actor_displays_its_name() {
        let actor = Actor::new("admin@example.com");

        assert_eq!(actor.name(), "admin@example.com");
        assert_eq!(actor.to_string(), "admin@example.com");
    }

    #[test]
    fn anonymous_actor() {
        assert_eq!(Actor::anonymous().name(), "anonymous");
    }
}
