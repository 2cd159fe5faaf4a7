//! Authentication port

use crate::Result;
use async_trait::async_trait;
use lingo_types::Identity;

/// Turns a bearer token into a verified identity.
///
/// Any failure must be reported as `LingoError::Unauthenticated`.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, token: &str) -> Result<Identity>;
}
