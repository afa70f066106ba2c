//! Query provider trait — the seam between the registry and each API client.

use async_trait::async_trait;

use querybot_core::Result;

use crate::normalize::{normalize, ProviderPayload};
use crate::registry::ProviderKind;

/// Trait that every provider client implements.
///
/// `fetch` does the network work and classifies the outcome; `query` adds
/// the formatting step. Providers only override `fetch`.
#[async_trait]
pub trait QueryProvider: Send + Sync {
    /// Which provider this is.
    fn kind(&self) -> ProviderKind;

    /// Call the remote API and classify what came back.
    ///
    /// Returns `Ok(None)` when the input gives the provider nothing to look
    /// up (a chat line with no video link). Transport and decode failures are
    /// returned as errors.
    async fn fetch(&self, input: &str) -> Result<Option<ProviderPayload>>;

    /// Fetch and render a single status line. Empty when there is nothing to say.
    async fn query(&self, input: &str) -> Result<String> {
        Ok(self
            .fetch(input)
            .await?
            .map(|payload| normalize(&payload))
            .unwrap_or_default())
    }
}
