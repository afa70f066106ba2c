//! Query adapters for Querybot.
//!
//! Each provider performs one or two HTTP calls against a third-party API and
//! turns the first relevant result into a single chat status line.
//!
//! # Architecture
//!
//! - [`traits::QueryProvider`] — trait that every provider client implements
//! - [`response::ProviderResponse`] — tagged outcome of one provider call
//! - [`normalize::normalize`] — pure formatter from payload to status line
//! - [`registry`] — static provider specs, credential checks, [`registry::query`]
//!
//! Provider modules: [`bing`], [`google`], [`geo`], [`weather`], [`wolfram`],
//! [`github`], [`youtube`].

pub mod bing;
pub mod geo;
pub mod github;
pub mod google;
mod http;
pub mod normalize;
pub mod registry;
pub mod response;
pub mod traits;
pub mod weather;
pub mod wolfram;
pub mod youtube;

// Re-export main types for convenience
pub use normalize::{normalize, ProviderPayload};
pub use registry::{create_provider, query, ProviderKind, ProviderSpec, PROVIDERS};
pub use response::ProviderResponse;
pub use traits::QueryProvider;
