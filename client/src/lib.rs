//! LMS client library: typed GraphQL data access plus session state.
//!
//! - [`domain`]: entities, the operation catalog, services and ports
//! - [`context`]: auth, loading, preview and progress state providers
//! - [`outbound`]: reqwest transport, credential stores, notifiers
//! - [`app`]: the [`LmsClient`] composition root

pub mod app;
pub mod config;
pub mod context;
pub mod domain;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use app::{AppError, LmsClient};
pub use config::ClientSettings;
