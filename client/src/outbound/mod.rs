//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **graphql**: reqwest-backed transport for queries, mutations and
//!   multipart uploads
//! - **storage**: credential stores (JSON file via `cap_std`, in-memory)
//! - **notify**: notification sinks (tracing log, tokio broadcast channel)
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod graphql;
pub mod notify;
pub mod storage;
