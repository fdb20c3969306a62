//! GraphQL outbound adapters.
//!
//! This module provides the reqwest implementation of the
//! `GraphqlTransport` port, including multipart uploads.

mod dto;
mod http_transport;
mod multipart;

pub(crate) use http_transport::DEFAULT_USER_AGENT;
pub use http_transport::{GraphqlHttpIdentity, HttpGraphqlTransport};
pub use multipart::UPLOAD_CHUNK_BYTES;
