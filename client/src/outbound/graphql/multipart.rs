//! GraphQL multipart request assembly.
//!
//! Uploads follow the multipart request convention: an `operations` field
//! holding the request with `null` in place of the file, a `map` field
//! pointing part `0` at that variable, then the file part itself.

use std::sync::Arc;

use futures_util::Stream;
use futures_util::stream;
use reqwest::Body;
use reqwest::multipart::{Form, Part};
use serde_json::json;

use crate::domain::media::{FileUpload, UploadProgressSnapshot};
use crate::domain::operations::GraphqlRequest;
use crate::domain::operations::media::UPLOAD_FILE_VARIABLE_PATH;
use crate::domain::ports::{GraphqlTransportError, UploadProgress};

/// Header some GraphQL servers require before accepting multipart bodies.
pub(super) const PREFLIGHT_HEADER: &str = "Apollo-Require-Preflight";

/// Size of each body chunk handed to the HTTP stack.
pub const UPLOAD_CHUNK_BYTES: usize = 64 * 1024;

const FILE_PART: &str = "0";

pub(super) fn build_form(
    request: &GraphqlRequest,
    file: FileUpload,
    progress: Arc<dyn UploadProgress>,
) -> Result<Form, GraphqlTransportError> {
    let operations = serde_json::to_string(request).map_err(|error| {
        GraphqlTransportError::invalid_request(format!("cannot encode operations: {error}"))
    })?;
    let map = json!({ FILE_PART: [UPLOAD_FILE_VARIABLE_PATH] }).to_string();

    let FileUpload {
        file_name,
        content_type,
        bytes,
    } = file;
    let total = bytes.len() as u64;
    let body = Body::wrap_stream(progress_chunks(bytes, progress));
    let part = Part::stream_with_length(body, total)
        .file_name(file_name)
        .mime_str(&content_type)
        .map_err(|error| {
            GraphqlTransportError::invalid_request(format!(
                "invalid content type {content_type}: {error}"
            ))
        })?;

    Ok(Form::new()
        .text("operations", operations)
        .text("map", map)
        .part(FILE_PART, part))
}

/// Split `bytes` into chunks, reporting cumulative progress as each chunk is
/// pulled by the consumer.
pub(crate) fn progress_chunks(
    bytes: Vec<u8>,
    progress: Arc<dyn UploadProgress>,
) -> impl Stream<Item = Result<Vec<u8>, std::io::Error>> + Send + 'static {
    let total_bytes = bytes.len() as u64;
    let chunks: Vec<Vec<u8>> = bytes
        .chunks(UPLOAD_CHUNK_BYTES)
        .map(<[u8]>::to_vec)
        .collect();
    let mut bytes_sent = 0_u64;
    stream::iter(chunks.into_iter().map(move |chunk| {
        bytes_sent += chunk.len() as u64;
        progress.report(UploadProgressSnapshot {
            bytes_sent,
            total_bytes,
        });
        Ok(chunk)
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use futures_util::StreamExt;

    use super::*;

    #[derive(Default)]
    struct Snapshots(Mutex<Vec<UploadProgressSnapshot>>);

    impl UploadProgress for Snapshots {
        fn report(&self, snapshot: UploadProgressSnapshot) {
            self.0.lock().expect("snapshots lock").push(snapshot);
        }
    }

    #[tokio::test]
    async fn reports_cumulative_progress_per_chunk() {
        let snapshots = Arc::new(Snapshots::default());
        let size = UPLOAD_CHUNK_BYTES * 2 + 10;
        let chunks: Vec<_> = progress_chunks(vec![7; size], snapshots.clone())
            .collect()
            .await;

        assert_eq!(chunks.len(), 3);
        let seen = snapshots.0.lock().expect("snapshots lock").clone();
        let sent: Vec<u64> = seen.iter().map(|s| s.bytes_sent).collect();
        assert_eq!(
            sent,
            vec![
                UPLOAD_CHUNK_BYTES as u64,
                (UPLOAD_CHUNK_BYTES * 2) as u64,
                size as u64
            ]
        );
        assert!(seen.iter().all(|s| s.total_bytes == size as u64));
        assert_eq!(seen.last().map(UploadProgressSnapshot::percent), Some(100));
    }

    #[tokio::test]
    async fn progress_is_only_reported_as_chunks_are_pulled() {
        let snapshots = Arc::new(Snapshots::default());
        let mut chunks = Box::pin(progress_chunks(
            vec![1; UPLOAD_CHUNK_BYTES + 1],
            snapshots.clone(),
        ));
        assert!(snapshots.0.lock().expect("snapshots lock").is_empty());

        let _first = chunks.next().await;
        assert_eq!(snapshots.0.lock().expect("snapshots lock").len(), 1);
    }

    #[test]
    fn rejects_malformed_content_types() {
        let request = GraphqlRequest::new("mutation UploadFile { x }", json!({ "file": null }));
        let file = FileUpload::new("a.txt", vec![1]).with_content_type("not a mime");
        let err = build_form(&request, file, Arc::new(crate::domain::ports::IgnoreUploadProgress))
            .expect_err("bad mime");
        assert_eq!(err.label(), "invalid_request");
    }
}
