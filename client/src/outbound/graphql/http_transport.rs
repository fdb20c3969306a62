//! Reqwest-backed GraphQL transport adapter.
//!
//! This adapter owns transport details only: request serialisation, header
//! assembly, timeout, HTTP status mapping, and decoding the response
//! envelope into the `data` object.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde_json::Value;
use tracing::{debug, warn};

use super::dto::ResponseEnvelopeDto;
use super::multipart;
use crate::domain::media::FileUpload;
use crate::domain::operations::GraphqlRequest;
use crate::domain::ports::{
    CredentialSource, ExecuteOptions, GraphqlTransport, GraphqlTransportError, UploadProgress,
};
use crate::domain::{BearerToken, TRACE_ID_HEADER, TraceId};

pub(crate) const DEFAULT_USER_AGENT: &str = concat!("lms-client/", env!("CARGO_PKG_VERSION"));

/// Outbound identity sent with every request.
pub struct GraphqlHttpIdentity {
    /// HTTP user-agent sent to the GraphQL server.
    pub user_agent: String,
}

impl Default for GraphqlHttpIdentity {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

/// GraphQL transport that POSTs every operation to one endpoint.
///
/// The credential is read from `credentials` at send time, so a login or
/// logout is visible to the next call without rebuilding the transport.
pub struct HttpGraphqlTransport {
    client: Client,
    endpoint: Url,
    user_agent: String,
    credentials: Arc<dyn CredentialSource>,
}

impl HttpGraphqlTransport {
    /// Build a transport using a reqwest client with an explicit request timeout.
    /// ```rust,ignore
    /// let transport = HttpGraphqlTransport::new(endpoint, timeout, credentials);
    /// assert!(transport.is_ok() || transport.is_err());
    /// ```
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        timeout: Duration,
        credentials: Arc<dyn CredentialSource>,
    ) -> Result<Self, reqwest::Error> {
        Self::with_identity(endpoint, timeout, credentials, GraphqlHttpIdentity::default())
    }

    /// Build a transport with an explicit outbound identity.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_identity(
        endpoint: Url,
        timeout: Duration,
        credentials: Arc<dyn CredentialSource>,
        identity: GraphqlHttpIdentity,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            user_agent: identity.user_agent,
            credentials,
        })
    }

    /// Endpoint every request is sent to.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn prepare(&self, options: &ExecuteOptions) -> (RequestBuilder, CallLabels) {
        let mut builder = self
            .client
            .post(self.endpoint.clone())
            .header(USER_AGENT, self.user_agent.as_str())
            .header(ACCEPT, "application/json");
        let trace_id = options.trace_id.or_else(TraceId::current);
        if let Some(trace_id) = trace_id {
            builder = builder.header(TRACE_ID_HEADER, trace_id.to_string());
        }
        let credential = if options.include_auth {
            self.credentials.current()
        } else {
            None
        };
        let fingerprint = credential.as_ref().map(|c| c.token.fingerprint());
        if let Some(value) = authorization_value(options, credential.as_ref().map(|c| &c.token)) {
            builder = builder.header(AUTHORIZATION, value);
        }
        (
            builder,
            CallLabels {
                trace_id,
                fingerprint,
            },
        )
    }
}

struct CallLabels {
    trace_id: Option<TraceId>,
    fingerprint: Option<String>,
}

#[async_trait]
impl GraphqlTransport for HttpGraphqlTransport {
    async fn execute(
        &self,
        request: &GraphqlRequest,
        options: &ExecuteOptions,
    ) -> Result<Value, GraphqlTransportError> {
        reject_blank_document(request)?;
        let (builder, labels) = self.prepare(options);
        dispatch(builder.json(request), request, labels).await
    }

    async fn upload(
        &self,
        request: &GraphqlRequest,
        file: FileUpload,
        progress: Arc<dyn UploadProgress>,
        options: &ExecuteOptions,
    ) -> Result<Value, GraphqlTransportError> {
        reject_blank_document(request)?;
        let form = multipart::build_form(request, file, progress)?;
        let (builder, labels) = self.prepare(options);
        let builder = builder
            .header(multipart::PREFLIGHT_HEADER, "true")
            .multipart(form);
        dispatch(builder, request, labels).await
    }
}

async fn dispatch(
    builder: RequestBuilder,
    request: &GraphqlRequest,
    labels: CallLabels,
) -> Result<Value, GraphqlTransportError> {
    let operation = request.display_name();
    let kind = operation_kind(&request.query);
    let trace_id = labels.trace_id.map(|id| id.to_string());
    let started = Instant::now();

    let sent = send(builder).await;
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    let (status, outcome) = match sent {
        Ok((status, body)) => {
            debug!(
                operation,
                kind,
                status = status.as_u16(),
                bytes = body.len(),
                elapsed_ms,
                trace_id = trace_id.as_deref(),
                credential = labels.fingerprint.as_deref(),
                "graphql response received"
            );
            (Some(status.as_u16()), interpret_response(status, &body, operation))
        }
        Err(err) => (None, Err(err)),
    };
    if let Err(err) = &outcome {
        warn!(
            operation,
            kind,
            status,
            elapsed_ms,
            trace_id = trace_id.as_deref(),
            error = %err,
            error_kind = err.label(),
            "graphql call failed"
        );
    }
    outcome
}

async fn send(builder: RequestBuilder) -> Result<(StatusCode, Vec<u8>), GraphqlTransportError> {
    let response = builder.send().await.map_err(map_network_error)?;
    let status = response.status();
    let body = response.bytes().await.map_err(map_network_error)?;
    Ok((status, body.to_vec()))
}

/// `Authorization` header value, present iff auth is requested and a token
/// is held.
pub(crate) fn authorization_value(
    options: &ExecuteOptions,
    token: Option<&BearerToken>,
) -> Option<String> {
    if !options.include_auth {
        return None;
    }
    token.map(BearerToken::authorization_value)
}

fn reject_blank_document(request: &GraphqlRequest) -> Result<(), GraphqlTransportError> {
    if request.query.trim().is_empty() {
        return Err(GraphqlTransportError::invalid_request(
            "GraphQL document must not be blank",
        ));
    }
    Ok(())
}

fn operation_kind(document: &str) -> &'static str {
    match document.split_whitespace().next() {
        Some("mutation") => "mutation",
        Some("subscription") => "subscription",
        _ => "query",
    }
}

/// Map a completed HTTP exchange onto the `data` object or a port error.
pub(crate) fn interpret_response(
    status: StatusCode,
    body: &[u8],
    operation: &str,
) -> Result<Value, GraphqlTransportError> {
    let envelope = serde_json::from_slice::<ResponseEnvelopeDto>(body);
    if !status.is_success() {
        let reported = envelope
            .ok()
            .and_then(|env| env.first_error().map(|error| error.message.clone()))
            .filter(|message| !message.trim().is_empty());
        let message = reported.unwrap_or_else(|| status_message(status, body));
        return Err(GraphqlTransportError::transport(
            Some(status.as_u16()),
            message,
        ));
    }

    let envelope = envelope.map_err(|error| {
        GraphqlTransportError::decode(format!("invalid GraphQL response body: {error}"))
    })?;
    if let Some(first) = envelope.first_error() {
        return Err(GraphqlTransportError::protocol(
            first.message.clone(),
            first.code(),
        ));
    }
    envelope
        .into_data()
        .ok_or_else(|| GraphqlTransportError::empty_response(operation))
}

fn map_network_error(error: reqwest::Error) -> GraphqlTransportError {
    GraphqlTransportError::transport(error.status().map(|s| s.as_u16()), error.to_string())
}

fn status_message(status: StatusCode, body: &[u8]) -> String {
    let preview = body_preview(body);
    if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), preview)
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for the pure request and response mapping helpers.

    use super::*;
    use crate::domain::ports::SessionCell;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case::auth_with_token(true, Some("T"), Some("Bearer T"))]
    #[case::auth_without_token(true, None, None)]
    #[case::no_auth_with_token(false, Some("T"), None)]
    #[case::no_auth_without_token(false, None, None)]
    fn attaches_authorization_only_when_requested_and_held(
        #[case] include_auth: bool,
        #[case] token: Option<&str>,
        #[case] expected: Option<&str>,
    ) {
        let options = ExecuteOptions {
            include_auth,
            trace_id: None,
        };
        let token = token.map(|raw| BearerToken::new(raw).expect("token"));
        assert_eq!(
            authorization_value(&options, token.as_ref()).as_deref(),
            expected
        );
    }

    #[test]
    fn success_with_data_yields_the_data_object() {
        let body = json!({ "data": { "getCourse": { "id": 1 } } }).to_string();
        let data = interpret_response(StatusCode::OK, body.as_bytes(), "GetCourse")
            .expect("data present");
        assert_eq!(data, json!({ "getCourse": { "id": 1 } }));
    }

    #[test]
    fn error_lists_become_protocol_errors_with_their_code() {
        let body = json!({
            "data": null,
            "errors": [
                { "message": "Not authorised", "extensions": { "code": "FORBIDDEN" } },
                { "message": "second" }
            ]
        })
        .to_string();
        let err = interpret_response(StatusCode::OK, body.as_bytes(), "GetCourse")
            .expect_err("protocol error");
        assert_eq!(
            err,
            GraphqlTransportError::protocol("Not authorised", Some("FORBIDDEN".to_owned()))
        );
    }

    #[rstest]
    #[case::missing_data(json!({}))]
    #[case::null_data(json!({ "data": null }))]
    #[case::empty_error_list(json!({ "data": null, "errors": [] }))]
    fn success_without_data_is_an_empty_response(#[case] body: Value) {
        let err = interpret_response(StatusCode::OK, body.to_string().as_bytes(), "GetQuiz")
            .expect_err("empty response");
        assert_eq!(err, GraphqlTransportError::empty_response("GetQuiz"));
    }

    #[test]
    fn unreadable_success_bodies_are_decode_errors() {
        let err = interpret_response(StatusCode::OK, b"<html>", "GetQuiz").expect_err("decode");
        assert_eq!(err.label(), "decode");
    }

    #[rstest]
    #[case::graphql_message(
        StatusCode::UNAUTHORIZED,
        r#"{"errors":[{"message":"jwt expired"}]}"#,
        "jwt expired"
    )]
    #[case::plain_body(StatusCode::BAD_GATEWAY, "  upstream \n down ", "status 502: upstream down")]
    #[case::empty_body(StatusCode::INTERNAL_SERVER_ERROR, "", "status 500")]
    fn non_success_statuses_are_transport_errors(
        #[case] status: StatusCode,
        #[case] body: &str,
        #[case] expected: &str,
    ) {
        let err = interpret_response(status, body.as_bytes(), "GetQuiz").expect_err("transport");
        assert_eq!(
            err,
            GraphqlTransportError::transport(Some(status.as_u16()), expected)
        );
    }

    #[test]
    fn previews_are_truncated() {
        let long = "x".repeat(400);
        let preview = body_preview(long.as_bytes());
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 163);
    }

    #[rstest]
    #[case("mutation DeleteSection($sectionId: Int!) { x }", "mutation")]
    #[case("  query GetQuiz { x }", "query")]
    #[case("{ me { id } }", "query")]
    fn infers_operation_kind_from_the_document(#[case] document: &str, #[case] expected: &str) {
        assert_eq!(operation_kind(document), expected);
    }

    #[tokio::test]
    async fn blank_documents_are_rejected_before_any_io() {
        let endpoint = Url::parse("http://127.0.0.1:9/graphql").expect("url");
        let transport = HttpGraphqlTransport::new(
            endpoint,
            Duration::from_millis(100),
            Arc::new(SessionCell::new()),
        )
        .expect("client");

        let err = transport
            .execute(&GraphqlRequest::new("   ", Value::Null), &ExecuteOptions::default())
            .await
            .expect_err("blank document");
        assert_eq!(err.label(), "invalid_request");
    }
}
