//! Test utilities for the client crate.
//!
//! This module provides shared doubles for both unit tests (in `src/`) and
//! integration tests (in `tests/`). It is only compiled for tests or with
//! the `test-support` feature.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Local, Utc};
use mockable::Clock;
use serde_json::Value;

use crate::domain::media::{FileUpload, UploadProgressSnapshot};
use crate::domain::operations::GraphqlRequest;
use crate::domain::ports::{
    ExecuteOptions, GraphqlTransport, GraphqlTransportError, Notification, NotificationLevel,
    Notifier, SessionCell, UploadProgress,
};
use crate::domain::{BearerToken, SessionCredential};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One call observed by [`ScriptedTransport`].
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub request: GraphqlRequest,
    pub options: ExecuteOptions,
    /// File handed to `upload`, `None` for plain executions.
    pub upload: Option<FileUpload>,
}

/// Transport double answering calls from a queue of scripted outcomes.
///
/// Calls beyond the script fail with a transport error so a test that
/// expects no I/O notices an unexpected request.
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<Value, GraphqlTransportError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedTransport {
    /// Transport with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response carrying `data`.
    #[must_use]
    pub fn respond(self, data: Value) -> Self {
        lock(&self.script).push_back(Ok(data));
        self
    }

    /// Queue a failure.
    #[must_use]
    pub fn fail(self, error: GraphqlTransportError) -> Self {
        lock(&self.script).push_back(Err(error));
        self
    }

    /// Calls observed so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    fn next_outcome(&self, call: RecordedCall) -> Result<Value, GraphqlTransportError> {
        let name = call.request.display_name().to_owned();
        lock(&self.calls).push(call);
        lock(&self.script).pop_front().unwrap_or_else(|| {
            Err(GraphqlTransportError::transport(
                None,
                format!("no scripted response for {name}"),
            ))
        })
    }
}

#[async_trait]
impl GraphqlTransport for ScriptedTransport {
    async fn execute(
        &self,
        request: &GraphqlRequest,
        options: &ExecuteOptions,
    ) -> Result<Value, GraphqlTransportError> {
        self.next_outcome(RecordedCall {
            request: request.clone(),
            options: *options,
            upload: None,
        })
    }

    async fn upload(
        &self,
        request: &GraphqlRequest,
        file: FileUpload,
        progress: Arc<dyn UploadProgress>,
        options: &ExecuteOptions,
    ) -> Result<Value, GraphqlTransportError> {
        progress.report(UploadProgressSnapshot {
            bytes_sent: file.len(),
            total_bytes: file.len(),
        });
        self.next_outcome(RecordedCall {
            request: request.clone(),
            options: *options,
            upload: Some(file),
        })
    }
}

/// Notifier that keeps every notification for later assertions.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    /// Every notification, in order.
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        lock(&self.seen).clone()
    }

    /// Error notifications only.
    #[must_use]
    pub fn errors(&self) -> Vec<Notification> {
        self.notifications()
            .into_iter()
            .filter(|n| n.level == NotificationLevel::Error)
            .collect()
    }

    /// Messages of success notifications.
    #[must_use]
    pub fn successes(&self) -> Vec<String> {
        self.notifications()
            .into_iter()
            .filter(|n| n.level == NotificationLevel::Success)
            .map(|n| n.message)
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        lock(&self.seen).push(notification);
    }
}

/// Session cell already holding `token`.
///
/// # Panics
///
/// Panics when `token` is not a usable bearer token.
#[must_use]
pub fn signed_in_cell(token: &str) -> SessionCell {
    let Ok(token) = BearerToken::new(token) else {
        panic!("test token {token:?} is not a valid bearer token");
    };
    SessionCell::with_credential(SessionCredential::new(token))
}

/// Clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    #[must_use]
    pub const fn new(now: DateTime<Utc>) -> Self {
        Self(now)
    }

    /// Clock frozen at the Unix epoch, before any realistic token expiry.
    #[must_use]
    pub const fn epoch() -> Self {
        Self(DateTime::UNIX_EPOCH)
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}
