//! The request/state/notification pattern shared by every domain service.
//!
//! A call runs through the same steps regardless of domain:
//!
//! 1. mark the owning [`CallTracker`] pending and clear its previous error;
//! 2. fail fast when a credential is required but none is held;
//! 3. render the operation and send it through the [`GraphqlTransport`];
//! 4. decode the root field and, for mutations, check the `success` flag;
//! 5. classify any failure, record it, emit exactly one error notification
//!    and return it to the caller;
//! 6. on success, emit the optional success notification.
//!
//! Each call gets a fresh [`TraceId`] that is carried by the tracing span,
//! the task-local scope and the outgoing `X-Trace-Id` header.

use std::sync::Arc;

use tracing::{Instrument, debug, info_span, warn};

use super::TraceId;
use super::call_state::CallTracker;
use super::error::{ClassifiedError, ServiceError, classify};
use super::media::FileUpload;
use super::operations::{MutationOutcome, Operation};
use super::ports::{
    CredentialSource, ExecuteOptions, GraphqlTransport, GraphqlTransportError, Notification,
    Notifier, UploadProgress,
};

/// Collaborators shared by every service.
#[derive(Clone)]
pub struct ServiceContext {
    transport: Arc<dyn GraphqlTransport>,
    credentials: Arc<dyn CredentialSource>,
    notifier: Arc<dyn Notifier>,
}

impl ServiceContext {
    pub fn new(
        transport: Arc<dyn GraphqlTransport>,
        credentials: Arc<dyn CredentialSource>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            transport,
            credentials,
            notifier,
        }
    }

    /// Whether a session credential is currently held.
    #[must_use]
    pub fn has_credential(&self) -> bool {
        self.credentials.is_present()
    }

    pub(crate) fn notify(&self, notification: Notification) {
        self.notifier.notify(notification);
    }
}

/// How one service call should behave.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSpec {
    action: &'static str,
    success_message: Option<String>,
    requires_credential: bool,
    include_auth: bool,
}

impl CallSpec {
    /// `action` completes the fallback message `Failed to <action>`.
    #[must_use]
    pub const fn new(action: &'static str) -> Self {
        Self {
            action,
            success_message: None,
            requires_credential: false,
            include_auth: true,
        }
    }

    /// Emit `message` as a success notification when the call resolves.
    #[must_use]
    pub fn notify_success(mut self, message: impl Into<String>) -> Self {
        self.success_message = Some(message.into());
        self
    }

    /// Fail with an authentication error before any I/O when no credential
    /// is held.
    #[must_use]
    pub const fn requires_credential(mut self) -> Self {
        self.requires_credential = true;
        self
    }

    /// Never attach the credential.
    #[must_use]
    pub const fn without_auth(mut self) -> Self {
        self.include_auth = false;
        self
    }

    #[must_use]
    pub const fn action(&self) -> &'static str {
        self.action
    }
}

enum Dispatch {
    Execute,
    Upload {
        file: FileUpload,
        progress: Arc<dyn UploadProgress>,
    },
}

/// Runs catalog operations for one service and owns its call state.
#[derive(Clone)]
pub struct ServiceHook {
    context: ServiceContext,
    tracker: CallTracker,
}

impl ServiceHook {
    pub fn new(context: ServiceContext) -> Self {
        Self {
            context,
            tracker: CallTracker::new(),
        }
    }

    /// Call state of this service.
    #[must_use]
    pub const fn tracker(&self) -> &CallTracker {
        &self.tracker
    }

    #[must_use]
    pub const fn context(&self) -> &ServiceContext {
        &self.context
    }

    /// Run a query and return its decoded root field.
    pub async fn query<O: Operation>(
        &self,
        variables: &O::Variables,
        spec: CallSpec,
    ) -> Result<O::Output, ClassifiedError> {
        self.perform::<O>(variables, Dispatch::Execute, spec, |_, _| Ok(()))
            .await
    }

    /// Run a mutation, rejecting payloads that report `success: false`.
    pub async fn mutate<O>(
        &self,
        variables: &O::Variables,
        spec: CallSpec,
    ) -> Result<O::Output, ClassifiedError>
    where
        O: Operation,
        O::Output: MutationOutcome,
    {
        self.perform::<O>(variables, Dispatch::Execute, spec, ensure_succeeded)
            .await
    }

    /// Run a mutation as a multipart upload carrying `file`.
    pub async fn upload<O>(
        &self,
        variables: &O::Variables,
        file: FileUpload,
        progress: Arc<dyn UploadProgress>,
        spec: CallSpec,
    ) -> Result<O::Output, ClassifiedError>
    where
        O: Operation,
        O::Output: MutationOutcome,
    {
        self.perform::<O>(
            variables,
            Dispatch::Upload { file, progress },
            spec,
            ensure_succeeded,
        )
        .await
    }

    /// Record and report a failure detected by the caller before dispatch.
    ///
    /// Keeps local validation on the same path as remote failures: the
    /// tracker ends up failed and exactly one error notification is sent.
    pub fn reject(&self, cause: ServiceError, spec: &CallSpec) -> ClassifiedError {
        let guard = self.tracker.begin();
        let classified = classify(cause, spec.action);
        self.report_failure(&classified, "local");
        guard.fail(classified.clone());
        classified
    }

    async fn perform<O: Operation>(
        &self,
        variables: &O::Variables,
        dispatch: Dispatch,
        spec: CallSpec,
        check: fn(&O::Output, &'static str) -> Result<(), ServiceError>,
    ) -> Result<O::Output, ClassifiedError> {
        let trace_id = TraceId::generate();
        let span = info_span!(
            "service_call",
            operation = O::NAME,
            kind = %O::KIND,
            trace_id = %trace_id,
        );
        let guard = self.tracker.begin();
        let outcome = TraceId::scope(
            trace_id,
            async {
                let output = self.dispatch::<O>(variables, dispatch, &spec, trace_id).await?;
                check(&output, spec.action)?;
                Ok::<_, ServiceError>(output)
            }
            .instrument(span.clone()),
        )
        .await;

        let _entered = span.enter();
        match outcome {
            Ok(output) => {
                debug!("call succeeded");
                guard.succeed();
                if let Some(message) = spec.success_message {
                    self.context.notify(Notification::success(message));
                }
                Ok(output)
            }
            Err(cause) => {
                let classified = classify(cause, spec.action);
                self.report_failure(&classified, O::NAME);
                guard.fail(classified.clone());
                Err(classified)
            }
        }
    }

    async fn dispatch<O: Operation>(
        &self,
        variables: &O::Variables,
        dispatch: Dispatch,
        spec: &CallSpec,
        trace_id: TraceId,
    ) -> Result<O::Output, ServiceError> {
        if spec.requires_credential && !self.context.has_credential() {
            return Err(ServiceError::authentication_required(format!(
                "You must be logged in to {}",
                spec.action
            )));
        }

        let request = O::request(variables).map_err(|err| {
            GraphqlTransportError::invalid_request(format!("{}: {err}", O::NAME))
        })?;
        let mut options = ExecuteOptions::default().with_trace_id(trace_id);
        if !spec.include_auth {
            options = options.without_auth();
        }

        let data = match dispatch {
            Dispatch::Execute => self.context.transport.execute(&request, &options).await?,
            Dispatch::Upload { file, progress } => {
                self.context
                    .transport
                    .upload(&request, file, progress, &options)
                    .await?
            }
        };
        O::decode(data).map_err(|err| {
            ServiceError::from(GraphqlTransportError::decode(format!("{}: {err}", O::NAME)))
        })
    }

    fn report_failure(&self, classified: &ClassifiedError, operation: &str) {
        warn!(
            operation,
            class = %classified.class(),
            cause = %classified.cause(),
            "call failed"
        );
        self.context.notify(Notification::failure(classified));
    }
}

fn ensure_succeeded<T: MutationOutcome>(
    output: &T,
    action: &'static str,
) -> Result<(), ServiceError> {
    if output.succeeded() {
        return Ok(());
    }
    let message = output
        .message()
        .filter(|message| !message.trim().is_empty())
        .map_or_else(|| format!("Failed to {action}"), str::to_owned);
    Err(ServiceError::domain_failure(message))
}
