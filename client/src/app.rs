//! Composition root.
//!
//! [`LmsClient`] wires settings, adapters, contexts and services together.
//! Every service shares one transport, one notifier and the session cell
//! owned by the [`AuthContext`].

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use mockable::{Clock, DefaultClock};
use tokio::sync::broadcast;
use tracing::debug;

use crate::config::{ClientSettings, ConfigError};
use crate::context::{AuthContext, AuthState, LoadingTracker, PreviewContext, ProgressContext};
use crate::domain::ports::{CredentialStore, GraphqlTransport, Notification, Notifier};
use crate::domain::{
    AssignmentService, AuthService, CourseService, LectureService, MediaService,
    PreferencesService, ProfileService, ProgressService, QuizService, ReminderService,
    SectionService, ServiceContext, ServiceError, UploadService,
};
use crate::outbound::graphql::{GraphqlHttpIdentity, HttpGraphqlTransport};
use crate::outbound::notify::{BroadcastNotifier, TracingNotifier};
use crate::outbound::storage::FileCredentialStore;

/// Failures while assembling the client.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("cannot build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Logs every notification and forwards it to broadcast subscribers.
struct AppNotifier {
    broadcast: BroadcastNotifier,
}

impl Notifier for AppNotifier {
    fn notify(&self, notification: Notification) {
        TracingNotifier.notify(notification.clone());
        self.broadcast.notify(notification);
    }
}

/// Every service, sharing one [`ServiceContext`].
struct Services {
    auth: AuthService,
    sections: SectionService,
    lectures: LectureService,
    quizzes: QuizService,
    assignments: AssignmentService,
    courses: CourseService,
    profile: ProfileService,
    preferences: PreferencesService,
    media: MediaService,
    uploads: UploadService,
    reminders: ReminderService,
    progress: ProgressService,
}

/// The assembled client: contexts plus one service per domain.
pub struct LmsClient {
    auth: Arc<AuthContext>,
    loading: LoadingTracker,
    preview: PreviewContext,
    progress: Arc<ProgressContext>,
    notifications: BroadcastNotifier,
    services: Services,
}

impl LmsClient {
    /// Build a client talking HTTP to the configured endpoint and keeping
    /// its session in the configured directory.
    ///
    /// # Errors
    ///
    /// Returns an error when the settings are invalid or the HTTP client
    /// cannot be built.
    pub fn from_settings(settings: &ClientSettings) -> Result<Self, AppError> {
        let endpoint = settings.endpoint()?;
        let store = Arc::new(FileCredentialStore::new(settings.session_dir()));
        let auth = Arc::new(AuthContext::new(store, Arc::new(DefaultClock)));
        let transport = HttpGraphqlTransport::with_identity(
            endpoint,
            settings.request_timeout(),
            Arc::new(auth.session_cell()),
            GraphqlHttpIdentity {
                user_agent: settings.user_agent().to_owned(),
            },
        )?;
        debug!(endpoint = %transport.endpoint(), "client assembled");
        Ok(Self::assemble(
            auth,
            Arc::new(transport),
            Arc::new(DefaultClock),
            settings.loading_grace(),
        ))
    }

    /// Build a client around an existing transport and store, e.g. a
    /// scripted transport in tests.
    ///
    /// The transport must read credentials from the returned client's
    /// session cell to see logins; use [`LmsClient::from_settings`] for the
    /// HTTP wiring.
    pub fn with_parts(
        transport: Arc<dyn GraphqlTransport>,
        store: Arc<dyn CredentialStore>,
        clock: Arc<dyn Clock>,
        loading_grace: Duration,
    ) -> Self {
        let auth = Arc::new(AuthContext::new(store, clock.clone()));
        Self::assemble(auth, transport, clock, loading_grace)
    }

    fn assemble(
        auth: Arc<AuthContext>,
        transport: Arc<dyn GraphqlTransport>,
        clock: Arc<dyn Clock>,
        loading_grace: Duration,
    ) -> Self {
        let notifications = BroadcastNotifier::default();
        let notifier = Arc::new(AppNotifier {
            broadcast: notifications.clone(),
        });
        let progress = Arc::new(ProgressContext::new());
        let context = ServiceContext::new(transport, Arc::new(auth.session_cell()), notifier);
        let services = Services {
            auth: AuthService::new(context.clone(), auth.clone()),
            sections: SectionService::new(context.clone()),
            lectures: LectureService::new(context.clone()),
            quizzes: QuizService::new(context.clone()),
            assignments: AssignmentService::new(context.clone()),
            courses: CourseService::new(context.clone()),
            profile: ProfileService::new(context.clone()),
            preferences: PreferencesService::new(context.clone()),
            media: MediaService::new(context.clone()),
            uploads: UploadService::new(context.clone()),
            reminders: ReminderService::new(context.clone(), clock),
            progress: ProgressService::new(context, progress.clone()),
        };
        Self {
            auth,
            loading: LoadingTracker::new(loading_grace),
            preview: PreviewContext::new(),
            progress,
            notifications,
            services,
        }
    }

    /// Load the persisted session and leave the `Unknown` auth state.
    ///
    /// # Errors
    ///
    /// Returns the store failure; the auth state still settles on
    /// `Unauthenticated`.
    pub fn initialize(&self) -> Result<AuthState, ServiceError> {
        self.auth.initialize()
    }

    /// Run `fut` with the global loading indicator raised.
    pub async fn track<F: Future>(&self, fut: F) -> F::Output {
        self.loading.with_loading(fut).await
    }

    /// Receive every notification emitted from now on.
    #[must_use]
    pub fn notifications(&self) -> broadcast::Receiver<Notification> {
        self.notifications.subscribe()
    }

    #[must_use]
    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    #[must_use]
    pub const fn loading(&self) -> &LoadingTracker {
        &self.loading
    }

    #[must_use]
    pub const fn preview(&self) -> &PreviewContext {
        &self.preview
    }

    #[must_use]
    pub fn progress(&self) -> &ProgressContext {
        &self.progress
    }

    #[must_use]
    pub const fn sessions(&self) -> &AuthService {
        &self.services.auth
    }

    #[must_use]
    pub const fn sections(&self) -> &SectionService {
        &self.services.sections
    }

    #[must_use]
    pub const fn lectures(&self) -> &LectureService {
        &self.services.lectures
    }

    #[must_use]
    pub const fn quizzes(&self) -> &QuizService {
        &self.services.quizzes
    }

    #[must_use]
    pub const fn assignments(&self) -> &AssignmentService {
        &self.services.assignments
    }

    #[must_use]
    pub const fn courses(&self) -> &CourseService {
        &self.services.courses
    }

    #[must_use]
    pub const fn profile(&self) -> &ProfileService {
        &self.services.profile
    }

    #[must_use]
    pub const fn preferences(&self) -> &PreferencesService {
        &self.services.preferences
    }

    #[must_use]
    pub const fn media(&self) -> &MediaService {
        &self.services.media
    }

    #[must_use]
    pub const fn uploads(&self) -> &UploadService {
        &self.services.uploads
    }

    #[must_use]
    pub const fn reminders(&self) -> &ReminderService {
        &self.services.reminders
    }

    #[must_use]
    pub const fn course_progress(&self) -> &ProgressService {
        &self.services.progress
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::ids::CourseId;
    use crate::domain::ports::NotificationLevel;
    use crate::outbound::storage::MemoryCredentialStore;
    use crate::test_support::{FixedClock, ScriptedTransport};

    fn client(transport: ScriptedTransport) -> (LmsClient, Arc<ScriptedTransport>) {
        let transport = Arc::new(transport);
        let client = LmsClient::with_parts(
            transport.clone(),
            Arc::new(MemoryCredentialStore::new()),
            Arc::new(FixedClock::epoch()),
            Duration::ZERO,
        );
        (client, transport)
    }

    #[tokio::test]
    async fn login_is_visible_to_later_calls() {
        let (client, transport) = client(
            ScriptedTransport::new()
                .respond(json!({ "login": { "success": true, "token": "T" } }))
                .respond(json!({ "getCourseProgress": null })),
        );
        assert_eq!(client.initialize().expect("init"), AuthState::Unauthenticated);

        client.sessions().login("a@b.com", "pw").await.expect("login");
        client
            .course_progress()
            .course_progress(CourseId::new(1))
            .await
            .expect("progress");

        assert!(client.auth().is_authenticated());
        let recorded = transport.requests();
        assert!(!recorded[0].options.include_auth);
        assert!(recorded[1].options.include_auth);
    }

    #[tokio::test]
    async fn failures_reach_notification_subscribers() {
        let (client, _) = client(ScriptedTransport::new());
        let mut notifications = client.notifications();

        let _err = client
            .sections()
            .course_sections(CourseId::new(1))
            .await
            .expect_err("no scripted response");

        let seen = notifications.recv().await.expect("notification");
        assert_eq!(seen.level, NotificationLevel::Error);
    }

    #[tokio::test]
    async fn tracked_calls_raise_the_loading_indicator() {
        let (client, _) = client(ScriptedTransport::new());
        let observed = client.track(async { client.loading().is_loading() }).await;
        assert!(observed);
        assert!(!client.loading().is_loading());
    }
}
