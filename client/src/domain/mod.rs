//! Transport-agnostic core of the LMS client.
//!
//! Purpose: define the entities exchanged with the GraphQL server, the
//! catalog of operations, the error taxonomy and its classification, and
//! the per-domain services built on the shared [`ServiceHook`]. Adapters
//! under `outbound` implement the traits in [`ports`]; nothing here performs
//! I/O directly.
//!
//! Public surface:
//! - [`operations`]: the catalog, one zero-sized type per operation.
//! - [`ServiceError`], [`ClassifiedError`], [`classify`]: failures and how
//!   they are presented.
//! - `*Service`: one service per domain, each owning its call state.

pub mod account;
pub mod auth;
pub mod call_state;
pub mod course;
pub mod curriculum;
pub mod error;
pub mod ids;
pub mod media;
pub mod operations;
pub mod ports;
pub mod progress;
pub mod reminder;
pub mod service_hook;
pub mod session;
mod trace_id;

mod assignment_service;
mod auth_service;
mod course_service;
mod lecture_service;
mod media_service;
mod preferences_service;
mod profile_service;
mod progress_service;
mod quiz_service;
mod reminder_service;
mod section_service;
mod upload_service;

pub use self::assignment_service::AssignmentService;
pub use self::auth::{AuthPayload, CredentialValidationError, LoginCredentials, Registration};
pub use self::auth_service::AuthService;
pub use self::call_state::{CallGuard, CallStatus, CallTracker};
pub use self::course_service::CourseService;
pub use self::error::{ClassifiedError, ErrorClass, ServiceError, classify};
pub use self::lecture_service::LectureService;
pub use self::media_service::MediaService;
pub use self::preferences_service::PreferencesService;
pub use self::profile_service::ProfileService;
pub use self::progress_service::ProgressService;
pub use self::quiz_service::{
    QuizService, QuizValidationError, validate_new_quiz, validate_questions, validate_quiz_update,
};
pub use self::reminder_service::ReminderService;
pub use self::section_service::SectionService;
pub use self::service_hook::{CallSpec, ServiceContext, ServiceHook};
pub use self::session::{
    BearerToken, SessionCredential, SessionUser, StoredSession, TokenValidationError,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::upload_service::UploadService;
