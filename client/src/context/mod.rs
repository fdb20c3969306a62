//! Process-wide state providers shared by services and the front end.
//!
//! Each provider publishes its state through a `tokio::sync::watch` channel
//! so any number of observers can follow it without polling.

pub mod auth;
pub mod loading;
pub mod preview;
pub mod progress;

pub use auth::{AuthContext, AuthState};
pub use loading::{DEFAULT_LOADING_GRACE, LoadingGuard, LoadingTracker};
pub use preview::{PreviewContext, PreviewState};
pub use progress::ProgressContext;
