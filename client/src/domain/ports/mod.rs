//! Ports the domain depends on. Adapters live under `outbound`.

mod macros;
pub(crate) use macros::define_port_error;

mod credential_source;
mod credential_store;
mod graphql_transport;
mod notifier;

pub use credential_source::{CredentialSource, SessionCell};
#[cfg(test)]
pub use credential_store::MockCredentialStore;
pub use credential_store::{
    CredentialStore, CredentialStoreError, LEGACY_TOKEN_KEY, REFRESH_TOKEN_KEY, SessionEntries,
    TOKEN_KEY, USER_KEY, clear_session_entries, session_from_entries, session_to_entries,
};
#[cfg(test)]
pub use graphql_transport::MockGraphqlTransport;
pub use graphql_transport::{
    ExecuteOptions, GraphqlTransport, GraphqlTransportError, IgnoreUploadProgress, UploadProgress,
};
#[cfg(test)]
pub use notifier::MockNotifier;
pub use notifier::{Notification, NotificationLevel, Notifier};
