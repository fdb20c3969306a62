//! Credential store adapters.
//!
//! Both adapters persist the flat key/value layout defined by the
//! `CredentialStore` port, so a session saved by one can be read back by
//! the other's conversion helpers.

mod file;
mod memory;

pub use file::{FileCredentialStore, SESSION_FILE_NAME};
pub use memory::MemoryCredentialStore;
