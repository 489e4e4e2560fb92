pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod store;
pub(crate) mod utils;

pub use client::{AUTH_ERROR_EVENT, ApiClient, ApiRequest, AuthErrorEvent};
pub use config::Config;
pub use endpoints::QuizSubmission;
pub use error::{AuthError, ClientError, StoreError};
pub use store::{CredentialStore, Credentials, FileStore, MemoryStore};
