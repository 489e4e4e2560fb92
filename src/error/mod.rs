mod auth;
mod client;
mod store;

pub use auth::AuthError;
pub use client::ClientError;
pub use store::StoreError;

pub trait IsRetryable {
    fn is_retryable(&self) -> bool;
}
