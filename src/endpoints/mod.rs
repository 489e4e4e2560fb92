//! Typed bindings for the Pathways REST API, as inherent methods on [`ApiClient`].

mod catalog;
mod quiz;
mod users;

pub use quiz::QuizSubmission;

use pathways_schema::{Listing, Record};
use serde::de::DeserializeOwned;

use crate::client::{ApiClient, ApiRequest};
use crate::error::ClientError;

impl ApiClient {
    async fn fetch_list<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<Vec<T>, ClientError> {
        Ok(self.send_json::<Listing<T>>(request).await?.into_vec())
    }

    async fn fetch_record<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ClientError> {
        Ok(self.send_json::<Record<T>>(request).await?.into_inner())
    }
}

fn search_term(term: &str) -> Result<&str, ClientError> {
    let term = term.trim();
    if term.is_empty() {
        return Err(ClientError::InvalidRequest("Search term must not be empty"));
    }
    Ok(term)
}
