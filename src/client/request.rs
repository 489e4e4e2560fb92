use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use url::Url;
use uuid::Uuid;

use crate::error::ClientError;

/// Description of one API call, relative to the client's base URL.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    segments: Vec<String>,
    query: Vec<(String, String)>,
    body: Option<Value>,
    authenticated: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            segments: Vec::new(),
            query: Vec::new(),
            body: None,
            authenticated: true,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// Appends one percent-encoded path segment (ids, search terms).
    #[must_use]
    pub fn segment(mut self, segment: impl ToString) -> Self {
        self.segments.push(segment.to_string());
        self
    }

    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Adds every non-null field of a serializable struct as a query parameter.
    pub fn query_from<T: Serialize>(mut self, params: &T) -> Result<Self, ClientError> {
        if let Value::Object(map) = serde_json::to_value(params)? {
            for (key, value) in map {
                match value {
                    Value::Null => {}
                    Value::String(s) => self.query.push((key, s)),
                    other => self.query.push((key, other.to_string())),
                }
            }
        }
        Ok(self)
    }

    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, ClientError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Sends without a bearer token and lets a 401 through as an ordinary error response.
    #[must_use]
    pub fn anonymous(mut self) -> Self {
        self.authenticated = false;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Resolves the request under `base`, keeping any path prefix the base carries.
    pub fn url(&self, base: &Url) -> Result<Url, ClientError> {
        let mut url = base.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|()| ClientError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(self.path.split('/').filter(|s| !s.is_empty()))
            .extend(&self.segments);
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }
        Ok(url)
    }

    pub(crate) fn build(
        &self,
        http: &reqwest::Client,
        base: &Url,
        bearer: Option<&str>,
    ) -> Result<reqwest::Request, ClientError> {
        let mut builder = http.request(self.method.clone(), self.url(base)?);
        if let Some(token) = bearer.filter(|_| self.authenticated) {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = self.body.as_ref() {
            builder = builder.json(body);
        }
        Ok(builder.build()?)
    }
}

/// An in-progress call: the request plus per-call bookkeeping.
#[derive(Debug)]
pub(crate) struct PendingRequest {
    pub(crate) id: Uuid,
    pub(crate) request: ApiRequest,
    auth_retried: bool,
}

impl PendingRequest {
    pub(crate) fn new(request: ApiRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            request,
            auth_retried: false,
        }
    }

    /// Marks the request as replayed after a 401. Returns `false` if it already was.
    pub(crate) fn mark_auth_retry(&mut self) -> bool {
        !std::mem::replace(&mut self.auth_retried, true)
    }
}
