//! Per-request values.

use http::{HeaderMap, Method};
use serde::Serialize;
use std::sync::Arc;

/// Immutable description of the request being dispatched.
///
/// Created once by the host adapter and shared (cheaply cloned) with actions,
/// gates and result procedures. Never mutated.
#[derive(Debug, Clone)]
pub struct RequestContext {
    inner: Arc<RequestInner>,
}

#[derive(Debug)]
struct RequestInner {
    method: Method,
    path: String,
    query: Option<String>,
    headers: HeaderMap,
    controller_token: Option<String>,
    action_token: Option<String>,
}

impl RequestContext {
    /// Start building a context for `method` and `path`.
    #[must_use]
    pub fn builder(method: Method, path: impl Into<String>) -> RequestContextBuilder {
        RequestContextBuilder {
            method,
            path: path.into(),
            query: None,
            headers: HeaderMap::new(),
            controller_token: None,
            action_token: None,
        }
    }

    /// HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.inner.method
    }

    /// Request path, without query string.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.inner.path
    }

    /// Raw query string, if any.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.inner.query.as_deref()
    }

    /// Request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.inner.headers
    }

    /// Controller segment exactly as it appeared in the path.
    #[must_use]
    pub fn raw_controller_token(&self) -> Option<&str> {
        self.inner.controller_token.as_deref()
    }

    /// Action segment exactly as it appeared in the path.
    #[must_use]
    pub fn raw_action_token(&self) -> Option<&str> {
        self.inner.action_token.as_deref()
    }
}

/// Builder for [`RequestContext`].
#[derive(Debug)]
pub struct RequestContextBuilder {
    method: Method,
    path: String,
    query: Option<String>,
    headers: HeaderMap,
    controller_token: Option<String>,
    action_token: Option<String>,
}

impl RequestContextBuilder {
    /// Set the controller segment.
    #[must_use]
    pub fn controller(mut self, token: impl Into<String>) -> Self {
        self.controller_token = Some(token.into());
        self
    }

    /// Set the action segment.
    #[must_use]
    pub fn action(mut self, token: impl Into<String>) -> Self {
        self.action_token = Some(token.into());
        self
    }

    /// Set the query string.
    #[must_use]
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Set the request headers.
    #[must_use]
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Finish the context.
    #[must_use]
    pub fn build(self) -> RequestContext {
        RequestContext {
            inner: Arc::new(RequestInner {
                method: self.method,
                path: self.path,
                query: self.query,
                headers: self.headers,
                controller_token: self.controller_token.filter(|t| !t.is_empty()),
                action_token: self.action_token.filter(|t| !t.is_empty()),
            }),
        }
    }
}

/// Which controller and action handled a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteInfo {
    /// Lower-cased controller name.
    pub controller: String,
    /// Name of the member that was executed.
    pub action: String,
    /// Lower-cased action token from the request.
    pub original_action: String,
}
