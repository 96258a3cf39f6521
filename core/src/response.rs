//! Response-writing and continuation capabilities.
//!
//! A dispatch owns one exchange. The [`ResponseChannel`] writes to it and the
//! [`Continuation`] hands it back to the host chain. Both share the same state,
//! so exactly one of them can complete the exchange: after `send`, `json`,
//! `redirect`, `render`, `end` or `pass`, every further write fails with
//! [`ResponseError::AlreadyCompleted`].

use crate::context::RouteInfo;
use crate::error::ResponseError;
use http::header::{CONTENT_TYPE, LOCATION};
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use serde::Serialize;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Renders named views. Supplied by the host; the dispatcher never parses templates.
pub trait ViewEngine: Send + Sync {
    /// Render `view` with `model` into an HTML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the view does not exist or fails to render.
    fn render(&self, view: &str, model: &serde_json::Value) -> anyhow::Result<String>;
}

/// Everything written to the response channel during one dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseParts {
    /// Explicit status; `None` means the host default (200).
    pub status: Option<StatusCode>,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body; `None` when nothing was written.
    pub body: Option<Vec<u8>>,
    /// Controller and action that produced the response.
    pub route: Option<RouteInfo>,
}

impl ResponseParts {
    /// Status to put on the wire.
    #[must_use]
    pub fn status_or_default(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }

    /// Body decoded as UTF-8, lossy.
    #[must_use]
    pub fn body_text(&self) -> Option<String> {
        self.body
            .as_deref()
            .map(|b| String::from_utf8_lossy(b).into_owned())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Completion {
    Open,
    Sent,
    Passed,
}

#[derive(Debug)]
struct ExchangeState {
    parts: ResponseParts,
    completion: Completion,
}

type SharedState = Arc<Mutex<ExchangeState>>;

fn lock(state: &SharedState) -> MutexGuard<'_, ExchangeState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// How an exchange ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeOutcome {
    /// The response channel holds the response to send.
    Responded(ResponseParts),
    /// The continuation was invoked; the host chain handles the request.
    PassedThrough,
}

/// Create the response channel and continuation for one dispatch.
pub(crate) fn exchange(
    views: Option<Arc<dyn ViewEngine>>,
    route: Option<RouteInfo>,
) -> (ResponseChannel, Continuation) {
    let state = Arc::new(Mutex::new(ExchangeState {
        parts: ResponseParts {
            route,
            ..ResponseParts::default()
        },
        completion: Completion::Open,
    }));
    (
        ResponseChannel {
            state: Arc::clone(&state),
            views,
        },
        Continuation { state },
    )
}

/// Close the exchange and take what was written.
///
/// An exchange nobody completed still counts as responded: whatever status
/// and headers were set go out with an empty body. Clones of the channel that
/// outlive the dispatch can no longer write.
pub(crate) fn finish(channel: &ResponseChannel) -> ExchangeOutcome {
    let mut state = lock(&channel.state);
    match state.completion {
        Completion::Passed => ExchangeOutcome::PassedThrough,
        Completion::Open | Completion::Sent => {
            state.completion = Completion::Sent;
            ExchangeOutcome::Responded(std::mem::take(&mut state.parts))
        }
    }
}

/// Response-writing capability handed to result procedures.
#[derive(Clone)]
pub struct ResponseChannel {
    state: SharedState,
    views: Option<Arc<dyn ViewEngine>>,
}

impl fmt::Debug for ResponseChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseChannel")
            .field("state", &self.state)
            .field("views", &self.views.is_some())
            .finish()
    }
}

impl ResponseChannel {
    fn with_open<R>(&self, f: impl FnOnce(&mut ResponseParts) -> R) -> Result<R, ResponseError> {
        let mut state = lock(&self.state);
        if state.completion != Completion::Open {
            return Err(ResponseError::AlreadyCompleted);
        }
        Ok(f(&mut state.parts))
    }

    fn complete(&self, f: impl FnOnce(&mut ResponseParts)) -> Result<(), ResponseError> {
        let mut state = lock(&self.state);
        if state.completion != Completion::Open {
            return Err(ResponseError::AlreadyCompleted);
        }
        f(&mut state.parts);
        state.completion = Completion::Sent;
        Ok(())
    }

    /// Whether the response was already sent or passed on.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        lock(&self.state).completion != Completion::Open
    }

    /// Controller and action being executed, if selection happened.
    #[must_use]
    pub fn route(&self) -> Option<RouteInfo> {
        lock(&self.state).parts.route.clone()
    }

    pub(crate) fn set_route(&self, route: RouteInfo) {
        lock(&self.state).parts.route = Some(route);
    }

    /// Set the status code.
    ///
    /// # Errors
    ///
    /// Fails if the code is invalid or the response already completed.
    pub fn status(&self, code: u16) -> Result<(), ResponseError> {
        let status = StatusCode::from_u16(code).map_err(|_| ResponseError::InvalidStatus(code))?;
        self.with_open(|parts| parts.status = Some(status))
    }

    /// Set a header, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Fails if the header is invalid or the response already completed.
    pub fn header(&self, name: &str, value: &str) -> Result<(), ResponseError> {
        let name = HeaderName::try_from(name)
            .map_err(|_| ResponseError::InvalidHeader(name.to_string()))?;
        let value = HeaderValue::try_from(value)
            .map_err(|_| ResponseError::InvalidHeader(name.to_string()))?;
        self.with_open(|parts| {
            parts.headers.insert(name, value);
        })
    }

    /// Send `body` as the full response. Defaults the content type to HTML.
    ///
    /// # Errors
    ///
    /// Fails if the response already completed.
    pub fn send(&self, body: impl Into<Vec<u8>>) -> Result<(), ResponseError> {
        let body = body.into();
        self.complete(|parts| {
            parts
                .headers
                .entry(CONTENT_TYPE)
                .or_insert(HeaderValue::from_static("text/html; charset=utf-8"));
            parts.body = Some(body);
        })
    }

    /// Serialize `value` and send it as `application/json`.
    ///
    /// # Errors
    ///
    /// Fails if serialization fails or the response already completed.
    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> Result<(), ResponseError> {
        let body = serde_json::to_vec(value)?;
        self.complete(|parts| {
            parts
                .headers
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            parts.body = Some(body);
        })
    }

    /// Redirect to `url` with `code`. Writes no body.
    ///
    /// # Errors
    ///
    /// Fails if the code or url is invalid, or the response already completed.
    pub fn redirect(&self, code: u16, url: &str) -> Result<(), ResponseError> {
        let status = StatusCode::from_u16(code).map_err(|_| ResponseError::InvalidStatus(code))?;
        let location =
            HeaderValue::try_from(url).map_err(|_| ResponseError::InvalidHeader(url.to_string()))?;
        self.complete(|parts| {
            parts.status = Some(status);
            parts.headers.insert(LOCATION, location);
        })
    }

    /// Render `view` through the host's view engine and send the HTML.
    ///
    /// # Errors
    ///
    /// Fails without a view engine, when rendering fails, or if the response
    /// already completed.
    pub fn render(&self, view: &str, model: &serde_json::Value) -> Result<(), ResponseError> {
        let Some(engine) = &self.views else {
            return Err(ResponseError::NoViewEngine(view.to_string()));
        };
        if self.is_completed() {
            return Err(ResponseError::AlreadyCompleted);
        }
        let html = engine
            .render(view, model)
            .map_err(|source| ResponseError::Render {
                view: view.to_string(),
                source,
            })?;
        self.send(html)
    }

    /// Complete the response without a body.
    ///
    /// # Errors
    ///
    /// Fails if the response already completed.
    pub fn end(&self) -> Result<(), ResponseError> {
        self.complete(|_| {})
    }
}

/// Pass-through capability: hand the request to the next host handler.
#[derive(Debug, Clone)]
pub struct Continuation {
    state: SharedState,
}

impl Continuation {
    /// Defer to the next handler in the host chain.
    ///
    /// # Errors
    ///
    /// Fails if the response already completed.
    pub fn pass(&self) -> Result<(), ResponseError> {
        let mut state = lock(&self.state);
        if state.completion != Completion::Open {
            return Err(ResponseError::AlreadyCompleted);
        }
        state.completion = Completion::Passed;
        Ok(())
    }
}
