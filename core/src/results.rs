//! Action results and the default result helpers.
//!
//! An action settles to an [`ActionResult`]:
//!
//! - [`ActionResult::Literal`] - text sent verbatim as the response body
//! - [`ActionResult::Deferred`] - a [`Procedure`] that receives the request,
//!   the response channel and the continuation, and does whatever it wants
//!   with them (redirect, JSON, status, raw writes, pass-through)
//!
//! The helper factories in this module (`view`, `redirect`, `json`,
//! `content`, `status`, `notfound`, `raw`) are available on every controller
//! instance and build the common `Deferred` results.

use crate::context::RequestContext;
use crate::options::DispatchOptions;
use crate::response::{Continuation, ResponseChannel};
use futures::future::{BoxFuture, FutureExt};
use serde::Serialize;
use std::fmt;
use std::future::Future;

/// Names of the default helpers every controller exposes.
pub const DEFAULT_HELPERS: [&str; 7] = [
    "view", "redirect", "json", "content", "status", "notfound", "raw",
];

type ProcedureFn = Box<
    dyn FnOnce(RequestContext, ResponseChannel, Continuation) -> BoxFuture<'static, anyhow::Result<()>>
        + Send,
>;

/// A deferred side effect against the response channel. Runs at most once.
pub struct Procedure(ProcedureFn);

impl Procedure {
    /// Wrap an async closure.
    ///
    /// # Example
    ///
    /// ```
    /// use mvc_dispatch_core::results::Procedure;
    ///
    /// let teapot = Procedure::new(|_req, res, _next| async move {
    ///     res.status(418)?;
    ///     res.send("short and stout")?;
    ///     Ok(())
    /// });
    /// ```
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: FnOnce(RequestContext, ResponseChannel, Continuation) -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self(Box::new(move |req, res, next| f(req, res, next).boxed()))
    }

    /// Run the procedure.
    ///
    /// # Errors
    ///
    /// Returns whatever the procedure returns.
    pub async fn run(
        self,
        request: RequestContext,
        response: ResponseChannel,
        next: Continuation,
    ) -> anyhow::Result<()> {
        (self.0)(request, response, next).await
    }
}

impl fmt::Debug for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Procedure(<fn>)")
    }
}

/// What an action produces.
#[derive(Debug)]
pub enum ActionResult {
    /// Final response body, sent verbatim with the default status.
    Literal(String),
    /// Side-effecting result executed against the response channel.
    Deferred(Procedure),
}

impl ActionResult {
    /// Short label for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Literal(_) => "literal",
            Self::Deferred(_) => "deferred",
        }
    }
}

impl From<String> for ActionResult {
    fn from(text: String) -> Self {
        Self::Literal(text)
    }
}

impl From<&str> for ActionResult {
    fn from(text: &str) -> Self {
        Self::Literal(text.to_string())
    }
}

impl From<Procedure> for ActionResult {
    fn from(procedure: Procedure) -> Self {
        Self::Deferred(procedure)
    }
}

/// Render a view.
///
/// Without a name the view is `<controller>/<action>` for the action being
/// executed. A model that fails to serialize fails the result procedure.
#[must_use]
pub fn view<T: Serialize + ?Sized>(name: Option<&str>, model: &T) -> ActionResult {
    let name = name.map(str::to_string);
    let model = serde_json::to_value(model);
    Procedure::new(move |_req, res, _next| async move {
        let view = match name {
            Some(view) => view,
            None => res
                .route()
                .map(|route| format!("{}/{}", route.controller, route.action))
                .ok_or_else(|| anyhow::anyhow!("no view name and no executing action"))?,
        };
        res.render(&view, &model?)?;
        Ok(())
    })
    .into()
}

/// Redirect to `url` with `status_code` (302 in the usual case).
#[must_use]
pub fn redirect(url: impl Into<String>, status_code: u16) -> ActionResult {
    let url = url.into();
    Procedure::new(move |_req, res, _next| async move {
        res.redirect(status_code, &url)?;
        Ok(())
    })
    .into()
}

/// Send `value` as JSON.
#[must_use]
pub fn json<T: Serialize + ?Sized>(value: &T) -> ActionResult {
    let payload = serde_json::to_value(value);
    Procedure::new(move |_req, res, _next| async move {
        res.json(&payload?)?;
        Ok(())
    })
    .into()
}

/// Send `raw` with an explicit content type (`text/html` in the usual case).
#[must_use]
pub fn content(raw: impl Into<String>, content_type: impl Into<String>) -> ActionResult {
    let raw = raw.into();
    let content_type = content_type.into();
    Procedure::new(move |_req, res, _next| async move {
        res.header("content-type", &content_type)?;
        res.send(raw)?;
        Ok(())
    })
    .into()
}

/// Respond with `status_code` and no body.
#[must_use]
pub fn status(status_code: u16) -> ActionResult {
    Procedure::new(move |_req, res, _next| async move {
        res.status(status_code)?;
        res.end()?;
        Ok(())
    })
    .into()
}

/// Respond with 404 and no body.
#[must_use]
pub fn notfound() -> ActionResult {
    status(404)
}

/// Use `procedure` as the result as-is.
#[must_use]
pub fn raw(procedure: Procedure) -> ActionResult {
    ActionResult::Deferred(procedure)
}

/// Build the result of a default helper reached as an action.
///
/// Helpers routed to directly run with their default arguments; `raw` with
/// nothing to run passes the request on.
#[must_use]
pub fn default_helper_result(name: &str, options: &DispatchOptions) -> Option<ActionResult> {
    let result = match name {
        "view" => view(None, &serde_json::Value::Null),
        "redirect" => redirect(options.mount_path.clone(), 302),
        "json" => json(&serde_json::Value::Null),
        "content" => content(String::new(), "text/html"),
        "status" => status(200),
        "notfound" => notfound(),
        "raw" => raw(Procedure::new(|_req, _res, next| async move {
            next.pass()?;
            Ok(())
        })),
        _ => return None,
    };
    Some(result)
}

/// Whether `name` is one of the default helpers.
#[must_use]
pub fn is_default_helper(name: &str) -> bool {
    DEFAULT_HELPERS.contains(&name)
}
