//! The dispatch state machine.
//!
//! ```text
//! Start → Resolving → Selecting ──NotFound──────────────→ Deferred
//!                         │
//!                         ▼
//!                    Authorizing ──Denied───────────────→ Deferred
//!                         │      ──Overridden───────────→ Responded
//!                         ▼
//!                    Executing → Interpreting ──────────→ Responded
//!                                              (pass)──→ Deferred
//! ```
//!
//! `Deferred` hands the request back to the host chain. Hard failures
//! ([`DispatchError`]) propagate to the host's error path.

use crate::context::{RequestContext, RouteInfo};
use crate::controller::RequestScope;
use crate::error::DispatchError;
use crate::executor;
use crate::gate::{self, Verdict};
use crate::interpreter;
use crate::lifecycle::{Lifecycle, LifecycleEvent, LifecycleObserver, TracingObserver};
use crate::loader::ControllerLoader;
use crate::naming::resolve_candidates;
use crate::options::DispatchOptions;
use crate::response::{exchange, finish, ExchangeOutcome, ResponseParts, ViewEngine};
use crate::selector::{self, Selection};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Why a request was handed back to the host chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferReason {
    /// The last path segment looks like a file name.
    StaticAsset,
    /// The loader knows no such controller.
    ControllerNotFound,
    /// No candidate action matched.
    ActionNotFound,
    /// The authorization gate denied the action.
    Denied,
    /// The result procedure invoked the continuation.
    PassedThrough,
}

impl DeferReason {
    /// Short label for metrics and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StaticAsset => "static_asset",
            Self::ControllerNotFound => "controller_not_found",
            Self::ActionNotFound => "action_not_found",
            Self::Denied => "denied",
            Self::PassedThrough => "passed_through",
        }
    }
}

impl fmt::Display for DeferReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal state of a dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The response channel was written.
    Responded(ResponseParts),
    /// The host chain should handle the request.
    Deferred(DeferReason),
}

/// Whether the final path segment carries a file extension.
///
/// # Examples
///
/// ```
/// use mvc_dispatch_core::dispatcher::is_static_asset;
///
/// assert!(is_static_asset("/css/site.css"));
/// assert!(!is_static_asset("/home/index"));
/// assert!(!is_static_asset("/.well-known"));
/// ```
#[must_use]
pub fn is_static_asset(path: &str) -> bool {
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .is_some_and(|segment| Path::new(segment).extension().is_some())
}

/// Resolves requests to controller actions and executes them.
#[derive(Clone)]
pub struct Dispatcher {
    loader: Arc<dyn ControllerLoader>,
    options: Arc<DispatchOptions>,
    lifecycle: Lifecycle,
    views: Option<Arc<dyn ViewEngine>>,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("options", &self.options)
            .field("lifecycle", &self.lifecycle)
            .field("views", &self.views.is_some())
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Create a dispatcher over `loader`.
    ///
    /// With `enable_hooks` set, a [`TracingObserver`] is registered first.
    pub fn new(loader: impl ControllerLoader + 'static, options: DispatchOptions) -> Self {
        let options = options.normalized();
        let mut lifecycle = Lifecycle::new();
        if options.enable_hooks {
            lifecycle.subscribe(Arc::new(TracingObserver));
        }
        Self {
            loader: Arc::new(loader),
            options: Arc::new(options),
            lifecycle,
            views: None,
        }
    }

    /// Append a lifecycle observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn LifecycleObserver>) -> Self {
        self.lifecycle.subscribe(observer);
        self
    }

    /// Use `engine` to render views.
    #[must_use]
    pub fn with_view_engine(mut self, engine: Arc<dyn ViewEngine>) -> Self {
        self.views = Some(engine);
        self
    }

    /// Dispatcher options.
    #[must_use]
    pub fn options(&self) -> &DispatchOptions {
        &self.options
    }

    /// Dispatch one request.
    ///
    /// # Errors
    ///
    /// Returns a [`DispatchError`] for hard failures: activation errors,
    /// contract violations, and failures of actions, gates or result
    /// procedures.
    pub async fn dispatch(&self, request: RequestContext) -> Result<DispatchOutcome, DispatchError> {
        let started = Instant::now();
        let result = self.run(request).await;
        let elapsed = started.elapsed();

        match &result {
            Ok(DispatchOutcome::Responded(_)) => crate::metrics::record_responded(elapsed),
            Ok(DispatchOutcome::Deferred(reason)) => {
                crate::metrics::record_deferred(reason.as_str(), elapsed);
            }
            Err(error) => {
                crate::metrics::record_error(error.kind(), elapsed);
                tracing::error!(kind = error.kind(), %error, "Dispatch failed");
            }
        }

        result
    }

    fn defer(reason: DeferReason) -> Result<DispatchOutcome, DispatchError> {
        tracing::debug!(%reason, "Deferring to next handler");
        Ok(DispatchOutcome::Deferred(reason))
    }

    async fn run(&self, request: RequestContext) -> Result<DispatchOutcome, DispatchError> {
        if is_static_asset(request.path()) {
            return Self::defer(DeferReason::StaticAsset);
        }

        let controller_name = request
            .raw_controller_token()
            .unwrap_or(self.options.default_controller_name.as_str())
            .to_lowercase();
        let action_name = request
            .raw_action_token()
            .unwrap_or(self.options.default_action_name.as_str())
            .to_lowercase();

        let Some(template) = self.loader.load(&controller_name) else {
            tracing::debug!(controller = %controller_name, "Controller not found");
            return Self::defer(DeferReason::ControllerNotFound);
        };

        let (response, next) = exchange(self.views.clone(), None);
        let scope = RequestScope {
            controller_name: controller_name.clone(),
            request: request.clone(),
            response: response.clone(),
            next: next.clone(),
            options: Arc::clone(&self.options),
        };
        let mut instance = template.activate(scope)?;
        let controller = instance.to_string();
        self.lifecycle.emit(&LifecycleEvent::ControllerCreated {
            controller: &controller,
        });

        let candidates = resolve_candidates(
            request.method().as_str(),
            &action_name,
            &self.options.fallback_action_name,
        );
        let Selection::Found(selected) =
            selector::select(&candidates, &action_name, &*instance, &self.options)
        else {
            tracing::debug!(%controller, %candidates, "No matching action");
            return Self::defer(DeferReason::ActionNotFound);
        };

        instance.set_selected_action(&selected.name);
        response.set_route(RouteInfo {
            controller: controller_name,
            action: selected.name.clone(),
            original_action: action_name,
        });
        self.lifecycle.emit(&LifecycleEvent::BeforeExecuteAction {
            controller: &controller,
            raw_action: &selected.raw_name,
            selected_action: &selected.name,
        });

        match gate::authorize(&mut *instance, &selected).await? {
            Verdict::Allow => {}
            Verdict::Deny => {
                tracing::debug!(%controller, action = %selected.name, "Authorization denied");
                return Self::defer(DeferReason::Denied);
            }
            Verdict::Override(procedure) => {
                tracing::debug!(%controller, action = %selected.name, "Authorization override");
                interpreter::run(procedure, &request, &response, &next).await?;
                return Self::conclude(finish(&response));
            }
        }

        let result = executor::execute(&mut *instance, &selected, request.clone()).await?;
        self.lifecycle.emit(&LifecycleEvent::AfterExecuteAction {
            controller: &controller,
            selected_action: &selected.name,
        });

        self.lifecycle.emit(&LifecycleEvent::BeforeExecuteResult {
            controller: &controller,
            selected_action: &selected.name,
        });
        interpreter::interpret(result, &request, &response, &next).await?;
        self.lifecycle.emit(&LifecycleEvent::AfterExecuteResult {
            controller: &controller,
            selected_action: &selected.name,
        });

        Self::conclude(finish(&response))
    }

    fn conclude(outcome: ExchangeOutcome) -> Result<DispatchOutcome, DispatchError> {
        match outcome {
            ExchangeOutcome::Responded(parts) => Ok(DispatchOutcome::Responded(parts)),
            ExchangeOutcome::PassedThrough => Self::defer(DeferReason::PassedThrough),
        }
    }
}
