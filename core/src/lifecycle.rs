//! Lifecycle notifications.
//!
//! Five events fire around every dispatch that reaches execution, always in
//! this order:
//!
//! ```text
//! controllerCreated → beforeExecuteAction → afterExecuteAction
//!                   → beforeExecuteResult → afterExecuteResult
//! ```
//!
//! Observers are purely observational. A failing or panicking observer is
//! logged, counted and skipped; dispatch continues.

use crate::error::ObserverError;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// A lifecycle notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent<'a> {
    /// A controller instance was activated.
    ControllerCreated {
        /// Controller name
        controller: &'a str,
    },
    /// An action was selected and is about to be authorized and executed.
    BeforeExecuteAction {
        /// Controller name
        controller: &'a str,
        /// Lower-cased action token
        raw_action: &'a str,
        /// Selected member name
        selected_action: &'a str,
    },
    /// The action settled.
    AfterExecuteAction {
        /// Controller name
        controller: &'a str,
        /// Selected member name
        selected_action: &'a str,
    },
    /// The result is about to be executed.
    BeforeExecuteResult {
        /// Controller name
        controller: &'a str,
        /// Selected member name
        selected_action: &'a str,
    },
    /// The result was executed.
    AfterExecuteResult {
        /// Controller name
        controller: &'a str,
        /// Selected member name
        selected_action: &'a str,
    },
}

impl LifecycleEvent<'_> {
    /// Event name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ControllerCreated { .. } => "controllerCreated",
            Self::BeforeExecuteAction { .. } => "beforeExecuteAction",
            Self::AfterExecuteAction { .. } => "afterExecuteAction",
            Self::BeforeExecuteResult { .. } => "beforeExecuteResult",
            Self::AfterExecuteResult { .. } => "afterExecuteResult",
        }
    }

    /// Controller the event concerns.
    #[must_use]
    pub const fn controller(&self) -> &str {
        match self {
            Self::ControllerCreated { controller }
            | Self::BeforeExecuteAction { controller, .. }
            | Self::AfterExecuteAction { controller, .. }
            | Self::BeforeExecuteResult { controller, .. }
            | Self::AfterExecuteResult { controller, .. } => *controller,
        }
    }
}

impl fmt::Display for LifecycleEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.controller())
    }
}

/// Receives lifecycle notifications.
///
/// Implemented for any `Fn(&LifecycleEvent) -> Result<(), ObserverError>`.
pub trait LifecycleObserver: Send + Sync {
    /// Handle one event.
    ///
    /// # Errors
    ///
    /// Errors are logged and discarded by the emitter.
    fn on_event(&self, event: &LifecycleEvent<'_>) -> Result<(), ObserverError>;
}

impl<F> LifecycleObserver for F
where
    F: Fn(&LifecycleEvent<'_>) -> Result<(), ObserverError> + Send + Sync,
{
    fn on_event(&self, event: &LifecycleEvent<'_>) -> Result<(), ObserverError> {
        self(event)
    }
}

/// Logs every event at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl LifecycleObserver for TracingObserver {
    fn on_event(&self, event: &LifecycleEvent<'_>) -> Result<(), ObserverError> {
        match *event {
            LifecycleEvent::ControllerCreated { controller } => {
                tracing::debug!(controller, "Controller created");
            }
            LifecycleEvent::BeforeExecuteAction {
                controller,
                raw_action,
                selected_action,
            } => {
                tracing::debug!(controller, raw_action, selected_action, "Before execute action");
            }
            LifecycleEvent::AfterExecuteAction {
                controller,
                selected_action,
            } => {
                tracing::debug!(controller, selected_action, "After execute action");
            }
            LifecycleEvent::BeforeExecuteResult {
                controller,
                selected_action,
            } => {
                tracing::debug!(controller, selected_action, "Before execute result");
            }
            LifecycleEvent::AfterExecuteResult {
                controller,
                selected_action,
            } => {
                tracing::debug!(controller, selected_action, "After execute result");
            }
        }
        Ok(())
    }
}

/// Ordered list of observers.
#[derive(Clone, Default)]
pub struct Lifecycle {
    observers: Vec<Arc<dyn LifecycleObserver>>,
}

impl fmt::Debug for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lifecycle")
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Lifecycle {
    /// Empty lifecycle.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    /// Append an observer; observers are notified in registration order.
    pub fn subscribe(&mut self, observer: Arc<dyn LifecycleObserver>) {
        self.observers.push(observer);
    }

    /// Number of registered observers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Whether no observers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Notify every observer of `event`, isolating failures.
    pub fn emit(&self, event: &LifecycleEvent<'_>) {
        for observer in &self.observers {
            match panic::catch_unwind(AssertUnwindSafe(|| observer.on_event(event))) {
                Ok(Ok(())) => {}
                Ok(Err(error)) => {
                    crate::metrics::record_observer_failure();
                    tracing::warn!(event = event.name(), %error, "Lifecycle observer failed");
                }
                Err(_) => {
                    crate::metrics::record_observer_failure();
                    tracing::warn!(event = event.name(), "Lifecycle observer panicked");
                }
            }
        }
    }
}
