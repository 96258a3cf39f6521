//! Authorization gate.
//!
//! A controller may carry a `can_execute` gate, evaluated after the action is
//! selected and before it runs:
//!
//! | gate                  | verdict                                       |
//! |-----------------------|-----------------------------------------------|
//! | absent                | `Allow`                                       |
//! | `Static(b)`           | `Allow` if `b`, else `Deny`                   |
//! | `Predicate(f)`        | whatever `f(selected, raw)` settles to        |
//!
//! `Deny` hands the request to the next host handler. `Override` runs the
//! returned procedure in place of the action and its result.

use crate::controller::{Controller, ControllerHandle};
use crate::error::DispatchError;
use crate::results::Procedure;
use crate::selector::SelectedAction;
use futures::future::BoxFuture;
use std::fmt;
use std::sync::Arc;

/// Outcome of the authorization gate.
#[derive(Debug)]
pub enum Verdict {
    /// Run the selected action.
    Allow,
    /// Defer to the next host handler.
    Deny,
    /// Produce the response with this procedure instead of the action.
    Override(Procedure),
}

impl Verdict {
    /// Short label for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Deny => "deny",
            Self::Override(_) => "override",
        }
    }
}

impl From<bool> for Verdict {
    fn from(allowed: bool) -> Self {
        if allowed { Self::Allow } else { Self::Deny }
    }
}

impl From<Procedure> for Verdict {
    fn from(procedure: Procedure) -> Self {
        Self::Override(procedure)
    }
}

impl From<Option<Procedure>> for Verdict {
    fn from(procedure: Option<Procedure>) -> Self {
        procedure.map_or(Self::Deny, Self::Override)
    }
}

type PredicateFn<C> = dyn for<'a> Fn(&'a mut Controller<C>, &'a str, &'a str) -> BoxFuture<'a, anyhow::Result<Verdict>>
    + Send
    + Sync;

/// An authorization predicate over controller state `C`.
pub struct GatePredicate<C>(Arc<PredicateFn<C>>);

impl<C> GatePredicate<C> {
    /// Evaluate with the selected and raw action names.
    pub fn call<'a>(
        &self,
        controller: &'a mut Controller<C>,
        selected: &'a str,
        raw: &'a str,
    ) -> BoxFuture<'a, anyhow::Result<Verdict>> {
        (self.0)(controller, selected, raw)
    }
}

impl<C> Clone for GatePredicate<C> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

/// The `can_execute` member of a controller.
pub enum CanExecute<C> {
    /// A fixed answer.
    Static(bool),
    /// Evaluated per request.
    Predicate(GatePredicate<C>),
}

impl<C> CanExecute<C> {
    /// Wrap an async predicate.
    pub fn predicate<F>(f: F) -> Self
    where
        F: for<'a> Fn(
                &'a mut Controller<C>,
                &'a str,
                &'a str,
            ) -> BoxFuture<'a, anyhow::Result<Verdict>>
            + Send
            + Sync
            + 'static,
    {
        Self::Predicate(GatePredicate(Arc::new(f)))
    }
}

impl<C> Clone for CanExecute<C> {
    fn clone(&self) -> Self {
        match self {
            Self::Static(allowed) => Self::Static(*allowed),
            Self::Predicate(predicate) => Self::Predicate(predicate.clone()),
        }
    }
}

impl<C> fmt::Debug for CanExecute<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(allowed) => f.debug_tuple("Static").field(allowed).finish(),
            Self::Predicate(_) => f.write_str("Predicate(<fn>)"),
        }
    }
}

/// Evaluate the gate of `instance` for `selected`.
///
/// # Errors
///
/// Returns [`DispatchError::Authorization`] if the predicate fails.
pub async fn authorize(
    instance: &mut dyn ControllerHandle,
    selected: &SelectedAction,
) -> Result<Verdict, DispatchError> {
    let controller = instance.to_string();
    instance
        .authorize(&selected.name, &selected.raw_name)
        .await
        .map_err(|source| DispatchError::Authorization {
            controller,
            action: selected.name.clone(),
            source,
        })
}
