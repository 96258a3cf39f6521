//! Controller definitions and per-request controller instances.
//!
//! A [`ControllerDefinition`] is built once when a controller is loaded. It
//! maps action names to typed handlers (the capability map) and optionally
//! carries a `can_execute` gate. For every request the activator turns the
//! definition into a fresh [`Controller`] owning new state plus the
//! request-scoped bindings.
//!
//! # Example
//!
//! ```
//! use mvc_dispatch_core::controller::ControllerDefinition;
//!
//! #[derive(Default)]
//! struct Home {
//!     visits: u32,
//! }
//!
//! let home = ControllerDefinition::<Home>::with_default("home")
//!     .sync_action("about", |_ctl, _req| "I'm about page.")
//!     .action("promise", |ctl, _req| {
//!         Box::pin(async move {
//!             ctl.visits += 1;
//!             Ok("promise success!".into())
//!         })
//!     });
//! assert!(home.has_action("promise"));
//! ```

use crate::context::RequestContext;
use crate::error::ActivationError;
use crate::executor::ActionOutput;
use crate::gate::{CanExecute, Verdict};
use crate::options::DispatchOptions;
use crate::response::{Continuation, ResponseChannel};
use crate::results::{self, ActionResult, Procedure};
use futures::future::{self, BoxFuture};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

/// Future returned by an action.
pub type ActionFuture<'a> = BoxFuture<'a, anyhow::Result<ActionOutput>>;

type ActionFn<C> =
    dyn for<'a> Fn(&'a mut Controller<C>, RequestContext) -> ActionFuture<'a> + Send + Sync;

/// A typed action bound to controller state `C`.
pub struct ActionHandler<C>(Arc<ActionFn<C>>);

impl<C> Clone for ActionHandler<C> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<C> fmt::Debug for ActionHandler<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ActionHandler(<fn>)")
    }
}

impl<C> ActionHandler<C> {
    /// Wrap an async action.
    pub fn new<F>(f: F) -> Self
    where
        F: for<'a> Fn(&'a mut Controller<C>, RequestContext) -> ActionFuture<'a>
            + Send
            + Sync
            + 'static,
    {
        Self(Arc::new(f))
    }
}

/// Request-scoped bindings attached to every controller instance.
#[derive(Debug, Clone)]
pub struct RequestScope {
    /// Resolved (lower-cased) controller name.
    pub controller_name: String,
    /// The request being dispatched.
    pub request: RequestContext,
    /// Response-writing capability.
    pub response: ResponseChannel,
    /// Pass-through capability.
    pub next: Continuation,
    /// Read-only dispatcher options.
    pub options: Arc<DispatchOptions>,
}

/// Where a member name resolves on an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Member {
    /// Defined by the controller itself.
    Action,
    /// One of the default result helpers.
    Helper,
}

/// Template for controllers with state `C`.
pub struct ControllerDefinition<C> {
    name: String,
    constructor: Option<Arc<dyn Fn() -> C + Send + Sync>>,
    actions: HashMap<String, ActionHandler<C>>,
    can_execute: Option<CanExecute<C>>,
}

impl<C> fmt::Debug for ControllerDefinition<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut actions: Vec<_> = self.actions.keys().collect();
        actions.sort();
        f.debug_struct("ControllerDefinition")
            .field("name", &self.name)
            .field("constructible", &self.constructor.is_some())
            .field("actions", &actions)
            .field("can_execute", &self.can_execute.is_some())
            .finish()
    }
}

impl<C: Send + 'static> ControllerDefinition<C> {
    /// Start a definition without a constructor.
    ///
    /// Activation fails until [`constructor`](Self::constructor) is set.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constructor: None,
            actions: HashMap::new(),
            can_execute: None,
        }
    }

    /// Set the zero-argument constructor for controller state.
    #[must_use]
    pub fn constructor<F>(mut self, f: F) -> Self
    where
        F: Fn() -> C + Send + Sync + 'static,
    {
        self.constructor = Some(Arc::new(f));
        self
    }

    /// Register an async action under `name`.
    #[must_use]
    pub fn action<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: for<'a> Fn(&'a mut Controller<C>, RequestContext) -> ActionFuture<'a>
            + Send
            + Sync
            + 'static,
    {
        self.actions.insert(name.into(), ActionHandler::new(f));
        self
    }

    /// Register a synchronous action under `name`.
    #[must_use]
    pub fn sync_action<F, R>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut Controller<C>, &RequestContext) -> R + Send + Sync + 'static,
        R: Into<ActionOutput>,
    {
        self.action(name, move |ctl, req| {
            let output = f(ctl, &req).into();
            Box::pin(future::ready(Ok(output)))
        })
    }

    /// Install the authorization gate.
    #[must_use]
    pub fn can_execute(mut self, gate: CanExecute<C>) -> Self {
        self.can_execute = Some(gate);
        self
    }

    /// Install an async authorization predicate.
    #[must_use]
    pub fn can_execute_with<F>(self, f: F) -> Self
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
        self.can_execute(CanExecute::predicate(f))
    }

    /// Install a synchronous authorization predicate.
    #[must_use]
    pub fn can_execute_sync<F, V>(self, f: F) -> Self
    where
        F: Fn(&mut Controller<C>, &str, &str) -> V + Send + Sync + 'static,
        V: Into<Verdict>,
    {
        self.can_execute_with(move |ctl, selected, raw| {
            let verdict = f(ctl, selected, raw).into();
            Box::pin(future::ready(Ok(verdict)))
        })
    }

    /// Controller name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the capability map defines `name`.
    #[must_use]
    pub fn has_action(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }
}

impl<C: Default + Send + 'static> ControllerDefinition<C> {
    /// Start a definition constructed with `C::default()`.
    #[must_use]
    pub fn with_default(name: impl Into<String>) -> Self {
        Self::new(name).constructor(C::default)
    }
}

/// Object-safe view of a controller definition, as returned by loaders.
pub trait ControllerTemplate: Send + Sync {
    /// Controller name.
    fn name(&self) -> &str;

    /// Build a fresh instance bound to `scope`.
    ///
    /// # Errors
    ///
    /// Returns [`ActivationError::NotConstructible`] if the template cannot
    /// produce an instance.
    fn activate(
        self: Arc<Self>,
        scope: RequestScope,
    ) -> Result<Box<dyn ControllerHandle>, ActivationError>;
}

/// Object-safe view of an activated controller instance.
pub trait ControllerHandle: Send + fmt::Display {
    /// Request-scoped bindings.
    fn scope(&self) -> &RequestScope;

    /// Two-tier member lookup: controller actions first, then default helpers.
    fn member(&self, name: &str) -> Option<Member>;

    /// Record which action was selected.
    fn set_selected_action(&mut self, name: &str);

    /// Evaluate the `can_execute` gate.
    fn authorize<'a>(
        &'a mut self,
        selected: &'a str,
        raw: &'a str,
    ) -> BoxFuture<'a, anyhow::Result<Verdict>>;

    /// Invoke member `name` with the request context.
    ///
    /// Returns `None` if the instance has no such member.
    fn invoke<'a>(
        &'a mut self,
        name: &'a str,
        request: RequestContext,
    ) -> Option<ActionFuture<'a>>;
}

impl<C: Send + 'static> ControllerTemplate for ControllerDefinition<C> {
    fn name(&self) -> &str {
        &self.name
    }

    fn activate(
        self: Arc<Self>,
        scope: RequestScope,
    ) -> Result<Box<dyn ControllerHandle>, ActivationError> {
        let constructor = self
            .constructor
            .as_ref()
            .ok_or_else(|| ActivationError::NotConstructible(self.name.clone()))?;
        let state = constructor();
        Ok(Box::new(Controller {
            state,
            scope,
            selected_action: None,
            definition: self,
        }))
    }
}

/// A controller instance: fresh state `C` plus request-scoped bindings.
///
/// Derefs to `C`. Formats as the controller's resolved name.
pub struct Controller<C> {
    state: C,
    scope: RequestScope,
    selected_action: Option<String>,
    definition: Arc<ControllerDefinition<C>>,
}

impl<C> Deref for Controller<C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.state
    }
}

impl<C> DerefMut for Controller<C> {
    fn deref_mut(&mut self) -> &mut C {
        &mut self.state
    }
}

impl<C> fmt::Display for Controller<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.scope.controller_name)
    }
}

impl<C> Controller<C> {
    /// Resolved controller name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.scope.controller_name
    }

    /// The request being dispatched.
    #[must_use]
    pub fn request(&self) -> &RequestContext {
        &self.scope.request
    }

    /// Response-writing capability.
    #[must_use]
    pub fn response(&self) -> &ResponseChannel {
        &self.scope.response
    }

    /// Pass-through capability.
    #[must_use]
    pub fn next(&self) -> &Continuation {
        &self.scope.next
    }

    /// Dispatcher options.
    #[must_use]
    pub fn options(&self) -> &DispatchOptions {
        &self.scope.options
    }

    /// Name of the action being executed, once selected.
    #[must_use]
    pub fn selected_action(&self) -> Option<&str> {
        self.selected_action.as_deref()
    }

    /// Render `name` with `model`.
    pub fn view(&self, name: &str, model: impl Serialize) -> ActionResult {
        results::view(Some(name), &model)
    }

    /// Render `<controller>/<action>` with `model`.
    pub fn view_default(&self, model: impl Serialize) -> ActionResult {
        results::view(None, &model)
    }

    /// Redirect to `url` with 302.
    pub fn redirect(&self, url: impl Into<String>) -> ActionResult {
        results::redirect(url, 302)
    }

    /// Redirect to `url` with `status_code`.
    pub fn redirect_with(&self, url: impl Into<String>, status_code: u16) -> ActionResult {
        results::redirect(url, status_code)
    }

    /// Send `value` as JSON.
    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> ActionResult {
        results::json(value)
    }

    /// Send `raw` as `text/html`.
    pub fn content(&self, raw: impl Into<String>) -> ActionResult {
        results::content(raw, "text/html")
    }

    /// Send `raw` with `content_type`.
    pub fn content_with(
        &self,
        raw: impl Into<String>,
        content_type: impl Into<String>,
    ) -> ActionResult {
        results::content(raw, content_type)
    }

    /// Respond with `status_code` and no body.
    pub fn status(&self, status_code: u16) -> ActionResult {
        results::status(status_code)
    }

    /// Respond with 404.
    pub fn notfound(&self) -> ActionResult {
        results::notfound()
    }

    /// Use `procedure` as the result.
    pub fn raw(&self, procedure: Procedure) -> ActionResult {
        results::raw(procedure)
    }
}

impl<C: Send + 'static> ControllerHandle for Controller<C> {
    fn scope(&self) -> &RequestScope {
        &self.scope
    }

    fn member(&self, name: &str) -> Option<Member> {
        if self.definition.has_action(name) {
            Some(Member::Action)
        } else if results::is_default_helper(name) {
            Some(Member::Helper)
        } else {
            None
        }
    }

    fn set_selected_action(&mut self, name: &str) {
        self.selected_action = Some(name.to_string());
    }

    fn authorize<'a>(
        &'a mut self,
        selected: &'a str,
        raw: &'a str,
    ) -> BoxFuture<'a, anyhow::Result<Verdict>> {
        match self.definition.can_execute.clone() {
            None => Box::pin(future::ready(Ok(Verdict::Allow))),
            Some(CanExecute::Static(allowed)) => Box::pin(future::ready(Ok(allowed.into()))),
            Some(CanExecute::Predicate(predicate)) => predicate.call(self, selected, raw),
        }
    }

    fn invoke<'a>(
        &'a mut self,
        name: &'a str,
        request: RequestContext,
    ) -> Option<ActionFuture<'a>> {
        if let Some(handler) = self.definition.actions.get(name).cloned() {
            return Some((handler.0)(self, request));
        }
        let result = results::default_helper_result(name, &self.scope.options)?;
        Some(Box::pin(future::ready(Ok(ActionOutput::Result(result)))))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::response::exchange;
    use http::Method;

    #[derive(Default)]
    struct Counter {
        hits: u32,
    }

    fn scope() -> RequestScope {
        let (response, next) = exchange(None, None);
        RequestScope {
            controller_name: "counter".to_string(),
            request: RequestContext::builder(Method::GET, "/counter/hit").build(),
            response,
            next,
            options: Arc::new(DispatchOptions::default()),
        }
    }

    fn definition() -> Arc<ControllerDefinition<Counter>> {
        Arc::new(
            ControllerDefinition::<Counter>::with_default("counter")
                .sync_action("hit", |ctl, _req| {
                    ctl.hits += 1;
                    format!("hits={}", ctl.hits)
                })
                .sync_action("view", |_ctl, _req| "custom view"),
        )
    }

    #[test]
    fn definition_without_constructor_is_not_constructible() {
        let template = Arc::new(ControllerDefinition::<Counter>::new("broken"));
        let err = template.activate(scope()).err().expect("activation must fail");
        assert_eq!(err, ActivationError::NotConstructible("broken".to_string()));
    }

    #[test]
    fn instance_formats_as_controller_name() {
        let instance = definition().activate(scope()).unwrap();
        assert_eq!(instance.to_string(), "counter");
    }

    #[test]
    fn controller_members_win_over_helpers() {
        let instance = definition().activate(scope()).unwrap();
        assert_eq!(instance.member("view"), Some(Member::Action));
        assert_eq!(instance.member("json"), Some(Member::Helper));
        assert_eq!(instance.member("hit"), Some(Member::Action));
        assert_eq!(instance.member("missing"), None);
    }

    #[tokio::test]
    async fn each_activation_gets_fresh_state() {
        let definition = definition();
        for _ in 0..2 {
            let mut instance = Arc::clone(&definition).activate(scope()).unwrap();
            let request = instance.scope().request.clone();
            let output = instance.invoke("hit", request).unwrap().await.unwrap();
            assert!(
                matches!(output, ActionOutput::Result(ActionResult::Literal(ref text)) if text == "hits=1")
            );
        }
    }

    #[tokio::test]
    async fn overridden_helper_invokes_controller_action() {
        let mut instance = definition().activate(scope()).unwrap();
        let request = instance.scope().request.clone();
        let output = instance.invoke("view", request).unwrap().await.unwrap();
        assert!(
            matches!(output, ActionOutput::Result(ActionResult::Literal(ref text)) if text == "custom view")
        );
    }

    #[tokio::test]
    async fn missing_member_is_not_invoked() {
        let mut instance = definition().activate(scope()).unwrap();
        let request = instance.scope().request.clone();
        assert!(instance.invoke("missing", request).is_none());
    }
}
