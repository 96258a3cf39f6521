//! # MVC Dispatch Core
//!
//! Convention-based controller/action dispatch, independent of any HTTP server.
//!
//! Given the path segments of a request, the dispatcher resolves a controller
//! and an action, runs an optional authorization gate, invokes the action and
//! executes what it returns against the response channel.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────┐   ┌───────────┐   ┌──────────┐   ┌──────┐   ┌──────────┐   ┌─────────────┐
//! │ Resolver │ → │ Activator │ → │ Selector │ → │ Gate │ → │ Executor │ → │ Interpreter │
//! └──────────┘   └───────────┘   └──────────┘   └──────┘   └──────────┘   └─────────────┘
//!                      │               │           │            │                │
//!                      └───────────────┴── lifecycle notifications ─────────────┘
//! ```
//!
//! - **Resolver** ([`naming`]): `GET` + `my-page` → `getMyPage`, `myPage`, `catchAll`
//! - **Activator** ([`controller`]): fresh controller instance per request
//! - **Selector** ([`selector`]): first candidate the instance exposes
//! - **Gate** ([`gate`]): `Allow`, `Deny` (defer) or `Override` (gate responds)
//! - **Executor** ([`executor`]): awaits the action, enforces the result contract
//! - **Interpreter** ([`interpreter`]): literal body or deferred procedure
//! - **Lifecycle** ([`lifecycle`]): best-effort observer notifications
//!
//! ## Outcomes
//!
//! Unknown controllers, unmatched actions and denied requests are not errors:
//! they produce [`DispatchOutcome::Deferred`] and the host passes the request
//! to its next handler. Contract violations and failing actions are
//! [`DispatchError`]s for the host's error path.
//!
//! ## Example
//!
//! ```
//! use mvc_dispatch_core::{
//!     ControllerDefinition, ControllerRegistry, DispatchOptions, DispatchOutcome, Dispatcher,
//!     RequestContext,
//! };
//! use http::Method;
//!
//! # tokio_test::block_on(async {
//! let registry = ControllerRegistry::new().register(
//!     ControllerDefinition::<()>::with_default("home")
//!         .sync_action("about", |_ctl, _req| "I'm about page."),
//! );
//! let dispatcher = Dispatcher::new(registry, DispatchOptions::default());
//!
//! let request = RequestContext::builder(Method::GET, "/home/about")
//!     .controller("home")
//!     .action("about")
//!     .build();
//!
//! match dispatcher.dispatch(request).await.unwrap() {
//!     DispatchOutcome::Responded(parts) => {
//!         assert_eq!(parts.body_text().as_deref(), Some("I'm about page."));
//!     }
//!     DispatchOutcome::Deferred(reason) => panic!("deferred: {reason}"),
//! }
//! # });
//! ```

pub mod context;
pub mod controller;
pub mod dispatcher;
pub mod error;
pub mod executor;
pub mod gate;
pub mod interpreter;
pub mod lifecycle;
pub mod loader;
pub mod metrics;
pub mod naming;
pub mod options;
pub mod response;
pub mod results;
pub mod selector;

// Re-export commonly used types
pub use context::{RequestContext, RouteInfo};
pub use controller::{Controller, ControllerDefinition, ControllerHandle, ControllerTemplate};
pub use dispatcher::{DeferReason, DispatchOutcome, Dispatcher};
pub use error::{ActivationError, DispatchError, ObserverError, ResponseError};
pub use executor::ActionOutput;
pub use gate::{CanExecute, Verdict};
pub use lifecycle::{LifecycleEvent, LifecycleObserver, TracingObserver};
pub use loader::{ControllerLoader, ControllerRegistry};
pub use options::DispatchOptions;
pub use response::{Continuation, ResponseChannel, ResponseParts, ViewEngine};
pub use results::{ActionResult, Procedure};

/// Boxed future used by actions and gate predicates.
pub use futures::future::BoxFuture;
