//! Axum web framework integration for MVC dispatch.
//!
//! This crate mounts a [`Dispatcher`](mvc_dispatch_core::Dispatcher) into an
//! axum/tower stack. The host router stays in charge of everything the
//! dispatcher does not claim.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │         Host (Axum)                     │  ← HTTP, TLS, static files
//! │  - MvcLayer / MvcService                │  ← route binding, spans
//! │  - inner service = "next handler"       │  ← deferred requests
//! ├─────────────────────────────────────────┤
//! │         Dispatch core                   │
//! │  - name resolution, selection           │  ← no HTTP server types
//! │  - gate, execution, results             │
//! │  - lifecycle notifications              │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Request Flow
//!
//! 1. **HTTP Request** reaches `MvcService`
//! 2. **Bind** `{mount}:controller?/:action?` into a request context
//! 3. **Dispatch** through the core dispatcher
//! 4. **Responded**: the written status, headers and body go out
//! 5. **Deferred**: the request continues to the inner service
//! 6. **Hard failure**: the standard JSON error response (500)
//!
//! # Example
//!
//! ```
//! use axum::Router;
//! use mvc_dispatch_core::{ControllerDefinition, ControllerRegistry, DispatchOptions, Dispatcher};
//!
//! let registry = ControllerRegistry::new().register(
//!     ControllerDefinition::<()>::with_default("home").sync_action("about", |_c, _r| "about"),
//! );
//! let dispatcher = Dispatcher::new(registry, DispatchOptions::default());
//!
//! let app: Router = mvc_dispatch_web::router(
//!     dispatcher,
//!     Router::new().fallback(|| async { "not found" }),
//! );
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod middleware;
pub mod response;
pub mod route;

// Re-export key types for convenience
pub use error::AppError;
pub use middleware::{router, MvcLayer, MvcService};
pub use response::into_response;
pub use route::{route_pattern, RouteTokens};
