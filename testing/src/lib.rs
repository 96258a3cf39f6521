//! # MVC Dispatch Testing
//!
//! Testing utilities and helpers for MVC dispatch.
//!
//! This crate provides:
//! - Mock observers and view engines
//! - Request builders that bind path segments the way the web adapter does
//! - Property-based testing strategies
//! - A Given-When-Then harness for dispatches
//!
//! ## Example
//!
//! ```
//! use mvc_dispatch_core::{ControllerDefinition, ControllerRegistry, DispatchOptions, Dispatcher};
//! use mvc_dispatch_testing::{get, DispatchTest};
//!
//! # tokio_test::block_on(async {
//! let registry = ControllerRegistry::new().register(
//!     ControllerDefinition::<()>::with_default("home").sync_action("index", |_c, _r| "ok"),
//! );
//!
//! DispatchTest::new(Dispatcher::new(registry, DispatchOptions::default()))
//!     .when_request(get("/home/index"))
//!     .then_body("ok")
//!     .then_status(200)
//!     .run()
//!     .await
//!     .unwrap();
//! # });
//! ```

mod dispatch_test;

pub use dispatch_test::{assertions, DispatchTest};

/// Mock collaborators for the dispatcher.
pub mod mocks {
    use anyhow::anyhow;
    use mvc_dispatch_core::{LifecycleEvent, LifecycleObserver, ObserverError, ViewEngine};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex, PoisonError};

    /// Records the name of every lifecycle event it sees.
    ///
    /// # Example
    ///
    /// ```
    /// use mvc_dispatch_core::{LifecycleEvent, LifecycleObserver};
    /// use mvc_dispatch_testing::mocks::RecordingObserver;
    ///
    /// let observer = RecordingObserver::new();
    /// observer
    ///     .on_event(&LifecycleEvent::ControllerCreated { controller: "home" })
    ///     .ok();
    /// assert_eq!(observer.events(), vec!["controllerCreated"]);
    /// ```
    #[derive(Debug, Clone, Default)]
    pub struct RecordingObserver {
        events: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingObserver {
        /// Create an empty recorder
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Event names seen so far, in order
        #[must_use]
        pub fn events(&self) -> Vec<String> {
            self.events
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// Forget recorded events
        pub fn clear(&self) {
            self.events
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clear();
        }
    }

    impl LifecycleObserver for RecordingObserver {
        fn on_event(&self, event: &LifecycleEvent<'_>) -> Result<(), ObserverError> {
            self.events
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(event.name().to_string());
            Ok(())
        }
    }

    /// Fails on every event.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct FailingObserver;

    impl LifecycleObserver for FailingObserver {
        fn on_event(&self, event: &LifecycleEvent<'_>) -> Result<(), ObserverError> {
            Err(format!("observer rejected {}", event.name()).into())
        }
    }

    /// Panics on every event.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct PanickingObserver;

    impl LifecycleObserver for PanickingObserver {
        #[allow(clippy::panic)] // Exercises observer isolation
        fn on_event(&self, event: &LifecycleEvent<'_>) -> Result<(), ObserverError> {
            panic!("observer panicked on {}", event.name())
        }
    }

    /// Renders `<view>|<model json>` for every view.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct EchoViewEngine;

    impl ViewEngine for EchoViewEngine {
        fn render(&self, view: &str, model: &serde_json::Value) -> anyhow::Result<String> {
            Ok(format!("{view}|{model}"))
        }
    }

    /// Serves fixed templates; `{{model}}` is replaced by the model JSON.
    ///
    /// Unknown views fail to render.
    #[derive(Debug, Clone, Default)]
    pub struct StaticViewEngine {
        templates: HashMap<String, String>,
    }

    impl StaticViewEngine {
        /// Create an engine with no templates
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Add a template
        #[must_use]
        pub fn with_view(mut self, name: impl Into<String>, template: impl Into<String>) -> Self {
            self.templates.insert(name.into(), template.into());
            self
        }
    }

    impl ViewEngine for StaticViewEngine {
        fn render(&self, view: &str, model: &serde_json::Value) -> anyhow::Result<String> {
            let template = self
                .templates
                .get(view)
                .ok_or_else(|| anyhow!("view '{view}' not found"))?;
            Ok(template.replace("{{model}}", &model.to_string()))
        }
    }
}

/// Test helpers and utilities.
pub mod helpers {
    use http::Method;
    use mvc_dispatch_core::RequestContext;

    /// Build a request for `path`, binding the first two segments to the
    /// controller and action tokens.
    ///
    /// A query string after `?` is kept as the raw query.
    ///
    /// # Example
    ///
    /// ```
    /// use http::Method;
    /// use mvc_dispatch_testing::request;
    ///
    /// let req = request(Method::POST, "/home/my-page?x=1");
    /// assert_eq!(req.raw_controller_token(), Some("home"));
    /// assert_eq!(req.raw_action_token(), Some("my-page"));
    /// assert_eq!(req.query(), Some("x=1"));
    /// ```
    #[must_use]
    pub fn request(method: Method, path: &str) -> RequestContext {
        let (path, query) = match path.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (path, None),
        };

        let mut segments = path.split('/').filter(|s| !s.is_empty());
        let mut builder = RequestContext::builder(method, path);
        if let Some(controller) = segments.next() {
            builder = builder.controller(controller);
        }
        if let Some(action) = segments.next() {
            builder = builder.action(action);
        }
        if let Some(query) = query {
            builder = builder.query(query);
        }
        builder.build()
    }

    /// `GET` request for `path`
    #[must_use]
    pub fn get(path: &str) -> RequestContext {
        request(Method::GET, path)
    }

    /// `POST` request for `path`
    #[must_use]
    pub fn post(path: &str) -> RequestContext {
        request(Method::POST, path)
    }

    /// Install a test-friendly tracing subscriber, once per process.
    ///
    /// Honors `RUST_LOG`.
    pub fn init_test_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }
}

/// Property-based testing utilities using proptest.
pub mod properties {
    use proptest::prelude::*;

    /// Strategy for HTTP method names as they appear on the wire.
    pub fn http_method() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("GET".to_string()),
            Just("POST".to_string()),
            Just("PUT".to_string()),
            Just("DELETE".to_string()),
            Just("PATCH".to_string()),
            Just("OPTIONS".to_string()),
        ]
    }

    /// Strategy for action tokens as they arrive from a path segment: empty,
    /// separators only, word characters mixed with separators, or arbitrary
    /// text.
    pub fn action_token() -> impl Strategy<Value = String> {
        prop_oneof![
            Just(String::new()),
            "[-_ %.]{1,6}",
            "[a-zA-Z0-9_ -]{1,24}",
            "\\PC{0,16}",
        ]
    }
}

// Re-export commonly used items
pub use helpers::{get, init_test_tracing, post, request};
pub use mocks::{
    EchoViewEngine, FailingObserver, PanickingObserver, RecordingObserver, StaticViewEngine,
};
