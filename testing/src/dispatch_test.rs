//! Ergonomic testing utilities for dispatches
//!
//! This module provides a fluent API for testing dispatches with readable Given-When-Then syntax.

#![allow(clippy::module_name_repetitions)] // DispatchTest is the natural name

use mvc_dispatch_core::{
    DeferReason, DispatchError, DispatchOutcome, Dispatcher, RequestContext, ResponseParts,
};

/// Type alias for outcome assertion functions
type OutcomeAssertion = Box<dyn FnOnce(&Result<DispatchOutcome, DispatchError>)>;

/// Fluent API for testing dispatches with Given-When-Then syntax
///
/// # Example
///
/// ```ignore
/// use mvc_dispatch_core::DeferReason;
/// use mvc_dispatch_testing::{get, DispatchTest};
///
/// DispatchTest::new(dispatcher)
///     .when_request(get("/admin/index"))
///     .then_deferred(DeferReason::Denied)
///     .run()
///     .await;
/// ```
pub struct DispatchTest {
    dispatcher: Dispatcher,
    request: Option<RequestContext>,
    assertions: Vec<OutcomeAssertion>,
}

impl DispatchTest {
    /// Create a new dispatch test over the given dispatcher (Given)
    #[must_use]
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            request: None,
            assertions: Vec::new(),
        }
    }

    /// Set the request to dispatch (When)
    #[must_use]
    pub fn when_request(mut self, request: RequestContext) -> Self {
        self.request = Some(request);
        self
    }

    /// Add an assertion about the raw dispatch result (Then)
    #[must_use]
    pub fn then_outcome<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&Result<DispatchOutcome, DispatchError>) + 'static,
    {
        self.assertions.push(Box::new(assertion));
        self
    }

    /// Add an assertion about the written response (Then)
    #[must_use]
    #[allow(clippy::panic)] // Test assertion
    pub fn then_response<F>(self, assertion: F) -> Self
    where
        F: FnOnce(&ResponseParts) + 'static,
    {
        self.then_outcome(move |outcome| match outcome {
            Ok(DispatchOutcome::Responded(parts)) => assertion(parts),
            other => panic!("Expected a response, but dispatch returned {other:?}"),
        })
    }

    /// Expect a response with this body text (Then)
    #[must_use]
    pub fn then_body(self, expected: &str) -> Self {
        let expected = expected.to_string();
        self.then_response(move |parts| assertions::assert_body(parts, &expected))
    }

    /// Expect a response with this status (Then)
    #[must_use]
    pub fn then_status(self, expected: u16) -> Self {
        self.then_response(move |parts| assertions::assert_status(parts, expected))
    }

    /// Expect the request to be handed to the next handler (Then)
    #[must_use]
    pub fn then_deferred(self, expected: DeferReason) -> Self {
        self.then_outcome(move |outcome| assertions::assert_deferred(outcome, expected))
    }

    /// Expect a hard dispatch failure of this kind (Then)
    #[must_use]
    #[allow(clippy::panic)] // Test assertion
    pub fn then_error(self, expected_kind: &'static str) -> Self {
        self.then_outcome(move |outcome| match outcome {
            Err(error) => assert_eq!(
                error.kind(),
                expected_kind,
                "Expected a {expected_kind} error, but got {error}"
            ),
            Ok(other) => panic!("Expected a {expected_kind} error, but dispatch returned {other:?}"),
        })
    }

    /// Dispatch the request and run all assertions
    ///
    /// Returns the dispatch result for further inspection.
    ///
    /// # Panics
    ///
    /// Panics if no request is set, or if any assertion fails.
    #[allow(clippy::expect_used)] // Test code can use expect
    pub async fn run(self) -> Result<DispatchOutcome, DispatchError> {
        let request = self
            .request
            .expect("Request must be set with when_request()");

        let outcome = self.dispatcher.dispatch(request).await;

        for assertion in self.assertions {
            assertion(&outcome);
        }

        outcome
    }
}

/// Helper assertions for dispatch outcomes
pub mod assertions {
    use mvc_dispatch_core::{DeferReason, DispatchError, DispatchOutcome, ResponseParts};

    /// Assert the response body text
    ///
    /// # Panics
    ///
    /// Panics if the body differs or is absent.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_body(parts: &ResponseParts, expected: &str) {
        assert_eq!(
            parts.body_text().as_deref(),
            Some(expected),
            "Unexpected response body"
        );
    }

    /// Assert the status put on the wire
    ///
    /// # Panics
    ///
    /// Panics if the status differs.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_status(parts: &ResponseParts, expected: u16) {
        assert_eq!(
            parts.status_or_default().as_u16(),
            expected,
            "Unexpected response status"
        );
    }

    /// Assert a response header value
    ///
    /// # Panics
    ///
    /// Panics if the header is missing or differs.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_header(parts: &ResponseParts, name: &str, expected: &str) {
        let value = parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok());
        assert_eq!(value, Some(expected), "Unexpected value for header {name}");
    }

    /// Assert the dispatch deferred for `expected`
    ///
    /// # Panics
    ///
    /// Panics if the dispatch responded, failed, or deferred for another reason.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_deferred(
        outcome: &Result<DispatchOutcome, DispatchError>,
        expected: DeferReason,
    ) {
        match outcome {
            Ok(DispatchOutcome::Deferred(reason)) => assert_eq!(
                *reason, expected,
                "Deferred for the wrong reason"
            ),
            other => panic!("Expected deferral ({expected}), but dispatch returned {other:?}"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::helpers::get;
    use mvc_dispatch_core::{ControllerDefinition, ControllerRegistry, DispatchOptions};

    fn dispatcher() -> Dispatcher {
        let registry = ControllerRegistry::new().register(
            ControllerDefinition::<()>::with_default("home")
                .sync_action("index", |_ctl, _req| "hello")
                .sync_action("broken", |_ctl, _req| serde_json::json!(42)),
        );
        Dispatcher::new(registry, DispatchOptions::default())
    }

    #[tokio::test]
    async fn test_dispatch_test_response() {
        DispatchTest::new(dispatcher())
            .when_request(get("/home/index"))
            .then_body("hello")
            .then_status(200)
            .then_response(|parts| {
                assertions::assert_header(parts, "content-type", "text/html; charset=utf-8");
            })
            .run()
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_dispatch_test_deferred() {
        DispatchTest::new(dispatcher())
            .when_request(get("/nowhere/index"))
            .then_deferred(DeferReason::ControllerNotFound)
            .run()
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_dispatch_test_error() {
        let outcome = DispatchTest::new(dispatcher())
            .when_request(get("/home/broken"))
            .then_error("contract_violation")
            .run()
            .await;
        assert!(outcome.is_err());
    }

    #[tokio::test]
    #[should_panic(expected = "Request must be set")]
    async fn test_dispatch_test_requires_request() {
        let _ = DispatchTest::new(dispatcher()).run().await;
    }
}
