//! Tower middleware that mounts the dispatcher in front of an inner service.
//!
//! # Flow
//!
//! 1. **Match** the path against the mount path (outside → inner service)
//! 2. **Skip** static-asset paths (→ inner service)
//! 3. **Bind** the controller and action segments into a request context
//! 4. **Dispatch** inside an `mvc_dispatch` tracing span
//! 5. **Respond** with what the action wrote, **defer** to the inner service,
//!    or render the standard error response for hard failures
//!
//! The inner service plays the role of the host chain's "next handler".
//!
//! # Example
//!
//! ```ignore
//! use axum::Router;
//! use mvc_dispatch_web::MvcLayer;
//! use tower::Layer;
//!
//! let fallback = Router::new().fallback(|| async { "not found" });
//! let app = MvcLayer::new(dispatcher).layer(fallback);
//! ```

use crate::error::AppError;
use crate::response::into_response;
use crate::route::{bind, route_pattern};
use axum::{
    extract::Request,
    response::{IntoResponse, Response},
    Router,
};
use mvc_dispatch_core::dispatcher::is_static_asset;
use mvc_dispatch_core::{DispatchOutcome, Dispatcher, RequestContext};
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tracing::Instrument;

/// Layer that routes requests through a [`Dispatcher`].
#[derive(Clone, Debug)]
pub struct MvcLayer {
    dispatcher: Arc<Dispatcher>,
}

impl MvcLayer {
    /// Create a layer over `dispatcher`.
    #[must_use]
    pub fn new(dispatcher: Dispatcher) -> Self {
        tracing::info!(
            pattern = %route_pattern(dispatcher.options()),
            "Mounting MVC dispatcher"
        );
        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }
}

impl<S> Layer<S> for MvcLayer {
    type Service = MvcService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MvcService {
            dispatcher: Arc::clone(&self.dispatcher),
            inner,
        }
    }
}

/// Middleware service dispatching to controllers before the inner service.
#[derive(Clone, Debug)]
pub struct MvcService<S> {
    dispatcher: Arc<Dispatcher>,
    inner: S,
}

impl<S> MvcService<S> {
    fn request_context(&self, req: &Request) -> Option<RequestContext> {
        let path = req.uri().path();
        if is_static_asset(path) {
            return None;
        }
        let tokens = bind(path, &self.dispatcher.options().mount_path)?;

        let mut builder = RequestContext::builder(req.method().clone(), path)
            .headers(req.headers().clone());
        if let Some(controller) = tokens.controller {
            builder = builder.controller(controller);
        }
        if let Some(action) = tokens.action {
            builder = builder.action(action);
        }
        if let Some(query) = req.uri().query() {
            builder = builder.query(query);
        }
        Some(builder.build())
    }
}

impl<S> Service<Request> for MvcService<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        // The ready inner service is taken; a fresh clone stays behind.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        let Some(context) = self.request_context(&req) else {
            return Box::pin(inner.call(req));
        };

        let dispatcher = Arc::clone(&self.dispatcher);
        let span = tracing::info_span!(
            "mvc_dispatch",
            method = %req.method(),
            path = %req.uri().path(),
        );

        Box::pin(async move {
            match dispatcher.dispatch(context).instrument(span).await {
                Ok(DispatchOutcome::Responded(parts)) => Ok(into_response(parts)),
                Ok(DispatchOutcome::Deferred(_)) => inner.call(req).await,
                Err(error) => Ok(AppError::from(error).into_response()),
            }
        })
    }
}

/// Mount `dispatcher` in front of `next`, which handles every deferred request.
///
/// ```ignore
/// let app = mvc_dispatch_web::router(dispatcher, Router::new().fallback(not_found));
/// axum::serve(listener, app).await?;
/// ```
#[must_use]
pub fn router(dispatcher: Dispatcher, next: Router) -> Router {
    Router::new().fallback_service(MvcLayer::new(dispatcher).layer(next))
}
