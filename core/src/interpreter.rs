//! Result interpretation.

use crate::context::RequestContext;
use crate::error::DispatchError;
use crate::response::{Continuation, ResponseChannel};
use crate::results::{ActionResult, Procedure};

/// Execute `result` against the response channel.
///
/// A literal becomes the whole body with the default status. A deferred
/// result runs its procedure, which decides everything about the response.
///
/// # Errors
///
/// Returns [`DispatchError::Response`] if the literal cannot be written and
/// [`DispatchError::Result`] if the procedure fails.
pub async fn interpret(
    result: ActionResult,
    request: &RequestContext,
    response: &ResponseChannel,
    next: &Continuation,
) -> Result<(), DispatchError> {
    match result {
        ActionResult::Literal(text) => {
            response.send(text)?;
            Ok(())
        }
        ActionResult::Deferred(procedure) => run(procedure, request, response, next).await,
    }
}

/// Run a procedure with clones of the request-scoped capabilities.
///
/// # Errors
///
/// Returns [`DispatchError::Result`] if the procedure fails.
pub async fn run(
    procedure: Procedure,
    request: &RequestContext,
    response: &ResponseChannel,
    next: &Continuation,
) -> Result<(), DispatchError> {
    procedure
        .run(request.clone(), response.clone(), next.clone())
        .await
        .map_err(DispatchError::Result)
}
