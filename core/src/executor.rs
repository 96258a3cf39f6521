//! Action execution.
//!
//! Actions settle to an [`ActionOutput`]. Typed results pass straight through;
//! untyped JSON values are accepted only when they are strings. Anything else
//! is a contract violation in the controller and is surfaced as an error
//! rather than stringified.

use crate::context::RequestContext;
use crate::controller::ControllerHandle;
use crate::error::DispatchError;
use crate::results::{ActionResult, Procedure};
use crate::selector::SelectedAction;

/// What an action hands back to the executor.
#[derive(Debug)]
pub enum ActionOutput {
    /// A typed action result.
    Result(ActionResult),
    /// An untyped value, e.g. produced by a data source.
    Value(serde_json::Value),
}

impl From<ActionResult> for ActionOutput {
    fn from(result: ActionResult) -> Self {
        Self::Result(result)
    }
}

impl From<Procedure> for ActionOutput {
    fn from(procedure: Procedure) -> Self {
        Self::Result(ActionResult::Deferred(procedure))
    }
}

impl From<String> for ActionOutput {
    fn from(text: String) -> Self {
        Self::Result(ActionResult::Literal(text))
    }
}

impl From<&str> for ActionOutput {
    fn from(text: &str) -> Self {
        Self::Result(ActionResult::Literal(text.to_string()))
    }
}

impl From<serde_json::Value> for ActionOutput {
    fn from(value: serde_json::Value) -> Self {
        Self::Value(value)
    }
}

/// Turn an action's output into an [`ActionResult`].
///
/// # Errors
///
/// Returns [`DispatchError::ContractViolation`] for any untyped value other
/// than a string.
pub fn settle(
    output: ActionOutput,
    controller: &str,
    action: &str,
) -> Result<ActionResult, DispatchError> {
    use serde_json::Value;

    let found = match output {
        ActionOutput::Result(result) => return Ok(result),
        ActionOutput::Value(Value::String(text)) => return Ok(ActionResult::Literal(text)),
        ActionOutput::Value(Value::Null) => "null",
        ActionOutput::Value(Value::Bool(_)) => "a boolean",
        ActionOutput::Value(Value::Number(_)) => "a number",
        ActionOutput::Value(Value::Array(_)) => "an array",
        ActionOutput::Value(Value::Object(_)) => "an object",
    };

    Err(DispatchError::ContractViolation {
        controller: controller.to_string(),
        action: action.to_string(),
        found: found.to_string(),
    })
}

/// Invoke the selected action on `instance` and settle its output.
///
/// # Errors
///
/// Returns [`DispatchError::Action`] if the action fails and
/// [`DispatchError::ContractViolation`] if it settles to an unusable value or
/// the member vanished.
pub async fn execute(
    instance: &mut dyn ControllerHandle,
    selected: &SelectedAction,
    request: RequestContext,
) -> Result<ActionResult, DispatchError> {
    let controller = instance.to_string();
    let Some(invocation) = instance.invoke(&selected.name, request) else {
        return Err(DispatchError::ContractViolation {
            controller,
            action: selected.name.clone(),
            found: "no callable member".to_string(),
        });
    };

    let output = invocation
        .await
        .map_err(|source| DispatchError::Action {
            controller: controller.clone(),
            action: selected.name.clone(),
            source,
        })?;

    settle(output, &controller, &selected.name)
}
