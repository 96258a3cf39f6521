//! Error types for dispatch.
//!
//! Soft outcomes (unknown controller, no matching action, denied
//! authorization) are not errors; they surface as
//! [`DispatchOutcome::Deferred`](crate::dispatcher::DispatchOutcome). Everything
//! here is a hard failure that must reach the host's error path.

use thiserror::Error;

/// Error returned by a lifecycle observer. Always discarded.
pub type ObserverError = Box<dyn std::error::Error + Send + Sync>;

/// A controller definition could not be turned into an instance.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActivationError {
    /// The definition carries no constructor.
    #[error("controller '{0}' is not constructible")]
    NotConstructible(String),
}

/// Failures while writing to the response channel.
#[derive(Error, Debug)]
pub enum ResponseError {
    /// The response was already sent or handed to the continuation.
    #[error("response already completed")]
    AlreadyCompleted,

    /// A view was requested but the host configured no view engine.
    #[error("no view engine configured to render '{0}'")]
    NoViewEngine(String),

    /// The view engine failed.
    #[error("failed to render view '{view}': {source}")]
    Render {
        /// The view that failed
        view: String,
        /// Engine error
        #[source]
        source: anyhow::Error,
    },

    /// A JSON payload could not be serialized.
    #[error("failed to serialize JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    /// A header name or value was rejected.
    #[error("invalid header '{0}'")]
    InvalidHeader(String),

    /// A status code outside 100..=999.
    #[error("invalid status code {0}")]
    InvalidStatus(u16),
}

/// Hard dispatch failures.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The loaded controller definition could not be activated.
    #[error(transparent)]
    Activation(#[from] ActivationError),

    /// An action settled to something that is neither text nor a result procedure.
    #[error("action '{action}' on controller '{controller}' returned {found}; expected text or a result procedure")]
    ContractViolation {
        /// Controller name
        controller: String,
        /// Selected action name
        action: String,
        /// Kind of value the action produced
        found: String,
    },

    /// The action itself failed.
    #[error("action '{action}' on controller '{controller}' failed: {source}")]
    Action {
        /// Controller name
        controller: String,
        /// Selected action name
        action: String,
        /// Action error
        #[source]
        source: anyhow::Error,
    },

    /// The authorization predicate failed.
    #[error("authorization for '{action}' on controller '{controller}' failed: {source}")]
    Authorization {
        /// Controller name
        controller: String,
        /// Selected action name
        action: String,
        /// Predicate error
        #[source]
        source: anyhow::Error,
    },

    /// A deferred result procedure failed.
    #[error("result procedure failed: {0}")]
    Result(#[source] anyhow::Error),

    /// Writing the literal body failed.
    #[error(transparent)]
    Response(#[from] ResponseError),
}

impl DispatchError {
    /// Short label used for metrics and logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Activation(_) => "activation",
            Self::ContractViolation { .. } => "contract_violation",
            Self::Action { .. } => "action",
            Self::Authorization { .. } => "authorization",
            Self::Result(_) => "result",
            Self::Response(_) => "response",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contract_violation_message() {
        let err = DispatchError::ContractViolation {
            controller: "home".to_string(),
            action: "index".to_string(),
            found: "a number".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "action 'index' on controller 'home' returned a number; expected text or a result procedure"
        );
        assert_eq!(err.kind(), "contract_violation");
    }

    #[test]
    fn activation_error_is_transparent() {
        let err = DispatchError::from(ActivationError::NotConstructible("home".to_string()));
        assert_eq!(err.to_string(), "controller 'home' is not constructible");
        assert_eq!(err.kind(), "activation");
    }
}
