//! Action selection.

use crate::controller::ControllerHandle;
use crate::naming::ActionCandidates;
use crate::options::DispatchOptions;

/// The action picked for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedAction {
    /// Member name that will be invoked.
    pub name: String,
    /// Lower-cased action token from the request.
    pub raw_name: String,
    /// Picked through the default-action fallback.
    pub via_default: bool,
}

/// Result of probing a controller instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// A member matched.
    Found(SelectedAction),
    /// Nothing matched; the request is not handled here.
    NotFound,
}

/// Pick the first candidate `instance` exposes.
///
/// With `use_default_action` set, a controller exposing the default action
/// gets it when no candidate matches.
#[must_use]
pub fn select(
    candidates: &ActionCandidates,
    raw_name: &str,
    instance: &dyn ControllerHandle,
    options: &DispatchOptions,
) -> Selection {
    if let Some(name) = candidates.iter().find(|name| instance.member(name).is_some()) {
        return Selection::Found(SelectedAction {
            name: name.to_string(),
            raw_name: raw_name.to_string(),
            via_default: false,
        });
    }

    let default = options.default_action_name.as_str();
    if options.use_default_action && instance.member(default).is_some() {
        return Selection::Found(SelectedAction {
            name: default.to_string(),
            raw_name: raw_name.to_string(),
            via_default: true,
        });
    }

    Selection::NotFound
}
