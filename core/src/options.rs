//! Dispatcher configuration.
//!
//! Options can be built programmatically, deserialized (camelCase keys, every
//! field optional) or loaded from `MVC_*` environment variables.

use crate::naming::DEFAULT_FALLBACK_ACTION;
use serde::{Deserialize, Serialize};
use std::env;

/// Options recognised by the dispatcher and the host adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DispatchOptions {
    /// Fall back to `default_action_name` when no candidate matches.
    pub use_default_action: bool,
    /// Wire lifecycle events to the built-in tracing observer.
    pub enable_hooks: bool,
    /// Folder external loaders read controller definitions from.
    pub controllers_folder: String,
    /// Controller used when the request carries no controller segment.
    pub default_controller_name: String,
    /// Action used when the request carries no action segment.
    pub default_action_name: String,
    /// Route parameter name bound to the controller segment.
    pub controller_token: String,
    /// Route parameter name bound to the action segment.
    pub action_token: String,
    /// Path prefix the dispatcher is mounted under.
    pub mount_path: String,
    /// Lowest-priority candidate probed on every controller.
    pub fallback_action_name: String,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            use_default_action: false,
            enable_hooks: false,
            controllers_folder: "controllers".to_string(),
            default_controller_name: "home".to_string(),
            default_action_name: "index".to_string(),
            controller_token: "controller".to_string(),
            action_token: "action".to_string(),
            mount_path: "/".to_string(),
            fallback_action_name: DEFAULT_FALLBACK_ACTION.to_string(),
        }
    }
}

impl DispatchOptions {
    /// Create a new options builder starting from the defaults.
    #[must_use]
    pub fn builder() -> DispatchOptionsBuilder {
        DispatchOptionsBuilder {
            options: Self::default(),
        }
    }

    /// Load options from environment variables.
    ///
    /// Unset or unparsable variables keep their defaults. Hooks are enabled by
    /// default when `APP_ENV=development`.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let development = env::var("APP_ENV").is_ok_and(|v| v == "development");

        Self {
            use_default_action: env_flag("MVC_USE_DEFAULT_ACTION")
                .unwrap_or(defaults.use_default_action),
            enable_hooks: env_flag("MVC_ENABLE_HOOKS").unwrap_or(development),
            controllers_folder: env::var("MVC_CONTROLLERS_FOLDER")
                .unwrap_or(defaults.controllers_folder),
            default_controller_name: env::var("MVC_DEFAULT_CONTROLLER")
                .unwrap_or(defaults.default_controller_name),
            default_action_name: env::var("MVC_DEFAULT_ACTION")
                .unwrap_or(defaults.default_action_name),
            controller_token: env::var("MVC_CONTROLLER_TOKEN")
                .unwrap_or(defaults.controller_token),
            action_token: env::var("MVC_ACTION_TOKEN").unwrap_or(defaults.action_token),
            mount_path: normalize_mount_path(
                &env::var("MVC_MOUNT_PATH").unwrap_or(defaults.mount_path),
            ),
            fallback_action_name: env::var("MVC_FALLBACK_ACTION")
                .unwrap_or(defaults.fallback_action_name),
        }
    }

    /// Return a copy with the mount path normalised.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.mount_path = normalize_mount_path(&self.mount_path);
        self
    }
}

/// Builder for [`DispatchOptions`].
#[derive(Debug, Clone)]
pub struct DispatchOptionsBuilder {
    options: DispatchOptions,
}

impl DispatchOptionsBuilder {
    /// Enable or disable the default-action fallback.
    #[must_use]
    pub const fn use_default_action(mut self, enabled: bool) -> Self {
        self.options.use_default_action = enabled;
        self
    }

    /// Enable or disable the tracing lifecycle observer.
    #[must_use]
    pub const fn enable_hooks(mut self, enabled: bool) -> Self {
        self.options.enable_hooks = enabled;
        self
    }

    /// Set the controllers folder.
    #[must_use]
    pub fn controllers_folder(mut self, folder: impl Into<String>) -> Self {
        self.options.controllers_folder = folder.into();
        self
    }

    /// Set the default controller name.
    #[must_use]
    pub fn default_controller_name(mut self, name: impl Into<String>) -> Self {
        self.options.default_controller_name = name.into();
        self
    }

    /// Set the default action name.
    #[must_use]
    pub fn default_action_name(mut self, name: impl Into<String>) -> Self {
        self.options.default_action_name = name.into();
        self
    }

    /// Set the route parameter names for controller and action.
    #[must_use]
    pub fn tokens(mut self, controller: impl Into<String>, action: impl Into<String>) -> Self {
        self.options.controller_token = controller.into();
        self.options.action_token = action.into();
        self
    }

    /// Set the mount path.
    #[must_use]
    pub fn mount_path(mut self, path: impl Into<String>) -> Self {
        self.options.mount_path = path.into();
        self
    }

    /// Set the fallback action name.
    #[must_use]
    pub fn fallback_action_name(mut self, name: impl Into<String>) -> Self {
        self.options.fallback_action_name = name.into();
        self
    }

    /// Build the options, normalising the mount path.
    #[must_use]
    pub fn build(self) -> DispatchOptions {
        self.options.normalized()
    }
}

/// Ensure a mount path starts and ends with `/`.
///
/// # Examples
///
/// ```
/// use mvc_dispatch_core::options::normalize_mount_path;
///
/// assert_eq!(normalize_mount_path("app"), "/app/");
/// assert_eq!(normalize_mount_path("/"), "/");
/// ```
#[must_use]
pub fn normalize_mount_path(path: &str) -> String {
    let mut normalized = String::with_capacity(path.len() + 2);
    if !path.starts_with('/') {
        normalized.push('/');
    }
    normalized.push_str(path);
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    normalized
}

fn env_flag(key: &str) -> Option<bool> {
    env::var(key)
        .ok()
        .and_then(|v| match v.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}
