//! Controller loading.
//!
//! The dispatcher asks a [`ControllerLoader`] for a controller by its
//! lower-cased name. `None` means "not here": the request is deferred to the
//! next host handler, exactly like an unmatched action.

use crate::controller::{ControllerDefinition, ControllerTemplate};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Produces controller templates by name.
pub trait ControllerLoader: Send + Sync {
    /// Look up the controller named `name` (already lower-cased).
    fn load(&self, name: &str) -> Option<Arc<dyn ControllerTemplate>>;
}

impl<F> ControllerLoader for F
where
    F: Fn(&str) -> Option<Arc<dyn ControllerTemplate>> + Send + Sync,
{
    fn load(&self, name: &str) -> Option<Arc<dyn ControllerTemplate>> {
        self(name)
    }
}

/// In-memory loader keyed by lower-cased controller name.
#[derive(Clone, Default)]
pub struct ControllerRegistry {
    controllers: HashMap<String, Arc<dyn ControllerTemplate>>,
}

impl fmt::Debug for ControllerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.controllers.keys().collect();
        names.sort();
        f.debug_struct("ControllerRegistry")
            .field("controllers", &names)
            .finish()
    }
}

impl ControllerRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a typed definition under its lower-cased name.
    #[must_use]
    pub fn register<C: Send + 'static>(self, definition: ControllerDefinition<C>) -> Self {
        self.register_template(Arc::new(definition))
    }

    /// Register an already erased template under its lower-cased name.
    ///
    /// A later registration with the same name replaces the earlier one.
    #[must_use]
    pub fn register_template(mut self, template: Arc<dyn ControllerTemplate>) -> Self {
        let name = template.name().to_lowercase();
        if self.controllers.insert(name.clone(), template).is_some() {
            tracing::warn!(controller = %name, "Controller registered twice, keeping the latest");
        }
        self
    }

    /// Registered controller names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.controllers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl ControllerLoader for ControllerRegistry {
    fn load(&self, name: &str) -> Option<Arc<dyn ControllerTemplate>> {
        self.controllers.get(name).cloned()
    }
}
