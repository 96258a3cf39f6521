//! Site controllers.

pub mod home;

use mvc_dispatch_core::ControllerRegistry;

/// Registry holding every site controller.
#[must_use]
pub fn registry(permissions: home::Permissions) -> ControllerRegistry {
    ControllerRegistry::new().register(home::definition(permissions))
}
