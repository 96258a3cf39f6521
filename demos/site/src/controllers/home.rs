//! The `home` controller.

use mvc_dispatch_core::{ActionOutput, ControllerDefinition};
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Per-request state of the home controller.
#[derive(Debug, Default)]
pub struct Home {
    authorized: bool,
}

/// Fake permission source: grants and revokes access on alternate calls.
#[derive(Debug, Clone, Default)]
pub struct Permissions {
    granted: Arc<AtomicBool>,
}

impl Permissions {
    /// Check whether the current visitor may see the index page.
    pub async fn check(&self) -> bool {
        tokio::task::yield_now().await;
        !self.granted.fetch_xor(true, Ordering::SeqCst)
    }
}

async fn data_service() -> &'static str {
    tokio::time::sleep(Duration::from_millis(500)).await;
    "ok"
}

/// Build the home controller.
#[must_use]
pub fn definition(permissions: Permissions) -> ControllerDefinition<Home> {
    ControllerDefinition::<Home>::with_default("home")
        .action("index", move |ctl, _req| {
            let permissions = permissions.clone();
            Box::pin(async move {
                ctl.authorized = permissions.check().await;
                tracing::debug!(authorized = ctl.authorized, "Index authorization");
                if ctl.authorized {
                    Ok(ActionOutput::from(
                        ctl.view("index", json!({"title": "mvc-dispatch: is authorized"})),
                    ))
                } else {
                    Ok(ActionOutput::from("i am not authorized!"))
                }
            })
        })
        .sync_action("about", |_ctl, _req| "I'm about page.")
        .action("promise", |_ctl, _req| {
            Box::pin(async move {
                data_service().await;
                Ok(ActionOutput::from("promise success!"))
            })
        })
        .sync_action("catchAll", |ctl, _req| {
            ctl.redirect(format!("{}home/index", ctl.options().mount_path))
        })
}
