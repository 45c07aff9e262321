//! Startup Module
//!
//! The original shell runs two independent async tracks at startup:
//! restoring the persisted token, and loading embedder resources
//! (fonts, initial deep-link state). Neither orders before the other;
//! both must finish before the loading view is dismissed.

use std::future::Future;
use std::pin::Pin;

use tracing::{info, warn};

use crate::controller::AuthController;

/// One embedder-supplied startup task (font loading, deep-link
/// resolution, ...). Failures are logged and fail open.
pub type ResourceTask = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>>;

/// Box a future into a [`ResourceTask`].
pub fn resource_task<F>(future: F) -> ResourceTask
where
    F: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    Box::pin(future)
}

/// Run token restoration and the resource tasks concurrently, and
/// return once both tracks are done.
pub async fn run(controller: &AuthController, resources: Vec<ResourceTask>) {
    tokio::join!(controller.restore_session(), load_resources(resources));
    info!("Startup complete");
}

/// Drain the resource tasks in order. A failed task never blocks
/// startup: the loading view is dismissed regardless.
async fn load_resources(resources: Vec<ResourceTask>) {
    for task in resources {
        if let Err(e) = task.await {
            warn!("Resource loading failed: {:#}", e);
        }
    }
}
