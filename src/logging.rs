use std::{env, io};
use tokio::task::JoinHandle;
use tracing::{info, warn, Level};
use tracing_loki::url::Url;
use tracing_loki::BackgroundTaskController;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{filter, fmt};

/// Handle to the Loki push task, kept alive for the whole run and shut down
/// before exiting so the last events get flushed.
pub struct LokiHandle {
    controller: BackgroundTaskController,
    task: JoinHandle<()>,
}

impl LokiHandle {
    pub async fn shutdown(self) {
        self.controller.shutdown().await;
        let _ = self.task.await;
    }
}

/// Initializes the stdout subscriber, plus a Loki layer when `LOKI_URL` is
/// set and reachable.
pub async fn setup() -> Option<LokiHandle> {
    let targets = filter::Targets::new()
        .with_target("shows_catalog", Level::TRACE)
        .with_default(Level::WARN);

    let registry = tracing_subscriber::registry()
        .with(targets)
        .with(fmt::layer().with_writer(io::stdout));

    let base_url: Url = match env::var("LOKI_URL") {
        Ok(raw) => raw.parse().expect("Invalid LOKI_URL format"),
        Err(_) => {
            registry.init();
            warn!("Loki URL not provided. Continuing without it.");
            return None;
        }
    };

    if reqwest::get(base_url.clone()).await.is_err() {
        registry.init();
        warn!("Couldn't connect to Loki. Continuing without it.");
        return None;
    }

    let (layer, controller, task) = tracing_loki::builder()
        .label("service", "shows-catalog")
        .expect("Failed setting label")
        .build_controller_url(base_url)
        .expect("Failed building the Loki layer");

    registry.with(layer).init();
    let task = tokio::spawn(task);
    info!("Loki initialized");

    Some(LokiHandle { controller, task })
}
