use shows_catalog::catalog::fetch_moscow_shows;
use shows_catalog::config::env_loader::load_config;
use shows_catalog::logging;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let loki = logging::setup().await;

    let config = load_config();
    let exit_code = match fetch_moscow_shows(&config).await {
        Ok(summary) => {
            info!(
                "Exported {} shows for {} to {}",
                summary.records,
                summary.city.name,
                summary.output_path.display()
            );
            0
        }
        Err(err) => {
            error!("Export failed: {err}");
            1
        }
    };

    if let Some(loki) = loki {
        loki.shutdown().await;
    }

    std::process::exit(exit_code);
}
