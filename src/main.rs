use inventory_backend::{config::Config, init_logging, run};
use tracing::error;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let _guard = init_logging();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(config).await {
        error!("Server stopped: {e}");
        std::process::exit(1);
    }
}
