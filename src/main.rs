use clap::Parser;
use tradinghub::app::App;
use tradinghub::cli::{Cli, Commands};
use tradinghub::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
            eprintln!("Using bundled configuration");
            Config::bundled()?
        }
    };

    // Initialize telemetry
    tradinghub::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Open(args) => {
            let app = App::new(config)?;
            args.execute(&app).await?;
        }
        Commands::Watch(args) => {
            let app = App::new(config)?;
            args.execute(&app).await?;
        }
        Commands::Buy(args) => {
            let app = App::new(config)?;
            args.execute(&app).await?;
        }
        Commands::Routes => {
            let router = tradinghub::router::Router::from_config(&config);
            for (path, description) in router.table() {
                println!("  {:<28} {}", path, description);
            }
        }
        Commands::Config => {
            println!("Current configuration:");
            println!(
                "  Backend: {} (timeout {}s)",
                config.backend.base_url, config.backend.timeout_secs
            );
            println!("  Broker: {}", config.backend.ws_url);
            println!(
                "  Feed: reconnect {}ms, position deltas {}ms, price deltas {}ms",
                config.feed.reconnect_delay_ms,
                config.feed.position_delta_ms,
                config.feed.price_delta_ms
            );
            println!(
                "  Purchase: submit delay {}ms, default collection {}",
                config.purchase.submit_delay_ms, config.purchase.default_collection
            );
            for collection in &config.collections {
                println!(
                    "  Collection: {} <- {} ({:?}, keys {:?}, unit {})",
                    collection.name,
                    collection.topic,
                    collection.skin,
                    collection.identifier_keys,
                    collection.unit
                );
            }
        }
    }

    Ok(())
}
