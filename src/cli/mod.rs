//! CLI interface for tradinghub
//!
//! Provides subcommands for:
//! - `open`: Resolve a route and run its screen
//! - `watch`: Live list screen for a collection
//! - `buy`: Purchase screen driven from flags
//! - `routes`: Print the route table
//! - `config`: Show the effective configuration

mod buy;
mod open;
mod watch;

pub use buy::{BuyArgs, OrderArgs};
pub use open::OpenArgs;
pub use watch::WatchArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "tradinghub")]
#[command(about = "Live stocks and craft brewery ordering in the terminal")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open a route, e.g. `/`, `/stocks` or `/beverages/7/purchase`
    Open(OpenArgs),
    /// Watch a collection's live prices
    Watch(WatchArgs),
    /// Order from a collection
    Buy(BuyArgs),
    /// Print the route table
    Routes,
    /// Show configuration
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::purchase::OrderStyle;

    #[test]
    fn test_parse_open_with_order() {
        let cli = Cli::parse_from([
            "tradinghub",
            "open",
            "/beverages/7/purchase",
            "--quantity",
            "3",
            "--style",
            "bottle",
        ]);
        assert_eq!(cli.config, "config.toml");
        match cli.command {
            Commands::Open(args) => {
                assert_eq!(args.path, "/beverages/7/purchase");
                assert_eq!(args.order.quantity.as_deref(), Some("3"));
                assert_eq!(args.order.style, OrderStyle::Bottle);
                assert!(!args.order.no_follow);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_buy() {
        let cli = Cli::parse_from([
            "tradinghub",
            "-c",
            "/etc/tradinghub.toml",
            "buy",
            "stocks",
            "AAPL",
            "--amount",
            "500",
            "--retries",
            "2",
            "--no-follow",
        ]);
        assert_eq!(cli.config, "/etc/tradinghub.toml");
        match cli.command {
            Commands::Buy(args) => {
                assert_eq!(args.collection, "stocks");
                assert_eq!(args.identifier, "AAPL");
                assert_eq!(args.order.amount.as_deref(), Some("500"));
                assert_eq!(args.order.style, OrderStyle::Tap);
                assert_eq!(args.order.retries, 2);
                assert!(args.order.no_follow);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_amount_and_quantity_conflict() {
        let result = Cli::try_parse_from([
            "tradinghub",
            "buy",
            "beverages",
            "1",
            "--amount",
            "10",
            "--quantity",
            "1",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_watch_and_routes() {
        let cli = Cli::parse_from(["tradinghub", "watch", "stocks"]);
        assert!(matches!(cli.command, Commands::Watch(ref w) if w.collection == "stocks"));

        let cli = Cli::parse_from(["tradinghub", "routes"]);
        assert!(matches!(cli.command, Commands::Routes));
    }
}
