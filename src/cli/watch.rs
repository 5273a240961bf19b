//! Watch command implementation

use crate::app::App;
use clap::Args;

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Collection name, e.g. `stocks`
    pub collection: String,
}

impl WatchArgs {
    pub async fn execute(&self, app: &App) -> anyhow::Result<()> {
        tracing::info!(collection = %self.collection, "Starting list screen");
        app.watch(&self.collection).await
    }
}
