//! Open command implementation

use super::OrderArgs;
use crate::app::App;
use clap::Args;

#[derive(Args, Debug)]
pub struct OpenArgs {
    /// Route path
    pub path: String,

    #[command(flatten)]
    pub order: OrderArgs,
}

impl OpenArgs {
    pub async fn execute(&self, app: &App) -> anyhow::Result<()> {
        app.open(&self.path, &self.order).await
    }
}
