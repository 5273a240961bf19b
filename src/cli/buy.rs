//! Buy command implementation

use crate::app::App;
use crate::purchase::{OrderStyle, PurchaseForm};
use clap::Args;

/// Order input shared by `buy` and `open`
#[derive(Args, Debug, Clone, Default)]
pub struct OrderArgs {
    /// Amount to spend; quantity follows from the unit price
    #[arg(long, conflicts_with = "quantity")]
    pub amount: Option<String>,

    /// Whole number of units
    #[arg(long)]
    pub quantity: Option<String>,

    /// Serving style
    #[arg(long, value_enum, default_value_t = OrderStyle::Tap)]
    pub style: OrderStyle,

    /// Resubmit up to this many times after a rejected order
    #[arg(long, default_value_t = 0)]
    pub retries: u32,

    /// Stay on the purchase screen after a successful order instead of
    /// returning to the list
    #[arg(long)]
    pub no_follow: bool,
}

impl OrderArgs {
    pub fn has_input(&self) -> bool {
        self.amount.is_some() || self.quantity.is_some()
    }

    /// Fill the form the way a user typing these values would
    pub fn apply(&self, form: &mut PurchaseForm) {
        form.set_style(self.style);
        if let Some(amount) = &self.amount {
            form.set_amount(amount);
        }
        if let Some(quantity) = &self.quantity {
            form.set_quantity(quantity);
        }
    }
}

#[derive(Args, Debug)]
pub struct BuyArgs {
    /// Collection name, e.g. `beverages`
    pub collection: String,

    /// Item identifier
    pub identifier: String,

    #[command(flatten)]
    pub order: OrderArgs,
}

impl BuyArgs {
    pub async fn execute(&self, app: &App) -> anyhow::Result<()> {
        tracing::info!(collection = %self.collection, identifier = %self.identifier, "Starting purchase screen");
        if let Some(next) = app
            .buy(&self.collection, &self.identifier, &self.order)
            .await?
        {
            app.open(&next.path(), &self.order).await?;
        }
        Ok(())
    }
}
