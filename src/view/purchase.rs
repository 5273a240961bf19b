//! Purchase screen rendering

use super::skin::Skin;
use crate::format::{beverage_type, format_price};
use crate::purchase::{Field, PurchaseFlow, PurchaseState};
use colored::Colorize;
use std::fmt::Write;

/// Draw the purchase screen for the flow's current state
pub fn render(flow: &PurchaseFlow, skin: Skin) -> String {
    let mut out = String::new();
    let options = flow.options();

    let _ = writeln!(
        out,
        "{} {}",
        skin.title_icon(),
        format!("Order from {}", skin.title()).color(skin.accent()).bold()
    );
    let _ = writeln!(out);

    let (item, form) = match (flow.state(), flow.item(), flow.form()) {
        (PurchaseState::Loading, _, _) => {
            let _ = writeln!(out, "{}", format!("Loading {}...", options.identifier).dimmed());
            return out;
        }
        (PurchaseState::Unavailable { message }, _, _) => {
            let _ = writeln!(out, "{}", message.red());
            return out;
        }
        (_, Some(item), Some(form)) => (item, form),
        _ => return out,
    };

    let name = item.display_name();
    let _ = writeln!(out, "{} {}", skin.row_icon(name), name.bold());
    if skin.shows_type() {
        let _ = writeln!(out, "  Type:       {}", beverage_type(name));
    }
    let _ = writeln!(out, "  Unit price: {}", format_price(item.price()));
    let _ = writeln!(out);

    let _ = writeln!(out, "  Amount:     {}", blank_or(form.amount()));
    let _ = writeln!(out, "  Quantity:   {}", blank_or(form.quantity()));
    for field in [Field::Input, Field::Amount, Field::Quantity] {
        if let Some(message) = form.errors().get(field) {
            let _ = writeln!(out, "  {} {}", "✗".red(), message.red());
        }
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "{}", "Order summary".bold());
    let _ = writeln!(out, "  Item:       {}", name);
    let _ = writeln!(out, "  Unit price: {}", format_price(item.price()));
    let _ = writeln!(out, "  Quantity:   {} {}", blank_or(form.quantity()), options.unit);
    let _ = writeln!(out, "  Style:      {}", form.style());
    let _ = writeln!(out, "  Total:      {}", format_price(form.total()).bold());
    let _ = writeln!(out);

    match flow.state() {
        PurchaseState::Submitting => {
            let _ = writeln!(out, "{}", "Placing order...".yellow());
        }
        PurchaseState::Succeeded { message } => {
            let _ = writeln!(out, "{} {}", "✓".green(), message.green());
        }
        PurchaseState::Failed { message } => {
            let _ = writeln!(out, "{} {}", "✗".red(), message.red());
        }
        _ => {}
    }

    out
}

fn blank_or(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}
