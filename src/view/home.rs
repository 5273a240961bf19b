//! Home screen: the collection menu

use crate::config::CollectionConfig;
use colored::Colorize;
use std::fmt::Write;

pub const TAGLINE: &str = "Your gateway to real-time market data and seamless trading experiences";

pub fn render(collections: &[CollectionConfig]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "📈 {}", "TradingHub".yellow().bold());
    let _ = writeln!(out, "{}", TAGLINE.dimmed());
    let _ = writeln!(out);

    for collection in collections {
        let skin = collection.skin;
        let path = format!("{:<16}", format!("/{}", collection.name));
        let _ = writeln!(
            out,
            "  {} {} {}",
            skin.title_icon(),
            path.color(skin.accent()).bold(),
            skin.title()
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", "Open a screen with `tradinghub open <path>`".dimmed());
    out
}
