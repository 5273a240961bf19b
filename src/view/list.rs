//! Live list screen rendering

use super::skin::Skin;
use super::stats::ListStats;
use crate::feed::{Direction, FeedView, PositionDelta};
use crate::format::{beverage_type, format_price, rank_badge};
use colored::Colorize;
use std::fmt::Write;

const NAME_WIDTH: usize = 24;
const TYPE_WIDTH: usize = 8;
const PRICE_WIDTH: usize = 14;

/// One rendered row, before colouring
#[derive(Debug, Clone, PartialEq)]
pub struct ListRow {
    /// 1-based rank
    pub rank: usize,
    pub identifier: String,
    pub badge: Option<&'static str>,
    pub icon: &'static str,
    pub name: String,
    pub kind: Option<&'static str>,
    pub price: String,
    /// Active price flash
    pub flash: Option<Direction>,
    /// Active rank move
    pub moved: Option<PositionDelta>,
}

impl ListRow {
    /// Rows in snapshot order with their highlights attached
    pub fn build(view: &FeedView, skin: Skin) -> Vec<Self> {
        view.items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let name = item.display_name().to_string();
                Self {
                    rank: index + 1,
                    identifier: item.identifier().to_string(),
                    badge: rank_badge(index),
                    icon: skin.row_icon(&name),
                    kind: skin.shows_type().then(|| beverage_type(&name)),
                    price: format_price(item.price()),
                    flash: view.price_delta(item.identifier()).map(|d| d.direction),
                    moved: view.position_delta(item.identifier()).copied(),
                    name,
                }
            })
            .collect()
    }

    /// Position arrow with the number of places moved, e.g. `↑2`
    pub fn move_marker(&self) -> Option<String> {
        self.moved.map(|delta| {
            let arrow = match delta.direction {
                Direction::Up => "↑",
                Direction::Down => "↓",
            };
            format!("{}{}", arrow, delta.distance())
        })
    }

    fn render(&self) -> String {
        let rank = match self.badge {
            Some(badge) => format!("{} {:>2}", badge, self.rank),
            None => format!("   {:>2}", self.rank),
        };

        let name = format!("{:<width$}", truncate(&self.name, NAME_WIDTH), width = NAME_WIDTH);
        let kind = self
            .kind
            .map(|k| format!(" {:<width$}", k, width = TYPE_WIDTH))
            .unwrap_or_default();
        let price = format!("{:>width$}", self.price, width = PRICE_WIDTH);

        let price = match self.flash {
            Some(Direction::Up) => format!("{} {}", price.green().bold(), "▲".green()),
            Some(Direction::Down) => format!("{} {}", price.red().bold(), "▼".red()),
            None => format!("{}  ", price),
        };

        let marker = match (self.move_marker(), self.moved.map(|d| d.direction)) {
            (Some(m), Some(Direction::Up)) => format!(" {}", m.green()),
            (Some(m), _) => format!(" {}", m.red()),
            (None, _) => String::new(),
        };

        let name = if self.moved.is_some() {
            name.bold().to_string()
        } else {
            name
        };

        format!("{} {} {}{} {}{}", rank, self.icon, name, kind, price, marker)
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Draw one full frame of the list screen
pub fn render(view: &FeedView, skin: Skin) -> String {
    let mut out = String::new();
    let accent = skin.accent();
    let status = skin.status_label(view.status);

    let _ = writeln!(
        out,
        "{} {}   {} {}",
        skin.title_icon(),
        skin.title().color(accent).bold(),
        "●".color(skin.status_color(view.status)),
        status.color(skin.status_color(view.status))
    );
    let _ = writeln!(out, "{}", skin.tagline().dimmed());
    let _ = writeln!(out);

    let stats = ListStats::from_items(&view.items);
    let [count_heading, average_heading, max_heading] = skin.stat_headings();
    let _ = writeln!(
        out,
        "{}: {}   {}: {}   {}: {}",
        count_heading,
        stats.count.to_string().bold(),
        average_heading,
        format_price(stats.average).bold(),
        max_heading,
        format_price(stats.max).bold()
    );
    let _ = writeln!(out);

    if view.is_empty() {
        let _ = writeln!(out, "{}", skin.loading_message().dimmed());
        return out;
    }

    for row in ListRow::build(view, skin) {
        let _ = writeln!(out, "{}", row.render());
    }

    out
}
