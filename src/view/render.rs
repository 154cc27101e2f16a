//! Text rendering of the recipe table, its pagination bar and the detail drawer.
//!
//! Every missing or empty field renders a fixed placeholder. Nothing in here
//! fails on absent data.

use std::fmt::Write;

use serde_json::Value;

use crate::client::{FilterField, PageSize, Recipe};
use crate::view::state::{LoadStatus, ResultOrigin, TableState};

pub const STAR_COUNT: usize = 5;
const FILLED_STAR: char = '★';
const EMPTY_STAR: char = '☆';
const TITLE_WIDTH: usize = 40;

/// Number of filled stars for a rating: `floor(rating)`, capped at five.
pub fn filled_stars(rating: Option<f64>) -> usize {
    let floor = rating.unwrap_or(0.0).floor();
    (0..STAR_COUNT).filter(|i| (*i as f64) < floor).count()
}

pub fn star_bar(rating: Option<f64>) -> String {
    let filled = filled_stars(rating);
    (0..STAR_COUNT)
        .map(|i| if i < filled { FILLED_STAR } else { EMPTY_STAR })
        .collect()
}

/// `proteinContent` -> `Protein Content`.
pub fn humanize_key(key: &str) -> String {
    let mut spaced = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            spaced.push(' ');
        }
        spaced.push(c);
    }

    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => spaced,
    }
}

/// Integral values print without a decimal point.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// A JSON scalar as it should appear on screen.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn text_or<'a>(value: Option<&'a str>, placeholder: &'a str) -> &'a str {
    match value {
        Some(text) if !text.is_empty() => text,
        _ => placeholder,
    }
}

pub fn minutes(value: Option<f64>) -> String {
    match value {
        Some(v) if v != 0.0 && !v.is_nan() => format_number(v),
        _ => "N/A".to_string(),
    }
}

fn serves(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => "N/A".to_string(),
        Some(Value::String(s)) if s.is_empty() => "N/A".to_string(),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => "N/A".to_string(),
        Some(other) => display_value(other),
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}

/// One table row: title, cuisine, stars, total time and serves.
pub fn row_cells(recipe: &Recipe) -> [String; 5] {
    [
        truncate(text_or(recipe.title.as_deref(), "No Title"), TITLE_WIDTH),
        text_or(recipe.cuisine.as_deref(), "Unknown").to_string(),
        star_bar(recipe.rating),
        format!("{} min", minutes(recipe.total_time)),
        serves(recipe.serves.as_ref()),
    ]
}

pub fn render_table(recipes: &[Recipe]) -> String {
    let header = ["Title", "Cuisine", "Rating", "Total Time", "Serves"];
    let rows: Vec<[String; 5]> = recipes.iter().map(row_cells).collect();

    let mut widths = header.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }
    let index_width = rows.len().to_string().len().max(1);

    let mut out = String::new();
    let _ = write!(out, "{}  ", pad("#", index_width));
    let header_line: Vec<String> = header.iter().zip(widths).map(|(h, w)| pad(h, w)).collect();
    let _ = writeln!(out, "{}", header_line.join("  ").trim_end());

    for (index, row) in rows.iter().enumerate() {
        let _ = write!(out, "{:>width$}  ", index + 1, width = index_width);
        let line: Vec<String> = row.iter().zip(widths).map(|(c, w)| pad(c, w)).collect();
        let _ = writeln!(out, "{}", line.join("  ").trim_end());
    }
    out
}

pub fn render_pagination(state: &TableState) -> String {
    let page = match state.total_pages() {
        Some(pages) => format!("Page {} of {}", state.current_page(), pages.max(1)),
        None => format!("Page {}", state.current_page()),
    };
    let previous = if state.is_first_page() { "Previous (disabled)" } else { "Previous" };
    let next = if state.is_last_page() { "Next (disabled)" } else { "Next" };
    let options: Vec<String> = PageSize::ALL.iter().map(PageSize::to_string).collect();

    format!(
        "{} | {} | {} | {} per page (options: {})",
        previous,
        page,
        next,
        state.page_size(),
        options.join(", ")
    )
}

pub fn render_drawer(recipe: &Recipe) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== {} ===", text_or(recipe.title.as_deref(), "Untitled"));
    let _ = writeln!(out, "{}", text_or(recipe.cuisine.as_deref(), "Unknown Cuisine"));
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Description: {}",
        text_or(recipe.description.as_deref(), "No description available.")
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Total Time: {} min", minutes(recipe.total_time));
    let _ = writeln!(out, "  Prep Time: {} min", minutes(recipe.prep_time));
    let _ = writeln!(out, "  Cook Time: {} min", minutes(recipe.cook_time));

    if let Some(nutrients) = &recipe.nutrients {
        let labels: Vec<(String, String)> = nutrients
            .iter()
            .map(|(key, value)| (humanize_key(key), display_value(value)))
            .collect();
        let width = labels.iter().map(|(label, _)| label.chars().count()).max().unwrap_or(0);

        let _ = writeln!(out);
        let _ = writeln!(out, "Nutrition Facts");
        for (label, value) in labels {
            let _ = writeln!(out, "  {}  {}", pad(&label, width), value);
        }
    }
    out
}

fn render_filters(state: &TableState) -> String {
    let active = state.filters().active();
    if active.is_empty() {
        let hints: Vec<&str> = FilterField::ALL.iter().map(FilterField::hint).collect();
        return format!("Filters: none set ({})", hints.join(", "));
    }
    let parts: Vec<String> = active
        .iter()
        .map(|(field, value)| format!("{}={}", field, value))
        .collect();
    format!("Filters: {}", parts.join(", "))
}

fn render_status(state: &TableState) -> Option<String> {
    let origin = state.origin()?;
    let count = state.recipes().len();
    let mut line = match origin {
        ResultOrigin::Listing { page } => format!("Showing {} recipes from page {}", count, page),
        ResultOrigin::Search => format!("Showing {} search results", count),
    };
    if let Some(at) = state.loaded_at() {
        let _ = write!(line, ", updated {}", at.format("%H:%M:%S UTC"));
    }
    Some(line)
}

/// The whole view: filters, status, table (or placeholder), pagination and drawer.
pub fn render_view(state: &TableState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Recipe Collection");
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", render_filters(state));

    if let LoadStatus::Failed(message) = state.status() {
        let _ = writeln!(out, "Could not load recipes: {}", message);
    }
    if let Some(status) = render_status(state) {
        let _ = writeln!(out, "{}", status);
    }
    let _ = writeln!(out);

    if state.is_loading() {
        let _ = writeln!(out, "Loading recipes...");
    } else if state.recipes().is_empty() {
        let _ = writeln!(out, "No recipes found.");
    } else {
        out.push_str(&render_table(state.recipes()));
    }

    if !state.recipes().is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", render_pagination(state));
    }

    if let Some(recipe) = state.selected() {
        let _ = writeln!(out);
        out.push_str(&render_drawer(recipe));
    }
    out
}
