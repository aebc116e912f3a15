use colored::Colorize;
use showtech_core::SectionStore;

use crate::capture::ParsedCapture;
use crate::extract::Inventory;
use crate::registry::Record;

/// Widest a text table cell may get before it is cut.
const MAX_CELL: usize = 40;

/// Render one inventory as per-category tables for terminal output.
pub fn render_inventory(inventory: &Inventory) -> String {
    let mut out = Vec::new();
    out.push(
        format!(
            "{} ({}, hint {}) from {}",
            inventory.hostname, inventory.family, inventory.hint, inventory.source
        )
        .bold()
        .to_string(),
    );
    for (title, records) in inventory.categories() {
        out.push(String::new());
        out.push(
            format!("{title} ({})", records.len())
                .cyan()
                .bold()
                .to_string(),
        );
        if records.is_empty() {
            out.push("  (none)".dimmed().to_string());
            continue;
        }
        out.extend(render_table(records));
    }
    out.join("\n")
}

fn render_table(records: &[Record]) -> Vec<String> {
    let columns: Vec<&String> = records[0]
        .iter()
        .filter(|(key, _)| records.iter().any(|r| r.get(*key).is_some_and(|v| !v.is_empty())))
        .map(|(key, _)| key)
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .map(|column| {
            records
                .iter()
                .filter_map(|r| r.get(*column))
                .map(|value| cell(value).chars().count())
                .chain(std::iter::once(column.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut lines = Vec::new();
    let header: Vec<String> = columns
        .iter()
        .zip(widths.iter().copied())
        .map(|(column, width)| format!("{column:<width$}"))
        .collect();
    lines.push(format!("  {}", header.join("  ")).yellow().to_string());

    for record in records {
        let row: Vec<String> = columns
            .iter()
            .zip(widths.iter().copied())
            .map(|(column, width)| {
                let value = record.get(*column).map_or("", String::as_str);
                format!("{:<width$}", cell(value))
            })
            .collect();
        lines.push(format!("  {}", row.join("  ").trim_end()));
    }
    lines
}

fn cell(value: &str) -> String {
    if value.chars().count() <= MAX_CELL {
        return value.to_string();
    }
    let cut: String = value.chars().take(MAX_CELL - 3).collect();
    format!("{cut}...")
}

/// Render the section listing of one capture.
pub fn render_sections(source: &str, sections: &SectionStore) -> String {
    let mut out = Vec::new();
    out.push(format!("{source}: {} sections", sections.len()).bold().to_string());
    for section in sections.iter() {
        out.push(format!(
            "- line {:>6}  {:<11}  {}  ({} lines)",
            section.line,
            section.style.to_string(),
            section.command.cyan(),
            section.body.lines().count()
        ));
    }
    out.join("\n")
}

/// Render device identification for one capture.
pub fn render_detect(parsed: &ParsedCapture) -> String {
    let categories: Vec<&str> = parsed.raw.hint.categories().iter().map(|c| c.title()).collect();
    let expected = if categories.is_empty() {
        "none".to_string()
    } else {
        categories.join(", ")
    };
    [
        format!("file={}", parsed.raw.display_path()),
        format!("hint={}", parsed.raw.hint.as_str().green()),
        format!("family={}", parsed.family),
        format!("hostname={}", parsed.hostname()),
        format!("running_config={}", parsed.config.is_some()),
        format!("categories={expected}"),
    ]
    .join("\n")
}
