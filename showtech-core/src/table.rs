//! Fixed-offset slicing of undelimited tabular command output.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One column of a fixed-width table, as character offsets `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpan {
    pub field: String,
    pub start: usize,
    pub end: usize,
    /// Keep only the first run of digits (`"--"` becomes empty, `"Po12"` becomes `"12"`).
    #[serde(default)]
    pub digits: bool,
}

impl ColumnSpan {
    pub fn new(field: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            field: field.into(),
            start,
            end,
            digits: false,
        }
    }

    /// Mark the column as numeric-only.
    pub fn digits_only(mut self) -> Self {
        self.digits = true;
        self
    }
}

/// Slice `line` into trimmed field values using the given column spans.
///
/// The line is right-padded to the widest column so rows truncated by the
/// terminal still produce every field.
pub fn parse_row(line: &str, columns: &[ColumnSpan]) -> BTreeMap<String, String> {
    let width = columns.iter().map(|c| c.end).max().unwrap_or(0);
    let mut chars: Vec<char> = line.trim_end_matches(['\r', '\n']).chars().collect();
    if chars.len() < width {
        chars.resize(width, ' ');
    }

    let mut row = BTreeMap::new();
    for column in columns {
        let start = column.start.min(chars.len());
        let end = column.end.clamp(start, chars.len());
        let raw: String = chars[start..end].iter().collect();
        let value = if column.digits {
            first_digit_run(&raw)
        } else {
            raw.trim().to_string()
        };
        row.insert(column.field.clone(), value);
    }
    row
}

fn first_digit_run(raw: &str) -> String {
    raw.chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(char::is_ascii_digit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans() -> Vec<ColumnSpan> {
        vec![
            ColumnSpan::new("interface", 0, 8),
            ColumnSpan::new("status", 8, 14),
            ColumnSpan::new("port_ch", 14, 20).digits_only(),
        ]
    }

    #[test]
    fn short_rows_are_padded() {
        let row = parse_row("Eth1/1  up", &spans());
        assert_eq!(row["interface"], "Eth1/1");
        assert_eq!(row["status"], "up");
        assert_eq!(row["port_ch"], "");
    }

    #[test]
    fn digit_columns_drop_placeholders() {
        let row = parse_row("Eth1/2  down  --", &spans());
        assert_eq!(row["port_ch"], "");
        let row = parse_row("Eth1/3  up    Po101", &spans());
        assert_eq!(row["port_ch"], "101");
    }
}
