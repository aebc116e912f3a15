use std::fmt::{self, Display, Formatter};

use serde::Serialize;

/// One configuration line plus the more-indented lines that belong to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigStatement {
    /// Original line text, indentation included.
    pub text: String,
    /// Child statements in file order.
    pub children: Vec<ConfigStatement>,
}

impl ConfigStatement {
    /// Create a statement with no children.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            children: Vec::new(),
        }
    }

    /// Line text without surrounding whitespace.
    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }

    /// Leading whitespace width of the original line.
    pub fn indent(&self) -> usize {
        indent_of(&self.text)
    }
}

/// Width of leading whitespace; tabs count as a single column.
pub(crate) fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

impl Display for ConfigStatement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.text)?;
        for child in &self.children {
            write!(f, "{}", child)?;
        }
        Ok(())
    }
}
