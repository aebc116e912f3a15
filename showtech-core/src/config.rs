use regex::Regex;

use crate::tree::{indent_of, ConfigStatement};

/// Indentation-structured view of a running configuration.
///
/// Blank lines are skipped without closing the open block. Lines whose first
/// non-blank character is `!` are comments; a `!` in column 0 closes every open
/// block. Line text is stored verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigTree {
    pub statements: Vec<ConfigStatement>,
}

impl ConfigTree {
    /// Build the statement tree for a configuration body.
    pub fn parse(body: &str) -> Self {
        let mut roots = Vec::new();
        let mut stack: Vec<ConfigStatement> = Vec::new();

        for line in body.lines() {
            let line = line.trim_end_matches('\r');
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let indent = indent_of(line);
            if trimmed.starts_with('!') {
                if indent == 0 {
                    close_until(&mut stack, &mut roots, 0);
                }
                continue;
            }

            close_until(&mut stack, &mut roots, indent);
            stack.push(ConfigStatement::new(line));
        }

        close_until(&mut stack, &mut roots, 0);
        Self { statements: roots }
    }

    /// Top-level statements whose trimmed text satisfies `predicate`.
    pub fn find<F>(&self, predicate: F) -> Vec<&ConfigStatement>
    where
        F: Fn(&str) -> bool,
    {
        self.statements
            .iter()
            .filter(|stmt| predicate(stmt.trimmed()))
            .collect()
    }

    /// Top-level statements whose trimmed text matches `pattern`.
    pub fn find_matching(&self, pattern: &Regex) -> Vec<&ConfigStatement> {
        self.find(|text| pattern.is_match(text))
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

/// Pop every open statement indented at or beyond `indent`, attaching each to
/// its parent (or to the roots when nothing is left open).
fn close_until(stack: &mut Vec<ConfigStatement>, roots: &mut Vec<ConfigStatement>, indent: usize) {
    while stack.last().is_some_and(|open| open.indent() >= indent) {
        let Some(done) = stack.pop() else {
            break;
        };
        match stack.last_mut() {
            Some(parent) => parent.children.push(done),
            None => roots.push(done),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ConfigTree;

    #[test]
    fn blank_lines_do_not_end_a_block() {
        let tree = ConfigTree::parse("interface Ethernet1/1\n  description up\n\n  switchport\n");
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.statements[0].children.len(), 2);
    }

    #[test]
    fn bang_in_first_column_closes_block() {
        let tree = ConfigTree::parse("interface Vlan1\n no ip address\n!\n shutdown\n");
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.statements[0].children.len(), 1);
        assert_eq!(tree.statements[1].trimmed(), "shutdown");
    }

    #[test]
    fn nested_lines_attach_to_nearest_parent() {
        let tree = ConfigTree::parse(
            "router bgp 1\n address-family ipv4\n  network 10.0.0.0\n neighbor 1.1.1.1\nhostname r1\n",
        );
        assert_eq!(tree.len(), 2);
        let bgp = &tree.statements[0];
        assert_eq!(bgp.children.len(), 2);
        assert_eq!(bgp.children[0].children[0].trimmed(), "network 10.0.0.0");
    }
}
