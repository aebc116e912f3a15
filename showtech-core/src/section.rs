//! Segmentation of a raw capture into per-command sections.
//!
//! Captures concatenate many `show ...` outputs with whatever delimiter the
//! collecting tool or platform used. Four header grammars are recognised, in
//! precedence order:
//!
//! 1. banners: `----- show x -----` on one line, or a banner line, the command,
//!    and a closing banner line of the same character
//! 2. quoted: `` `show x` `` or `'show x'` alone on a line
//! 3. bare: a line starting with `show ip`, `show interface(s)`, `show cdp`,
//!    `show trunk`, `show run(ning(-config))` or `show version`
//! 4. timestamped: `12:01:02.345 show x`
//!
//! A section body runs from the end of its header to the start of the nearest
//! following header of any grammar.

use std::collections::{HashMap, HashSet};
use std::fmt::{self, Display, Formatter};
use std::sync::LazyLock;

use log::debug;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

/// Commands accepted as the running configuration, most specific first.
pub const RUNNING_CONFIG_COMMANDS: [&str; 4] = [
    "show running-config",
    "show running-config all",
    "show running",
    "show run",
];

static QUOTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:`(show\s[^`]+)`|'(show\s[^']+)')\s*$").expect("valid quoted header regex")
});

static BARE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(show\s+(?:ip|interfaces?|cdp|trunk|running-config|running|run|version)\b.*?)\s*$",
    )
    .expect("valid bare header regex")
});

static TIMESTAMPED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\d{2}:\d{2}:\d{2}\.\d{3}\s+(show\s.+?)\s*$")
        .expect("valid timestamped header regex")
});

static HOSTNAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^hostname\s+(\S+)").expect("valid hostname regex"));

static NXOS_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)NX-OS|Nexus").expect("valid nxos marker regex"));

static IOS_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bIOS\b").expect("valid ios marker regex"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SectionError {
    #[error("no show-command headers found in capture")]
    NoSectionsFound,
}

/// Header grammars in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderStyle {
    Banner,
    Quoted,
    Bare,
    Timestamped,
}

impl Display for HeaderStyle {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            HeaderStyle::Banner => "banner",
            HeaderStyle::Quoted => "quoted",
            HeaderStyle::Bare => "bare",
            HeaderStyle::Timestamped => "timestamped",
        };
        f.write_str(name)
    }
}

/// Operating-system family of a capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PlatformFamily {
    #[serde(rename = "IOS")]
    Ios,
    #[serde(rename = "NXOS")]
    Nxos,
    Unknown,
}

impl Display for PlatformFamily {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlatformFamily::Ios => "IOS",
            PlatformFamily::Nxos => "NXOS",
            PlatformFamily::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

/// One extracted command output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    /// Normalized command key.
    pub command: String,
    /// 1-based line of the header's command text.
    pub line: usize,
    pub style: HeaderStyle,
    pub body: String,
}

#[derive(Debug, Clone)]
struct Header {
    /// First line index covered by the header.
    start: usize,
    /// Line index of the command text.
    command_line: usize,
    /// First line index of the body.
    body_start: usize,
    style: HeaderStyle,
    command: String,
}

/// Command name to raw output, for one capture.
#[derive(Debug, Clone, Default)]
pub struct SectionStore {
    sections: Vec<Section>,
    index: HashMap<String, usize>,
}

impl SectionStore {
    /// Split `raw` into sections. Fails only when no header of any grammar exists.
    pub fn extract(raw: &str) -> Result<Self, SectionError> {
        let lines: Vec<&str> = raw.lines().collect();
        let headers = scan_headers(&lines);
        if headers.is_empty() {
            return Err(SectionError::NoSectionsFound);
        }

        let mut starts: Vec<usize> = headers.iter().map(|h| h.start).collect();
        starts.sort_unstable();

        let mut ordered: Vec<&Header> = headers.iter().collect();
        ordered.sort_by_key(|h| (h.style, h.start));

        let mut store = SectionStore::default();
        for header in ordered {
            let key = normalize_command(&header.command);
            if store.index.contains_key(&key) {
                debug!(
                    "ignoring duplicate '{key}' at line {}",
                    header.command_line + 1
                );
                continue;
            }
            let end = starts
                .iter()
                .copied()
                .find(|&start| start >= header.body_start)
                .unwrap_or(lines.len());
            let body = lines[header.body_start.min(end)..end].join("\n");
            store.index.insert(key.clone(), store.sections.len());
            store.sections.push(Section {
                command: key,
                line: header.command_line + 1,
                style: header.style,
                body: body.trim_start_matches('\n').trim_end().to_string(),
            });
        }
        store.sections.sort_by_key(|s| s.line);
        store.index = store
            .sections
            .iter()
            .enumerate()
            .map(|(idx, s)| (s.command.clone(), idx))
            .collect();
        debug!("extracted {} sections", store.sections.len());
        Ok(store)
    }

    /// Body of `command`, matched case- and whitespace-insensitively.
    pub fn get(&self, command: &str) -> Option<&str> {
        self.index
            .get(&normalize_command(command))
            .map(|&idx| self.sections[idx].body.as_str())
    }

    /// Body of the first command in `commands` that is present.
    pub fn get_any(&self, commands: &[&str]) -> Option<&str> {
        commands.iter().find_map(|command| self.get(command))
    }

    pub fn contains(&self, command: &str) -> bool {
        self.index.contains_key(&normalize_command(command))
    }

    /// Running configuration body, under any of its accepted command spellings.
    pub fn running_config(&self) -> Option<&str> {
        self.get_any(&RUNNING_CONFIG_COMMANDS)
    }

    /// Device hostname from the running configuration, or `"unknown"`.
    pub fn hostname(&self) -> String {
        self.running_config()
            .and_then(|config| HOSTNAME.captures(config))
            .map(|caps| caps[1].to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }

    /// Platform family from running-config and `show version` markers.
    pub fn platform_family(&self) -> PlatformFamily {
        let config = self.running_config();
        if config.is_some_and(|body| NXOS_MARKER.is_match(body)) {
            return PlatformFamily::Nxos;
        }
        if let Some(version) = self.get("show version") {
            if NXOS_MARKER.is_match(version) {
                return PlatformFamily::Nxos;
            }
            if IOS_MARKER.is_match(version) {
                return PlatformFamily::Ios;
            }
        }
        if config.is_some() {
            PlatformFamily::Ios
        } else {
            PlatformFamily::Unknown
        }
    }

    /// Sections in file order.
    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    /// Normalized command keys in file order.
    pub fn commands(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.command.as_str())
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Lowercase a command and collapse internal whitespace runs to one space.
pub fn normalize_command(command: &str) -> String {
    command
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

fn scan_headers(lines: &[&str]) -> Vec<Header> {
    let mut claimed = HashSet::new();
    let mut headers = Vec::new();

    for header in scan_banners(lines) {
        claimed.extend(header.start..header.body_start);
        headers.push(header);
    }

    let single_line: [(HeaderStyle, fn(&str) -> Option<String>); 3] = [
        (HeaderStyle::Quoted, quoted_command),
        (HeaderStyle::Bare, bare_command),
        (HeaderStyle::Timestamped, timestamped_command),
    ];
    for (style, matcher) in single_line {
        for (idx, line) in lines.iter().enumerate() {
            if claimed.contains(&idx) {
                continue;
            }
            if let Some(command) = matcher(line) {
                claimed.insert(idx);
                headers.push(Header {
                    start: idx,
                    command_line: idx,
                    body_start: idx + 1,
                    style,
                    command,
                });
            }
        }
    }
    headers
}

fn scan_banners(lines: &[&str]) -> Vec<Header> {
    let mut headers = Vec::new();
    let mut idx = 0;
    while idx < lines.len() {
        if let Some(command) = inline_banner_command(lines[idx]) {
            headers.push(Header {
                start: idx,
                command_line: idx,
                body_start: idx + 1,
                style: HeaderStyle::Banner,
                command,
            });
            idx += 1;
            continue;
        }
        if let (Some(open), Some(middle), Some(close)) = (
            banner_char(lines[idx]),
            lines.get(idx + 1),
            lines.get(idx + 2).and_then(|line| banner_char(line)),
        ) {
            let middle = middle.trim();
            if open == close && is_show_command(middle) {
                headers.push(Header {
                    start: idx,
                    command_line: idx + 1,
                    body_start: idx + 3,
                    style: HeaderStyle::Banner,
                    command: middle.to_string(),
                });
                idx += 3;
                continue;
            }
        }
        idx += 1;
    }
    headers
}

/// The repeated character of a line made only of 5+ `-`, `*` or `=`.
fn banner_char(line: &str) -> Option<char> {
    let line = line.trim();
    let first = line.chars().next()?;
    let is_banner =
        matches!(first, '-' | '*' | '=') && line.len() >= 5 && line.chars().all(|c| c == first);
    is_banner.then_some(first)
}

fn inline_banner_command(line: &str) -> Option<String> {
    let line = line.trim();
    let first = line.chars().next()?;
    if !matches!(first, '-' | '*' | '=') {
        return None;
    }
    let inner = line.trim_start_matches(first);
    let lead = line.len() - inner.len();
    let inner_trimmed = inner.trim_end_matches(first);
    let trail = inner.len() - inner_trimmed.len();
    if lead < 5 || trail < 5 {
        return None;
    }
    let command = inner_trimmed.trim();
    is_show_command(command).then(|| command.to_string())
}

fn is_show_command(text: &str) -> bool {
    text.split_whitespace().next().is_some_and(|word| word.eq_ignore_ascii_case("show"))
        && text.split_whitespace().nth(1).is_some()
}

fn quoted_command(line: &str) -> Option<String> {
    let caps = QUOTED.captures(line)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().trim().to_string())
}

fn bare_command(line: &str) -> Option<String> {
    BARE.captures(line).map(|caps| caps[1].to_string())
}

fn timestamped_command(line: &str) -> Option<String> {
    TIMESTAMPED.captures(line).map(|caps| caps[1].to_string())
}
