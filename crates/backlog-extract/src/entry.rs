//! Change-entry extraction from a single remove/append cell.
//!
//! Cell text follows a human labeling convention:
//!
//! ```text
//! [status] Name [disambiguation] (as Appearance)
//! ```
//!
//! where every part except the name is optional, and the cell's hyperlink
//! encodes the identity's database id.

use std::sync::OnceLock;

use regex::Regex;
use uuid::Uuid;

use backlog_model::{Cell, ChangeEntry};

use crate::diag::{info_row, warn_row};
use crate::util::parse_entity_url;

fn entry_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)^(?:\[(?P<status>[a-z]+?)\] )?(?P<name>.+?)(?: \[(?P<dsmbg>.+?)\])?(?: \(as (?P<as>.+)\))?$",
        )
        .expect("valid regex")
    })
}

fn trailing_parens_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?P<name>.+?) \((?P<dsmbg>[^()]+)\)$").expect("valid regex"))
}

/// Parse one remove/append cell into a [`ChangeEntry`].
///
/// Returns `None` for cells that intentionally carry no entry: empty cells,
/// `>>>>>` row continuations, `#` comments, `[v]` voided entries, and (when
/// `skip_done_cells` is set) cells struck through as completed. Malformed
/// text never fails: the whole value becomes the name and a warning is
/// logged.
pub fn parse_change_entry(
    cell: &Cell,
    row_num: usize,
    key: Option<Uuid>,
    skip_done_cells: bool,
) -> Option<ChangeEntry> {
    let raw_name = cell.value.trim();

    if raw_name.is_empty() || raw_name.starts_with(">>>>>") {
        return None;
    }
    if raw_name.starts_with('#') || raw_name.starts_with("[v]") {
        return None;
    }
    if skip_done_cells && cell.done {
        return None;
    }

    let (status, mut name, mut disambiguation, appearance) =
        match entry_pattern().captures(raw_name) {
            Some(captures) => (
                captures.name("status").map(|m| m.as_str().to_string()),
                captures.name("name").map_or_else(
                    || raw_name.to_string(),
                    |m| m.as_str().to_string(),
                ),
                captures.name("dsmbg").map(|m| m.as_str().to_string()),
                captures.name("as").map(|m| m.as_str().to_string()),
            ),
            None => {
                warn_row!(row_num, "Failed to parse name {raw_name:?}");
                (None, raw_name.to_string(), None, None)
            }
        };

    // Common mis-authored variant: disambiguation in trailing parens
    // instead of the `[...]` tag syntax.
    if disambiguation.is_none() {
        let candidate = name.clone();
        if let Some(captures) = trailing_parens_pattern().captures(&candidate) {
            info_row!(
                row_num,
                "Recovered disambiguation from trailing parens: {raw_name:?}"
            );
            name = captures["name"].to_string();
            disambiguation = Some(captures["dsmbg"].to_string());
        }
    }

    // Logical key of the row, for locating the cell from the logs.
    let key = key.map(|k| format!(" (for {k})")).unwrap_or_default();

    let url = cell.first_link();
    let id = match url {
        None => {
            if status.as_deref() != Some("new") {
                warn_row!(row_num, "Missing performer ID: {raw_name}{key}");
            }
            None
        }
        Some(url) => match parse_entity_url(url) {
            Some(("performers", id)) => Some(id),
            Some(("edits", _)) => None,
            Some(_) => {
                warn_row!(row_num, "Failed to extract performer ID for: {raw_name}{key}");
                None
            }
            None => {
                if status.as_deref() != Some("new") {
                    warn_row!(row_num, "Failed to extract performer ID for: {raw_name}{key}");
                }
                None
            }
        },
    };

    let status_url = match (status.as_deref(), url) {
        (Some("new") | Some("c"), Some(url)) => Some(url.to_string()),
        _ => None,
    };

    let notes: Vec<String> = cell
        .note
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty() && Some(*line) != url)
        .map(String::from)
        .collect();

    Some(ChangeEntry {
        id,
        name,
        disambiguation,
        appearance,
        status,
        status_url,
        notes,
    })
}

/// Parse a set of remove/append cells into a deduplicated entry list.
///
/// Entries equal on `(id, name, appearance)` within the same list keep only
/// their first occurrence; later ones are logged and dropped.
pub fn parse_change_entries<'a>(
    cells: impl IntoIterator<Item = &'a Cell>,
    row_num: usize,
    key: Option<Uuid>,
    skip_done_cells: bool,
) -> Vec<ChangeEntry> {
    let mut results: Vec<ChangeEntry> = Vec::new();

    for cell in cells {
        let Some(entry) = parse_change_entry(cell, row_num, key, skip_done_cells) else {
            continue;
        };

        if results.contains(&entry) {
            warn_row!(
                row_num,
                "Skipping duplicate performer: {}",
                cell.value.trim()
            );
            continue;
        }

        results.push(entry);
    }

    results
}
