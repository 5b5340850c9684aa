//! Fragment extraction from free-text "split this record up" cells.
//!
//! A fragment cell names one candidate external identity in loosely
//! formatted multi-line text: a name, optional site-name `[label]` tokens,
//! optional detail lines and bulleted lists, with links/ids carried by the
//! cell's hyperlinks and note.

use std::sync::OnceLock;

use regex::Regex;
use url::Url;
use uuid::Uuid;

use backlog_model::{Cell, Fragment, STRIKE_END, STRIKE_START};

use crate::util::parse_uuid;

/// Placeholder for a fragment whose first line carried nothing but labels.
pub const NO_NAME: &str = "[no name provided]";

/// A note line equal to this sentinel stops note processing: everything
/// below it is bookkeeping for an external archive, not fragment data.
const ARCHIVE_SENTINEL: &str = "archive";

/// Known site-name labels.
///
/// Labels appear in cells as `[label]` or `[label N]`/`[labelN]` tokens
/// (case-insensitive) and carry no fragment data of their own; they only
/// tell the curator which external profile a link points at. Adding a new
/// label is a one-line change here.
pub const SITE_LABELS: &[&str] = &[
    "babepedia",
    "boobpedia",
    "data18",
    "egafd",
    "eurobabeindex",
    "freeones",
    "iafd",
    "indexxx",
    "ixxx",
    "manyvids",
    "nude",
    "stash",
    "thenude",
    "twitter",
];

/// Matches one `[label]` token, optionally numbered.
pub fn labels_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // Longest alternatives first so e.g. `thenude` wins over `nude`.
        let mut labels: Vec<&str> = SITE_LABELS.to_vec();
        labels.sort_by_key(|l| std::cmp::Reverse(l.len()));
        let alternation = labels.join("|");
        Regex::new(&format!(r"(?i)\[(?:{alternation}) ?\d*\]")).expect("valid regex")
    })
}

fn url_prefix_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(https?://\S+)").expect("valid regex"))
}

/// Remove label tokens (and one following space, so words re-join cleanly)
/// from a line.
fn strip_labels(line: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        let labels = labels_pattern().as_str();
        Regex::new(&format!("{labels} ?")).expect("valid regex")
    });
    re.replace_all(line, "").trim().to_string()
}

fn strip_markers(text: &str) -> String {
    text.chars()
        .filter(|&c| c != STRIKE_START && c != STRIKE_END)
        .collect()
}

fn is_bullet(line: &str) -> bool {
    strip_markers(line).starts_with("- ")
}

/// Remove a leading `- ` bullet, tolerating a strike marker before it.
fn strip_bullet(line: &str) -> String {
    if let Some(rest) = line.strip_prefix("- ") {
        return rest.to_string();
    }
    if let Some(rest) = line.strip_prefix(STRIKE_START) {
        if let Some(rest) = rest.strip_prefix("- ") {
            return format!("{STRIKE_START}{rest}");
        }
    }
    line.to_string()
}

/// Parse one fragment cell. Returns `None` only for an empty cell.
pub fn parse_fragment(cell: &Cell) -> Option<Fragment> {
    let raw = cell.value.trim();
    if raw.is_empty() {
        return None;
    }

    let mut lines: Vec<String> = raw.split('\n').map(|l| l.trim().to_string()).collect();
    let first = lines.remove(0);

    let name = if lines.is_empty() {
        // Single-line cells may inline everything: `Name [label] rest`.
        // The name is whatever precedes the first label; whatever follows
        // the last label becomes the (only) further line.
        let label_spans: Vec<(usize, usize)> = labels_pattern()
            .find_iter(&first)
            .map(|m| (m.start(), m.end()))
            .collect();
        match (label_spans.first(), label_spans.last()) {
            (Some(&(first_start, _)), Some(&(_, last_end))) => {
                let rest = first[last_end..].trim();
                if !rest.is_empty() {
                    lines.push(rest.to_string());
                }
                first[..first_start].trim().to_string()
            }
            _ => first.clone(),
        }
    } else {
        strip_labels(&first)
    };
    let name = name.trim_end_matches('-').trim_end().to_string();
    let name = if name.is_empty() {
        NO_NAME.to_string()
    } else {
        name
    };

    let cleaned: Vec<String> = lines
        .iter()
        .map(|line| strip_labels(line))
        .filter(|line| !line.is_empty())
        .collect();

    let (note_lines, note_links) = split_note(&cell.note);

    let mut text: Option<String> = None;
    let mut notes: Vec<String> = Vec::new();

    if !cleaned.is_empty() {
        let total = cleaned.len() + note_lines.len();
        let all_bullets =
            total > 1 && cleaned.iter().chain(note_lines.iter()).all(|l| is_bullet(l));

        if all_bullets {
            // The whole thing reads as one bulleted list of notes; there is
            // no single detail line to promote.
            notes.extend(cleaned);
        } else {
            text = Some(strip_bullet(&cleaned[0]));
            notes.extend(cleaned[1..].iter().cloned());
        }
    }
    notes.extend(note_lines);

    let (id, links) = resolve_links(&cell.links, note_links);

    Some(Fragment {
        raw: raw.to_string(),
        id,
        name,
        text,
        notes,
        links,
        done: cell.done,
    })
}

/// Split a cell note into surviving note lines and extracted links.
fn split_note(note: &str) -> (Vec<String>, Vec<String>) {
    let mut note_lines: Vec<String> = Vec::new();
    let mut note_links: Vec<String> = Vec::new();

    for line in note.split('\n') {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let plain = strip_markers(line);
        if plain.trim().eq_ignore_ascii_case(ARCHIVE_SENTINEL) {
            break;
        }

        if let Some(m) = url_prefix_pattern().find(&plain) {
            // A struck-through link is being retracted along with its line.
            if !line.starts_with(STRIKE_START) {
                note_links.push(m.as_str().to_string());
            }
            continue;
        }

        note_lines.push(line.to_string());
    }

    (note_lines, note_links)
}

/// Resolve the fragment's identifier from its direct links and merge the
/// remaining direct links with the note-derived ones.
fn resolve_links(direct: &[String], note_links: Vec<String>) -> (Option<Uuid>, Vec<String>) {
    let mut id: Option<Uuid> = None;
    let mut links: Vec<String> = Vec::new();

    for link in direct {
        if id.is_none() {
            if let Some(found) = performer_id_link(link) {
                id = Some(found);
                continue;
            }
        }
        if is_redirect_stub(link) {
            continue;
        }
        if !links.contains(link) {
            links.push(link.clone());
        }
    }

    for link in note_links {
        if !links.contains(&link) {
            links.push(link);
        }
    }

    (id, links)
}

/// A direct link counts as the fragment's identifier only when it is a
/// plain `performers/<uuid>` path with no query string.
fn performer_id_link(link: &str) -> Option<Uuid> {
    let url = Url::parse(link).ok()?;
    if url.query().is_some() {
        return None;
    }
    let mut segments = url.path_segments()?.filter(|s| !s.is_empty());
    match (segments.next(), segments.next(), segments.next()) {
        (Some("performers"), Some(id), None) => parse_uuid(id),
        _ => None,
    }
}

/// Bare `http://host/` links are tracking/redirect noise, not data.
fn is_redirect_stub(link: &str) -> bool {
    Url::parse(link).is_ok_and(|url| {
        url.scheme() == "http" && matches!(url.path(), "" | "/") && url.query().is_none()
    })
}
