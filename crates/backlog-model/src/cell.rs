use serde::{Deserialize, Serialize};
use url::Url;

/// Marks the start of a struck-through span inside a [`Cell`] value.
pub const STRIKE_START: char = '\u{2}';
/// Marks the end of a struck-through span inside a [`Cell`] value.
pub const STRIKE_END: char = '\u{3}';

/// One formatting run over a cell value.
///
/// ## Indexing
/// `start` is a **Unicode scalar value** (`char`) index into the cell value
/// (not a UTF-8 byte offset). A run extends to the start of the next run, or
/// to the end of the value for the last run. Out-of-range offsets are clamped
/// during parsing, never rejected.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TextFormatRun {
    #[serde(default)]
    pub start: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default)]
    pub strikethrough: bool,
}

/// A single grid cell as delivered by a transport collaborator, before
/// normalization.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCell {
    #[serde(default)]
    pub value: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub runs: Vec<TextFormatRun>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hyperlink: Option<String>,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub strikethrough: bool,
}

impl RawCell {
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }
}

/// One grid position's normalized content.
///
/// `value` may embed [`STRIKE_START`]/[`STRIKE_END`] pairs delimiting
/// partially-completed (struck-through) spans. A marker pair never straddles
/// a line break.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub value: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<String>,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub done: bool,
}

impl Cell {
    /// Normalize one raw cell.
    ///
    /// - Link URLs are collected from runs first, then the cell-level
    ///   hyperlink, first-seen order, discarding URLs with no host.
    /// - `done` is the cell-level strikethrough flag; a cell whose runs are
    ///   *all* struck through counts as done as well.
    /// - When not fully done, struck-through run spans are wrapped in
    ///   sentinel markers, links carried solely by struck runs are dropped
    ///   (they are being retracted), and struck segments that appear in the
    ///   note are wrapped in `~~` there.
    pub fn parse(raw: RawCell) -> Self {
        let RawCell {
            mut value,
            runs,
            hyperlink,
            mut note,
            strikethrough,
        } = raw;

        let mut links: Vec<String> = Vec::new();
        for run in &runs {
            if let Some(link) = &run.link {
                if has_host(link) && !links.iter().any(|l| l == link) {
                    links.push(link.clone());
                }
            }
        }
        if let Some(link) = &hyperlink {
            if has_host(link) && !links.iter().any(|l| l == link) {
                links.push(link.clone());
            }
        }

        let mut done = strikethrough;
        if !done && !runs.is_empty() && runs.iter().all(|r| r.strikethrough) {
            done = true;
        }

        if !done && runs.iter().any(|r| r.strikethrough) {
            let chars: Vec<char> = value.chars().collect();
            let spans = struck_spans(&runs, &chars);

            retract_struck_links(&mut links, &runs, hyperlink.as_deref());

            let segments: Vec<String> = spans
                .iter()
                .map(|&(start, end)| chars[start..end].iter().collect())
                .collect();

            value = render_markers(&chars, &spans);

            for segment in &segments {
                if !segment.trim().is_empty() && note.contains(segment.as_str()) {
                    note = note.replace(segment.as_str(), &format!("~~{segment}~~"));
                }
            }
        }

        Self {
            value,
            links,
            note,
            done,
        }
    }

    pub fn first_link(&self) -> Option<&str> {
        self.links.first().map(String::as_str)
    }
}

/// Compute the struck-through char ranges of a cell value.
///
/// Ranges are clamped to the value length, shifted off leading/trailing
/// line breaks so a marker pair never splits a `\n`, and returned sorted
/// and non-overlapping.
fn struck_spans(runs: &[TextFormatRun], chars: &[char]) -> Vec<(usize, usize)> {
    let len = chars.len();
    let mut spans: Vec<(usize, usize)> = Vec::new();

    for (idx, run) in runs.iter().enumerate() {
        if !run.strikethrough {
            continue;
        }

        let mut start = run.start.min(len);
        let mut end = runs.get(idx + 1).map_or(len, |next| next.start).min(len);

        while start < end && chars[start] == '\n' {
            start += 1;
        }
        while end > start && chars[end - 1] == '\n' {
            end -= 1;
        }

        if start < end {
            spans.push((start, end));
        }
    }

    spans.sort_unstable();

    // Malformed run offsets can produce overlaps; clamp them away.
    let mut pos = 0;
    spans.retain_mut(|span| {
        span.0 = span.0.max(pos);
        if span.0 >= span.1 {
            return false;
        }
        pos = span.1;
        true
    });

    spans
}

/// A link attached only to struck-through runs is being retracted.
fn retract_struck_links(links: &mut Vec<String>, runs: &[TextFormatRun], hyperlink: Option<&str>) {
    links.retain(|link| {
        let struck = runs
            .iter()
            .any(|r| r.strikethrough && r.link.as_deref() == Some(link));
        if !struck {
            return true;
        }
        runs.iter()
            .any(|r| !r.strikethrough && r.link.as_deref() == Some(link))
            || hyperlink == Some(link.as_str())
    });
}

fn render_markers(chars: &[char], spans: &[(usize, usize)]) -> String {
    let mut out = String::with_capacity(chars.len() + spans.len() * 2);
    let mut pos = 0;

    for &(start, end) in spans {
        out.extend(chars[pos..start].iter());
        out.push(STRIKE_START);
        out.extend(chars[start..end].iter());
        out.push(STRIKE_END);
        pos = end;
    }
    out.extend(chars[pos..].iter());

    out
}

fn has_host(link: &str) -> bool {
    Url::parse(link).is_ok_and(|url| url.host_str().is_some())
}
