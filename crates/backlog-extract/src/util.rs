use std::sync::OnceLock;

use regex::Regex;
use uuid::Uuid;

const UUID_PATTERN: &str = r"[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}";

fn entity_url_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(&format!(r"/([a-z]+)/({UUID_PATTERN})")).expect("valid regex"))
}

/// Parse an identifier in the canonical lowercase hyphenated UUID form.
///
/// Stricter than [`Uuid::try_parse`]: uppercase, braced and URN renditions
/// are rejected, matching the grammar the spreadsheet expects.
pub fn parse_uuid(text: &str) -> Option<Uuid> {
    if text.len() != 36 || text.bytes().any(|b| b.is_ascii_uppercase()) {
        return None;
    }
    Uuid::try_parse(text).ok()
}

/// Extract an `(entity kind, id)` pair from a database URL, e.g.
/// `https://…/performers/<uuid>` yields `("performers", <uuid>)`.
pub fn parse_entity_url(url: &str) -> Option<(&str, Uuid)> {
    let captures = entity_url_pattern().captures(url)?;
    let kind = captures.get(1)?.as_str();
    let id = parse_uuid(captures.get(2)?.as_str())?;
    Some((kind, id))
}

/// Parse a `[HH:]MM:SS`-style duration into seconds.
pub fn parse_duration(text: &str) -> Option<u32> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let parts: Vec<&str> = text.split(':').collect();
    if parts.len() > 3 {
        return None;
    }

    let mut seconds: u32 = 0;
    for part in &parts {
        seconds = seconds
            .checked_mul(60)?
            .checked_add(part.trim().parse::<u32>().ok()?)?;
    }
    Some(seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_uuid_accepts_canonical_form_only() {
        let id = "ded1973e-daae-45f3-aff1-2085fb567b63";
        assert_eq!(parse_uuid(id), Some(Uuid::parse_str(id).unwrap()));

        assert_eq!(parse_uuid("DED1973E-DAAE-45F3-AFF1-2085FB567B63"), None);
        assert_eq!(parse_uuid("not-a-uuid"), None);
        assert_eq!(parse_uuid(""), None);
        assert_eq!(parse_uuid("-"), None);
    }

    #[test]
    fn parse_entity_url_finds_kind_and_id() {
        let (kind, id) =
            parse_entity_url("https://stashdb.org/performers/ded1973e-daae-45f3-aff1-2085fb567b63")
                .unwrap();
        assert_eq!(kind, "performers");
        assert_eq!(
            id,
            Uuid::parse_str("ded1973e-daae-45f3-aff1-2085fb567b63").unwrap()
        );

        assert_eq!(
            parse_entity_url("https://www.iafd.com/person.rme/perfid=x/x.htm"),
            None
        );
    }

    #[test]
    fn parse_duration_handles_all_layouts() {
        assert_eq!(parse_duration("01:02:03"), Some(3723));
        assert_eq!(parse_duration("12:34"), Some(754));
        assert_eq!(parse_duration("45"), Some(45));
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("1:2:3:4"), None);
        assert_eq!(parse_duration("abc"), None);
    }
}
