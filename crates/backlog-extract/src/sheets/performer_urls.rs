//! "Performer URLs" sheet: external profile links to attach to performer
//! records, grouped by performer identifier.

use std::collections::HashMap;

use uuid::Uuid;

use backlog_model::{ColumnPattern, PerformerUrlItem, Sheet, SheetError};

use crate::diag::warn_row;
use crate::sheets::submitted_done;
use crate::util::parse_uuid;

/// Parsed "Performer URLs" sheet: per-performer URL lists in row order.
#[derive(Clone, Debug, Default)]
pub struct PerformerUrls {
    groups: Vec<(Uuid, Vec<PerformerUrlItem>)>,
}

impl PerformerUrls {
    pub fn parse(sheet: &Sheet, skip_done: bool) -> Result<Self, SheetError> {
        let column_name = sheet.require_column(&ColumnPattern::regex("(?i)name"))?;
        let column_performer_id = sheet.require_column(&ColumnPattern::regex(r"(?i)\bid\b"))?;
        let column_url = sheet.require_column(&ColumnPattern::regex("(?i)url"))?;
        let column_text = sheet.require_column(&ColumnPattern::regex("(?i)text"))?;

        let mut groups: Vec<(Uuid, Vec<PerformerUrlItem>)> = Vec::new();
        let mut by_performer: HashMap<Uuid, usize> = HashMap::new();
        // Rows for one performer are expected to be adjacent; this tracks
        // where each performer id was last seen so strays can be reported.
        let mut last_seen: HashMap<String, usize> = HashMap::new();

        for row in &sheet.rows {
            let (submitted, done) = submitted_done(row)?;

            let name = row.cells[column_name].value.trim();
            let performer_raw = row.cells[column_performer_id].value.trim();
            let url = row.cells[column_url].value.trim();
            let text = row.cells[column_text].value.trim();

            // Filler row.
            if performer_raw.is_empty() || url.is_empty() || name.is_empty() {
                continue;
            }

            if skip_done && done {
                if last_seen.contains_key(performer_raw) {
                    last_seen.insert(performer_raw.to_string(), row.num);
                }
                continue;
            }

            match last_seen.get(performer_raw).copied() {
                Some(last) if row.num > last + 1 => {
                    warn_row!(
                        row.num,
                        "Ungrouped entries for performer ID {performer_raw:?} last seen row {last}"
                    );
                }
                _ => {
                    last_seen.insert(performer_raw.to_string(), row.num);
                }
            }

            let Some(performer_id) = parse_uuid(performer_raw) else {
                warn_row!(row.num, "Skipped due to invalid performer ID: {performer_raw}");
                continue;
            };

            let item = PerformerUrlItem {
                url: url.to_string(),
                name: name.to_string(),
                text: (!text.is_empty()).then(|| text.to_string()),
                submitted,
            };

            match by_performer.get(&performer_id) {
                Some(&idx) => groups[idx].1.push(item),
                None => {
                    by_performer.insert(performer_id, groups.len());
                    groups.push((performer_id, vec![item]));
                }
            }
        }

        Ok(Self { groups })
    }

    pub fn groups(&self) -> &[(Uuid, Vec<PerformerUrlItem>)] {
        &self.groups
    }

    pub fn into_groups(self) -> Vec<(Uuid, Vec<PerformerUrlItem>)> {
        self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
