//! "Performers To Split Up" sheet: one multi-identity record per row, with
//! its candidate identities described by free-text fragment cells.

use std::collections::HashMap;

use uuid::Uuid;

use backlog_model::{ColumnPattern, Fragment, Sheet, SheetError, SplitPerformerItem};

use crate::diag::warn_row;
use crate::fragment::parse_fragment;
use crate::sheets::require_all_columns;
use crate::util::parse_uuid;

/// Row/fragment completion handling for [`PerformersToSplitUp::parse`].
#[derive(Copy, Clone, Debug, Default)]
pub struct SplitOptions {
    /// Drop rows whose done checkbox is ticked.
    pub skip_done_rows: bool,
    /// Drop individual fragment cells struck through as completed.
    pub skip_done_fragments: bool,
}

/// Parsed "Performers To Split Up" sheet, folded by performer identifier.
#[derive(Clone, Debug, Default)]
pub struct PerformersToSplitUp {
    items: Vec<SplitPerformerItem>,
}

impl PerformersToSplitUp {
    pub fn parse(sheet: &Sheet, options: SplitOptions) -> Result<Self, SheetError> {
        let column_name = sheet.require_column(&ColumnPattern::Text("Performer"))?;
        let column_main_id = sheet.require_column(&ColumnPattern::Text("Performer Stash ID"))?;
        let columns_fragments = require_all_columns(sheet, &ColumnPattern::regex(r"^\(\d+\)$"))?;
        let column_user = sheet.require_column(&ColumnPattern::Text("Added by"))?;

        let mut items: Vec<SplitPerformerItem> = Vec::new();
        let mut by_id: HashMap<Uuid, usize> = HashMap::new();

        for row in &sheet.rows {
            if options.skip_done_rows && row.is_done(1)? {
                continue;
            }

            let raw_id = row.cells[column_main_id].value.trim();
            // `-` is the placeholder for a record that no longer exists.
            if raw_id.is_empty() || raw_id == "-" {
                continue;
            }
            let Some(id) = parse_uuid(raw_id) else {
                warn_row!(row.num, "Invalid performer ID: {raw_id:?}");
                continue;
            };

            let fragments: Vec<Fragment> = columns_fragments
                .iter()
                .map(|&i| &row.cells[i])
                .filter(|cell| !(options.skip_done_fragments && cell.done))
                .filter_map(parse_fragment)
                .collect();
            if fragments.is_empty() {
                continue;
            }

            let name_cell = &row.cells[column_name];
            let name = name_cell.value.trim().to_string();
            let notes: Vec<String> = name_cell
                .note
                .split('\n')
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(String::from)
                .collect();
            let links = name_cell.links.clone();

            let user_raw = row.cells[column_user].value.trim();
            let user = (!user_raw.is_empty()).then(|| user_raw.to_string());

            match by_id.get(&id) {
                Some(&idx) => {
                    let existing = &mut items[idx];
                    existing.fragments.extend(fragments);
                    for note in notes {
                        if !existing.notes.contains(&note) {
                            existing.notes.push(note);
                        }
                    }
                    for link in links {
                        if !existing.links.contains(&link) {
                            existing.links.push(link);
                        }
                    }
                }
                None => {
                    by_id.insert(id, items.len());
                    items.push(SplitPerformerItem {
                        name,
                        id,
                        fragments,
                        notes,
                        links,
                        user,
                    });
                }
            }
        }

        Ok(Self { items })
    }

    pub fn items(&self) -> &[SplitPerformerItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<SplitPerformerItem> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
