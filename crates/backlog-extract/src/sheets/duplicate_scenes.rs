//! "Duplicate Scenes" sheet: groups of scene identifiers to merge into a
//! main scene.

use std::collections::HashSet;

use uuid::Uuid;

use backlog_model::{Cell, ColumnPattern, DuplicateScenesItem, Sheet, SheetError};

use crate::diag::warn_row;
use crate::util::parse_uuid;

/// The default category carries no information and is left off the items.
const DEFAULT_CATEGORY: &str = "Exact duplicate";

/// Parsed "Duplicate Scenes" sheet.
#[derive(Clone, Debug, Default)]
pub struct DuplicateScenes {
    items: Vec<DuplicateScenesItem>,
}

impl DuplicateScenes {
    pub fn parse(sheet: &Sheet) -> Result<Self, SheetError> {
        let column_category = sheet.require_column(&ColumnPattern::Text("Category"))?;
        let column_studio = sheet.require_column(&ColumnPattern::Text("Studio"))?;
        let column_main_id = sheet.require_column(&ColumnPattern::Text("Main ID"))?;
        let column_user = sheet.require_column(&ColumnPattern::Text("Added by"))?;

        let mut items: Vec<DuplicateScenesItem> = Vec::new();
        // The same group of scenes is sometimes entered twice with a
        // different main; identity is the whole id set, order-free.
        let mut seen: HashSet<Vec<Uuid>> = HashSet::new();

        for row in &sheet.rows {
            if row.is_done(1)? {
                continue;
            }

            let duplicates = duplicate_ids(&row.cells[column_main_id + 1..], row.num);

            let raw_main = row.cells[column_main_id].value.trim();
            if raw_main.is_empty() || raw_main == "-" {
                continue;
            }
            let Some(main_id) = parse_uuid(raw_main) else {
                warn_row!(row.num, "Invalid main scene ID: {raw_main:?}");
                continue;
            };
            if duplicates.is_empty() {
                continue;
            }

            let mut identity: Vec<Uuid> = duplicates.clone();
            identity.push(main_id);
            identity.sort_unstable();
            if !seen.insert(identity) {
                warn_row!(row.num, "Skipping duplicate entry for scene ID: {main_id}");
                continue;
            }

            let category_raw = row.cells[column_category].value.trim();
            let category = (!category_raw.is_empty() && category_raw != DEFAULT_CATEGORY)
                .then(|| category_raw.to_string());

            let user_raw = row.cells[column_user].value.trim();

            items.push(DuplicateScenesItem {
                studio: row.cells[column_studio].value.trim().to_string(),
                main_id,
                duplicates,
                category,
                user: (!user_raw.is_empty()).then(|| user_raw.to_string()),
            });
        }

        Ok(Self { items })
    }

    pub fn items(&self) -> &[DuplicateScenesItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<DuplicateScenesItem> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Collect duplicate scene ids from the trailing cells of a row.
fn duplicate_ids(cells: &[Cell], row_num: usize) -> Vec<Uuid> {
    let mut results: Vec<Uuid> = Vec::new();

    for cell in cells {
        let value = cell.value.trim();
        if value.is_empty() || cell.done {
            continue;
        }
        // Non-identifier trailing cells (checkboxes, usernames) are expected.
        let Some(id) = parse_uuid(value) else {
            continue;
        };
        if results.contains(&id) {
            warn_row!(row_num, "Skipping duplicate scene ID: {id}");
            continue;
        }
        results.push(id);
    }

    results
}
