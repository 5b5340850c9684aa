//! "Duplicate Performers" sheet: groups of performer identifiers to merge
//! into a main profile.

use uuid::Uuid;

use backlog_model::{ColumnPattern, DuplicatePerformersItem, Row, Sheet, SheetError};

use crate::diag::warn_row;
use crate::sheets::submitted_done;
use crate::util::parse_uuid;

/// Parsed "Duplicate Performers" sheet.
#[derive(Clone, Debug, Default)]
pub struct DuplicatePerformers {
    items: Vec<DuplicatePerformersItem>,
}

impl DuplicatePerformers {
    pub fn parse(sheet: &Sheet, skip_done: bool) -> Result<Self, SheetError> {
        let column_name = sheet.require_column(&ColumnPattern::Text("Performer"))?;
        let column_main_id = sheet.require_column(&ColumnPattern::Text("Main ID"))?;
        let column_user = sheet.require_column(&ColumnPattern::Text("Added by"))?;

        let mut items: Vec<DuplicatePerformersItem> = Vec::new();

        for row in &sheet.rows {
            let (submitted, done) = submitted_done(row)?;
            if skip_done && done {
                continue;
            }

            let raw_main = row.cells[column_main_id].value.trim();
            if raw_main.is_empty() || raw_main == "-" {
                continue;
            }
            let Some(main_id) = parse_uuid(raw_main) else {
                warn_row!(row.num, "Invalid main performer ID: {raw_main:?}");
                continue;
            };

            let name_cell = &row.cells[column_name];
            let mut notes: Vec<String> = name_cell
                .note
                .split('\n')
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(String::from)
                .collect();

            let duplicates = duplicate_ids(row, column_main_id, column_user, &mut notes);
            if duplicates.is_empty() {
                continue;
            }

            let mut unique_notes: Vec<String> = Vec::new();
            for note in notes {
                if !unique_notes.contains(&note) {
                    unique_notes.push(note);
                }
            }

            let user_raw = row.cells[column_user].value.trim();

            items.push(DuplicatePerformersItem {
                name: name_cell.value.trim().to_string(),
                main_id,
                duplicates,
                notes: unique_notes,
                user: (!user_raw.is_empty()).then(|| user_raw.to_string()),
                submitted,
            });
        }

        Ok(Self { items })
    }

    pub fn items(&self) -> &[DuplicatePerformersItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<DuplicatePerformersItem> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Collect duplicate performer ids from the trailing cells of a row.
///
/// Unlike scenes, a non-identifier trailing cell is meaningful here: it is
/// a profile that does not exist in the database yet, so its link (or text)
/// is demoted to the item's notes.
fn duplicate_ids(
    row: &Row,
    column_main_id: usize,
    column_user: usize,
    notes: &mut Vec<String>,
) -> Vec<Uuid> {
    let mut results: Vec<Uuid> = Vec::new();

    for (idx, cell) in row.cells.iter().enumerate().skip(column_main_id + 1) {
        if idx == column_user {
            continue;
        }
        let value = cell.value.trim();
        if value.is_empty() || cell.done {
            continue;
        }

        let Some(id) = parse_uuid(value) else {
            let note = cell.first_link().unwrap_or(value);
            notes.push(note.to_string());
            continue;
        };

        if results.contains(&id) {
            warn_row!(row.num, "Skipping duplicate performer ID: {id}");
            continue;
        }
        results.push(id);
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use backlog_model::RawCell;
    use pretty_assertions::assert_eq;

    const HEADER: &[&str] = &["Submitted", "Done", "Performer", "Main ID", "1", "2"];

    const MAIN: &str = "11111111-1111-4111-8111-111111111111";
    const DUP_A: &str = "22222222-2222-4222-8222-222222222222";
    const DUP_B: &str = "33333333-3333-4333-8333-333333333333";

    fn sheet(rows: Vec<Vec<RawCell>>) -> Sheet {
        let mut grid: Vec<Vec<RawCell>> =
            vec![HEADER.iter().map(|h| RawCell::text(*h)).collect()];
        // "Added by" lives past the duplicate cells on this sheet.
        grid[0].push(RawCell::text("Added by"));
        grid.extend(rows);
        Sheet::parse_data("duplicate performers", grid, Some(1)).unwrap()
    }

    fn row(main: &str, dups: [&str; 2]) -> Vec<RawCell> {
        vec![
            RawCell::text("FALSE"),
            RawCell::text("FALSE"),
            RawCell::text("Jane Doe"),
            RawCell::text(main),
            RawCell::text(dups[0]),
            RawCell::text(dups[1]),
            RawCell::text("curator"),
        ]
    }

    #[test]
    fn collects_duplicates_and_user() {
        let data =
            DuplicatePerformers::parse(&sheet(vec![row(MAIN, [DUP_A, DUP_B])]), true).unwrap();

        assert_eq!(data.len(), 1);
        let item = &data.items()[0];
        assert_eq!(item.name, "Jane Doe");
        assert_eq!(item.main_id.to_string(), MAIN);
        assert_eq!(item.duplicates.len(), 2);
        assert_eq!(item.user.as_deref(), Some("curator"));
        assert!(!item.submitted);
    }

    #[test]
    fn non_identifier_cells_become_notes() {
        let mut cells = row(MAIN, [DUP_A, "unregistered profile"]);
        cells[5].hyperlink = Some("https://example.org/profile".into());
        let data = DuplicatePerformers::parse(&sheet(vec![cells]), true).unwrap();

        let item = &data.items()[0];
        assert_eq!(item.duplicates.len(), 1);
        assert_eq!(item.notes, vec!["https://example.org/profile"]);
    }

    #[test]
    fn name_cell_note_lines_merge_with_demoted_cells() {
        let mut cells = row(MAIN, [DUP_A, "maybe the same person"]);
        cells[2].note = "needs research\n\nneeds research".into();
        let data = DuplicatePerformers::parse(&sheet(vec![cells]), true).unwrap();

        assert_eq!(
            data.items()[0].notes,
            vec!["needs research", "maybe the same person"]
        );
    }

    #[test]
    fn placeholder_invalid_and_empty_rows_are_skipped() {
        let data = DuplicatePerformers::parse(
            &sheet(vec![
                row("-", [DUP_A, ""]),
                row("", [DUP_A, ""]),
                row("not-a-uuid", [DUP_A, ""]),
                row(MAIN, ["", ""]),
            ]),
            true,
        )
        .unwrap();

        assert!(data.is_empty());
    }
}
