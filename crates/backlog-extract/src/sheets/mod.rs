//! Per-sheet row transformers.
//!
//! Each transformer resolves its column indices once at construction; a
//! missing required column fails the whole sheet with
//! [`SheetError::MissingColumn`]. Everything row-level is recoverable: bad
//! rows are logged with their row number and skipped, so one malformed
//! correction never blocks the rest of the sheet.

mod duplicate_performers;
mod duplicate_scenes;
mod performer_urls;
mod performers_to_split_up;
mod scene_fingerprints;
mod scene_fixes;
mod scene_performers;

pub use duplicate_performers::DuplicatePerformers;
pub use duplicate_scenes::DuplicateScenes;
pub use performer_urls::PerformerUrls;
pub use performers_to_split_up::{PerformersToSplitUp, SplitOptions};
pub use scene_fingerprints::{SceneFingerprints, SceneFingerprintsOptions};
pub use scene_fixes::SceneFixes;
pub use scene_performers::ScenePerformers;

use backlog_model::{CheckboxError, ColumnPattern, Row, Sheet, SheetError};

/// Read a row's `(submitted, done)` checkbox pair.
///
/// Two-checkbox sheets put submitted first and done second; a sheet with a
/// single checkbox tracks done only. A row with no checkboxes at all cannot
/// be interpreted and fails the sheet.
pub(crate) fn submitted_done(row: &Row) -> Result<(bool, bool), CheckboxError> {
    let first = row.is_done(1)?;
    match row.is_done(2) {
        Ok(done) => Ok((first, done)),
        Err(CheckboxError::Insufficient { .. }) => Ok((false, first)),
        Err(err) => Err(err),
    }
}

/// Resolve a repeated column set, raising [`SheetError::MissingColumn`]
/// when the pattern matches no header at all.
pub(crate) fn require_all_columns(
    sheet: &Sheet,
    pattern: &ColumnPattern,
) -> Result<Vec<usize>, SheetError> {
    let indices = sheet.all_column_indices(pattern);
    if indices.is_empty() {
        return Err(SheetError::MissingColumn {
            title: sheet.title.clone(),
            column: pattern.to_string(),
        });
    }
    Ok(indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use backlog_model::RawCell;

    fn row_of(values: &[&str]) -> Row {
        Row::parse(
            values.iter().map(|v| RawCell::text(*v)).collect(),
            1,
            values.len(),
        )
    }

    #[test]
    fn two_checkboxes_read_as_submitted_then_done() {
        let row = row_of(&["TRUE", "FALSE", "data"]);
        assert_eq!(submitted_done(&row), Ok((true, false)));
    }

    #[test]
    fn single_checkbox_tracks_done_only() {
        let row = row_of(&["TRUE", "data"]);
        assert_eq!(submitted_done(&row), Ok((false, true)));
    }

    #[test]
    fn no_checkboxes_is_fatal() {
        let row = row_of(&["data"]);
        assert_eq!(
            submitted_done(&row),
            Err(CheckboxError::NotFound { row: 1 })
        );
    }
}
