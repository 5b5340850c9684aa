//! "Scene Performers" sheet: remove/append/update corrections to a scene's
//! performer list.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use uuid::Uuid;

use backlog_model::{ColumnPattern, ScenePerformersItem, Sheet, SheetError};

use crate::diag::{info_row, warn_row};
use crate::entry::parse_change_entries;
use crate::reconcile::{reconcile, Reconciled};
use crate::sheets::{require_all_columns, submitted_done};
use crate::util::parse_uuid;

/// A studio cell may carry the parent studio in trailing brackets:
/// `Studio Name [Parent Name]`.
fn parent_studio_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?P<studio>.+?) \[(?P<parent>.+)\]$").expect("valid regex"))
}

/// Parsed "Scene Performers" sheet, folded by scene identifier.
#[derive(Clone, Debug, Default)]
pub struct ScenePerformers {
    items: Vec<ScenePerformersItem>,
}

impl ScenePerformers {
    /// Transform every data row of the sheet.
    ///
    /// With `skip_done`, rows (and individual cells) already struck through
    /// as completed are dropped; otherwise the done state is carried on the
    /// items. With `skip_no_id`, rows where any participant lacks a resolved
    /// identifier are dropped, as are rows carrying `[merge]`/`[edit]`/
    /// `[new]`-tagged entries — acting on such rows would be ambiguous.
    /// Rows sharing a scene identifier are folded into one item with their
    /// change lists concatenated; the first row's submitted/done flags win.
    pub fn parse(sheet: &Sheet, skip_done: bool, skip_no_id: bool) -> Result<Self, SheetError> {
        let column_studio = sheet.require_column(&ColumnPattern::Text("Studio"))?;
        let column_scene_id = sheet.require_column(&ColumnPattern::Text("Scene ID"))?;
        let columns_remove =
            require_all_columns(sheet, &ColumnPattern::regex(r"\(\d+\) Remove/Replace"))?;
        let columns_append =
            require_all_columns(sheet, &ColumnPattern::regex(r"\(\d+\) Add/With"))?;
        let column_note = sheet.require_column(&ColumnPattern::Text("Edit Note"))?;
        let column_user = sheet.require_column(&ColumnPattern::Text("Added by"))?;

        let mut items: Vec<ScenePerformersItem> = Vec::new();
        let mut by_scene: HashMap<Uuid, usize> = HashMap::new();

        for row in &sheet.rows {
            let (submitted, done) = submitted_done(row)?;
            if skip_done && done {
                continue;
            }

            // Empty or non-identifier scene cells mark filler rows.
            let Some(scene_id) = parse_uuid(row.cells[column_scene_id].value.trim()) else {
                continue;
            };

            let remove = parse_change_entries(
                columns_remove.iter().map(|&i| &row.cells[i]),
                row.num,
                Some(scene_id),
                skip_done,
            );
            let append = parse_change_entries(
                columns_append.iter().map(|&i| &row.cells[i]),
                row.num,
                Some(scene_id),
                skip_done,
            );
            let reconciled = reconcile(remove, append, row.num);

            if reconciled.remove.is_empty()
                && reconciled.append.is_empty()
                && reconciled.updates.is_empty()
            {
                warn_row!(row.num, "Skipped due to no changes.");
                continue;
            }

            if skip_no_id && skip_ambiguous(&reconciled, row.num) {
                continue;
            }

            let studio_raw = row.cells[column_studio].value.trim();
            let (studio, parent_studio) = match parent_studio_pattern().captures(studio_raw) {
                Some(captures) => (
                    Some(captures["studio"].to_string()),
                    Some(captures["parent"].to_string()),
                ),
                None => ((!studio_raw.is_empty()).then(|| studio_raw.to_string()), None),
            };

            let note_cell = &row.cells[column_note];
            let comment_parts: Vec<&str> = [note_cell.value.trim(), note_cell.note.trim()]
                .into_iter()
                .filter(|part| !part.is_empty())
                .collect();
            let comment = (!comment_parts.is_empty()).then(|| comment_parts.join("\n\n"));

            let user_raw = row.cells[column_user].value.trim();
            let user = (!user_raw.is_empty()).then(|| user_raw.to_string());

            match by_scene.get(&scene_id) {
                Some(&idx) => {
                    let existing = &mut items[idx];
                    existing.remove.extend(reconciled.remove);
                    existing.append.extend(reconciled.append);
                    existing.update.extend(reconciled.updates);
                    if let Some(comment) = comment {
                        existing.comment = Some(match existing.comment.take() {
                            Some(previous) => format!("{previous}\n{comment}"),
                            None => comment,
                        });
                    }
                }
                None => {
                    by_scene.insert(scene_id, items.len());
                    items.push(ScenePerformersItem {
                        studio,
                        parent_studio,
                        scene_id,
                        remove: reconciled.remove,
                        append: reconciled.append,
                        update: reconciled.updates,
                        comment,
                        user,
                        submitted,
                        done: (!skip_done).then_some(done),
                    });
                }
            }
        }

        Ok(Self { items })
    }

    pub fn items(&self) -> &[ScenePerformersItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<ScenePerformersItem> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Row-inclusion gate for the narrow mode: rows carrying entries tagged for
/// a merge, a pending profile edit or a not-yet-created profile, or entries
/// with no resolved identifier, are skipped wholesale to avoid acting on
/// ambiguous edits (an unmatched remove could delete the wrong performer).
fn skip_ambiguous(reconciled: &Reconciled, row_num: usize) -> bool {
    for status in ["merge", "edit", "new"] {
        let tagged: Vec<String> = reconciled
            .remove
            .iter()
            .chain(reconciled.append.iter())
            .filter(|e| e.status.as_deref() == Some(status))
            .map(|e| e.display_name())
            .chain(
                reconciled
                    .updates
                    .iter()
                    .filter(|u| u.status.as_deref() == Some(status))
                    .map(|u| u.display_name()),
            )
            .collect();
        if !tagged.is_empty() {
            info_row!(
                row_num,
                "Skipped due to [{status}]-tagged performers: {}",
                tagged.join(" , ")
            );
            return true;
        }
    }

    let no_id: Vec<String> = reconciled
        .remove
        .iter()
        .chain(reconciled.append.iter())
        .filter(|e| e.id.is_none())
        .map(|e| e.display_name())
        .collect();
    if !no_id.is_empty() {
        warn_row!(
            row_num,
            "Skipped due to missing performer IDs: {}",
            no_id.join(" , ")
        );
        return true;
    }

    false
}
