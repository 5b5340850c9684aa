//! "Scene Fixes" sheet: single-field scene metadata corrections, grouped by
//! scene identifier.

use std::collections::HashMap;

use uuid::Uuid;

use backlog_model::{
    Cell, ColumnPattern, SceneChangeField, SceneChangeItem, Sheet, SheetError,
};

use crate::diag::{error_row, info_row, warn_row};
use crate::sheets::submitted_done;
use crate::util::{parse_duration, parse_uuid};

/// Parsed "Scene Fixes" sheet: per-scene change lists in row order.
#[derive(Clone, Debug, Default)]
pub struct SceneFixes {
    groups: Vec<(Uuid, Vec<SceneChangeItem>)>,
}

impl SceneFixes {
    pub fn parse(sheet: &Sheet, skip_done: bool) -> Result<Self, SheetError> {
        let column_scene_id = sheet.require_column(&ColumnPattern::Text("Scene ID"))?;
        let column_field = sheet.require_column(&ColumnPattern::Text("Field"))?;
        let column_new_data = sheet.require_column(&ColumnPattern::Text("New Data"))?;
        let column_correction = sheet.require_column(&ColumnPattern::Text("Correction"))?;
        let column_user = sheet.require_column(&ColumnPattern::Text("Added by"))?;

        let mut groups: Vec<(Uuid, Vec<SceneChangeItem>)> = Vec::new();
        let mut by_scene: HashMap<Uuid, usize> = HashMap::new();
        // Rows for one scene are expected to be adjacent; this tracks where
        // each scene id was last seen so strays can be reported.
        let mut last_seen: HashMap<String, usize> = HashMap::new();

        for row in &sheet.rows {
            let (submitted, done) = submitted_done(row)?;
            if skip_done && done {
                continue;
            }

            let scene_raw = row.cells[column_scene_id].value.trim();

            match last_seen.get(scene_raw).copied() {
                Some(last) if row.num > last + 1 => {
                    warn_row!(
                        row.num,
                        "Ungrouped entries for scene ID {scene_raw:?} last seen row {last}"
                    );
                }
                _ => {
                    last_seen.insert(scene_raw.to_string(), row.num);
                }
            }

            if scene_raw.is_empty() || done {
                continue;
            }

            let user_raw = row.cells[column_user].value.trim();
            let Some(change) = parse_change(
                row.num,
                &row.cells[column_field],
                &row.cells[column_new_data],
                &row.cells[column_correction],
                user_raw,
                submitted,
            ) else {
                continue;
            };

            let Some(scene_id) = parse_uuid(scene_raw) else {
                // A literal "multiple ..." scene cell is a known authoring
                // convention, not an error.
                if !scene_raw.to_lowercase().starts_with("multiple") {
                    warn_row!(row.num, "Skipped due to invalid scene ID: {scene_raw}");
                }
                continue;
            };

            match by_scene.get(&scene_id) {
                Some(&idx) => groups[idx].1.push(change),
                None => {
                    by_scene.insert(scene_id, groups.len());
                    groups.push((scene_id, vec![change]));
                }
            }
        }

        Ok(Self { groups })
    }

    pub fn groups(&self) -> &[(Uuid, Vec<SceneChangeItem>)] {
        &self.groups
    }

    pub fn into_groups(self) -> Vec<(Uuid, Vec<SceneChangeItem>)> {
        self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

fn parse_change(
    row_num: usize,
    field_cell: &Cell,
    new_data_cell: &Cell,
    correction_cell: &Cell,
    user: &str,
    submitted: bool,
) -> Option<SceneChangeItem> {
    let field_raw = field_cell.value.trim();
    if field_raw.is_empty() {
        error_row!(row_num, "Field is empty.");
        return None;
    }
    if field_raw == "Overall" {
        info_row!(row_num, "Skipping non-applicable field {field_raw:?}.");
        return None;
    }
    let Some(field) = normalize_field(field_raw) else {
        error_row!(row_num, "Field {field_raw:?} is invalid.");
        return None;
    };

    // A linked cell carries the payload in the link, not the display text.
    let new_data = new_data_cell
        .first_link()
        .map(String::from)
        .or_else(|| {
            let value = new_data_cell.value.trim();
            (!value.is_empty()).then(|| value.to_string())
        });
    let new_data = transform_new_data(row_num, field, field_raw, new_data)?;

    let correction_raw = correction_cell.value.trim();
    let correction = (!correction_raw.is_empty()).then(|| correction_raw.to_string());

    Some(SceneChangeItem {
        field,
        new_data,
        correction,
        user: (!user.is_empty()).then(|| user.to_string()),
        submitted,
        done: false,
    })
}

fn normalize_field(field: &str) -> Option<SceneChangeField> {
    match field {
        "Title" => Some(SceneChangeField::Title),
        "Description" => Some(SceneChangeField::Details),
        "Date" => Some(SceneChangeField::Date),
        "Studio ID" => Some(SceneChangeField::StudioId),
        "Studio Code" => Some(SceneChangeField::Code),
        "Director" => Some(SceneChangeField::Director),
        "Duration" => Some(SceneChangeField::Duration),
        "Image" => Some(SceneChangeField::Image),
        "URL" => Some(SceneChangeField::Url),
        _ => None,
    }
}

/// Field-specific validation of the new value. Returns the outer `None` when
/// the whole change must be dropped; `Some(None)` clears the value.
fn transform_new_data(
    row_num: usize,
    field: SceneChangeField,
    field_raw: &str,
    value: Option<String>,
) -> Option<Option<String>> {
    match field {
        SceneChangeField::Duration => match value.as_deref().and_then(parse_duration) {
            Some(seconds) => Some(Some(seconds.to_string())),
            None => {
                error_row!(row_num, "Value {value:?} for field {field_raw:?} is invalid.");
                None
            }
        },
        SceneChangeField::StudioId => match value.as_deref() {
            Some("missing") => {
                info_row!(
                    row_num,
                    "Value {value:?} for field {field_raw:?} replaced with: None."
                );
                Some(None)
            }
            Some(id) if parse_uuid(id).is_some() => Some(value),
            _ => {
                error_row!(row_num, "Value {value:?} for field {field_raw:?} is invalid.");
                None
            }
        },
        _ => Some(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backlog_model::RawCell;
    use pretty_assertions::assert_eq;

    const HEADER: &[&str] = &[
        "Done",
        "Scene ID",
        "Field",
        "New Data",
        "Correction",
        "Added by",
    ];

    const SCENE_A: &str = "11111111-1111-4111-8111-111111111111";
    const SCENE_B: &str = "22222222-2222-4222-8222-222222222222";
    const STUDIO: &str = "33333333-3333-4333-8333-333333333333";

    fn sheet(rows: Vec<Vec<RawCell>>) -> Sheet {
        let mut grid = vec![HEADER.iter().map(|h| RawCell::text(*h)).collect()];
        grid.extend(rows);
        Sheet::parse_data("scene fixes", grid, Some(1)).unwrap()
    }

    fn row(scene: &str, field: &str, new_data: &str, correction: &str) -> Vec<RawCell> {
        vec![
            RawCell::text("FALSE"),
            RawCell::text(scene),
            RawCell::text(field),
            RawCell::text(new_data),
            RawCell::text(correction),
            RawCell::text("curator"),
        ]
    }

    #[test]
    fn changes_group_by_scene_in_row_order() {
        let data = SceneFixes::parse(
            &sheet(vec![
                row(SCENE_A, "Title", "Correct Title", ""),
                row(SCENE_A, "Date", "2020-01-01", "was off by one day"),
                row(SCENE_B, "Director", "Jane Doe", ""),
            ]),
            true,
        )
        .unwrap();

        assert_eq!(data.len(), 2);
        let (scene, changes) = &data.groups()[0];
        assert_eq!(scene.to_string(), SCENE_A);
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].field, SceneChangeField::Title);
        assert_eq!(changes[0].new_data.as_deref(), Some("Correct Title"));
        assert_eq!(changes[1].correction.as_deref(), Some("was off by one day"));
        assert_eq!(changes[0].user.as_deref(), Some("curator"));
    }

    #[test]
    fn duration_is_normalized_to_seconds() {
        let data = SceneFixes::parse(
            &sheet(vec![
                row(SCENE_A, "Duration", "1:02:03", ""),
                row(SCENE_B, "Duration", "junk", ""),
            ]),
            true,
        )
        .unwrap();

        assert_eq!(data.len(), 1);
        assert_eq!(data.groups()[0].1[0].new_data.as_deref(), Some("3723"));
    }

    #[test]
    fn studio_id_validation() {
        let data = SceneFixes::parse(
            &sheet(vec![
                row(SCENE_A, "Studio ID", STUDIO, ""),
                row(SCENE_B, "Studio ID", "missing", "no such studio yet"),
                row(SCENE_B, "Studio ID", "bogus", ""),
            ]),
            true,
        )
        .unwrap();

        assert_eq!(data.len(), 2);
        assert_eq!(data.groups()[0].1[0].new_data.as_deref(), Some(STUDIO));
        assert_eq!(data.groups()[1].1[0].new_data, None);
        assert_eq!(
            data.groups()[1].1[0].correction.as_deref(),
            Some("no such studio yet")
        );
    }

    #[test]
    fn description_field_maps_to_details() {
        let data = SceneFixes::parse(
            &sheet(vec![row(SCENE_A, "Description", "better text", "")]),
            true,
        )
        .unwrap();
        assert_eq!(data.groups()[0].1[0].field, SceneChangeField::Details);
    }

    #[test]
    fn invalid_and_non_applicable_fields_are_dropped() {
        let data = SceneFixes::parse(
            &sheet(vec![
                row(SCENE_A, "Overall", "x", ""),
                row(SCENE_A, "Nonsense", "x", ""),
                row(SCENE_A, "", "x", ""),
                row("multiple scenes", "Title", "x", ""),
                row("not-a-uuid", "Title", "x", ""),
            ]),
            true,
        )
        .unwrap();

        assert!(data.is_empty());
    }

    #[test]
    fn linked_new_data_prefers_the_url() {
        let mut cells = row(SCENE_A, "Image", "image link", "");
        cells[3].hyperlink = Some("https://example.org/image.jpg".into());
        let data = SceneFixes::parse(&sheet(vec![cells]), true).unwrap();

        assert_eq!(
            data.groups()[0].1[0].new_data.as_deref(),
            Some("https://example.org/image.jpg")
        );
    }
}
