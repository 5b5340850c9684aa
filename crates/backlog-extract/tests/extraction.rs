//! End-to-end extraction over raw grids: formatting-run normalization,
//! entry parsing, reconciliation and per-sheet aggregation working together.

use backlog_extract::{
    PerformersToSplitUp, ScenePerformers, SplitOptions,
};
use backlog_model::{RawCell, Sheet, TextFormatRun};
use pretty_assertions::assert_eq;

const SCENE: &str = "11111111-1111-4111-8111-111111111111";
const JANE: &str = "https://stashdb.org/performers/ded1973e-daae-45f3-aff1-2085fb567b63";
const JOHN: &str = "https://stashdb.org/performers/22222222-2222-4222-8222-222222222222";

fn text(value: &str) -> RawCell {
    RawCell::text(value)
}

fn linked(value: &str, url: &str) -> RawCell {
    RawCell {
        value: value.into(),
        hyperlink: Some(url.into()),
        ..RawCell::default()
    }
}

#[test]
fn scene_performers_full_pipeline() {
    let header = vec![
        text("Submitted"),
        text("Done"),
        text("Studio"),
        text("Scene ID"),
        text("(1) Remove/Replace"),
        text("(2) Remove/Replace"),
        text("(1) Add/With"),
        text("Edit Note"),
        text("Added by"),
    ];

    // One performer renamed in place, one removed outright; the second
    // remove slot is struck through as already handled.
    let struck_remove = RawCell {
        value: "John Roe".into(),
        runs: vec![TextFormatRun {
            start: 0,
            link: Some(JOHN.into()),
            strikethrough: true,
        }],
        ..RawCell::default()
    };

    let row = vec![
        text("FALSE"),
        text("FALSE"),
        text("Example Films [Example Group]"),
        text(SCENE),
        linked("Jane Doe (as Jane)", JANE),
        struck_remove,
        linked("Jane Doe (as Janey)", JANE),
        text("rename confirmed by the studio"),
        text("curator"),
    ];

    let sheet =
        Sheet::parse_data("scene performers", vec![header, row], Some(1)).unwrap();
    let data = ScenePerformers::parse(&sheet, true, true).unwrap();

    assert_eq!(data.len(), 1);
    let item = &data.items()[0];

    let json = serde_json::to_value(item).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "studio": "Example Films",
            "parent_studio": "Example Group",
            "scene_id": "11111111-1111-4111-8111-111111111111",
            "remove": [],
            "append": [],
            "update": [{
                "id": "ded1973e-daae-45f3-aff1-2085fb567b63",
                "name": "Jane Doe",
                "appearance": "Janey",
                "old_appearance": "Jane",
            }],
            "comment": "rename confirmed by the studio",
            "user": "curator",
        })
    );
}

#[test]
fn performers_to_split_up_full_pipeline() {
    let header = vec![
        text("Done"),
        text("Performer"),
        text("Performer Stash ID"),
        text("(1)"),
        text("(2)"),
        text("Added by"),
    ];

    let mut name_cell = text("Jane Doe");
    name_cell.note = "two distinct people share this profile".into();

    let fragment_cell = RawCell {
        value: "Jane (EU) [iafd] [ixxx]\n- Euro Studio".into(),
        hyperlink: Some(JANE.into()),
        ..RawCell::default()
    };

    let row = vec![
        text("FALSE"),
        name_cell,
        text("ded1973e-daae-45f3-aff1-2085fb567b63"),
        fragment_cell,
        text("[iafd] (2008, Euro Studio)"),
        text("curator"),
    ];

    let sheet =
        Sheet::parse_data("performers to split up", vec![header, row], Some(1)).unwrap();
    let data = PerformersToSplitUp::parse(&sheet, SplitOptions::default()).unwrap();

    assert_eq!(data.len(), 1);
    let item = &data.items()[0];
    assert_eq!(item.name, "Jane Doe");
    assert_eq!(item.notes, vec!["two distinct people share this profile"]);
    assert_eq!(item.fragments.len(), 2);

    let first = &item.fragments[0];
    assert_eq!(first.name, "Jane (EU)");
    assert_eq!(first.text.as_deref(), Some("Euro Studio"));
    assert_eq!(
        first.id.map(|id| id.to_string()),
        Some("ded1973e-daae-45f3-aff1-2085fb567b63".to_string())
    );
    assert_eq!(first.links, Vec::<String>::new());

    let second = &item.fragments[1];
    assert_eq!(second.name, "[no name provided]");
    assert_eq!(second.text.as_deref(), Some("(2008, Euro Studio)"));
}
