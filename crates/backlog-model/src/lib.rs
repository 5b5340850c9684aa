//! `backlog-model` defines the in-memory grid model and typed domain records
//! for backlog sheet extraction.
//!
//! The crate is intentionally self-contained so it can be reused by:
//! - the extraction engine (`backlog-extract`)
//! - transport layers that flatten a fetched spreadsheet (JSON cell-grid or
//!   parsed HTML table) into the common [`RawCell`] grid shape
//! - generic JSON/YAML writers via `serde`
//!
//! None of the types here perform I/O: a grid arrives fully materialized and
//! everything downstream is a pure transformation over it.

mod cell;
mod records;
mod row;
mod sheet;

pub use cell::{Cell, RawCell, TextFormatRun, STRIKE_END, STRIKE_START};
pub use records::{
    display_name, ChangeEntry, DuplicatePerformersItem, DuplicateScenesItem, FingerprintAlgorithm,
    Fragment, PerformerUrlItem, SceneChangeField, SceneChangeItem, SceneFingerprintsItem,
    ScenePerformersItem, SplitPerformerItem, UpdateEntry,
};
pub use row::{CheckboxError, Row};
pub use sheet::{ColumnPattern, Sheet, SheetError};
