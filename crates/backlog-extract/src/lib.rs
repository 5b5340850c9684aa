//! Semantic extraction engine for community correction spreadsheets.
//!
//! Turns the loosely formatted cells of a curated backlog spreadsheet into
//! validated, structured edit records: performer remove/append/update
//! instructions, record-split fragments, scene metadata fixes, duplicate
//! groups, fingerprint reports and performer profile links.
//!
//! The grid arrives already materialized as [`backlog_model`] cells; this
//! crate is pure transformation. Fatal sheet-level problems (missing
//! columns, no frozen header, uninterpretable checkbox layout) surface as
//! [`backlog_model::SheetError`]; anything row-level is logged through the
//! `log` facade and skipped.

mod diag;

pub mod entry;
pub mod fragment;
pub mod reconcile;
pub mod sheets;
pub mod util;

pub use entry::{parse_change_entries, parse_change_entry};
pub use fragment::parse_fragment;
pub use reconcile::{reconcile, Reconciled};
pub use sheets::{
    DuplicatePerformers, DuplicateScenes, PerformerUrls, PerformersToSplitUp, SceneFingerprints,
    SceneFingerprintsOptions, SceneFixes, ScenePerformers, SplitOptions,
};
