use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Cell, RawCell};

/// Raised by [`Row::is_done`] when a row has fewer checkbox cells than the
/// caller asked for. Carries the row number so the failure can be located in
/// the spreadsheet.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CheckboxError {
    #[error("Row {row:<4} | No checkboxes found!")]
    NotFound { row: usize },
    #[error("Row {row:<4} | Only {found} checkbox(es) found, cannot get checkbox #{wanted}!")]
    Insufficient {
        row: usize,
        found: usize,
        wanted: usize,
    },
}

/// One sheet row: a 1-based row number matching the spreadsheet's visual
/// numbering, plus its cells padded to the sheet's column count.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub num: usize,
    pub cells: Vec<Cell>,
}

impl Row {
    /// Build a row from raw cells, padding with empty cells up to `fill`.
    pub fn parse(raw_cells: Vec<RawCell>, num: usize, fill: usize) -> Self {
        let mut cells: Vec<Cell> = raw_cells.into_iter().map(Cell::parse).collect();
        while cells.len() < fill {
            cells.push(Cell::default());
        }
        Self { num, cells }
    }

    /// Read the 1-based `which`-th checkbox cell of this row.
    ///
    /// Checkbox cells are the cells whose value is exactly `"TRUE"` or
    /// `"FALSE"`. Some sheets use one checkbox (done), others two
    /// (submitted, then done).
    pub fn is_done(&self, which: usize) -> Result<bool, CheckboxError> {
        let checkboxes: Vec<bool> = self
            .cells
            .iter()
            .filter_map(|c| match c.value.as_str() {
                "TRUE" => Some(true),
                "FALSE" => Some(false),
                _ => None,
            })
            .collect();

        if checkboxes.is_empty() {
            return Err(CheckboxError::NotFound { row: self.num });
        }

        checkboxes
            .get(which.saturating_sub(1))
            .copied()
            .ok_or(CheckboxError::Insufficient {
                row: self.num,
                found: checkboxes.len(),
                wanted: which,
            })
    }
}
