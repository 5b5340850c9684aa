use regex::Regex;
use thiserror::Error;

use crate::{CheckboxError, RawCell, Row};

/// Fatal setup failures: the sheet cannot be processed at all.
#[derive(Debug, Error)]
pub enum SheetError {
    #[error("sheet {title:?}: frozen row count is undefined")]
    NoFrozenRows { title: String },
    #[error("sheet {title:?}: missing expected column {column:?}")]
    MissingColumn { title: String, column: String },
    #[error(transparent)]
    Checkbox(#[from] CheckboxError),
}

/// Header lookup pattern: a literal substring or a regex, matched against
/// header cell text. Patterns rather than fixed positions keep the lookup
/// stable across spreadsheet revisions that rename or reorder columns.
#[derive(Clone, Debug)]
pub enum ColumnPattern {
    Text(&'static str),
    Regex(Regex),
}

impl ColumnPattern {
    pub fn regex(pattern: &str) -> Self {
        // Column patterns are compile-time literals in practice.
        Self::Regex(Regex::new(pattern).expect("invalid column pattern"))
    }

    fn matches(&self, header: &str) -> bool {
        match self {
            Self::Text(text) => header.contains(text),
            Self::Regex(re) => re.is_match(header),
        }
    }
}

impl std::fmt::Display for ColumnPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Regex(re) => f.write_str(re.as_str()),
        }
    }
}

/// A fully-materialized sheet: header texts plus data rows.
#[derive(Clone, Debug, Default)]
pub struct Sheet {
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Sheet {
    /// Locate the header and data rows of a raw grid.
    ///
    /// `frozen_row_count` is the number of header rows that stay visible
    /// while scrolling; the header is its last row and data starts right
    /// after it. A grid without frozen rows cannot be interpreted, so this
    /// fails fast instead of guessing.
    ///
    /// Data rows keep the spreadsheet's 1-based visual numbering (the first
    /// data row is `frozen_row_count + 1`) and are padded to the header's
    /// column count.
    pub fn parse_data(
        title: impl Into<String>,
        grid: Vec<Vec<RawCell>>,
        frozen_row_count: Option<usize>,
    ) -> Result<Self, SheetError> {
        let title = title.into();

        let frozen = match frozen_row_count {
            Some(n) if n > 0 => n,
            _ => return Err(SheetError::NoFrozenRows { title }),
        };

        let columns: Vec<String> = grid
            .get(frozen - 1)
            .map(|row| row.iter().map(|c| c.value.clone()).collect())
            .unwrap_or_default();

        let fill = columns.len();
        let rows: Vec<Row> = grid
            .into_iter()
            .skip(frozen)
            .enumerate()
            .map(|(i, raw)| Row::parse(raw, frozen + 1 + i, fill))
            .collect();

        Ok(Self {
            title,
            columns,
            rows,
        })
    }

    /// Index of the first header matching `pattern`, or `None` when the
    /// column is absent in this spreadsheet revision. Callers treat a missing
    /// *required* column as a hard [`SheetError::MissingColumn`].
    pub fn column_index(&self, pattern: &ColumnPattern) -> Option<usize> {
        self.columns.iter().position(|col| pattern.matches(col))
    }

    /// Indices of every header matching `pattern`, in header order.
    pub fn all_column_indices(&self, pattern: &ColumnPattern) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, col)| pattern.matches(col))
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Resolve a required column, raising the sheet-wide setup failure when
    /// it is missing.
    pub fn require_column(&self, pattern: &ColumnPattern) -> Result<usize, SheetError> {
        self.column_index(pattern)
            .ok_or_else(|| SheetError::MissingColumn {
                title: self.title.clone(),
                column: pattern.to_string(),
            })
    }
}
