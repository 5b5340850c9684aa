//! Row-context diagnostics.
//!
//! Every row-level message carries the spreadsheet row number (padded so the
//! messages line up in a terminal) so an operator can locate the offending
//! cell. Emitted through the `log` facade; the embedding application picks
//! the logger implementation.

macro_rules! info_row {
    ($row:expr, $($arg:tt)+) => {
        log::info!("Row {:<4} | {}", $row, format_args!($($arg)+))
    };
}

macro_rules! warn_row {
    ($row:expr, $($arg:tt)+) => {
        log::warn!("Row {:<4} | {}", $row, format_args!($($arg)+))
    };
}

macro_rules! error_row {
    ($row:expr, $($arg:tt)+) => {
        log::error!("Row {:<4} | {}", $row, format_args!($($arg)+))
    };
}

pub(crate) use {error_row, info_row, warn_row};
