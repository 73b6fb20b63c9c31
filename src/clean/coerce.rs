//! Best-effort type coercion of normalized text cells
//!
//! Every attempt returns either the converted cell or [`Unchanged`]. Failures
//! are never reported; the cell simply keeps its previous value.

use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

use crate::model::CellValue;

/// Returned by a coercion attempt that leaves the cell as it is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unchanged;

/// Outcome of a single coercion attempt
pub type Coercion = Result<CellValue, Unchanged>;

/// Date-time layouts. Day-first layouts come before month-first ones.
const DATETIME_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%d-%b-%Y %H:%M:%S",
    "%d-%b-%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m-%d-%Y %H:%M:%S",
    "%m-%d-%Y %H:%M",
];

/// Date-only layouts. Day-first layouts come before month-first ones.
const DATE_LAYOUTS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d/%m/%y",
    "%d-%m-%y",
    "%d.%m.%y",
    "%d %b %Y",
    "%d-%b-%Y",
    "%d %B %Y",
    "%d-%B-%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%B %d %Y",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%m.%d.%Y",
    "%m/%d/%y",
    "%m-%d-%y",
    "%m.%d.%y",
];

fn number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[+-]?[0-9]+[.,]?[0-9]*$").expect("Hardcode regex pattern")
    })
}

/// A four-digit-year layout must not accept `24` as the year 24.
fn plausible_year(layout: &str, year: i32) -> bool {
    !layout.contains("%Y") || year >= 1000
}

/// Parse a date or date-time, preferring day-before-month ordering
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() || text.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    for layout in DATETIME_LAYOUTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, layout) {
            if plausible_year(layout, dt.year()) {
                return Some(dt);
            }
        }
    }

    for layout in DATE_LAYOUTS {
        if let Ok(date) = NaiveDate::parse_from_str(text, layout) {
            if plausible_year(layout, date.year()) {
                return Some(date.and_time(NaiveTime::MIN));
            }
        }
    }

    None
}

/// Attempt to read text as a timestamp
pub fn coerce_timestamp(text: &str) -> Coercion {
    parse_timestamp(text)
        .map(CellValue::Timestamp)
        .ok_or(Unchanged)
}

/// Attempt to read text as a number.
///
/// The whole text must be an optional sign, digits, and at most one `.` or
/// `,` separator. A comma separator is read as a decimal point.
pub fn coerce_number(text: &str) -> Coercion {
    if !number_pattern().is_match(text) {
        return Err(Unchanged);
    }

    text.replace(',', ".")
        .parse::<f64>()
        .map(CellValue::Number)
        .map_err(|_| Unchanged)
}

/// Cells converted by each attempt on one column
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CoercionCounts {
    pub timestamps: usize,
    pub numbers: usize,
}

/// Run the timestamp attempt then the numeric attempt over a column.
///
/// Only text cells are offered to an attempt; every other cell passes through.
pub fn coerce_column(cells: &mut [CellValue]) -> CoercionCounts {
    CoercionCounts {
        timestamps: apply(cells, coerce_timestamp),
        numbers: apply(cells, coerce_number),
    }
}

fn apply(cells: &mut [CellValue], attempt: fn(&str) -> Coercion) -> usize {
    let mut converted = 0;
    for cell in cells.iter_mut() {
        let Some(text) = cell.as_text() else {
            continue;
        };
        if let Ok(value) = attempt(text) {
            *cell = value;
            converted += 1;
        }
    }
    converted
}
