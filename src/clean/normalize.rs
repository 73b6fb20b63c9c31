//! Per-cell text normalization
//!
//! Only text cells are touched. In order: null tokens become `Null`, the text
//! is trimmed and title-cased, and any text holding a digit is stripped down
//! to digits, `.`, `,` and `-`.
//!
//! The last step is lossy on purpose: `"Room 12B"` becomes `"12"`. Cleaned
//! identifiers that mix letters and digits should not be trusted.

use std::borrow::Cow;

use crate::model::CellValue;

/// Literal texts that mean "no data"
pub const NULL_TOKENS: [&str; 3] = ["NA", "NaN", "None"];

/// What normalization did to a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Not a text cell
    Bypassed,
    /// Replaced by `Null`
    Nulled,
    /// Trimmed and title-cased only
    Cased,
    /// Non-numeric characters were removed
    Stripped,
}

/// Check whether a text is a null token (empty, whitespace-only or a literal)
pub fn is_null_token(text: &str) -> bool {
    text.trim().is_empty() || NULL_TOKENS.contains(&text)
}

/// Normalize a single cell
pub fn normalize(cell: CellValue) -> CellValue {
    normalize_cell(cell).0
}

/// Normalize a single cell, reporting which step decided the result
pub fn normalize_cell(cell: CellValue) -> (CellValue, Outcome) {
    let text = match cell {
        CellValue::Text(text) => text,
        other => return (other, Outcome::Bypassed),
    };

    let trimmed = text.trim();
    if is_null_token(trimmed) {
        return (CellValue::Null, Outcome::Nulled);
    }

    let cased = title_case(trimmed);
    if is_null_token(&cased) {
        return (CellValue::Null, Outcome::Nulled);
    }

    if !cased.chars().any(|c| c.is_ascii_digit()) {
        return (CellValue::Text(Cow::Owned(cased)), Outcome::Cased);
    }

    let stripped = strip_numeric_noise(&cased);
    if stripped.is_empty() {
        (CellValue::Null, Outcome::Nulled)
    } else if stripped.len() == cased.len() {
        (CellValue::Text(Cow::Owned(stripped)), Outcome::Cased)
    } else {
        (CellValue::Text(Cow::Owned(stripped)), Outcome::Stripped)
    }
}

/// Uppercase the first character of every whitespace-separated word and
/// lowercase the rest. Whitespace is copied verbatim.
///
/// A word-initial character whose uppercase form is several characters
/// (`ß` -> `SS`) is kept as-is.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut word_start = true;

    for c in text.chars() {
        if c.is_whitespace() {
            out.push(c);
            word_start = true;
            continue;
        }

        if word_start {
            let mut upper = c.to_uppercase();
            match (upper.next(), upper.next()) {
                (Some(u), None) => out.push(u),
                _ => out.push(c),
            }
        } else {
            out.extend(c.to_lowercase());
        }
        word_start = false;
    }

    out
}

/// Keep only ASCII digits, `.`, `,` and `-`
fn strip_numeric_noise(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn text(s: &str) -> CellValue {
        CellValue::from(s)
    }

    #[test]
    fn test_null_tokens() {
        for raw in ["", " ", "\t \n", "NA", "NaN", "None"] {
            assert_eq!(normalize(text(raw)), CellValue::Null, "{raw:?}");
        }
        assert_eq!(normalize(CellValue::Null), CellValue::Null);
    }

    #[test]
    fn test_padded_and_recased_tokens_are_null() {
        assert_eq!(normalize(text(" NA ")), CellValue::Null);
        assert_eq!(normalize(text("none")), CellValue::Null);
        assert_eq!(normalize(text("NONE")), CellValue::Null);
    }

    #[test]
    fn test_lookalike_tokens_stay_text() {
        assert_eq!(normalize(text("nan")), text("Nan"));
        assert_eq!(normalize(text("na")), text("Na"));
        assert_eq!(normalize(text("null")), text("Null"));
    }

    #[test]
    fn test_trim_and_title_case() {
        assert_eq!(normalize(text("  john SMITH ")), text("John Smith"));
        assert_eq!(normalize(text("o'NEIL")), text("O'neil"));
        assert_eq!(normalize(text("new  york")), text("New  York"));
    }

    #[test]
    fn test_numeric_noise_is_stripped() {
        assert_eq!(normalize(text("123.45")), text("123.45"));
        assert_eq!(normalize(text("$ 1,200")), text("1,200"));
        assert_eq!(normalize(text("-12,5 kg")), text("-12,5"));
        assert_eq!(normalize(text("03/04/2024")), text("03042024"));
    }

    #[test]
    fn test_identifiers_lose_letters() {
        assert_eq!(normalize(text("Room 12B")), text("12"));
        assert_eq!(normalize(text("Unit 4B")), text("4"));
    }

    #[test]
    fn test_outcomes() {
        assert_eq!(normalize_cell(text("NA")).1, Outcome::Nulled);
        assert_eq!(normalize_cell(text("abc")).1, Outcome::Cased);
        assert_eq!(normalize_cell(text("12.5")).1, Outcome::Cased);
        assert_eq!(normalize_cell(text("12 kg")).1, Outcome::Stripped);
        assert_eq!(normalize_cell(CellValue::Number(1.0)).1, Outcome::Bypassed);
    }

    #[test]
    fn test_non_text_cells_bypass() {
        let stamp = NaiveDate::from_ymd_opt(2024, 1, 2)
            .and_then(|d| d.and_hms_opt(3, 4, 5))
            .unwrap();
        assert_eq!(normalize(CellValue::Number(7.5)), CellValue::Number(7.5));
        assert_eq!(
            normalize(CellValue::Timestamp(stamp)),
            CellValue::Timestamp(stamp)
        );
    }

    #[test]
    fn test_title_case_multichar_uppercase() {
        assert_eq!(title_case("ßtraße"), "ßtraße");
        assert_eq!(title_case("éCOLE"), "École");
    }

    proptest! {
        #[test]
        fn title_case_is_idempotent(s in "[a-zA-ZäöüßÀ-ÿ0-9' \t-]{0,40}") {
            let once = title_case(&s);
            prop_assert_eq!(title_case(&once), once);
        }

        #[test]
        fn null_tokens_always_normalize_to_null(
            token in prop::sample::select(vec!["", "NA", "NaN", "None"]),
            pad in "[ \t]{0,3}",
        ) {
            let raw = format!("{pad}{token}{pad}");
            prop_assert_eq!(normalize(CellValue::from(raw.as_str())), CellValue::Null);
        }

        #[test]
        fn stripped_text_only_keeps_numeric_characters(s in "[a-zA-Z ]{0,5}[0-9][a-zA-Z0-9 .,$%-]{0,10}") {
            match normalize(CellValue::from(s.as_str())) {
                CellValue::Text(t) => prop_assert!(t
                    .chars()
                    .all(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))),
                other => prop_assert!(false, "unexpected {:?}", other),
            }
        }
    }
}
