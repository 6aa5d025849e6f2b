//! Text form of agtype values.
//!
//! The text form is JSON with `::name` annotations. Object literals accept
//! `::vertex` and `::edge`, array literals accept `::path`, and scalars
//! accept `::numeric`, `::integer`, `::float`, and `::timestamp`, which
//! convert the scalar. Annotation names are case-insensitive. Floats
//! additionally accept `NaN`, `Infinity`, and `-Infinity`.
//!
//! ```
//! use agraph_core::agtype::{Value, from_text, to_text};
//!
//! let v = from_text(r#"{"id": 7, "label": "Person", "properties": {}}::vertex"#).unwrap();
//! assert!(matches!(v, Value::Vertex(_)));
//! assert_eq!(
//!     to_text(&v, false).unwrap(),
//!     r#"{"id": 7, "label": "Person", "properties": {}}::vertex"#
//! );
//! ```

mod lexer;
mod parser;
mod printer;

pub use parser::from_text;
pub use printer::to_text;

/// Formats a timestamp (microseconds since 2000-01-01) as
/// `YYYY-MM-DD HH:MM:SS[.ffffff]`, or `None` if it is outside the calendar
/// range.
pub fn format_timestamp(micros: i64) -> Option<String> {
    let epoch = chrono::NaiveDate::from_ymd_opt(2000, 1, 1)?.and_hms_opt(0, 0, 0)?;
    let at = epoch.checked_add_signed(chrono::TimeDelta::microseconds(micros))?;
    Some(at.format("%Y-%m-%d %H:%M:%S%.f").to_string())
}

/// Parses `YYYY-MM-DD HH:MM:SS[.ffffff]` (or a bare date, or with a `T`
/// separator) into microseconds since 2000-01-01.
pub fn parse_timestamp(text: &str) -> Option<i64> {
    let epoch = chrono::NaiveDate::from_ymd_opt(2000, 1, 1)?.and_hms_opt(0, 0, 0)?;
    let at = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| chrono::NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            chrono::NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;
    (at - epoch).num_microseconds()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_text() {
        assert_eq!(format_timestamp(0).as_deref(), Some("2000-01-01 00:00:00"));
        assert_eq!(
            format_timestamp(1_500_000).as_deref(),
            Some("2000-01-01 00:00:01.500")
        );
        assert_eq!(parse_timestamp("2000-01-01 00:00:01.5"), Some(1_500_000));
        assert_eq!(parse_timestamp("2000-01-02"), Some(86_400_000_000));
        assert_eq!(parse_timestamp("1999-12-31T23:59:59"), Some(-1_000_000));
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn test_timestamp_roundtrip() {
        for micros in [0, 1, -1, 123_456_789, 700_000_000_000_000] {
            let text = format_timestamp(micros).unwrap();
            assert_eq!(parse_timestamp(&text), Some(micros));
        }
    }
}
