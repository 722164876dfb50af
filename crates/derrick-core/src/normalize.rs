//! Field normalization rules.
//!
//! Second assembly phase: each raw text value becomes a typed value, or
//! nothing. The outcome is explicit per field ([`Outcome::Absent`] for
//! empty/missing input, [`Outcome::Skipped`] with a reason for malformed
//! input), so the assembler can log what was dropped without any hidden
//! control flow, and a bad field never aborts the rest of the record.

use chrono::NaiveDate;

use crate::fields::Rule;

/// A typed, normalized field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    /// Trimmed verbatim text.
    Text(String),
    /// Calendar date.
    Date(NaiveDate),
    /// Floating point number.
    Float(f64),
    /// Operator id and name, derived together from `[id] name`.
    Operator {
        /// Integer operator id.
        id: i64,
        /// Operator display name.
        name: String,
    },
    /// Latitude/longitude pair, derived together from `lat, lon [label]`.
    Coordinates {
        /// Latitude half.
        latitude: f64,
        /// Longitude half.
        longitude: f64,
    },
}

/// Per-field normalization outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The field normalized to a typed value.
    Value(Normalized),
    /// The field was missing or empty; stored as absent, nothing to report.
    Absent,
    /// The field was present but malformed; stored as absent, with a reason
    /// worth logging.
    Skipped(String),
}

/// Normalizes one raw field value under the given rule.
///
/// Missing input and input that trims to nothing are [`Outcome::Absent`] for
/// every rule; an empty string is never retained as a value.
#[must_use]
pub fn normalize(rule: Rule, raw: Option<&str>) -> Outcome {
    let raw = match raw {
        Some(r) => r.trim(),
        None => return Outcome::Absent,
    };
    if raw.is_empty() {
        return Outcome::Absent;
    }
    match rule {
        Rule::Text => Outcome::Value(Normalized::Text(raw.to_string())),
        Rule::Date => date(raw),
        Rule::Float => float(raw),
        Rule::Operator => operator(raw),
        Rule::Coordinates => coordinates(raw),
    }
}

/// Strict `MM/DD/YYYY`. Anything else (wrong shape, impossible calendar
/// date) is skipped.
fn date(raw: &str) -> Outcome {
    match NaiveDate::parse_from_str(raw, "%m/%d/%Y") {
        Ok(d) => Outcome::Value(Normalized::Date(d)),
        Err(e) => Outcome::Skipped(format!("failed to parse date from '{raw}': {e}")),
    }
}

fn float(raw: &str) -> Outcome {
    match raw.parse::<f64>() {
        Ok(f) => Outcome::Value(Normalized::Float(f)),
        Err(_) => Outcome::Skipped(format!("'{raw}' is not a number")),
    }
}

/// `[id] name` → id + name. Both derived fields stand or fall together:
/// a missing separator, a missing bracket, or a non-integer id skips the
/// whole value.
fn operator(raw: &str) -> Outcome {
    let Some((id_part, name_part)) = raw.split_once("] ") else {
        return Outcome::Skipped(format!("operator '{raw}' has no '] ' separator"));
    };
    let Some(id_digits) = id_part.strip_prefix('[') else {
        return Outcome::Skipped(format!("operator '{raw}' has no leading '['"));
    };
    let id = match id_digits.parse::<i64>() {
        Ok(id) => id,
        Err(_) => {
            return Outcome::Skipped(format!("operator id '{id_digits}' is not an integer"));
        }
    };
    let name = name_part.trim();
    if name.is_empty() {
        return Outcome::Skipped(format!("operator '{raw}' has an empty name"));
    }
    Outcome::Value(Normalized::Operator {
        id,
        name: name.to_string(),
    })
}

/// `lat, lon [label]` → latitude + longitude, derived atomically. The
/// longitude half may carry a trailing label such as `(surface)`, which is
/// cut at the first space after trimming.
fn coordinates(raw: &str) -> Outcome {
    let Some((lat_raw, lon_raw)) = raw.split_once(',') else {
        return Outcome::Skipped(format!("coordinates '{raw}' have no comma"));
    };
    let lat_raw = lat_raw.trim();
    let mut lon_raw = lon_raw.trim();
    if let Some((head, _)) = lon_raw.split_once(' ') {
        lon_raw = head;
    }
    let (Ok(latitude), Ok(longitude)) = (lat_raw.parse::<f64>(), lon_raw.parse::<f64>()) else {
        return Outcome::Skipped(format!(
            "failed to convert coordinates to float: '{lat_raw}', '{lon_raw}'"
        ));
    };
    Outcome::Value(Normalized::Coordinates {
        latitude,
        longitude,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn value(outcome: Outcome) -> Normalized {
        match outcome {
            Outcome::Value(v) => v,
            other => panic!("expected a value, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_and_empty_are_absent_for_every_rule() {
        for rule in [
            Rule::Text,
            Rule::Date,
            Rule::Float,
            Rule::Operator,
            Rule::Coordinates,
        ] {
            assert_eq!(normalize(rule, None), Outcome::Absent);
            assert_eq!(normalize(rule, Some("")), Outcome::Absent);
            assert_eq!(normalize(rule, Some("   ")), Outcome::Absent);
        }
    }

    #[test]
    fn test_text_trims() {
        assert_eq!(
            normalize(Rule::Text, Some("  Active  ")),
            Outcome::Value(Normalized::Text("Active".into()))
        );
    }

    #[test]
    fn test_date_well_formed() {
        assert_eq!(
            value(normalize(Rule::Date, Some("04/01/2019"))),
            Normalized::Date(NaiveDate::from_ymd_opt(2019, 4, 1).unwrap())
        );
    }

    #[test]
    fn test_date_malformed_is_skipped() {
        assert!(matches!(
            normalize(Rule::Date, Some("2019-04-01")),
            Outcome::Skipped(_)
        ));
        assert!(matches!(
            normalize(Rule::Date, Some("not a date")),
            Outcome::Skipped(_)
        ));
        // Valid shape, impossible calendar date.
        assert!(matches!(
            normalize(Rule::Date, Some("02/30/2019")),
            Outcome::Skipped(_)
        ));
    }

    #[test]
    fn test_float() {
        assert_eq!(
            value(normalize(Rule::Float, Some("1234.5"))),
            Normalized::Float(1234.5)
        );
        assert_eq!(
            value(normalize(Rule::Float, Some("-3612"))),
            Normalized::Float(-3612.0)
        );
        assert!(matches!(
            normalize(Rule::Float, Some("abc")),
            Outcome::Skipped(_)
        ));
    }

    #[test]
    fn test_operator_well_formed() {
        assert_eq!(
            value(normalize(Rule::Operator, Some("[42] Acme Oil"))),
            Normalized::Operator {
                id: 42,
                name: "Acme Oil".into()
            }
        );
    }

    #[test]
    fn test_operator_malformed_is_skipped_whole() {
        for raw in [
            "NoSeparatorHere",
            "42] Acme Oil",
            "[x42] Acme Oil",
            "[42] ",
            "[] Acme",
        ] {
            assert!(
                matches!(normalize(Rule::Operator, Some(raw)), Outcome::Skipped(_)),
                "{raw:?} should be skipped"
            );
        }
    }

    #[test]
    fn test_operator_name_may_contain_separator_text() {
        // Split happens on the first "] " only.
        assert_eq!(
            value(normalize(Rule::Operator, Some("[7] Acme [West] Division"))),
            Normalized::Operator {
                id: 7,
                name: "Acme [West] Division".into()
            }
        );
    }

    #[test]
    fn test_coordinates_with_trailing_label() {
        assert_eq!(
            value(normalize(Rule::Coordinates, Some("32.81, -104.19 (surface)"))),
            Normalized::Coordinates {
                latitude: 32.81,
                longitude: -104.19
            }
        );
    }

    #[test]
    fn test_coordinates_plain() {
        assert_eq!(
            value(normalize(Rule::Coordinates, Some("32.81,-104.19"))),
            Normalized::Coordinates {
                latitude: 32.81,
                longitude: -104.19
            }
        );
    }

    #[test]
    fn test_coordinates_malformed_is_skipped_whole() {
        for raw in ["32.81", "32.81, abc", "abc, -104.19", "32.81, "] {
            assert!(
                matches!(normalize(Rule::Coordinates, Some(raw)), Outcome::Skipped(_)),
                "{raw:?} should be skipped"
            );
        }
    }

    proptest! {
        #[test]
        fn prop_formatted_dates_round_trip(y in 1900i32..2100, m in 1u32..=12, d in 1u32..=28) {
            let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
            let raw = date.format("%m/%d/%Y").to_string();
            prop_assert_eq!(
                value(normalize(Rule::Date, Some(&raw))),
                Normalized::Date(date)
            );
        }

        #[test]
        fn prop_floats_round_trip_through_display(f in -1.0e9f64..1.0e9) {
            let raw = f.to_string();
            prop_assert_eq!(
                value(normalize(Rule::Float, Some(&raw))),
                Normalized::Float(raw.parse::<f64>().unwrap())
            );
        }

        #[test]
        fn prop_operator_never_yields_partial_pair(raw in "[a-zA-Z0-9\\[\\] ]{0,24}") {
            // Whatever the input, the outcome is a full pair or nothing.
            match normalize(Rule::Operator, Some(&raw)) {
                Outcome::Value(Normalized::Operator { name, .. }) => {
                    prop_assert!(!name.is_empty());
                }
                Outcome::Value(other) => prop_assert!(false, "wrong variant {other:?}"),
                Outcome::Absent | Outcome::Skipped(_) => {}
            }
        }
    }
}
