//! Record assembly.
//!
//! Ties the two phases together: extract every raw field from the page, run
//! each through its normalization rule, and build one immutable [`Well`].
//! Individual field failures are collected into a skip report and logged;
//! they never abort the record. Only an unreadable document does.

use crate::document::WellDocument;
use crate::error::DerrickResult;
use crate::extract::raw_fields;
use crate::fields::SourceField;
use crate::normalize::{normalize, Normalized, Outcome};
use crate::record::Well;

/// One field that was present on the page but failed to normalize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSkip {
    /// Which field was dropped.
    pub field: SourceField,
    /// The raw text that failed.
    pub raw: String,
    /// Why it failed.
    pub reason: String,
}

/// The product of one assembly pass.
#[derive(Debug, Clone)]
pub struct Assembled {
    /// The assembled record.
    pub well: Well,
    /// Fields that were present but dropped, for diagnostic logging.
    pub skipped: Vec<FieldSkip>,
}

/// Assembles a [`Well`] from a raw detail page.
///
/// # Errors
///
/// Fails only when the document itself is unreadable (empty input). A field
/// that fails to normalize is reported in [`Assembled::skipped`] and stored
/// as absent.
pub fn assemble(api_number: &str, html: &str) -> DerrickResult<Assembled> {
    let doc = WellDocument::new(html)?;
    let raw = raw_fields(&doc);

    let mut well = Well::new(api_number);
    let mut skipped = Vec::new();

    for field in SourceField::ALL {
        let raw_text = raw.get(&field).map(String::as_str);
        match normalize(field.rule(), raw_text) {
            Outcome::Value(value) => apply(&mut well, field, value),
            Outcome::Absent => {}
            Outcome::Skipped(reason) => {
                tracing::debug!(
                    api_number,
                    field = field.name(),
                    %reason,
                    "field skipped during normalization"
                );
                skipped.push(FieldSkip {
                    field,
                    raw: raw_text.unwrap_or_default().to_string(),
                    reason,
                });
            }
        }
    }

    tracing::debug!(
        api_number,
        skipped = skipped.len(),
        "assembled well record"
    );
    Ok(Assembled { well, skipped })
}

/// Writes one normalized value to its destination field(s). The compound
/// rules write both halves of their pair; nothing else ever touches a field
/// it does not own.
fn apply(well: &mut Well, field: SourceField, value: Normalized) {
    match (field, value) {
        (SourceField::Operator, Normalized::Operator { id, name }) => {
            well.operator_id = Some(id);
            well.operator_name = Some(name);
        }
        (
            SourceField::Coordinates,
            Normalized::Coordinates {
                latitude,
                longitude,
            },
        ) => {
            well.latitude = Some(latitude);
            well.longitude = Some(longitude);
        }
        (SourceField::SpudDate, Normalized::Date(d)) => well.spud_date = Some(d),
        (SourceField::LastInspectionDate, Normalized::Date(d)) => {
            well.last_inspection_date = Some(d);
        }
        (SourceField::GlElevation, Normalized::Float(f)) => well.gl_elevation = Some(f),
        (SourceField::KbElevation, Normalized::Float(f)) => well.kb_elevation = Some(f),
        (SourceField::DfElevation, Normalized::Float(f)) => well.df_elevation = Some(f),
        (SourceField::Tvd, Normalized::Float(f)) => well.tvd = Some(f),
        (SourceField::Status, Normalized::Text(t)) => well.status = Some(t),
        (SourceField::WellType, Normalized::Text(t)) => well.well_type = Some(t),
        (SourceField::WorkType, Normalized::Text(t)) => well.work_type = Some(t),
        (SourceField::DirectionalStatus, Normalized::Text(t)) => {
            well.directional_status = Some(t);
        }
        (SourceField::MultiLateral, Normalized::Text(t)) => well.multi_lateral = Some(t),
        (SourceField::MineralOwner, Normalized::Text(t)) => well.mineral_owner = Some(t),
        (SourceField::SurfaceOwner, Normalized::Text(t)) => well.surface_owner = Some(t),
        (SourceField::SurfaceLocation, Normalized::Text(t)) => well.surface_location = Some(t),
        (SourceField::SingleMultCompletion, Normalized::Text(t)) => {
            well.single_mult_completion = Some(t);
        }
        (SourceField::PotashWaiver, Normalized::Text(t)) => well.potash_waiver = Some(t),
        (SourceField::Crs, Normalized::Text(t)) => well.crs = Some(t),
        // A rule/field mismatch cannot be produced by the table.
        (field, value) => {
            tracing::error!(field = field.name(), ?value, "rule/value mismatch");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const PREFIX: &str = "ctl00_ctl00__main_main_ucGeneralWellInformation";

    fn span(suffix: &str, text: &str) -> String {
        format!(r#"<span id="{PREFIX}{suffix}">{text}</span>"#)
    }

    fn sample_page() -> String {
        let mut body = String::new();
        body.push_str(&span("_lblOperator", "[229137] ACME ENERGY LLC"));
        body.push_str(&span("_lblStatus", "Active"));
        body.push_str(&span("_lblWellType", "Oil"));
        body.push_str(&span("_lblWorkType", "New Well"));
        body.push_str(&span("_lblDirectionalStatus", "Horizontal"));
        body.push_str(&span("_lblMultiLateral", "No"));
        body.push_str(&span("_lblMineralOwner", "Federal"));
        body.push_str(&span("_lblSurfaceOwner", "Private"));
        body.push_str(&span("_Location_lblLocation", "Unit A, Section 12"));
        body.push_str(&span("_lblGLElevation", "3612"));
        body.push_str(&span("_lblKBElevation", "3627.5"));
        body.push_str(&span("_lblDFElevationLabel", ""));
        body.push_str(&span("_lblCompletions", "Single"));
        body.push_str(&span("_lblPotashWaiver", "None"));
        body.push_str(&span("_lblSpudDate", "04/01/2019"));
        body.push_str(&span("_lblLastInspectionDate", "11/15/2023"));
        body.push_str(&span("_lblTrueVerticalDepth", "8450"));
        body.push_str(&span("_Location_lblCoordinates", "32.81, -104.19 (surface)"));
        format!("<html><body>{body}</body></html>")
    }

    #[test]
    fn test_assembles_full_record() {
        let assembled = assemble("30-015-12345", &sample_page()).unwrap();
        let well = &assembled.well;

        assert_eq!(well.api_number, "30-015-12345");
        assert_eq!(well.operator_id, Some(229_137));
        assert_eq!(well.operator_name.as_deref(), Some("ACME ENERGY LLC"));
        assert_eq!(well.status.as_deref(), Some("Active"));
        assert_eq!(well.well_type.as_deref(), Some("Oil"));
        assert_eq!(well.gl_elevation, Some(3612.0));
        assert_eq!(well.kb_elevation, Some(3627.5));
        // Present-but-empty element normalizes to absent, not "".
        assert_eq!(well.df_elevation, None);
        assert_eq!(well.spud_date, NaiveDate::from_ymd_opt(2019, 4, 1));
        assert_eq!(
            well.last_inspection_date,
            NaiveDate::from_ymd_opt(2023, 11, 15)
        );
        assert_eq!(well.tvd, Some(8450.0));
        assert_eq!(well.coordinates(), Some((32.81, -104.19)));
        assert_eq!(well.crs, None);
        assert!(assembled.skipped.is_empty());
    }

    #[test]
    fn test_bad_fields_do_not_abort_the_record() {
        let body = [
            span("_lblStatus", "Plugged"),
            span("_lblSpudDate", "not a date"),
            span("_lblGLElevation", "n/a"),
            span("_lblOperator", "Orphaned Well Fund"),
        ]
        .concat();
        let assembled = assemble("w1", &format!("<html>{body}</html>")).unwrap();

        assert_eq!(assembled.well.status.as_deref(), Some("Plugged"));
        assert_eq!(assembled.well.spud_date, None);
        assert_eq!(assembled.well.gl_elevation, None);
        assert_eq!(assembled.well.operator_id, None);
        assert_eq!(assembled.well.operator_name, None);

        let skipped: Vec<_> = assembled.skipped.iter().map(|s| s.field).collect();
        assert_eq!(
            skipped,
            vec![
                SourceField::Operator,
                SourceField::GlElevation,
                SourceField::SpudDate
            ]
        );
    }

    #[test]
    fn test_unreadable_document_is_the_only_fatal_case() {
        assert!(assemble("w1", "").is_err());
        assert!(assemble("w1", "  \n ").is_err());
        // A readable page with zero matching fields still assembles.
        let assembled = assemble("w1", "<html><body>maintenance page</body></html>").unwrap();
        assert_eq!(assembled.well.api_number, "w1");
        assert!(assembled.skipped.is_empty());
    }

    #[test]
    fn test_assembly_is_deterministic() {
        let page = sample_page();
        let first = assemble("w1", &page).unwrap();
        let second = assemble("w1", &page).unwrap();
        assert_eq!(first.well, second.well);
    }
}
