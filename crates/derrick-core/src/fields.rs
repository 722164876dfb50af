//! The declarative field table.
//!
//! Each [`SourceField`] names one logical field on the portal detail page and
//! carries the lookup key (the page's span element id) plus the [`Rule`] that
//! normalizes its raw text. The assembler iterates this table and assigns
//! results explicitly: there is no reflective dispatch and no field setter
//! with hidden side effects.

/// Normalization rule for a source field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// Trimmed verbatim text; empty becomes absent.
    Text,
    /// Strict `MM/DD/YYYY` calendar date.
    Date,
    /// Floating point number.
    Float,
    /// Compound `[id] name` operator string producing two fields.
    Operator,
    /// Compound `lat, lon [label]` string producing two fields.
    Coordinates,
}

/// Logical source fields of the portal detail page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum SourceField {
    Operator,
    Status,
    WellType,
    WorkType,
    DirectionalStatus,
    MultiLateral,
    MineralOwner,
    SurfaceOwner,
    SurfaceLocation,
    GlElevation,
    KbElevation,
    DfElevation,
    SingleMultCompletion,
    PotashWaiver,
    SpudDate,
    LastInspectionDate,
    Tvd,
    Coordinates,
    Crs,
}

impl SourceField {
    /// Every source field, in the order they are assembled.
    pub const ALL: [Self; 19] = [
        Self::Operator,
        Self::Status,
        Self::WellType,
        Self::WorkType,
        Self::DirectionalStatus,
        Self::MultiLateral,
        Self::MineralOwner,
        Self::SurfaceOwner,
        Self::SurfaceLocation,
        Self::GlElevation,
        Self::KbElevation,
        Self::DfElevation,
        Self::SingleMultCompletion,
        Self::PotashWaiver,
        Self::SpudDate,
        Self::LastInspectionDate,
        Self::Tvd,
        Self::Coordinates,
        Self::Crs,
    ];

    /// Snake-case field name, for diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Operator => "operator",
            Self::Status => "status",
            Self::WellType => "well_type",
            Self::WorkType => "work_type",
            Self::DirectionalStatus => "directional_status",
            Self::MultiLateral => "multi_lateral",
            Self::MineralOwner => "mineral_owner",
            Self::SurfaceOwner => "surface_owner",
            Self::SurfaceLocation => "surface_location",
            Self::GlElevation => "gl_elevation",
            Self::KbElevation => "kb_elevation",
            Self::DfElevation => "df_elevation",
            Self::SingleMultCompletion => "single_mult_completion",
            Self::PotashWaiver => "potash_waiver",
            Self::SpudDate => "spud_date",
            Self::LastInspectionDate => "last_inspection_date",
            Self::Tvd => "tvd",
            Self::Coordinates => "coordinates",
            Self::Crs => "crs",
        }
    }

    /// The span element id on the portal detail page.
    ///
    /// `Crs` has no element (the portal never renders a coordinate reference
    /// system), so its key is empty and extraction always misses it.
    #[must_use]
    pub const fn lookup_key(self) -> &'static str {
        match self {
            Self::Operator => "ctl00_ctl00__main_main_ucGeneralWellInformation_lblOperator",
            Self::Status => "ctl00_ctl00__main_main_ucGeneralWellInformation_lblStatus",
            Self::WellType => "ctl00_ctl00__main_main_ucGeneralWellInformation_lblWellType",
            Self::WorkType => "ctl00_ctl00__main_main_ucGeneralWellInformation_lblWorkType",
            Self::DirectionalStatus => {
                "ctl00_ctl00__main_main_ucGeneralWellInformation_lblDirectionalStatus"
            }
            Self::MultiLateral => {
                "ctl00_ctl00__main_main_ucGeneralWellInformation_lblMultiLateral"
            }
            Self::MineralOwner => {
                "ctl00_ctl00__main_main_ucGeneralWellInformation_lblMineralOwner"
            }
            Self::SurfaceOwner => {
                "ctl00_ctl00__main_main_ucGeneralWellInformation_lblSurfaceOwner"
            }
            Self::SurfaceLocation => {
                "ctl00_ctl00__main_main_ucGeneralWellInformation_Location_lblLocation"
            }
            Self::GlElevation => {
                "ctl00_ctl00__main_main_ucGeneralWellInformation_lblGLElevation"
            }
            Self::KbElevation => {
                "ctl00_ctl00__main_main_ucGeneralWellInformation_lblKBElevation"
            }
            Self::DfElevation => {
                "ctl00_ctl00__main_main_ucGeneralWellInformation_lblDFElevationLabel"
            }
            Self::SingleMultCompletion => {
                "ctl00_ctl00__main_main_ucGeneralWellInformation_lblCompletions"
            }
            Self::PotashWaiver => {
                "ctl00_ctl00__main_main_ucGeneralWellInformation_lblPotashWaiver"
            }
            Self::SpudDate => "ctl00_ctl00__main_main_ucGeneralWellInformation_lblSpudDate",
            Self::LastInspectionDate => {
                "ctl00_ctl00__main_main_ucGeneralWellInformation_lblLastInspectionDate"
            }
            Self::Tvd => {
                "ctl00_ctl00__main_main_ucGeneralWellInformation_lblTrueVerticalDepth"
            }
            Self::Coordinates => {
                "ctl00_ctl00__main_main_ucGeneralWellInformation_Location_lblCoordinates"
            }
            Self::Crs => "",
        }
    }

    /// The normalization rule for this field.
    #[must_use]
    pub const fn rule(self) -> Rule {
        match self {
            Self::Operator => Rule::Operator,
            Self::Coordinates => Rule::Coordinates,
            Self::SpudDate | Self::LastInspectionDate => Rule::Date,
            Self::GlElevation | Self::KbElevation | Self::DfElevation | Self::Tvd => Rule::Float,
            Self::Status
            | Self::WellType
            | Self::WorkType
            | Self::DirectionalStatus
            | Self::MultiLateral
            | Self::MineralOwner
            | Self::SurfaceOwner
            | Self::SurfaceLocation
            | Self::SingleMultCompletion
            | Self::PotashWaiver
            | Self::Crs => Rule::Text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_covers_every_field_once() {
        let mut seen = std::collections::BTreeSet::new();
        for field in SourceField::ALL {
            assert!(seen.insert(field), "{} listed twice", field.name());
        }
        assert_eq!(seen.len(), 19);
    }

    #[test]
    fn test_only_crs_has_no_lookup_key() {
        for field in SourceField::ALL {
            if field == SourceField::Crs {
                assert!(field.lookup_key().is_empty());
            } else {
                assert!(!field.lookup_key().is_empty(), "{}", field.name());
            }
        }
    }

    #[test]
    fn test_rules() {
        assert_eq!(SourceField::Operator.rule(), Rule::Operator);
        assert_eq!(SourceField::Coordinates.rule(), Rule::Coordinates);
        assert_eq!(SourceField::SpudDate.rule(), Rule::Date);
        assert_eq!(SourceField::LastInspectionDate.rule(), Rule::Date);
        assert_eq!(SourceField::Tvd.rule(), Rule::Float);
        assert_eq!(SourceField::GlElevation.rule(), Rule::Float);
        assert_eq!(SourceField::Status.rule(), Rule::Text);
        assert_eq!(SourceField::Crs.rule(), Rule::Text);
    }
}
