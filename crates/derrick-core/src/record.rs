//! The well record.
//!
//! [`Well`] is the typed product of one extraction pass over a portal detail
//! page. Every field other than the API number is optional: a field that was
//! missing from the page, or whose raw text failed to normalize, is `None`,
//! never an empty string or a zero.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One well record, keyed by its API number.
///
/// Records are assembled fresh per scrape pass by
/// [`assemble`](crate::assemble::assemble) and are not mutated field-by-field
/// afterwards. Two field pairs are atomic by construction:
/// `operator_id`/`operator_name` and `latitude`/`longitude` are either both
/// set or both `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Well {
    /// External unique key. Any non-empty string is accepted; the format is
    /// not validated. Assigned at construction and never reassigned.
    pub api_number: String,
    /// Operator name, from the compound `[id] name` operator string.
    pub operator_name: Option<String>,
    /// Operator id, from the compound `[id] name` operator string.
    pub operator_id: Option<i64>,
    /// Well status, verbatim.
    pub status: Option<String>,
    /// Well type, verbatim.
    pub well_type: Option<String>,
    /// Work type, verbatim.
    pub work_type: Option<String>,
    /// Directional status, verbatim.
    pub directional_status: Option<String>,
    /// Multi-lateral flag, verbatim.
    pub multi_lateral: Option<String>,
    /// Mineral owner, verbatim.
    pub mineral_owner: Option<String>,
    /// Surface owner, verbatim.
    pub surface_owner: Option<String>,
    /// Surface location description, verbatim.
    pub surface_location: Option<String>,
    /// Ground-level elevation, feet.
    pub gl_elevation: Option<f64>,
    /// Kelly-bushing elevation, feet.
    pub kb_elevation: Option<f64>,
    /// Derrick-floor elevation, feet.
    pub df_elevation: Option<f64>,
    /// Single/multiple completion flag, verbatim.
    pub single_mult_completion: Option<String>,
    /// Potash waiver flag, verbatim.
    pub potash_waiver: Option<String>,
    /// Spud date.
    pub spud_date: Option<NaiveDate>,
    /// Last inspection date.
    pub last_inspection_date: Option<NaiveDate>,
    /// True vertical depth, feet.
    pub tvd: Option<f64>,
    /// Latitude half of the compound coordinate string.
    pub latitude: Option<f64>,
    /// Longitude half of the compound coordinate string.
    pub longitude: Option<f64>,
    /// Coordinate reference system. The portal page has no element for this
    /// field; it is populated only from a configured default, if at all.
    pub crs: Option<String>,
}

impl Well {
    /// Creates an empty record for the given API number.
    #[must_use]
    pub fn new(api_number: impl Into<String>) -> Self {
        Self {
            api_number: api_number.into(),
            operator_name: None,
            operator_id: None,
            status: None,
            well_type: None,
            work_type: None,
            directional_status: None,
            multi_lateral: None,
            mineral_owner: None,
            surface_owner: None,
            surface_location: None,
            gl_elevation: None,
            kb_elevation: None,
            df_elevation: None,
            single_mult_completion: None,
            potash_waiver: None,
            spud_date: None,
            last_inspection_date: None,
            tvd: None,
            latitude: None,
            longitude: None,
            crs: None,
        }
    }

    /// Returns `(latitude, longitude)` when both halves are present.
    ///
    /// The pair is set atomically during assembly, so observing exactly one
    /// half would indicate a bug elsewhere; this accessor simply requires
    /// both.
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}
