//! The in-polygon spatial filter.
//!
//! A linear scan over the record set: cheap and predictable at the scale of
//! one state's well registry. If the record count ever makes this the slow
//! path, a spatial index in front of the store is the fix; the containment
//! semantics here would not change.

use crate::geometry::{Point, Polygon};
use crate::record::Well;

/// Returns the API numbers of wells whose point lies strictly inside the
/// polygon, in input order.
///
/// The test point is `(latitude, longitude)`, the same pairing convention
/// as [`Polygon`](crate::geometry). Wells missing either coordinate are
/// skipped silently; a point exactly on the boundary is excluded.
pub fn wells_within<'a, I>(polygon: &Polygon, wells: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Well>,
{
    wells
        .into_iter()
        .filter_map(|well| {
            let (lat, lon) = well.coordinates()?;
            polygon
                .contains(Point::new(lat, lon))
                .then(|| well.api_number.clone())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn well_at(api_number: &str, lat: f64, lon: f64) -> Well {
        let mut well = Well::new(api_number);
        well.latitude = Some(lat);
        well.longitude = Some(lon);
        well
    }

    fn square() -> Polygon {
        Polygon::from_flat(&[0.0, 0.0, 0.0, 4.0, 4.0, 4.0, 4.0, 0.0]).unwrap()
    }

    #[test]
    fn test_inside_point_is_included() {
        let wells = vec![well_at("in", 2.0, 2.0), well_at("out", 9.0, 9.0)];
        assert_eq!(wells_within(&square(), &wells), vec!["in"]);
    }

    #[test]
    fn test_boundary_point_is_excluded() {
        let wells = vec![
            well_at("edge", 0.0, 2.0),
            well_at("vertex", 4.0, 4.0),
            well_at("in", 1.0, 1.0),
        ];
        assert_eq!(wells_within(&square(), &wells), vec!["in"]);
    }

    #[test]
    fn test_missing_coordinates_are_skipped() {
        let mut lat_only = Well::new("lat-only");
        lat_only.latitude = Some(2.0);
        let wells = vec![Well::new("bare"), lat_only, well_at("in", 2.0, 2.0)];
        assert_eq!(wells_within(&square(), &wells), vec!["in"]);
    }

    #[test]
    fn test_preserves_input_order() {
        let wells = vec![
            well_at("c", 3.0, 3.0),
            well_at("a", 1.0, 1.0),
            well_at("b", 2.0, 2.0),
        ];
        assert_eq!(wells_within(&square(), &wells), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_empty_record_set() {
        assert!(wells_within(&square(), &[]).is_empty());
    }
}
