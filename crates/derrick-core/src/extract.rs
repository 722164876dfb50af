//! Raw field extraction.
//!
//! First of the two assembly phases: look up every field's span element and
//! collect whatever raw text is present. Absence of an element is not an
//! error; the field is simply missing from the map. Normalization happens
//! separately in [`crate::normalize`].

use std::collections::BTreeMap;

use crate::document::WellDocument;
use crate::fields::SourceField;

/// Extracts the raw text of every field present on the page.
///
/// Fields whose lookup key matches no element are absent from the returned
/// map. An element that exists but renders no text yields an empty string;
/// the normalizer decides what that means per rule.
#[must_use]
pub fn raw_fields(doc: &WellDocument) -> BTreeMap<SourceField, String> {
    SourceField::ALL
        .iter()
        .filter_map(|field| {
            doc.span_text(field.lookup_key())
                .map(|text| (*field, text))
        })
        .collect()
}
