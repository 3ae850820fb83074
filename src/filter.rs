use crate::error::DashboardError;
use crate::types::{AreaField, FacetSelection, ProjectedTable, RestArea};
use std::collections::HashSet;

/// Default projection for the district view.
pub const DISTRICT_COLUMNS: [AreaField; 3] =
    [AreaField::Name, AreaField::Address, AreaField::City];

/// Full-row projection. The on-screen district table stays narrow; the CSV
/// export carries every column.
pub const ALL_COLUMNS: [AreaField; 9] = [
    AreaField::Name,
    AreaField::Address,
    AreaField::City,
    AreaField::County,
    AreaField::District,
    AreaField::Route,
    AreaField::Latitude,
    AreaField::Longitude,
    AreaField::TrafficDir,
];

/// Apply the facet selection to the dataset, keeping at most `limit` rows.
///
/// Rows pass when every required amenity is present; non-required amenities
/// impose no constraint, so a selection with nothing required returns the
/// whole dataset. Output preserves dataset order.
///
/// Callers clamp the user-requested count into `[1, filtered_len]` before
/// invoking this; the truncation here additionally caps at the (possibly
/// zero) result length, so a limit against an empty result is an empty list,
/// never an error.
pub fn apply(dataset: &[RestArea], selection: &FacetSelection, limit: usize) -> Vec<RestArea> {
    debug_assert!(limit >= 1, "display limit must be at least 1");
    dataset
        .iter()
        .filter(|area| selection.matches(area))
        .take(limit)
        .cloned()
        .collect()
}

/// Distinct district numbers in first-appearance order; the district
/// selector offers exactly these.
pub fn districts(dataset: &[RestArea]) -> Vec<u32> {
    let mut seen: HashSet<u32> = HashSet::new();
    let mut out = Vec::new();
    for area in dataset {
        if seen.insert(area.district) {
            out.push(area.district);
        }
    }
    out
}

/// Rows in one district, projected onto the requested columns (NAME,
/// ADDRESS, CITY when the caller passes `None`). Output preserves dataset
/// order; the dataset itself is never touched.
///
/// The district must be a value actually present in the dataset. The
/// selector only offers those, so `InvalidDistrict` marks a programming
/// error rather than a user-facing path.
pub fn areas_in_district(
    dataset: &[RestArea],
    district: u32,
    fields: Option<&[AreaField]>,
) -> Result<ProjectedTable, DashboardError> {
    if !dataset.iter().any(|area| area.district == district) {
        return Err(DashboardError::InvalidDistrict(district));
    }
    let fields = fields.unwrap_or(&DISTRICT_COLUMNS);
    let headers: Vec<&'static str> = fields.iter().map(|f| f.header()).collect();
    let rows: Vec<Vec<String>> = dataset
        .iter()
        .filter(|area| area.district == district)
        .map(|area| fields.iter().map(|f| area.field(*f)).collect())
        .collect();
    Ok(ProjectedTable { headers, rows })
}
