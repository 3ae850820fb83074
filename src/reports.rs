use crate::error::DashboardError;
use crate::filter;
use crate::types::{
    AmenityCoverage, AmenityKind, CountsByKey, DashboardView, Direction, DirectionPartition,
    FacetSelection, FlaggedArea, GroupKey, PivotTable, RestArea, SummaryStats, AMENITY_COUNT,
};
use crate::util::percent;
use chrono::Local;
use std::collections::HashMap;

/// Count rows per distinct value of the given column. The view passed in
/// decides the scope: county counts run over the filtered view, city and
/// route counts over the full dataset.
pub fn count_by(view: &[RestArea], key: GroupKey) -> CountsByKey {
    let mut counts: CountsByKey = HashMap::new();
    for area in view {
        *counts.entry(key.value_of(area)).or_insert(0) += 1;
    }
    counts
}

/// Decode the amenity cells of every row into booleans, yielding the typed
/// view the pivot runs on. The input rows are copied, never mutated, so the
/// string-typed dataset stays exactly as loaded.
pub fn coerce_amenities(dataset: &[RestArea]) -> Vec<FlaggedArea> {
    dataset
        .iter()
        .map(|area| {
            let mut flags = [false; AMENITY_COUNT];
            for kind in AmenityKind::ALL {
                flags[kind as usize] = area.has_amenity(kind);
            }
            FlaggedArea {
                area: area.clone(),
                flags,
            }
        })
        .collect()
}

/// Sum amenity flags per group value. Every group carries a cell for every
/// requested amenity, zero when no row in the group has it, so each cell is
/// bounded by the group's row count.
pub fn pivot(flagged: &[FlaggedArea], key: GroupKey, kinds: &[AmenityKind]) -> PivotTable {
    let mut table: PivotTable = HashMap::new();
    for row in flagged {
        let cells = table.entry(key.value_of(&row.area)).or_default();
        for kind in kinds {
            *cells.entry(*kind).or_insert(0) += usize::from(row.flag(*kind));
        }
    }
    table
}

/// Do-Have / Do-Not-Have split for every amenity over the given rows.
pub fn amenity_coverage(dataset: &[RestArea]) -> Vec<AmenityCoverage> {
    AmenityKind::ALL
        .iter()
        .map(|kind| {
            let have = dataset.iter().filter(|a| a.has_amenity(*kind)).count();
            AmenityCoverage {
                amenity: kind.label().to_string(),
                have,
                not_have: dataset.len() - have,
                have_pct: percent(have, dataset.len()),
            }
        })
        .collect()
}

/// Coordinate pairs for the map, in view order.
pub fn map_points(view: &[RestArea]) -> Vec<(f64, f64)> {
    view.iter().map(|a| (a.latitude, a.longitude)).collect()
}

/// Split the dataset into the four direction buckets. Rows whose direction
/// code is not one of N, S, E, W fall into no bucket; within each bucket the
/// dataset order is preserved.
pub fn partition_by_direction(dataset: &[RestArea]) -> DirectionPartition {
    let mut parts = DirectionPartition::default();
    for area in dataset {
        if let Some(dir) = area.direction() {
            let bucket = match dir {
                Direction::North => &mut parts.north,
                Direction::South => &mut parts.south,
                Direction::East => &mut parts.east,
                Direction::West => &mut parts.west,
            };
            bucket.push((area.name.clone(), dir));
        }
    }
    parts
}

/// Dataset-wide totals and per-amenity coverage, stamped with the wall-clock
/// time of generation.
pub fn generate_summary(dataset: &[RestArea]) -> SummaryStats {
    SummaryStats {
        total_rest_areas: dataset.len(),
        total_counties: count_by(dataset, GroupKey::County).len(),
        total_cities: count_by(dataset, GroupKey::City).len(),
        total_districts: count_by(dataset, GroupKey::District).len(),
        total_routes: count_by(dataset, GroupKey::Route).len(),
        amenity_coverage: amenity_coverage(dataset),
        generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    }
}

/// Derive every dashboard section from the loaded dataset in one pass.
///
/// The facet selection and row limit shape only the list, the county counts,
/// and the map; the district table, city counts, pivot, route counts,
/// coverage, and direction partition always read the full dataset. The
/// requested row count is clamped into `[1, filtered_len]` before the list
/// is cut. Callers hand in a nonempty dataset (the loader refuses to produce
/// an empty one) and a district taken from `filter::districts`.
pub fn assemble_dashboard(
    dataset: &[RestArea],
    selection: &FacetSelection,
    requested_rows: usize,
    district: u32,
) -> Result<DashboardView, DashboardError> {
    let filtered = filter::apply(dataset, selection, dataset.len());
    let display_limit = requested_rows.clamp(1, filtered.len().max(1));
    let listed: Vec<RestArea> = filtered.iter().take(display_limit).cloned().collect();
    let district_table = filter::areas_in_district(dataset, district, None)?;
    let flagged = coerce_amenities(dataset);

    Ok(DashboardView {
        county_counts: count_by(&filtered, GroupKey::County),
        map_points: map_points(&filtered),
        listed,
        filtered,
        district,
        district_table,
        city_counts: count_by(dataset, GroupKey::City),
        pivot: pivot(&flagged, GroupKey::City, &AmenityKind::ALL),
        route_counts: count_by(dataset, GroupKey::Route),
        coverage: amenity_coverage(dataset),
        directions: partition_by_direction(dataset),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(name: &str, district: u32, dir: &str, restroom: &str, water: &str) -> RestArea {
        RestArea {
            name: name.to_string(),
            address: format!("{} Address", name),
            city: format!("{} City", name),
            county: "Kern".to_string(),
            district,
            route: "5".to_string(),
            latitude: 35.0,
            longitude: -119.0,
            amenities: [
                restroom.to_string(),
                water.to_string(),
                "Yes".to_string(),
                "Yes".to_string(),
                "Yes".to_string(),
                "Yes".to_string(),
                "No".to_string(),
                "Yes".to_string(),
            ],
            traffic_dir: dir.to_string(),
        }
    }

    fn scenario() -> Vec<RestArea> {
        vec![
            area("Area A", 5, "N", "Yes", "No"),
            area("Area B", 5, "S", "Yes", "Yes"),
            area("Area C", 7, "N", "No", "Yes"),
        ]
    }

    #[test]
    fn count_by_district_matches_row_counts() {
        let counts = count_by(&scenario(), GroupKey::District);
        let expected: CountsByKey =
            [("5".to_string(), 2), ("7".to_string(), 1)].into_iter().collect();
        assert_eq!(counts, expected);
    }

    #[test]
    fn count_by_direction_counts_raw_codes() {
        let mut data = scenario();
        data.push(area("Area D", 5, "NS", "Yes", "Yes"));
        let counts = count_by(&data, GroupKey::Direction);
        assert_eq!(counts.get("N"), Some(&2));
        assert_eq!(counts.get("S"), Some(&1));
        assert_eq!(counts.get("NS"), Some(&1));
    }

    #[test]
    fn coercion_decodes_exact_yes_and_leaves_rows_untouched() {
        let mut data = scenario();
        data[2].amenities[0] = "yes".to_string();

        let flagged = coerce_amenities(&data);
        assert_eq!(flagged.len(), data.len());
        for (original, typed) in data.iter().zip(&flagged) {
            assert_eq!(&typed.area, original);
            for kind in AmenityKind::ALL {
                assert_eq!(typed.flag(kind), original.has_amenity(kind));
            }
        }
        // Lowercase is not a match.
        assert!(!flagged[2].flag(AmenityKind::Restroom));
    }

    #[test]
    fn pivot_sums_flags_per_group_with_explicit_zero_cells() {
        let mut a = area("Area A", 5, "N", "Yes", "No");
        a.city = "Tipton".to_string();
        let mut b = area("Area B", 5, "S", "No", "No");
        b.city = "Tipton".to_string();
        let mut c = area("Area C", 7, "N", "Yes", "Yes");
        c.city = "Coalinga".to_string();
        let data = vec![a, b, c];

        let flagged = coerce_amenities(&data);
        let kinds = [AmenityKind::Restroom, AmenityKind::Water];
        let table = pivot(&flagged, GroupKey::City, &kinds);

        assert_eq!(table.len(), 2);
        assert_eq!(table["Tipton"][&AmenityKind::Restroom], 1);
        assert_eq!(table["Tipton"][&AmenityKind::Water], 0);
        assert_eq!(table["Coalinga"][&AmenityKind::Restroom], 1);
        assert_eq!(table["Coalinga"][&AmenityKind::Water], 1);
        // Only the requested amenities appear, and no cell exceeds the
        // group's row count.
        assert!(!table["Tipton"].contains_key(&AmenityKind::Phone));
        for cells in table.values() {
            for count in cells.values() {
                assert!(*count <= 2);
            }
        }
    }

    #[test]
    fn coverage_splits_sum_to_the_total() {
        let data = scenario();
        let coverage = amenity_coverage(&data);
        assert_eq!(coverage.len(), AMENITY_COUNT);
        for row in &coverage {
            assert_eq!(row.have + row.not_have, data.len());
        }
        assert_eq!(coverage[0].amenity, "Restroom");
        assert_eq!(coverage[0].have, 2);
        assert!((coverage[0].have_pct - 200.0 / 3.0).abs() < 1e-9);
        // Vending is "No" across the fixture.
        assert_eq!(coverage[AmenityKind::Vending as usize].have, 0);
        assert_eq!(coverage[AmenityKind::Vending as usize].have_pct, 0.0);
    }

    #[test]
    fn partition_buckets_by_direction_code() {
        let mut data = scenario();
        data.push(area("Area D", 5, "NS", "Yes", "Yes"));

        let parts = partition_by_direction(&data);
        assert_eq!(
            parts.north,
            vec![
                ("Area A".to_string(), Direction::North),
                ("Area C".to_string(), Direction::North),
            ]
        );
        assert_eq!(parts.south, vec![("Area B".to_string(), Direction::South)]);
        assert!(parts.east.is_empty());
        assert!(parts.west.is_empty());
        // The unrecognized code lands in no bucket.
        assert_eq!(parts.total(), 3);
    }

    #[test]
    fn summary_counts_distinct_dimension_values() {
        let summary = generate_summary(&scenario());
        assert_eq!(summary.total_rest_areas, 3);
        assert_eq!(summary.total_counties, 1);
        assert_eq!(summary.total_cities, 3);
        assert_eq!(summary.total_districts, 2);
        assert_eq!(summary.total_routes, 1);
        assert_eq!(summary.amenity_coverage.len(), AMENITY_COUNT);
        assert!(!summary.generated_at.is_empty());
    }

    #[test]
    fn dashboard_sections_split_between_filtered_and_full_views() {
        let data = scenario();
        let mut selection = FacetSelection::none();
        selection.set_required(AmenityKind::Restroom, true);

        let view = assemble_dashboard(&data, &selection, 10, 5).unwrap();

        let filtered_names: Vec<&str> = view.filtered.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(filtered_names, vec!["Area A", "Area B"]);
        assert_eq!(view.listed, view.filtered);
        assert_eq!(view.county_counts.get("Kern"), Some(&2));
        assert_eq!(view.map_points.len(), 2);

        // The remaining sections ignore the facet selection.
        assert_eq!(view.city_counts.len(), 3);
        assert_eq!(view.route_counts.get("5"), Some(&3));
        assert_eq!(view.pivot.len(), 3);
        assert_eq!(view.coverage[0].have, 2);
        assert_eq!(view.directions.total(), 3);
        assert_eq!(view.district, 5);
        assert_eq!(view.district_table.len(), 2);
    }

    #[test]
    fn dashboard_clamps_the_requested_row_count() {
        let data = scenario();
        let none = FacetSelection::none();

        let view = assemble_dashboard(&data, &none, 1, 5).unwrap();
        assert_eq!(view.listed.len(), 1);
        assert_eq!(view.filtered.len(), 3);

        let view = assemble_dashboard(&data, &none, 0, 5).unwrap();
        assert_eq!(view.listed.len(), 1);

        let view = assemble_dashboard(&data, &none, 99, 5).unwrap();
        assert_eq!(view.listed.len(), 3);
    }

    #[test]
    fn dashboard_rejects_a_district_missing_from_the_dataset() {
        let data = scenario();
        let err = assemble_dashboard(&data, &FacetSelection::none(), 10, 99).unwrap_err();
        assert!(matches!(err, DashboardError::InvalidDistrict(99)));
    }
}
