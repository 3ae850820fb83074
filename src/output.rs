use crate::error::DashboardError;
use crate::filter;
use crate::types::{
    AmenityCoverage, AmenityKind, AreaListRow, CountsByKey, CoverageRow, DashboardView,
    Direction, DirectionPartition, GroupKey, PivotExportRow, PivotTable, ProjectedTable,
    RestArea, SummaryStats,
};
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;
use tabled::{Table, Tabled};

pub const FILTERED_CSV: &str = "filtered_rest_areas.csv";
pub const DISTRICT_CSV: &str = "district_rest_areas.csv";
pub const PIVOT_CSV: &str = "amenities_by_city.csv";
pub const MAP_JSON: &str = "map_points.json";
pub const SUMMARY_JSON: &str = "summary.json";

pub fn write_csv<T: Serialize>(path: &str, rows: &[T]) -> Result<(), DashboardError> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    log::debug!("wrote {}", path);
    Ok(())
}

/// CSV writer for tables whose columns are only known at runtime.
pub fn write_projected_csv(path: &str, table: &ProjectedTable) -> Result<(), DashboardError> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(&table.headers)?;
    for row in &table.rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    log::debug!("wrote {}", path);
    Ok(())
}

pub fn write_json<T: Serialize>(path: &str, value: &T) -> Result<(), DashboardError> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    log::debug!("wrote {}", path);
    Ok(())
}

pub fn markdown_table<T: Tabled + Clone>(rows: &[T]) -> String {
    if rows.is_empty() {
        return "(no rows)".to_string();
    }
    let owned: Vec<T> = rows.to_vec();
    Table::new(owned).with(Style::markdown()).to_string()
}

pub fn projected_markdown(table: &ProjectedTable) -> String {
    if table.is_empty() {
        return "(no rows)".to_string();
    }
    let mut builder = Builder::default();
    builder.push_record(table.headers.iter().copied());
    for row in &table.rows {
        builder.push_record(row.iter().cloned());
    }
    let mut built = builder.build();
    built.with(Style::markdown());
    built.to_string()
}

/// Counts as a two-column table, busiest value first; ties break on the
/// value so the output is stable.
pub fn counts_markdown(key: GroupKey, counts: &CountsByKey) -> String {
    if counts.is_empty() {
        return "(no rows)".to_string();
    }
    let mut entries: Vec<(&str, usize)> =
        counts.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let mut builder = Builder::default();
    builder.push_record([key.label(), "Rest Areas"]);
    for (value, count) in entries {
        builder.push_record([value.to_string(), count.to_string()]);
    }
    let mut table = builder.build();
    table.with(Style::markdown());
    table.to_string()
}

pub fn coverage_rows(coverage: &[AmenityCoverage]) -> Vec<CoverageRow> {
    coverage
        .iter()
        .map(|c| CoverageRow {
            amenity: c.amenity.clone(),
            do_have: c.have,
            do_not_have: c.not_have,
            coverage: format!("{:.1}%", c.have_pct),
        })
        .collect()
}

/// Flatten the pivot into one row per city, cities sorted so renders and
/// exports come out in a stable order. Missing cells read as zero.
pub fn pivot_rows(pivot: &PivotTable) -> Vec<PivotExportRow> {
    let mut cities: Vec<&String> = pivot.keys().collect();
    cities.sort();
    cities
        .into_iter()
        .map(|city| {
            let cells = &pivot[city];
            let count = |kind: AmenityKind| cells.get(&kind).copied().unwrap_or(0);
            PivotExportRow {
                city: city.clone(),
                restroom: count(AmenityKind::Restroom),
                water: count(AmenityKind::Water),
                picnictab: count(AmenityKind::PicnicTable),
                phone: count(AmenityKind::Phone),
                handicap: count(AmenityKind::Handicap),
                rv_station: count(AmenityKind::RvStation),
                vending: count(AmenityKind::Vending),
                pet_area: count(AmenityKind::PetArea),
            }
        })
        .collect()
}

/// Pivot as a markdown table, one column per amenity under its source
/// column name.
pub fn pivot_markdown(pivot: &PivotTable, kinds: &[AmenityKind]) -> String {
    if pivot.is_empty() {
        return "(no rows)".to_string();
    }
    let mut cities: Vec<&String> = pivot.keys().collect();
    cities.sort();

    let mut builder = Builder::default();
    let mut header = vec!["CITY".to_string()];
    header.extend(kinds.iter().map(|k| k.column().to_string()));
    builder.push_record(header);
    for city in cities {
        let cells = &pivot[city];
        let mut row = vec![city.clone()];
        row.extend(
            kinds
                .iter()
                .map(|k| cells.get(k).copied().unwrap_or(0).to_string()),
        );
        builder.push_record(row);
    }
    let mut table = builder.build();
    table.with(Style::markdown());
    table.to_string()
}

pub fn direction_listing(parts: &DirectionPartition) -> String {
    let render_order = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];
    let mut out = String::new();
    for dir in render_order {
        out.push_str(&format!("Rest Areas - {} Bound\n", dir.label()));
        let bucket = parts.bucket(dir);
        if bucket.is_empty() {
            out.push_str("(none)\n");
        }
        for (name, d) in bucket {
            out.push_str(&format!(
                "Rest Area: {}, Traffic Direction: {}\n",
                name,
                d.code()
            ));
        }
        out.push('\n');
    }
    out
}

/// Render every dashboard section, in a fixed page order, as one block of
/// display text.
pub fn render_dashboard(view: &DashboardView) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Rest Areas (showing {} of {} filtered)\n",
        view.listed.len(),
        view.filtered.len()
    ));
    let listed: Vec<AreaListRow> = view.listed.iter().map(AreaListRow::from).collect();
    out.push_str(&markdown_table(&listed));
    out.push_str("\n\n");

    out.push_str("Number of Rest Areas per County\n");
    out.push_str(&counts_markdown(GroupKey::County, &view.county_counts));
    out.push_str("\n\n");

    out.push_str(&format!(
        "Map Points ({} filtered locations)\n",
        view.map_points.len()
    ));
    for (lat, lon) in view.map_points.iter().take(5) {
        out.push_str(&format!("({:.4}, {:.4})\n", lat, lon));
    }
    if view.map_points.len() > 5 {
        out.push_str(&format!("... and {} more\n", view.map_points.len() - 5));
    }
    out.push('\n');

    out.push_str(&format!(
        "Rest Areas in District {} ({} areas)\n",
        view.district,
        view.district_table.len()
    ));
    out.push_str(&projected_markdown(&view.district_table));
    out.push_str("\n\n");

    out.push_str("Number of Rest Areas per City\n");
    out.push_str(&counts_markdown(GroupKey::City, &view.city_counts));
    out.push_str("\n\n");

    out.push_str("Amenities per City\n");
    out.push_str(&pivot_markdown(&view.pivot, &AmenityKind::ALL));
    out.push_str("\n\n");

    out.push_str("Number of Rest Areas per Route\n");
    out.push_str(&counts_markdown(GroupKey::Route, &view.route_counts));
    out.push_str("\n\n");

    out.push_str("Amenity Coverage\n");
    out.push_str(&markdown_table(&coverage_rows(&view.coverage)));
    out.push_str("\n\n");

    out.push_str(&format!(
        "Rest Areas by Traffic Direction ({} with a known direction)\n\n",
        view.directions.total()
    ));
    out.push_str(&direction_listing(&view.directions));
    out
}

/// Write all five artifacts and report which files were produced. The
/// district CSV re-projects from the dataset so the file carries every
/// column, not just the three shown on screen.
pub fn export_dashboard(
    dataset: &[RestArea],
    view: &DashboardView,
    summary: &SummaryStats,
) -> Result<Vec<&'static str>, DashboardError> {
    let filtered: Vec<AreaListRow> = view.filtered.iter().map(AreaListRow::from).collect();
    write_csv(FILTERED_CSV, &filtered)?;
    let district_rows =
        filter::areas_in_district(dataset, view.district, Some(&filter::ALL_COLUMNS))?;
    write_projected_csv(DISTRICT_CSV, &district_rows)?;
    write_csv(PIVOT_CSV, &pivot_rows(&view.pivot))?;
    write_json(MAP_JSON, &view.map_points)?;
    write_json(SUMMARY_JSON, summary)?;
    Ok(vec![
        FILTERED_CSV,
        DISTRICT_CSV,
        PIVOT_CSV,
        MAP_JSON,
        SUMMARY_JSON,
    ])
}
