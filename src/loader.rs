use crate::error::DashboardError;
use crate::types::{AmenityKind, RawRow, RestArea, AMENITY_COUNT};
use crate::util::{non_blank, parse_f64_safe, parse_u32_safe};
use csv::ReaderBuilder;
use std::io::Read;

#[derive(Debug, Clone)]
pub struct LoadReport {
    pub total_rows: usize,
    pub kept_rows: usize,
    pub dropped_rows: usize,
}

/// Load the rest area CSV and run the one-time cleaning pass.
///
/// A row survives only if every required field is usable: the identifying
/// columns, a parseable district number, a parseable coordinate pair, all
/// eight amenity cells, and the traffic direction code. Anything less and
/// the row is dropped (counted in the report, not an error). The pass is
/// irreversible and happens before any filter touches the data.
///
/// A file that cleans down to zero rows is a failed load; the dashboard
/// never renders over a partial dataset.
pub fn load_and_clean(path: &str) -> Result<(Vec<RestArea>, LoadReport), DashboardError> {
    let rdr = ReaderBuilder::new().flexible(true).from_path(path)?;
    let (data, report) = clean(rdr);
    log::debug!(
        "cleaned {}: kept {} of {} rows",
        path,
        report.kept_rows,
        report.total_rows
    );
    if report.dropped_rows > 0 {
        log::warn!(
            "{} rows in {} had missing or invalid fields",
            report.dropped_rows,
            path
        );
    }
    if data.is_empty() {
        return Err(DashboardError::EmptyDataset {
            path: path.to_string(),
            dropped: report.dropped_rows,
        });
    }
    Ok((data, report))
}

fn clean<R: Read>(mut rdr: csv::Reader<R>) -> (Vec<RestArea>, LoadReport) {
    let mut total_rows = 0usize;
    let mut dropped_rows = 0usize;
    let mut data: Vec<RestArea> = Vec::new();

    for result in rdr.deserialize::<RawRow>() {
        total_rows += 1;
        let raw = match result {
            Ok(r) => r,
            Err(_) => {
                dropped_rows += 1;
                continue;
            }
        };
        match clean_row(&raw) {
            Some(area) => data.push(area),
            None => dropped_rows += 1,
        }
    }

    let report = LoadReport {
        total_rows,
        kept_rows: data.len(),
        dropped_rows,
    };
    (data, report)
}

fn clean_row(raw: &RawRow) -> Option<RestArea> {
    let name = non_blank(raw.name.as_deref())?;
    let address = non_blank(raw.address.as_deref())?;
    let city = non_blank(raw.city.as_deref())?;
    let county = non_blank(raw.county.as_deref())?;
    let district = parse_u32_safe(raw.district.as_deref())?;
    let route = non_blank(raw.route.as_deref())?;
    let latitude = parse_f64_safe(raw.latitude.as_deref())?;
    let longitude = parse_f64_safe(raw.longitude.as_deref())?;
    let traffic_dir = non_blank(raw.traffic_dir.as_deref())?;

    // Amenity cells keep their source encoding; only presence is required
    // here. The "Yes"/other reading happens at filter and pivot time.
    let mut amenities: [String; AMENITY_COUNT] = Default::default();
    for kind in AmenityKind::ALL {
        amenities[kind as usize] = non_blank(raw.amenity(kind))?;
    }

    Some(RestArea {
        name,
        address,
        city,
        county,
        district,
        route,
        latitude,
        longitude,
        amenities,
        traffic_dir,
    })
}
