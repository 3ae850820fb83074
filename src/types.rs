use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tabled::Tabled;

pub const AMENITY_COUNT: usize = 8;

/// The exact cell value that marks an amenity as present in the source data.
/// Comparisons are case-sensitive; any other value reads as absent.
pub const AMENITY_PRESENT: &str = "Yes";

/// The eight amenity columns a rest area can offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AmenityKind {
    Restroom,
    Water,
    PicnicTable,
    Phone,
    Handicap,
    RvStation,
    Vending,
    PetArea,
}

impl AmenityKind {
    pub const ALL: [AmenityKind; AMENITY_COUNT] = [
        AmenityKind::Restroom,
        AmenityKind::Water,
        AmenityKind::PicnicTable,
        AmenityKind::Phone,
        AmenityKind::Handicap,
        AmenityKind::RvStation,
        AmenityKind::Vending,
        AmenityKind::PetArea,
    ];

    /// Label shown in menus, coverage rows, and table headers.
    pub fn label(&self) -> &'static str {
        match self {
            AmenityKind::Restroom => "Restroom",
            AmenityKind::Water => "Water",
            AmenityKind::PicnicTable => "Picnic Table",
            AmenityKind::Phone => "Phone",
            AmenityKind::Handicap => "Handicap Access",
            AmenityKind::RvStation => "RV Station",
            AmenityKind::Vending => "Vending Machines",
            AmenityKind::PetArea => "Pet Area",
        }
    }

    /// Column name in the source CSV.
    pub fn column(&self) -> &'static str {
        match self {
            AmenityKind::Restroom => "RESTROOM",
            AmenityKind::Water => "WATER",
            AmenityKind::PicnicTable => "PICNICTAB",
            AmenityKind::Phone => "PHONE",
            AmenityKind::Handicap => "HANDICAP",
            AmenityKind::RvStation => "RV_STATION",
            AmenityKind::Vending => "VENDING",
            AmenityKind::PetArea => "PET_AREA",
        }
    }
}

/// Traffic direction served by a rest area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Single-letter code used by the TRAFFICDIR column.
    pub fn code(&self) -> &'static str {
        match self {
            Direction::North => "N",
            Direction::South => "S",
            Direction::East => "E",
            Direction::West => "W",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Direction::North => "North",
            Direction::South => "South",
            Direction::East => "East",
            Direction::West => "West",
        }
    }

    /// Returns `None` for any code outside {N, S, E, W}. Rows carrying such
    /// codes stay in the dataset but land in no direction bucket.
    pub fn from_code(code: &str) -> Option<Direction> {
        match code {
            "N" => Some(Direction::North),
            "S" => Some(Direction::South),
            "E" => Some(Direction::East),
            "W" => Some(Direction::West),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(rename = "NAME")]
    pub name: Option<String>,
    #[serde(rename = "ADDRESS")]
    pub address: Option<String>,
    #[serde(rename = "CITY")]
    pub city: Option<String>,
    #[serde(rename = "COUNTY")]
    pub county: Option<String>,
    #[serde(rename = "DISTRICT")]
    pub district: Option<String>,
    #[serde(rename = "ROUTE")]
    pub route: Option<String>,
    #[serde(rename = "LATITUDE")]
    pub latitude: Option<String>,
    #[serde(rename = "LONGITUDE")]
    pub longitude: Option<String>,
    #[serde(rename = "RESTROOM")]
    pub restroom: Option<String>,
    #[serde(rename = "WATER")]
    pub water: Option<String>,
    #[serde(rename = "PICNICTAB")]
    pub picnictab: Option<String>,
    #[serde(rename = "PHONE")]
    pub phone: Option<String>,
    #[serde(rename = "HANDICAP")]
    pub handicap: Option<String>,
    #[serde(rename = "RV_STATION")]
    pub rv_station: Option<String>,
    #[serde(rename = "VENDING")]
    pub vending: Option<String>,
    #[serde(rename = "PET_AREA")]
    pub pet_area: Option<String>,
    #[serde(rename = "TRAFFICDIR")]
    pub traffic_dir: Option<String>,
}

impl RawRow {
    pub fn amenity(&self, kind: AmenityKind) -> Option<&str> {
        let cell = match kind {
            AmenityKind::Restroom => &self.restroom,
            AmenityKind::Water => &self.water,
            AmenityKind::PicnicTable => &self.picnictab,
            AmenityKind::Phone => &self.phone,
            AmenityKind::Handicap => &self.handicap,
            AmenityKind::RvStation => &self.rv_station,
            AmenityKind::Vending => &self.vending,
            AmenityKind::PetArea => &self.pet_area,
        };
        cell.as_deref()
    }
}

/// One rest area with every required field populated.
///
/// The amenity cells and the traffic direction keep the raw source encoding
/// (`"Yes"`/other, single-letter code); the facet filter depends on the
/// string form, and the typed readings live behind `has_amenity` and
/// `direction`.
#[derive(Debug, Clone, PartialEq)]
pub struct RestArea {
    pub name: String,
    pub address: String,
    pub city: String,
    pub county: String,
    pub district: u32,
    pub route: String,
    pub latitude: f64,
    pub longitude: f64,
    pub amenities: [String; AMENITY_COUNT],
    pub traffic_dir: String,
}

impl RestArea {
    pub fn amenity(&self, kind: AmenityKind) -> &str {
        &self.amenities[kind as usize]
    }

    pub fn has_amenity(&self, kind: AmenityKind) -> bool {
        self.amenity(kind) == AMENITY_PRESENT
    }

    pub fn direction(&self) -> Option<Direction> {
        Direction::from_code(&self.traffic_dir)
    }

    /// Display text for one projectable column.
    pub fn field(&self, field: AreaField) -> String {
        match field {
            AreaField::Name => self.name.clone(),
            AreaField::Address => self.address.clone(),
            AreaField::City => self.city.clone(),
            AreaField::County => self.county.clone(),
            AreaField::District => self.district.to_string(),
            AreaField::Route => self.route.clone(),
            AreaField::Latitude => self.latitude.to_string(),
            AreaField::Longitude => self.longitude.to_string(),
            AreaField::TrafficDir => self.traffic_dir.clone(),
        }
    }
}

/// Columns the district selector can project onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaField {
    Name,
    Address,
    City,
    County,
    District,
    Route,
    Latitude,
    Longitude,
    TrafficDir,
}

impl AreaField {
    pub fn header(&self) -> &'static str {
        match self {
            AreaField::Name => "NAME",
            AreaField::Address => "ADDRESS",
            AreaField::City => "CITY",
            AreaField::County => "COUNTY",
            AreaField::District => "DISTRICT",
            AreaField::Route => "ROUTE",
            AreaField::Latitude => "LATITUDE",
            AreaField::Longitude => "LONGITUDE",
            AreaField::TrafficDir => "TRAFFICDIR",
        }
    }
}

/// Categorical columns the aggregator can group by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    County,
    City,
    Route,
    District,
    Direction,
}

impl GroupKey {
    pub fn label(&self) -> &'static str {
        match self {
            GroupKey::County => "County",
            GroupKey::City => "City",
            GroupKey::Route => "Route",
            GroupKey::District => "District",
            GroupKey::Direction => "Direction",
        }
    }

    pub fn value_of(&self, area: &RestArea) -> String {
        match self {
            GroupKey::County => area.county.clone(),
            GroupKey::City => area.city.clone(),
            GroupKey::Route => area.route.clone(),
            GroupKey::District => area.district.to_string(),
            GroupKey::Direction => area.traffic_dir.clone(),
        }
    }
}

/// Which amenities a row must offer to pass the facet filter.
///
/// `true` requires the amenity to be present; `false` imposes no constraint.
/// The filter is a conjunction of positive constraints only; there is no
/// "must not have" mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetSelection {
    required: [bool; AMENITY_COUNT],
}

impl Default for FacetSelection {
    /// Every amenity required, mirroring the dashboard checkboxes which all
    /// default to on.
    fn default() -> Self {
        FacetSelection {
            required: [true; AMENITY_COUNT],
        }
    }
}

impl FacetSelection {
    /// No constraints at all; the filter passes every row.
    pub fn none() -> Self {
        FacetSelection {
            required: [false; AMENITY_COUNT],
        }
    }

    pub fn is_required(&self, kind: AmenityKind) -> bool {
        self.required[kind as usize]
    }

    pub fn set_required(&mut self, kind: AmenityKind, required: bool) {
        self.required[kind as usize] = required;
    }

    pub fn toggle(&mut self, kind: AmenityKind) {
        let i = kind as usize;
        self.required[i] = !self.required[i];
    }

    pub fn matches(&self, area: &RestArea) -> bool {
        AmenityKind::ALL
            .iter()
            .all(|kind| !self.is_required(*kind) || area.has_amenity(*kind))
    }
}

pub type CountsByKey = HashMap<String, usize>;

pub type PivotTable = HashMap<String, HashMap<AmenityKind, usize>>;

/// One row of the boolean-typed amenity view used for pivoting.
///
/// Produced by `reports::coerce_amenities`; wraps the original row untouched
/// and carries the decoded amenity flags alongside it. Exists only for
/// summation and never feeds back into facet-filter semantics.
#[derive(Debug, Clone)]
pub struct FlaggedArea {
    pub area: RestArea,
    pub flags: [bool; AMENITY_COUNT],
}

impl FlaggedArea {
    pub fn flag(&self, kind: AmenityKind) -> bool {
        self.flags[kind as usize]
    }
}

/// The four direction buckets, each holding `(name, direction)` pairs in
/// original dataset order. Rows with an unrecognized direction code land in
/// none of them.
#[derive(Debug, Clone, Default)]
pub struct DirectionPartition {
    pub north: Vec<(String, Direction)>,
    pub south: Vec<(String, Direction)>,
    pub east: Vec<(String, Direction)>,
    pub west: Vec<(String, Direction)>,
}

impl DirectionPartition {
    pub fn bucket(&self, dir: Direction) -> &[(String, Direction)] {
        match dir {
            Direction::North => &self.north,
            Direction::South => &self.south,
            Direction::East => &self.east,
            Direction::West => &self.west,
        }
    }

    pub fn total(&self) -> usize {
        Direction::ALL.iter().map(|d| self.bucket(*d).len()).sum()
    }
}

/// A column-projected slice of the dataset, ready for the rendering boundary.
#[derive(Debug, Clone)]
pub struct ProjectedTable {
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

impl ProjectedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Do-Have / Do-Not-Have split for one amenity over the full dataset.
#[derive(Debug, Clone, Serialize)]
pub struct AmenityCoverage {
    pub amenity: String,
    pub have: usize,
    pub not_have: usize,
    pub have_pct: f64,
}

#[derive(Debug, Clone, Serialize, Tabled)]
pub struct AreaListRow {
    #[serde(rename = "NAME")]
    #[tabled(rename = "NAME")]
    pub name: String,
    #[serde(rename = "ADDRESS")]
    #[tabled(rename = "ADDRESS")]
    pub address: String,
    #[serde(rename = "CITY")]
    #[tabled(rename = "CITY")]
    pub city: String,
    #[serde(rename = "COUNTY")]
    #[tabled(rename = "COUNTY")]
    pub county: String,
    #[serde(rename = "DISTRICT")]
    #[tabled(rename = "DISTRICT")]
    pub district: u32,
    #[serde(rename = "ROUTE")]
    #[tabled(rename = "ROUTE")]
    pub route: String,
    #[serde(rename = "TRAFFICDIR")]
    #[tabled(rename = "TRAFFICDIR")]
    pub traffic_dir: String,
}

impl From<&RestArea> for AreaListRow {
    fn from(area: &RestArea) -> Self {
        AreaListRow {
            name: area.name.clone(),
            address: area.address.clone(),
            city: area.city.clone(),
            county: area.county.clone(),
            district: area.district,
            route: area.route.clone(),
            traffic_dir: area.traffic_dir.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Tabled)]
pub struct PivotExportRow {
    #[serde(rename = "CITY")]
    #[tabled(rename = "CITY")]
    pub city: String,
    #[serde(rename = "RESTROOM")]
    #[tabled(rename = "RESTROOM")]
    pub restroom: usize,
    #[serde(rename = "WATER")]
    #[tabled(rename = "WATER")]
    pub water: usize,
    #[serde(rename = "PICNICTAB")]
    #[tabled(rename = "PICNICTAB")]
    pub picnictab: usize,
    #[serde(rename = "PHONE")]
    #[tabled(rename = "PHONE")]
    pub phone: usize,
    #[serde(rename = "HANDICAP")]
    #[tabled(rename = "HANDICAP")]
    pub handicap: usize,
    #[serde(rename = "RV_STATION")]
    #[tabled(rename = "RV_STATION")]
    pub rv_station: usize,
    #[serde(rename = "VENDING")]
    #[tabled(rename = "VENDING")]
    pub vending: usize,
    #[serde(rename = "PET_AREA")]
    #[tabled(rename = "PET_AREA")]
    pub pet_area: usize,
}

#[derive(Debug, Clone, Tabled)]
pub struct CoverageRow {
    #[tabled(rename = "Amenity")]
    pub amenity: String,
    #[tabled(rename = "Do Have")]
    pub do_have: usize,
    #[tabled(rename = "Do Not Have")]
    pub do_not_have: usize,
    #[tabled(rename = "Coverage")]
    pub coverage: String,
}

#[derive(Debug, Serialize)]
pub struct SummaryStats {
    pub total_rest_areas: usize,
    pub total_counties: usize,
    pub total_cities: usize,
    pub total_districts: usize,
    pub total_routes: usize,
    pub amenity_coverage: Vec<AmenityCoverage>,
    pub generated_at: String,
}

/// Everything one dashboard render needs, derived in a single pass.
///
/// `filtered` is the full facet-filtered view (it drives the map points, the
/// county counts, and the CSV export); `listed` is its row-limited head shown
/// in the list section. The remaining views always read the full dataset;
/// the facet selection does not narrow them.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub filtered: Vec<RestArea>,
    pub listed: Vec<RestArea>,
    pub county_counts: CountsByKey,
    pub map_points: Vec<(f64, f64)>,
    pub district: u32,
    pub district_table: ProjectedTable,
    pub city_counts: CountsByKey,
    pub pivot: PivotTable,
    pub route_counts: CountsByKey,
    pub coverage: Vec<AmenityCoverage>,
    pub directions: DirectionPartition,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(name: &str, restroom: &str, water: &str) -> RestArea {
        RestArea {
            name: name.to_string(),
            address: "100 Test Rd".to_string(),
            city: "Testville".to_string(),
            county: "Test County".to_string(),
            district: 1,
            route: "5".to_string(),
            latitude: 36.0,
            longitude: -120.0,
            amenities: [
                restroom.to_string(),
                water.to_string(),
                "Yes".to_string(),
                "Yes".to_string(),
                "Yes".to_string(),
                "Yes".to_string(),
                "Yes".to_string(),
                "Yes".to_string(),
            ],
            traffic_dir: "N".to_string(),
        }
    }

    #[test]
    fn amenity_reading_is_exact_and_case_sensitive() {
        let a = area("A", "Yes", "yes");
        assert!(a.has_amenity(AmenityKind::Restroom));
        assert!(!a.has_amenity(AmenityKind::Water));

        let b = area("B", "No", "");
        assert!(!b.has_amenity(AmenityKind::Restroom));
        assert!(!b.has_amenity(AmenityKind::Water));
    }

    #[test]
    fn direction_codes_parse_only_the_four_known_letters() {
        assert_eq!(Direction::from_code("N"), Some(Direction::North));
        assert_eq!(Direction::from_code("S"), Some(Direction::South));
        assert_eq!(Direction::from_code("E"), Some(Direction::East));
        assert_eq!(Direction::from_code("W"), Some(Direction::West));
        assert_eq!(Direction::from_code("B"), None);
        assert_eq!(Direction::from_code("n"), None);
        assert_eq!(Direction::from_code(""), None);
    }

    #[test]
    fn default_selection_requires_everything() {
        let selection = FacetSelection::default();
        for kind in AmenityKind::ALL {
            assert!(selection.is_required(kind));
        }

        let none = FacetSelection::none();
        for kind in AmenityKind::ALL {
            assert!(!none.is_required(kind));
        }
    }

    #[test]
    fn selection_matches_is_a_conjunction_of_required_flags() {
        let mut selection = FacetSelection::none();
        selection.set_required(AmenityKind::Restroom, true);

        let with_restroom = area("A", "Yes", "No");
        let without_restroom = area("B", "No", "Yes");
        assert!(selection.matches(&with_restroom));
        assert!(!selection.matches(&without_restroom));

        // Adding a second requirement narrows the match.
        selection.set_required(AmenityKind::Water, true);
        assert!(!selection.matches(&with_restroom));
    }

    #[test]
    fn toggle_flips_a_single_facet() {
        let mut selection = FacetSelection::default();
        selection.toggle(AmenityKind::Vending);
        assert!(!selection.is_required(AmenityKind::Vending));
        assert!(selection.is_required(AmenityKind::PetArea));
        selection.toggle(AmenityKind::Vending);
        assert!(selection.is_required(AmenityKind::Vending));
    }

    #[test]
    fn group_key_renders_numeric_and_string_columns() {
        let a = area("A", "Yes", "Yes");
        assert_eq!(GroupKey::County.value_of(&a), "Test County");
        assert_eq!(GroupKey::District.value_of(&a), "1");
        assert_eq!(GroupKey::Direction.value_of(&a), "N");
    }
}
