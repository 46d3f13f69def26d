//! Coordinate to place-name resolution.
//!
//! [`PlaceLookup`] is total: every coordinate resolves to some label. The
//! bundled [`RegionTable`] is a static list of named bounding boxes, so
//! resolution never blocks and never fails.

/// Resolve a coordinate to a human-readable place name.
///
/// Implementations must be fast and must not fail; when nothing matches they
/// return a formatted fallback label instead.
pub trait PlaceLookup: Send + Sync {
    fn resolve(&self, latitude: f64, longitude: f64) -> String;
}

/// Fallback label for coordinates no region covers
pub fn fallback_label(latitude: f64, longitude: f64) -> String {
    format!("near ({:.4}, {:.4})", latitude, longitude)
}

/// A named latitude/longitude box, inclusive on every edge
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub name: String,
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Region {
    pub fn new(name: impl Into<String>, lat: (f64, f64), lon: (f64, f64)) -> Self {
        Self {
            name: name.into(),
            min_lat: lat.0,
            max_lat: lat.1,
            min_lon: lon.0,
            max_lon: lon.1,
        }
    }

    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&latitude)
            && (self.min_lon..=self.max_lon).contains(&longitude)
    }
}

/// Regions checked in insertion order; the first match wins.
///
/// Regions overlap (a city sits inside its country, which sits inside its
/// continent), so narrow regions must be added before the wide ones.
#[derive(Debug, Clone, Default)]
pub struct RegionTable {
    regions: Vec<Region>,
}

impl RegionTable {
    /// An empty table: everything resolves to the fallback label
    pub fn new() -> Self {
        Self { regions: Vec::new() }
    }

    /// Append a region with lower priority than every region already added
    pub fn with_region(mut self, name: impl Into<String>, lat: (f64, f64), lon: (f64, f64)) -> Self {
        self.regions.push(Region::new(name, lat, lon));
        self
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Built-in table: cities, then countries, then continents
    pub fn builtin() -> Self {
        Self::new()
            // Cities
            .with_region("Bratislava, Slovakia", (48.00, 48.26), (16.95, 17.25))
            .with_region("Vienna, Austria", (48.11, 48.33), (16.18, 16.58))
            .with_region("Budapest, Hungary", (47.35, 47.62), (18.92, 19.34))
            .with_region("Prague, Czech Republic", (49.94, 50.18), (14.22, 14.71))
            .with_region("Brno, Czech Republic", (49.11, 49.29), (16.43, 16.73))
            .with_region("Kosice, Slovakia", (48.63, 48.78), (21.13, 21.35))
            .with_region("Krakow, Poland", (49.97, 50.13), (19.79, 20.22))
            .with_region("Warsaw, Poland", (52.09, 52.37), (20.85, 21.27))
            .with_region("Berlin, Germany", (52.33, 52.68), (13.08, 13.77))
            .with_region("Munich, Germany", (48.06, 48.25), (11.36, 11.72))
            .with_region("Paris, France", (48.81, 48.91), (2.22, 2.47))
            .with_region("London, United Kingdom", (51.28, 51.70), (-0.51, 0.33))
            .with_region("New York, United States", (40.49, 40.92), (-74.26, -73.70))
            // Countries
            .with_region("Slovakia", (47.73, 49.61), (16.83, 22.57))
            .with_region("Czech Republic", (48.55, 51.06), (12.09, 18.86))
            .with_region("Austria", (46.37, 49.02), (9.53, 17.16))
            .with_region("Hungary", (45.74, 48.59), (16.11, 22.90))
            .with_region("Poland", (49.00, 54.84), (14.12, 24.15))
            .with_region("Germany", (47.27, 55.06), (5.87, 15.04))
            .with_region("France", (41.33, 51.12), (-5.14, 9.56))
            .with_region("United Kingdom", (49.96, 58.64), (-8.65, 1.76))
            .with_region("United States", (24.52, 49.38), (-124.77, -66.95))
            // Continents
            .with_region("Europe", (34.5, 71.2), (-25.0, 45.0))
            .with_region("Africa", (-35.0, 37.5), (-18.0, 52.0))
            .with_region("North America", (7.0, 83.0), (-170.0, -50.0))
            .with_region("South America", (-56.0, 13.0), (-82.0, -34.0))
            .with_region("Oceania", (-50.0, 0.0), (110.0, 180.0))
            .with_region("Asia", (-11.0, 81.0), (25.0, 180.0))
    }
}

impl PlaceLookup for RegionTable {
    fn resolve(&self, latitude: f64, longitude: f64) -> String {
        self.regions
            .iter()
            .find(|r| r.contains(latitude, longitude))
            .map(|r| r.name.clone())
            .unwrap_or_else(|| fallback_label(latitude, longitude))
    }
}
