use std::f64::consts::PI;

/// Coefficient to translate from degrees to radians
pub const DEGREE_RAD: f64 = PI / 180.0;

/// Earth radius in metres
pub const EARTH_R: f64 = 6_371_000.0;

/// Equirectangular projection about a reference latitude/longitude
///
/// Cartesian coordinates are metres east (`x`) and north (`y`) of the
/// reference. Accurate enough for the city-scale extents trajectories cover.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Equirectangular {
    ref_lat: f64,
    ref_lon: f64,
    cos_ref_lat: f64,
}

impl Default for Equirectangular {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl Equirectangular {
    /// Creates a projection centred on `(ref_lat, ref_lon)` (degrees)
    pub fn new(ref_lat: f64, ref_lon: f64) -> Self {
        Self {
            ref_lat,
            ref_lon,
            cos_ref_lat: (ref_lat * DEGREE_RAD).cos(),
        }
    }

    /// Reference point as `[lat, lon]`
    pub fn reference(&self) -> [f64; 2] {
        [self.ref_lat, self.ref_lon]
    }

    /// Projects `(lat, lon)` in degrees to `[x, y]` in metres
    pub fn geographic_to_cartesian(&self, lat: f64, lon: f64) -> [f64; 2] {
        let x = EARTH_R * (lon - self.ref_lon) * DEGREE_RAD * self.cos_ref_lat;
        let y = EARTH_R * (lat - self.ref_lat) * DEGREE_RAD;
        [x, y]
    }

    /// Inverse of [`Self::geographic_to_cartesian`], returns `[lat, lon]`
    pub fn cartesian_to_geographic(&self, xy: [f64; 2]) -> [f64; 2] {
        let lat = self.ref_lat + xy[1] / EARTH_R / DEGREE_RAD;
        let lon = self.ref_lon + xy[0] / (EARTH_R * self.cos_ref_lat) / DEGREE_RAD;
        [lat, lon]
    }
}

/// Euclidean distance between two cartesian coordinates
pub fn distance_euclidean(a: &[f64; 2], b: &[f64; 2]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    (dx * dx + dy * dy).sqrt()
}
