/// Axis-aligned geographic bounding box
///
/// Corners are stored as `[lat, lon]` pairs:
/// - `min` is the bottom-left corner
/// - `max` is the top-right corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl Region {
    /// Creates a region from its latitude and longitude extents
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        Region {
            min: [min_lat, min_lon],
            max: [max_lat, max_lon],
        }
    }

    pub fn min_lat(&self) -> f64 {
        self.min[0]
    }

    pub fn max_lat(&self) -> f64 {
        self.max[0]
    }

    pub fn min_lon(&self) -> f64 {
        self.min[1]
    }

    pub fn max_lon(&self) -> f64 {
        self.max[1]
    }

    /// Checks if `(lat, lon)` lies inside this region, edges included
    pub fn contains_point(&self, lat: f64, lon: f64) -> bool {
        let pt = [lat, lon];
        greater_eq(&pt, &self.min) && less_eq(&pt, &self.max)
    }

    /// Checks if `other` lies completely inside this region
    ///
    /// Reflexive, so it doubles as region equality for grid cells.
    pub fn contains(&self, other: &Region) -> bool {
        inside(&other.min, &other.max, &self.min, &self.max)
    }

    /// Grows this region so it also covers `(lat, lon)`
    pub fn extend(&mut self, lat: f64, lon: f64) {
        self.min[0] = self.min[0].min(lat);
        self.min[1] = self.min[1].min(lon);
        self.max[0] = self.max[0].max(lat);
        self.max[1] = self.max[1].max(lon);
    }

    /// Centre of the region as `[lat, lon]`
    pub fn center(&self) -> [f64; 2] {
        [
            (self.min[0] + self.max[0]) / 2.0,
            (self.min[1] + self.max[1]) / 2.0,
        ]
    }
}

/// a <= b on both axes
fn less_eq(a: &[f64; 2], b: &[f64; 2]) -> bool {
    a[0] <= b[0] && a[1] <= b[1]
}

/// a >= b on both axes
fn greater_eq(a: &[f64; 2], b: &[f64; 2]) -> bool {
    a[0] >= b[0] && a[1] >= b[1]
}

/// Checks if (innerMin, innerMax) rectangle is inside (outerMin, outerMax) rectangle
fn inside(
    inner_min: &[f64; 2],
    inner_max: &[f64; 2],
    outer_min: &[f64; 2],
    outer_max: &[f64; 2],
) -> bool {
    greater_eq(inner_min, outer_min) && less_eq(inner_max, outer_max)
}
