/// Geographic position in degrees, longitude first (GeoJSON order).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LonLat {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl LonLat {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }

    pub fn lon_rad(self) -> f64 {
        self.lon_deg.to_radians()
    }

    pub fn lat_rad(self) -> f64 {
        self.lat_deg.to_radians()
    }

    pub fn is_finite(self) -> bool {
        self.lon_deg.is_finite() && self.lat_deg.is_finite()
    }
}
