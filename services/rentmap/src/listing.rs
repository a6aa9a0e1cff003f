use serde::Serialize;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Both components present and finite.
    pub fn from_parts(lat: Option<f64>, lon: Option<f64>) -> Option<Self> {
        match (lat, lon) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => {
                Some(Self { lat, lon })
            }
            _ => None,
        }
    }
}

/// One rental offer after normalization.
///
/// Cost fields are never NaN and never negative; `area`, when present, is
/// strictly positive. Total cost is derived on demand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing {
    pub id: Option<String>,
    pub title: Option<String>,
    pub street: Option<String>,
    pub district: Option<String>,
    pub coords: Option<GeoPoint>,
    pub rent: f64,
    pub admin_fee: f64,
    pub area: Option<f64>,
    pub url: Option<String>,
}

impl Listing {
    pub fn new(id: Option<&str>, rent: f64) -> Self {
        Self {
            id: id.map(str::to_string),
            title: None,
            street: None,
            district: None,
            coords: None,
            rent,
            admin_fee: 0.0,
            area: None,
            url: None,
        }
    }

    pub fn with_admin_fee(mut self, admin_fee: f64) -> Self {
        self.admin_fee = admin_fee;
        self
    }

    pub fn with_area(mut self, area: f64) -> Self {
        self.area = Some(area);
        self
    }

    pub fn with_district(mut self, district: &str) -> Self {
        self.district = Some(district.to_string());
        self
    }

    pub fn with_coords(mut self, lat: f64, lon: f64) -> Self {
        self.coords = GeoPoint::from_parts(Some(lat), Some(lon));
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn total_cost(&self) -> f64 {
        self.rent + self.admin_fee
    }

    pub fn is_geo_eligible(&self) -> bool {
        self.coords
            .map(|c| c.lat.is_finite() && c.lon.is_finite())
            .unwrap_or(false)
    }

    pub fn has_rent(&self) -> bool {
        self.rent > 0.0
    }

    pub fn has_admin_fee(&self) -> bool {
        self.admin_fee > 0.0
    }

    /// Base rent per square metre, when both rent and area are known.
    pub fn rent_per_area(&self) -> Option<f64> {
        match self.area {
            Some(area) if self.has_rent() && area > 0.0 => Some(self.rent / area),
            _ => None,
        }
    }

    /// Total cost per square metre, under the same conditions as `rent_per_area`.
    pub fn total_per_area(&self) -> Option<f64> {
        match self.area {
            Some(area) if self.has_rent() && area > 0.0 => Some(self.total_cost() / area),
            _ => None,
        }
    }

    pub fn district(&self) -> Option<&str> {
        self.district.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_cost() {
        let listing = Listing::new(Some("a"), 2500.0).with_admin_fee(450.0);
        assert_eq!(listing.total_cost(), 2950.0);
    }

    #[test]
    fn test_geo_point_requires_both_parts() {
        assert!(GeoPoint::from_parts(Some(50.0), None).is_none());
        assert!(GeoPoint::from_parts(None, Some(19.9)).is_none());
        assert!(GeoPoint::from_parts(Some(f64::NAN), Some(19.9)).is_none());
        assert!(GeoPoint::from_parts(Some(50.0), Some(f64::INFINITY)).is_none());
        assert_eq!(
            GeoPoint::from_parts(Some(50.0), Some(19.9)),
            Some(GeoPoint::new(50.0, 19.9))
        );
    }

    #[test]
    fn test_geo_eligibility() {
        let listing = Listing::new(Some("a"), 1000.0);
        assert!(!listing.is_geo_eligible());
        assert!(listing.with_coords(50.06, 19.94).is_geo_eligible());
    }

    #[test]
    fn test_per_area_requires_rent_and_area() {
        let no_area = Listing::new(Some("a"), 2000.0);
        assert!(no_area.rent_per_area().is_none());

        let no_rent = Listing::new(Some("b"), 0.0).with_area(40.0);
        assert!(no_rent.total_per_area().is_none());

        let full = Listing::new(Some("c"), 2000.0)
            .with_admin_fee(400.0)
            .with_area(40.0);
        assert_eq!(full.rent_per_area(), Some(50.0));
        assert_eq!(full.total_per_area(), Some(60.0));
    }
}
