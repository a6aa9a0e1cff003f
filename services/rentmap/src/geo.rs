//! Great-circle distances and distance rings around the reference point

use crate::listing::{GeoPoint, Listing};
use serde::Serialize;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometres.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Concentric distance bucket around the reference point. Upper edges are
/// inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Ring {
    UpTo1Km,
    From1To3Km,
    From3To5Km,
    Beyond5Km,
}

impl Ring {
    pub const ALL: [Ring; 4] = [
        Ring::UpTo1Km,
        Ring::From1To3Km,
        Ring::From3To5Km,
        Ring::Beyond5Km,
    ];

    pub fn for_distance(km: f64) -> Self {
        if km <= 1.0 {
            Ring::UpTo1Km
        } else if km <= 3.0 {
            Ring::From1To3Km
        } else if km <= 5.0 {
            Ring::From3To5Km
        } else {
            Ring::Beyond5Km
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Ring::UpTo1Km => "0-1 km",
            Ring::From1To3Km => "1-3 km",
            Ring::From3To5Km => "3-5 km",
            Ring::Beyond5Km => ">5 km",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RingCount {
    pub ring: Ring,
    pub label: &'static str,
    pub count: usize,
}

/// Distance from the reference point against base rent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistancePoint {
    pub distance_km: f64,
    pub rent: f64,
}

/// Distances of geo-eligible listings with rent, in input order.
pub fn distance_points(listings: &[Listing], center: GeoPoint) -> Vec<DistancePoint> {
    listings
        .iter()
        .filter(|l| l.has_rent())
        .filter_map(|l| {
            l.coords.map(|c| DistancePoint {
                distance_km: haversine_km(center, c),
                rent: l.rent,
            })
        })
        .collect()
}

/// Listing count per ring, every ring present in order.
pub fn ring_counts(listings: &[Listing], center: GeoPoint) -> Vec<RingCount> {
    let mut counts = [0usize; 4];
    for point in distance_points(listings, center) {
        let ring = Ring::for_distance(point.distance_km);
        if let Some(slot) = Ring::ALL.iter().position(|r| *r == ring) {
            counts[slot] += 1;
        }
    }
    Ring::ALL
        .iter()
        .zip(counts)
        .map(|(ring, count)| RingCount {
            ring: *ring,
            label: ring.label(),
            count,
        })
        .collect()
}
