use crate::listing::Listing;
use serde::Serialize;
use std::cmp::Ordering;

/// Numerator of the value score; score = `VALUE_SCALE / price_per_area`.
pub const VALUE_SCALE: f64 = 1000.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedListing {
    pub listing: Listing,
    pub total_cost: f64,
    /// Total cost per m².
    pub price_per_area: f64,
    pub value_score: f64,
}

impl RankedListing {
    /// `None` unless the listing has rent, area and a district, and the
    /// resulting price per m² is finite and positive.
    pub fn score(listing: &Listing) -> Option<Self> {
        listing.district()?;
        let price_per_area = listing.total_per_area()?;
        if !price_per_area.is_finite() || price_per_area <= 0.0 {
            return None;
        }
        let value_score = VALUE_SCALE / price_per_area;
        if !value_score.is_finite() {
            return None;
        }
        Some(Self {
            listing: listing.clone(),
            total_cost: listing.total_cost(),
            price_per_area,
            value_score,
        })
    }
}

/// Best value first. `sort_by` is stable, so equal scores keep input order.
pub fn rank(listings: &[Listing]) -> Vec<RankedListing> {
    let mut ranked: Vec<RankedListing> = listings.iter().filter_map(RankedListing::score).collect();
    ranked.sort_by(|a, b| b.value_score.partial_cmp(&a.value_score).unwrap_or(Ordering::Equal));
    ranked
}

pub fn top_deals(listings: &[Listing], n: usize) -> Vec<RankedListing> {
    let mut ranked = rank(listings);
    ranked.truncate(n);
    ranked
}
