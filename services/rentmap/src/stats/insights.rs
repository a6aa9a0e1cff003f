//! Dataset-wide summaries: headline figures, price segments, data coverage

use crate::config::StatsConfig;
use crate::listing::Listing;
use crate::stats::district::admin_fee_share;
use crate::stats::summary::{max, mean, median, min};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminFeeSummary {
    /// Fee share of total cost, ratio in [0, 1].
    pub share: f64,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub mean_per_area: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MarketSummary {
    pub total_listings: usize,
    pub mean_rent: Option<f64>,
    pub median_rent: Option<f64>,
    pub mean_area: Option<f64>,
    pub mean_rent_per_area: Option<f64>,
    pub mean_total_per_area: Option<f64>,
    pub admin_fee: Option<AdminFeeSummary>,
    /// Share of listings with rent, area and coordinates, ratio in [0, 1].
    pub data_quality: Option<f64>,
}

pub fn rents(listings: &[Listing]) -> Vec<f64> {
    listings.iter().filter(|l| l.has_rent()).map(|l| l.rent).collect()
}

pub fn areas(listings: &[Listing]) -> Vec<f64> {
    listings.iter().filter_map(|l| l.area).collect()
}

pub fn admin_fees(listings: &[Listing]) -> Vec<f64> {
    listings
        .iter()
        .filter(|l| l.has_admin_fee())
        .map(|l| l.admin_fee)
        .collect()
}

fn admin_fee_summary(listings: &[Listing]) -> Option<AdminFeeSummary> {
    let with_both: Vec<&Listing> = listings
        .iter()
        .filter(|l| l.has_rent() && l.has_admin_fee())
        .collect();
    let fees: Vec<f64> = with_both.iter().map(|l| l.admin_fee).collect();
    let per_area: Vec<f64> = with_both
        .iter()
        .filter_map(|l| l.area.map(|area| l.admin_fee / area))
        .collect();

    Some(AdminFeeSummary {
        share: admin_fee_share(with_both.iter().copied())?,
        mean: mean(&fees)?,
        median: median(&fees)?,
        min: min(&fees)?,
        max: max(&fees)?,
        mean_per_area: mean(&per_area),
    })
}

pub fn market_summary(listings: &[Listing]) -> MarketSummary {
    let rent_per_area: Vec<f64> = listings.iter().filter_map(|l| l.rent_per_area()).collect();
    let total_per_area: Vec<f64> = listings.iter().filter_map(|l| l.total_per_area()).collect();
    let complete = listings
        .iter()
        .filter(|l| l.has_rent() && l.area.is_some() && l.is_geo_eligible())
        .count();

    let rent_values = rents(listings);
    MarketSummary {
        total_listings: listings.len(),
        mean_rent: mean(&rent_values),
        median_rent: median(&rent_values),
        mean_area: mean(&areas(listings)),
        mean_rent_per_area: mean(&rent_per_area),
        mean_total_per_area: mean(&total_per_area),
        admin_fee: admin_fee_summary(listings),
        data_quality: (!listings.is_empty()).then(|| complete as f64 / listings.len() as f64),
    }
}

/// Listing counts per base-rent segment, over listings with rent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PriceSegments {
    pub budget: usize,
    pub mid_range: usize,
    pub premium: usize,
    pub luxury: usize,
}

pub fn price_segments(listings: &[Listing], bounds: &StatsConfig) -> PriceSegments {
    let mut segments = PriceSegments::default();
    for rent in rents(listings) {
        if rent <= bounds.budget_max {
            segments.budget += 1;
        } else if rent <= bounds.mid_range_max {
            segments.mid_range += 1;
        } else if rent <= bounds.premium_max {
            segments.premium += 1;
        } else {
            segments.luxury += 1;
        }
    }
    segments
}

/// Percentage of listings carrying each field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DataCoverage {
    pub rent_pct: f64,
    pub area_pct: f64,
    pub admin_fee_pct: f64,
    pub district_pct: f64,
    pub coordinates_pct: f64,
}

pub fn data_coverage(listings: &[Listing]) -> DataCoverage {
    if listings.is_empty() {
        return DataCoverage::default();
    }
    let pct = |predicate: fn(&Listing) -> bool| {
        listings.iter().filter(|l| predicate(l)).count() as f64 * 100.0 / listings.len() as f64
    };
    DataCoverage {
        rent_pct: pct(Listing::has_rent),
        area_pct: pct(|l| l.area.is_some()),
        admin_fee_pct: pct(Listing::has_admin_fee),
        district_pct: pct(|l| l.district.is_some()),
        coordinates_pct: pct(Listing::is_geo_eligible),
    }
}

/// Area-vs-rent scatter point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
}

/// Geographic bubble: position plus a rent-scaled radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BubblePoint {
    pub x: f64,
    pub y: f64,
    pub r: f64,
}

const MAX_BUBBLE_RADIUS: f64 = 20.0;

pub fn area_rent_points(listings: &[Listing]) -> Vec<ScatterPoint> {
    listings
        .iter()
        .filter(|l| l.has_rent())
        .filter_map(|l| l.area.map(|area| ScatterPoint { x: area, y: l.rent }))
        .collect()
}

/// Longitude on x, latitude on y; radius `min(rent / 100, 20)`.
pub fn geo_bubbles(listings: &[Listing]) -> Vec<BubblePoint> {
    listings
        .iter()
        .filter(|l| l.has_rent())
        .filter_map(|l| {
            l.coords.map(|c| BubblePoint {
                x: c.lon,
                y: c.lat,
                r: (l.rent / 100.0).min(MAX_BUBBLE_RADIUS),
            })
        })
        .collect()
}
