//! Price-range and district filtering over the full dataset

use crate::ingest::parse_number;
use crate::listing::Listing;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

/// Filter criteria as entered in the filter controls.
///
/// The price range applies to base rent only; the administrative fee is not
/// part of the filtered price.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterCriteria {
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub district: Option<String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build criteria from raw control text. Unparseable prices are unset and
    /// an empty district means "all districts".
    pub fn from_inputs(min_price: &str, max_price: &str, district: &str) -> Self {
        let district = district.trim();
        Self {
            min_price: parse_number(min_price),
            max_price: parse_number(max_price),
            district: (!district.is_empty()).then(|| district.to_string()),
        }
    }

    pub fn with_price_range(mut self, min_price: Option<f64>, max_price: Option<f64>) -> Self {
        self.min_price = min_price;
        self.max_price = max_price;
        self
    }

    pub fn with_district(mut self, district: &str) -> Self {
        self.district = Some(district.to_string());
        self
    }

    /// Lower rent bound; 0 when unset.
    pub fn min_bound(&self) -> f64 {
        match self.min_price {
            Some(v) if !v.is_nan() => v,
            _ => 0.0,
        }
    }

    /// Upper rent bound; +∞ when unset. A zero maximum counts as unset.
    pub fn max_bound(&self) -> f64 {
        match self.max_price {
            Some(v) if !v.is_nan() && v != 0.0 => v,
            _ => f64::INFINITY,
        }
    }

    fn selected_district(&self) -> Option<&str> {
        self.district.as_deref().filter(|d| !d.is_empty())
    }

    pub fn matches(&self, listing: &Listing) -> bool {
        let price_match = listing.rent >= self.min_bound() && listing.rent <= self.max_bound();
        let district_match = match self.selected_district() {
            None => true,
            Some(selected) => listing.district() == Some(selected),
        };
        price_match && district_match
    }

    pub fn is_empty(&self) -> bool {
        self.min_price.is_none() && self.max_price.is_none() && self.selected_district().is_none()
    }
}

/// Project the full dataset through `criteria` into a fresh subset.
///
/// Always applied to the full dataset, never to an earlier result.
pub fn filter_listings(dataset: &[Listing], criteria: &FilterCriteria) -> Vec<Listing> {
    let subset: Vec<Listing> = dataset
        .iter()
        .filter(|l| criteria.matches(l))
        .cloned()
        .collect();
    debug!(
        "Filter {:?} kept {}/{} listings",
        criteria,
        subset.len(),
        dataset.len()
    );
    subset
}

/// Distinct non-empty districts, sorted, for the district selector.
pub fn districts(listings: &[Listing]) -> Vec<String> {
    listings
        .iter()
        .filter_map(|l| l.district())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

pub fn geo_eligible(listings: &[Listing]) -> Vec<Listing> {
    listings
        .iter()
        .filter(|l| l.is_geo_eligible())
        .cloned()
        .collect()
}

pub fn without_coordinates(listings: &[Listing]) -> Vec<Listing> {
    listings
        .iter()
        .filter(|l| !l.is_geo_eligible())
        .cloned()
        .collect()
}
