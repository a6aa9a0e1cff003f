//! Per-district aggregation for the district table and charts

use crate::listing::Listing;
use crate::stats::summary::median;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

/// One row of the district table. Medians are `None` when the district has
/// no qualifying listings; `admin_fee_share` is a ratio in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistrictStats {
    pub district: String,
    pub count: usize,
    pub median_rent: Option<f64>,
    pub median_area: Option<f64>,
    pub median_rent_per_area: Option<f64>,
    pub median_total_per_area: Option<f64>,
    pub admin_fee_share: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistrictCount {
    pub district: String,
    pub count: usize,
    /// Percentage of all listings passed in, including those without a district.
    pub share_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistrictPrice {
    pub district: String,
    pub median_total_per_area: f64,
}

/// Partition by district in first-seen order, skipping listings without one.
pub fn group_by_district(listings: &[Listing]) -> Vec<(String, Vec<&Listing>)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<&Listing>)> = Vec::new();

    for listing in listings {
        let Some(district) = listing.district() else {
            continue;
        };
        let slot = *index.entry(district).or_insert_with(|| {
            groups.push((district.to_string(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(listing);
    }
    groups
}

/// Fee share over listings with both rent and fee:
/// `sum(fee) / sum(rent + fee)`.
pub fn admin_fee_share<'a>(listings: impl IntoIterator<Item = &'a Listing>) -> Option<f64> {
    let (fee_sum, total_sum, n) = listings
        .into_iter()
        .filter(|l| l.has_rent() && l.has_admin_fee())
        .fold((0.0, 0.0, 0usize), |(fee, total, n), l| {
            (fee + l.admin_fee, total + l.total_cost(), n + 1)
        });
    if n == 0 || total_sum <= 0.0 {
        return None;
    }
    Some(fee_sum / total_sum)
}

fn stats_for(district: String, members: &[&Listing]) -> DistrictStats {
    let rents: Vec<f64> = members.iter().filter(|l| l.has_rent()).map(|l| l.rent).collect();
    let areas: Vec<f64> = members.iter().filter_map(|l| l.area).collect();
    let rent_per_area: Vec<f64> = members.iter().filter_map(|l| l.rent_per_area()).collect();
    let total_per_area: Vec<f64> = members.iter().filter_map(|l| l.total_per_area()).collect();

    DistrictStats {
        district,
        count: members.len(),
        median_rent: median(&rents),
        median_area: median(&areas),
        median_rent_per_area: median(&rent_per_area),
        median_total_per_area: median(&total_per_area),
        admin_fee_share: admin_fee_share(members.iter().copied()),
    }
}

/// District table rows, ordered by descending listing count.
///
/// Ties keep first-seen order.
pub fn district_table(listings: &[Listing]) -> Vec<DistrictStats> {
    let mut table: Vec<DistrictStats> = group_by_district(listings)
        .into_iter()
        .map(|(district, members)| stats_for(district, &members))
        .collect();
    table.sort_by(|a, b| b.count.cmp(&a.count));
    table
}

/// The `top` districts by listing count with their share of `listings`.
pub fn district_counts(listings: &[Listing], top: usize) -> Vec<DistrictCount> {
    let total = listings.len();
    let mut counts: Vec<DistrictCount> = group_by_district(listings)
        .into_iter()
        .map(|(district, members)| DistrictCount {
            district,
            count: members.len(),
            share_pct: if total == 0 {
                0.0
            } else {
                members.len() as f64 * 100.0 / total as f64
            },
        })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(top);
    counts
}

/// The `top` districts by median total price per m², most expensive first.
/// Districts without any listing having both rent and area are left out.
pub fn district_prices(listings: &[Listing], top: usize) -> Vec<DistrictPrice> {
    let mut prices: Vec<DistrictPrice> = group_by_district(listings)
        .into_iter()
        .filter_map(|(district, members)| {
            let per_area: Vec<f64> = members.iter().filter_map(|l| l.total_per_area()).collect();
            median(&per_area).map(|m| DistrictPrice {
                district,
                median_total_per_area: m,
            })
        })
        .collect();
    prices.sort_by(|a, b| {
        b.median_total_per_area
            .partial_cmp(&a.median_total_per_area)
            .unwrap_or(Ordering::Equal)
    });
    prices.truncate(top);
    prices
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listings() -> Vec<Listing> {
        vec![
            Listing::new(Some("1"), 2000.0)
                .with_admin_fee(500.0)
                .with_area(50.0)
                .with_district("Krowodrza"),
            Listing::new(Some("2"), 3000.0)
                .with_area(60.0)
                .with_district("Stare Miasto"),
            Listing::new(Some("3"), 2400.0)
                .with_admin_fee(600.0)
                .with_area(40.0)
                .with_district("Krowodrza"),
            Listing::new(Some("4"), 0.0)
                .with_area(30.0)
                .with_district("Krowodrza"),
            Listing::new(Some("5"), 1800.0),
        ]
    }

    #[test]
    fn test_group_skips_missing_district() {
        let data = listings();
        let groups = group_by_district(&data);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "Krowodrza");
        assert_eq!(groups[0].1.len(), 3);
        assert_eq!(groups[1].0, "Stare Miasto");
    }

    #[test]
    fn test_district_table() {
        let table = district_table(&listings());
        assert_eq!(table.len(), 2);

        let krowodrza = &table[0];
        assert_eq!(krowodrza.district, "Krowodrza");
        assert_eq!(krowodrza.count, 3);
        assert_eq!(krowodrza.median_rent, Some(2200.0));
        assert_eq!(krowodrza.median_area, Some(40.0));
        // 2000/50 = 40, 2400/40 = 60
        assert_eq!(krowodrza.median_rent_per_area, Some(50.0));
        // 2500/50 = 50, 3000/40 = 75
        assert_eq!(krowodrza.median_total_per_area, Some(62.5));
        // (500 + 600) / (2500 + 3000)
        assert_eq!(krowodrza.admin_fee_share, Some(0.2));

        let stare = &table[1];
        assert_eq!(stare.count, 1);
        assert_eq!(stare.admin_fee_share, None);
    }

    #[test]
    fn test_admin_fee_share_bounds() {
        let share = admin_fee_share(&listings()).unwrap();
        assert!((0.0..=1.0).contains(&share));
        assert_eq!(admin_fee_share(&[Listing::new(None, 100.0)]), None);
    }

    #[test]
    fn test_district_counts_share() {
        let counts = district_counts(&listings(), 10);
        assert_eq!(counts[0].district, "Krowodrza");
        assert_eq!(counts[0].count, 3);
        assert!((counts[0].share_pct - 60.0).abs() < 1e-9);
        assert_eq!(district_counts(&listings(), 1).len(), 1);
        assert!(district_counts(&[], 10).is_empty());
    }

    #[test]
    fn test_district_prices_descending() {
        let prices = district_prices(&listings(), 10);
        assert_eq!(prices.len(), 2);
        assert_eq!(prices[0].district, "Krowodrza");
        assert_eq!(prices[0].median_total_per_area, 62.5);
        assert_eq!(prices[1].district, "Stare Miasto");
        assert_eq!(prices[1].median_total_per_area, 50.0);
    }
}
