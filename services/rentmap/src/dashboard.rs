//! Dataset lifecycle and the render-ready views handed to the presentation layer

use crate::color::{PriceColorScale, Rgb};
use crate::config::{Config, ColumnsConfig};
use crate::error::LoadError;
use crate::filter::{self, FilterCriteria};
use crate::geo::{self, DistancePoint, RingCount};
use crate::ingest::{self, extract_area_from_title, RawRow};
use crate::listing::{GeoPoint, Listing};
use crate::ranking::{self, RankedListing};
use crate::stats::district::{DistrictCount, DistrictPrice};
use crate::stats::insights::{
    self, area_rent_points, geo_bubbles, BubblePoint, DataCoverage, PriceSegments, ScatterPoint,
};
use crate::stats::{
    district_counts, district_prices, district_table, quartiles, DistrictStats, Histogram,
    MarketSummary, Quartiles,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Immutable snapshot of one successful load.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub source: PathBuf,
    /// Normalized, deduplicated, in file order.
    pub listings: Vec<Listing>,
    pub raw_rows: usize,
    pub duplicates: usize,
    pub loaded_at: DateTime<Utc>,
}

impl Dataset {
    pub fn from_rows(source: &Path, rows: &[RawRow], columns: &ColumnsConfig) -> Self {
        let deduped = ingest::deduplicate(ingest::normalize_batch(rows, columns));
        Self {
            source: source.to_path_buf(),
            listings: deduped.retained,
            raw_rows: rows.len(),
            duplicates: deduped.duplicates,
            loaded_at: Utc::now(),
        }
    }

    pub fn load(path: &Path, columns: &ColumnsConfig) -> Result<Self, LoadError> {
        let rows = ingest::read_rows(path, columns)?;
        let dataset = Self::from_rows(path, &rows, columns);
        info!(
            "Loaded {} listings from {:?} ({} rows, {} duplicates, {} without coordinates)",
            dataset.listings.len(),
            path,
            dataset.raw_rows,
            dataset.duplicates,
            dataset.without_coordinates_count()
        );
        Ok(dataset)
    }

    pub fn without_coordinates_count(&self) -> usize {
        self.listings.iter().filter(|l| !l.is_geo_eligible()).count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingDetails {
    pub title: Option<String>,
    pub street: Option<String>,
    pub district: Option<String>,
    pub area: Option<f64>,
    pub rent: f64,
    pub admin_fee: Option<f64>,
    pub total_cost: f64,
    pub url: Option<String>,
}

impl ListingDetails {
    fn of(listing: &Listing) -> Self {
        Self {
            title: listing.title.clone(),
            street: listing.street.clone(),
            district: listing.district.clone(),
            area: listing.area,
            rent: listing.rent,
            admin_fee: listing.has_admin_fee().then_some(listing.admin_fee),
            total_cost: listing.total_cost(),
            url: listing.url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub id: Option<String>,
    pub position: GeoPoint,
    pub color: Rgb,
    pub popup: String,
    pub details: ListingDetails,
}

/// Area shown on the map: the area column, else whatever the title states.
pub fn display_area(listing: &Listing) -> Option<f64> {
    listing
        .area
        .or_else(|| listing.title.as_deref().and_then(extract_area_from_title))
}

/// `"<total> PLN/mies."`, followed by `" | <area>m²"` when an area is known.
pub fn popup_text(listing: &Listing) -> String {
    let mut text = format!("{} PLN/mies.", listing.total_cost());
    if let Some(area) = display_area(listing) {
        text.push_str(&format!(" | {}m²", area));
    }
    text
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MapView {
    pub criteria: FilterCriteria,
    /// Filtered listings, with or without coordinates.
    pub count: usize,
    pub districts: Vec<String>,
    pub markers: Vec<Marker>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatisticsView {
    pub summary: MarketSummary,
    pub rent_histogram: Option<Histogram>,
    pub fee_histogram: Option<Histogram>,
    pub area_histogram: Option<Histogram>,
    pub rent_quartiles: Option<Quartiles>,
    pub districts: Vec<DistrictStats>,
    pub district_counts: Vec<DistrictCount>,
    pub district_prices: Vec<DistrictPrice>,
    pub area_rent: Vec<ScatterPoint>,
    pub geo_bubbles: Vec<BubblePoint>,
    pub distances: Vec<DistancePoint>,
    pub rings: Vec<RingCount>,
    pub segments: PriceSegments,
    pub best_deals: Vec<RankedListing>,
    pub coverage: DataCoverage,
}

impl StatisticsView {
    pub fn build(listings: &[Listing], config: &Config) -> Self {
        let stats = &config.stats;
        let center = GeoPoint::new(config.geo.center_lat, config.geo.center_lon);
        let rents = insights::rents(listings);

        Self {
            summary: insights::market_summary(listings),
            rent_histogram: Histogram::build(&rents, stats.rent_bins),
            fee_histogram: Histogram::build(&insights::admin_fees(listings), stats.fee_bins),
            area_histogram: Histogram::build_with_unit(
                &insights::areas(listings),
                stats.area_bins,
                " m²",
            ),
            rent_quartiles: quartiles(&rents),
            districts: district_table(listings),
            district_counts: district_counts(listings, stats.top_districts),
            district_prices: district_prices(listings, stats.top_districts),
            area_rent: area_rent_points(listings),
            geo_bubbles: geo_bubbles(listings),
            distances: geo::distance_points(listings, center),
            rings: geo::ring_counts(listings, center),
            segments: insights::price_segments(listings, stats),
            best_deals: ranking::top_deals(listings, stats.top_deals),
            coverage: insights::data_coverage(listings),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnlocatedListing {
    pub id: Option<String>,
    pub title: Option<String>,
    /// `None` when the listing carries no price at all.
    pub total_cost: Option<f64>,
    pub admin_fee: Option<f64>,
    pub district: Option<String>,
    pub street: Option<String>,
    pub area: Option<f64>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WithoutCoordinatesView {
    pub total_listings: usize,
    pub listings: Vec<UnlocatedListing>,
}

impl WithoutCoordinatesView {
    pub fn build(listings: &[Listing]) -> Self {
        let unlocated = filter::without_coordinates(listings)
            .into_iter()
            .map(|l| UnlocatedListing {
                total_cost: (l.total_cost() > 0.0).then(|| l.total_cost()),
                admin_fee: l.has_admin_fee().then_some(l.admin_fee),
                id: l.id,
                title: l.title,
                district: l.district,
                street: l.street,
                area: l.area,
                url: l.url,
            })
            .collect();
        Self {
            total_listings: listings.len(),
            listings: unlocated,
        }
    }
}

/// Everything the presentation layer renders for one state of the controls.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardPayload {
    pub error: Option<String>,
    pub loaded_at: Option<DateTime<Utc>>,
    pub map: MapView,
    pub statistics: StatisticsView,
    pub without_coordinates: WithoutCoordinatesView,
}

impl DashboardPayload {
    /// Empty payload carrying a load failure message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Owns the current dataset. Views are computed fresh on every call and never
/// alias the dataset, so earlier results stay valid across reloads.
pub struct Dashboard {
    config: Config,
    dataset: Arc<Dataset>,
}

impl Dashboard {
    pub fn load(config: Config) -> Result<Self, LoadError> {
        let dataset = Dataset::load(Path::new(&config.data_path), &config.columns)?;
        Ok(Self::from_dataset(config, dataset))
    }

    pub fn from_dataset(config: Config, dataset: Dataset) -> Self {
        Self {
            config,
            dataset: Arc::new(dataset),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn dataset(&self) -> Arc<Dataset> {
        Arc::clone(&self.dataset)
    }

    /// Replace the dataset with a fresh load of `path`. On failure the current
    /// dataset stays in place.
    pub fn reload<P: AsRef<Path>>(&mut self, path: P) -> Result<(), LoadError> {
        let path = path.as_ref();
        match Dataset::load(path, &self.config.columns) {
            Ok(dataset) => {
                self.dataset = Arc::new(dataset);
                self.config.data_path = path.to_string_lossy().into_owned();
                Ok(())
            }
            Err(e) => {
                warn!("Reload of {:?} failed, keeping previous dataset: {}", path, e);
                Err(e)
            }
        }
    }

    pub fn map_view(&self, criteria: &FilterCriteria) -> MapView {
        let filtered = filter::filter_listings(&self.dataset.listings, criteria);
        let distribution: Vec<f64> = filtered
            .iter()
            .map(Listing::total_cost)
            .filter(|c| *c > 0.0)
            .collect();
        let scale = PriceColorScale::new(&distribution, self.config.color.gradient_ceiling);

        let markers = filtered
            .iter()
            .filter_map(|l| {
                l.coords.map(|position| Marker {
                    id: l.id.clone(),
                    position,
                    color: scale.color_for(l.total_cost()),
                    popup: popup_text(l),
                    details: ListingDetails::of(l),
                })
            })
            .collect();

        MapView {
            criteria: criteria.clone(),
            count: filtered.len(),
            districts: filter::districts(&self.dataset.listings),
            markers,
        }
    }

    /// Statistics over the listings that have coordinates.
    pub fn statistics_view(&self) -> StatisticsView {
        StatisticsView::build(&filter::geo_eligible(&self.dataset.listings), &self.config)
    }

    pub fn without_coordinates_view(&self) -> WithoutCoordinatesView {
        WithoutCoordinatesView::build(&self.dataset.listings)
    }

    pub fn best_deals(&self) -> Vec<RankedListing> {
        ranking::top_deals(
            &filter::geo_eligible(&self.dataset.listings),
            self.config.stats.top_deals,
        )
    }

    pub fn payload(&self, criteria: &FilterCriteria) -> DashboardPayload {
        DashboardPayload {
            error: None,
            loaded_at: Some(self.dataset.loaded_at),
            map: self.map_view(criteria),
            statistics: self.statistics_view(),
            without_coordinates: self.without_coordinates_view(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{BURGUNDY, GREEN, RED};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "id,title,ulica,dzielnica,lat,lon,najem_pln,czynsz_adm_pln,metraz_m2,url\n";

    fn write_csv(body: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(HEADER.as_bytes()).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn rows() -> Vec<RawRow> {
        vec![
            RawRow::from_pairs([
                ("id", "a"),
                ("title", "Kawalerka 28 m²"),
                ("dzielnica", "Krowodrza"),
                ("lat", "50.07"),
                ("lon", "19.92"),
                ("najem_pln", "1000"),
            ]),
            RawRow::from_pairs([
                ("id", "b"),
                ("dzielnica", "Podgórze"),
                ("lat", "50.04"),
                ("lon", "19.96"),
                ("najem_pln", "2500"),
                ("czynsz_adm_pln", "500"),
                ("metraz_m2", "50"),
            ]),
            RawRow::from_pairs([
                ("id", "c"),
                ("dzielnica", "Stare Miasto"),
                ("lat", "50.06"),
                ("lon", "19.94"),
                ("najem_pln", "4000"),
                ("czynsz_adm_pln", "1000"),
                ("metraz_m2", "80"),
            ]),
            RawRow::from_pairs([("id", "a"), ("najem_pln", "999")]),
            RawRow::from_pairs([
                ("id", "d"),
                ("title", "Bez mapy"),
                ("dzielnica", "Krowodrza"),
                ("najem_pln", "1800"),
                ("czynsz_adm_pln", "200"),
            ]),
        ]
    }

    fn dashboard() -> Dashboard {
        let config = Config::default();
        let dataset = Dataset::from_rows(Path::new("mem.csv"), &rows(), &config.columns);
        Dashboard::from_dataset(config, dataset)
    }

    #[test]
    fn test_dataset_from_rows() {
        let dataset = dashboard().dataset();
        assert_eq!(dataset.raw_rows, 5);
        assert_eq!(dataset.duplicates, 1);
        assert_eq!(dataset.listings.len(), 4);
        assert_eq!(dataset.listings[0].rent, 1000.0);
        assert_eq!(dataset.without_coordinates_count(), 1);
    }

    #[test]
    fn test_map_view_unfiltered() {
        let view = dashboard().map_view(&FilterCriteria::new());
        assert_eq!(view.count, 4);
        assert_eq!(view.markers.len(), 3);
        assert_eq!(view.districts, vec!["Krowodrza", "Podgórze", "Stare Miasto"]);

        // totals 1000, 3000, 5000 and 2000 for the unmapped one
        assert_eq!(view.markers[0].color, GREEN);
        assert_eq!(view.markers[2].color, RED);
        assert_eq!(view.markers[1].details.total_cost, 3000.0);
    }

    #[test]
    fn test_map_view_filters_on_rent() {
        let criteria = FilterCriteria::new().with_price_range(Some(1500.0), Some(3000.0));
        let view = dashboard().map_view(&criteria);
        // b (2500) and d (1800); d has no coordinates
        assert_eq!(view.count, 2);
        assert_eq!(view.markers.len(), 1);
        assert_eq!(view.markers[0].id.as_deref(), Some("b"));
        // districts always come from the full dataset
        assert_eq!(view.districts.len(), 3);
    }

    #[test]
    fn test_marker_above_ceiling_is_burgundy() {
        let mut rows = rows();
        rows.push(RawRow::from_pairs([
            ("id", "e"),
            ("lat", "50.05"),
            ("lon", "19.93"),
            ("najem_pln", "7000"),
        ]));
        let config = Config::default();
        let dataset = Dataset::from_rows(Path::new("mem.csv"), &rows, &config.columns);
        let view = Dashboard::from_dataset(config, dataset).map_view(&FilterCriteria::new());
        let marker = view.markers.iter().find(|m| m.id.as_deref() == Some("e")).unwrap();
        assert_eq!(marker.color, BURGUNDY);
    }

    #[test]
    fn test_popup_text() {
        let view = dashboard().map_view(&FilterCriteria::new());
        // area falls back to the title
        assert_eq!(view.markers[0].popup, "1000 PLN/mies. | 28m²");
        assert_eq!(view.markers[1].popup, "3000 PLN/mies. | 50m²");
        assert_eq!(popup_text(&Listing::new(None, 1500.5)), "1500.5 PLN/mies.");
    }

    #[test]
    fn test_statistics_view_uses_mapped_listings() {
        let stats = dashboard().statistics_view();
        assert_eq!(stats.summary.total_listings, 3);
        assert_eq!(stats.summary.median_rent, Some(2500.0));
        assert_eq!(stats.rent_histogram.as_ref().map(|h| h.total()), Some(3));
        assert_eq!(stats.rent_histogram.as_ref().map(|h| h.bins.len()), Some(20));
        assert_eq!(stats.fee_histogram.as_ref().map(|h| h.bins.len()), Some(15));
        assert_eq!(stats.rings.iter().map(|r| r.count).sum::<usize>(), 3);
        assert_eq!(stats.districts.len(), 3);
        // a has no area, so only b and c rank; b is 60/m², c is 62.5/m²
        assert_eq!(stats.best_deals.len(), 2);
        assert_eq!(stats.best_deals[0].listing.id.as_deref(), Some("b"));
        assert_eq!(stats.coverage.coordinates_pct, 100.0);
    }

    #[test]
    fn test_without_coordinates_view() {
        let view = dashboard().without_coordinates_view();
        assert_eq!(view.total_listings, 4);
        assert_eq!(view.listings.len(), 1);
        assert_eq!(view.listings[0].id.as_deref(), Some("d"));
        assert_eq!(view.listings[0].total_cost, Some(2000.0));
        assert_eq!(view.listings[0].admin_fee, Some(200.0));
    }

    #[test]
    fn test_failed_payload_is_empty() {
        let payload = DashboardPayload::failed("Error loading data. Check if the CSV file exists.");
        assert!(payload.is_failed());
        assert_eq!(payload.map.count, 0);
        assert!(payload.map.markers.is_empty());
        assert_eq!(payload.statistics.summary.total_listings, 0);
        assert!(payload.statistics.rent_histogram.is_none());
        assert!(payload.without_coordinates.listings.is_empty());

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json["error"],
            "Error loading data. Check if the CSV file exists."
        );
    }

    #[test]
    fn test_load_from_file() {
        let file = write_csv(
            "a,Flat A,Długa 1,Krowodrza,50.07,19.93,2500,400,45,http://x/a\n\
             b,Flat B,,Podgórze,,,3100 zł,,,http://x/b\n\
             a,Flat A again,,,,,9999,,,\n",
        );
        let config = Config {
            data_path: file.path().to_string_lossy().into_owned(),
            ..Config::default()
        };
        let dashboard = Dashboard::load(config).unwrap();
        let dataset = dashboard.dataset();
        assert_eq!(dataset.listings.len(), 2);
        assert_eq!(dataset.duplicates, 1);
        assert_eq!(dataset.listings[1].rent, 3100.0);

        let payload = dashboard.payload(&FilterCriteria::new());
        assert!(!payload.is_failed());
        assert_eq!(payload.map.markers.len(), 1);
        assert_eq!(payload.without_coordinates.listings.len(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let config = Config {
            data_path: "no/such/oferty.csv".to_string(),
            ..Config::default()
        };
        let err = Dashboard::load(config).err().unwrap();
        assert!(matches!(err, LoadError::NotFound(_)));
    }

    #[test]
    fn test_failed_reload_keeps_dataset() {
        let mut dashboard = dashboard();
        let before = dashboard.dataset();

        let result = dashboard.reload("no/such/oferty.csv");
        assert!(result.is_err());
        assert!(Arc::ptr_eq(&before, &dashboard.dataset()));
        assert_eq!(dashboard.map_view(&FilterCriteria::new()).count, 4);
    }

    #[test]
    fn test_reload_swaps_dataset() {
        let mut dashboard = dashboard();
        let before = dashboard.dataset();
        let earlier_view = dashboard.map_view(&FilterCriteria::new());

        let file = write_csv("z,Flat Z,,Nowa Huta,50.08,20.03,1900,,38,\n");
        dashboard.reload(file.path()).unwrap();

        assert_eq!(dashboard.dataset().listings.len(), 1);
        assert_eq!(dashboard.map_view(&FilterCriteria::new()).count, 1);
        // earlier snapshot and view are untouched
        assert_eq!(before.listings.len(), 4);
        assert_eq!(earlier_view.count, 4);
    }
}
