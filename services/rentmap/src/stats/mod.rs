//! Aggregate statistics over listing sets

pub mod district;
pub mod histogram;
pub mod insights;
pub mod summary;

pub use district::{district_counts, district_prices, district_table, DistrictStats};
pub use histogram::{Histogram, HistogramBin};
pub use insights::{data_coverage, market_summary, price_segments, MarketSummary};
pub use summary::{mean, median, percentile, quartiles, Quartiles};
