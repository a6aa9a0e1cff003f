//! Apartment-rental dashboard engine: loads a listing file, cleans it and
//! derives the map, statistics and best-value views from it.

pub mod color;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod geo;
pub mod ingest;
pub mod listing;
pub mod ranking;
pub mod stats;

pub use config::Config;
pub use dashboard::{Dashboard, DashboardPayload, Dataset};
pub use error::LoadError;
pub use filter::FilterCriteria;
pub use listing::{GeoPoint, Listing};
