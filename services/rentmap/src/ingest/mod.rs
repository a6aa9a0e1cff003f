//! Listing file → raw rows → typed listings → deduplicated dataset

pub mod dedup;
pub mod loader;
pub mod normalize;

pub use dedup::{deduplicate, DedupResult};
pub use loader::{read_rows, RawRow};
pub use normalize::{extract_area_from_title, normalize_batch, normalize_row, parse_number};
