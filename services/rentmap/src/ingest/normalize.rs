//! Typed listings from raw rows, with per-field default coercion

use crate::config::ColumnsConfig;
use crate::ingest::loader::RawRow;
use crate::listing::{GeoPoint, Listing};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

static LEADING_NUMBER: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
static AREA_PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();

fn leading_number() -> &'static Result<Regex, regex::Error> {
    LEADING_NUMBER.get_or_init(|| Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?"))
}

/// Parse the longest leading decimal literal of `raw`, ignoring surrounding
/// whitespace. `"2500 zł"` parses as 2500. Non-finite results are rejected.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let literal = match leading_number() {
        Ok(re) => re.find(trimmed)?.as_str(),
        // whole-field parse only
        Err(_) => trimmed,
    };
    literal.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Cost fields: absent, unparseable or negative values become 0.
pub fn parse_cost(raw: Option<&str>) -> f64 {
    raw.and_then(parse_number)
        .filter(|v| *v >= 0.0)
        .unwrap_or(0.0)
}

/// Area: absent unless it parses to a strictly positive number.
pub fn parse_area(raw: Option<&str>) -> Option<f64> {
    raw.and_then(parse_number).filter(|v| *v > 0.0)
}

/// Text fields: trimmed, with empty strings treated as absent.
pub fn parse_text(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Coordinates are kept only when both parse as finite numbers.
pub fn parse_coords(lat: Option<&str>, lon: Option<&str>) -> Option<GeoPoint> {
    GeoPoint::from_parts(lat.and_then(parse_number), lon.and_then(parse_number))
}

/// Area stated in a listing title, e.g. "41,60 m²", "75 m2", "24mkw", "60 m kw".
///
/// Only used as a display fallback; it never fills `Listing::area`.
pub fn extract_area_from_title(title: &str) -> Option<f64> {
    for re in area_patterns() {
        if let Some(caps) = re.captures(title) {
            let digits = caps.get(1)?.as_str().replacen(',', ".", 1);
            return parse_number(&digits).filter(|v| *v > 0.0);
        }
    }
    None
}

fn area_patterns() -> &'static [Regex] {
    AREA_PATTERNS.get_or_init(|| {
        [
            r"(?i)(\d+[,\d]*)\s*m²",
            r"(?i)(\d+[,\d]*)\s*m2",
            r"(?i)(\d+[,\d]*)\s*mkw",
            r"(?i)(\d+[,\d]*)\s*m\s*kw",
        ]
        .iter()
        .filter_map(|p| Regex::new(p).ok())
        .collect()
    })
}

/// Normalize a single raw row into a listing.
pub fn normalize_row(row: &RawRow, columns: &ColumnsConfig) -> Listing {
    Listing {
        id: parse_text(row.get(&columns.id)),
        title: parse_text(row.get(&columns.title)),
        street: parse_text(row.get(&columns.street)),
        district: parse_text(row.get(&columns.district)),
        coords: parse_coords(row.get(&columns.lat), row.get(&columns.lon)),
        rent: parse_cost(row.get(&columns.rent)),
        admin_fee: parse_cost(row.get(&columns.admin_fee)),
        area: parse_area(row.get(&columns.area)),
        url: parse_text(row.get(&columns.url)),
    }
}

/// Normalize rows in input order. Rows without coordinates are kept.
pub fn normalize_batch(rows: &[RawRow], columns: &ColumnsConfig) -> Vec<Listing> {
    let listings: Vec<Listing> = rows.iter().map(|r| normalize_row(r, columns)).collect();
    let without_coords = listings.iter().filter(|l| !l.is_geo_eligible()).count();
    debug!(
        "Normalized {} rows ({} without coordinates)",
        listings.len(),
        without_coords
    );
    listings
}
