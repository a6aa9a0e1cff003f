use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_data_path")]
    pub data_path: String,
    #[serde(default)]
    pub columns: ColumnsConfig,
    #[serde(default)]
    pub geo: GeoConfig,
    #[serde(default)]
    pub color: ColorConfig,
    #[serde(default)]
    pub stats: StatsConfig,
}

/// Header names of the listing file, one per listing field.
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnsConfig {
    #[serde(default = "default_id_column")]
    pub id: String,
    #[serde(default = "default_title_column")]
    pub title: String,
    #[serde(default = "default_street_column")]
    pub street: String,
    #[serde(default = "default_district_column")]
    pub district: String,
    #[serde(default = "default_lat_column")]
    pub lat: String,
    #[serde(default = "default_lon_column")]
    pub lon: String,
    #[serde(default = "default_rent_column")]
    pub rent: String,
    #[serde(default = "default_admin_fee_column")]
    pub admin_fee: String,
    #[serde(default = "default_area_column")]
    pub area: String,
    #[serde(default = "default_url_column")]
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeoConfig {
    #[serde(default = "default_center_lat")]
    pub center_lat: f64,
    #[serde(default = "default_center_lon")]
    pub center_lon: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ColorConfig {
    #[serde(default = "default_gradient_ceiling")]
    pub gradient_ceiling: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatsConfig {
    #[serde(default = "default_rent_bins")]
    pub rent_bins: usize,
    #[serde(default = "default_fee_bins")]
    pub fee_bins: usize,
    #[serde(default = "default_area_bins")]
    pub area_bins: usize,
    #[serde(default = "default_top_deals")]
    pub top_deals: usize,
    #[serde(default = "default_top_districts")]
    pub top_districts: usize,
    #[serde(default = "default_budget_max")]
    pub budget_max: f64,
    #[serde(default = "default_mid_range_max")]
    pub mid_range_max: f64,
    #[serde(default = "default_premium_max")]
    pub premium_max: f64,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config from {:?}", path.as_ref()))?;
        let config: Config = toml::from_str(&content).context("Failed to parse config TOML")?;
        Ok(config)
    }

    /// Load from `path` when given, otherwise fall back to built-in defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            columns: ColumnsConfig::default(),
            geo: GeoConfig::default(),
            color: ColorConfig::default(),
            stats: StatsConfig::default(),
        }
    }
}

impl Default for ColumnsConfig {
    fn default() -> Self {
        Self {
            id: default_id_column(),
            title: default_title_column(),
            street: default_street_column(),
            district: default_district_column(),
            lat: default_lat_column(),
            lon: default_lon_column(),
            rent: default_rent_column(),
            admin_fee: default_admin_fee_column(),
            area: default_area_column(),
            url: default_url_column(),
        }
    }
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            center_lat: default_center_lat(),
            center_lon: default_center_lon(),
        }
    }
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            gradient_ceiling: default_gradient_ceiling(),
        }
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            rent_bins: default_rent_bins(),
            fee_bins: default_fee_bins(),
            area_bins: default_area_bins(),
            top_deals: default_top_deals(),
            top_districts: default_top_districts(),
            budget_max: default_budget_max(),
            mid_range_max: default_mid_range_max(),
            premium_max: default_premium_max(),
        }
    }
}

fn default_data_path() -> String {
    "data/oferty_geo.csv".to_string()
}

fn default_id_column() -> String {
    "id".to_string()
}

fn default_title_column() -> String {
    "title".to_string()
}

fn default_street_column() -> String {
    "ulica".to_string()
}

fn default_district_column() -> String {
    "dzielnica".to_string()
}

fn default_lat_column() -> String {
    "lat".to_string()
}

fn default_lon_column() -> String {
    "lon".to_string()
}

fn default_rent_column() -> String {
    "najem_pln".to_string()
}

fn default_admin_fee_column() -> String {
    "czynsz_adm_pln".to_string()
}

fn default_area_column() -> String {
    "metraz_m2".to_string()
}

fn default_url_column() -> String {
    "url".to_string()
}

// Kraków, Rynek Główny
fn default_center_lat() -> f64 {
    50.0647
}

fn default_center_lon() -> f64 {
    19.9450
}

fn default_gradient_ceiling() -> f64 {
    5000.0
}

fn default_rent_bins() -> usize {
    20
}

fn default_fee_bins() -> usize {
    15
}

fn default_area_bins() -> usize {
    15
}

fn default_top_deals() -> usize {
    10
}

fn default_top_districts() -> usize {
    10
}

fn default_budget_max() -> f64 {
    2000.0
}

fn default_mid_range_max() -> f64 {
    3000.0
}

fn default_premium_max() -> f64 {
    4000.0
}
