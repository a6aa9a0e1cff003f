//! Total-cost → marker colour mapping
//!
//! Cheap offers are green, expensive ones red, with yellow in between. Costs
//! above the gradient ceiling are burgundy regardless of the distribution.

use serde::{Serialize, Serializer};
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

pub const GREEN: Rgb = Rgb::new(0, 255, 0);
pub const RED: Rgb = Rgb::new(255, 0, 0);
pub const BURGUNDY: Rgb = Rgb::new(128, 0, 32);

/// Colour used when there is nothing to scale against.
pub const DEFAULT_COLOR: Rgb = GREEN;

const RED_YELLOW_END: f64 = 0.6;
const YELLOW_GREEN_END: f64 = 0.9;

/// Three-segment gradient over `t` in [0, 1]: red → yellow on [0, 0.6],
/// yellow → green on (0.6, 0.9], pure green above.
pub fn gradient(t: f64) -> Rgb {
    if t <= RED_YELLOW_END {
        let local = t / RED_YELLOW_END;
        Rgb::new(255, channel(255.0 * local), 0)
    } else if t <= YELLOW_GREEN_END {
        let local = (t - RED_YELLOW_END) / (YELLOW_GREEN_END - RED_YELLOW_END);
        Rgb::new(channel(255.0 * (1.0 - local)), 255, 0)
    } else {
        GREEN
    }
}

fn channel(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Colour scale fitted to one cost distribution.
///
/// Build once per distribution and reuse it for every listing of that view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceColorScale {
    ceiling: f64,
    /// min/max of the distribution at or below the ceiling
    realistic: Option<(f64, f64)>,
}

impl PriceColorScale {
    pub fn new(distribution: &[f64], ceiling: f64) -> Self {
        let realistic = distribution
            .iter()
            .copied()
            .filter(|c| *c <= ceiling)
            .fold(None, |range: Option<(f64, f64)>, c| match range {
                None => Some((c, c)),
                Some((lo, hi)) => Some((lo.min(c), hi.max(c))),
            });

        if !distribution.is_empty() {
            let cheap = distribution.iter().filter(|c| **c <= ceiling).count();
            debug!(
                "Colour scale: {} costs within {}, {} above",
                cheap,
                ceiling,
                distribution.len() - cheap
            );
        }

        Self { ceiling, realistic }
    }

    pub fn realistic_range(&self) -> Option<(f64, f64)> {
        self.realistic
    }

    pub fn color_for(&self, total_cost: f64) -> Rgb {
        let Some((min, max)) = self.realistic else {
            return DEFAULT_COLOR;
        };
        if total_cost > self.ceiling {
            return BURGUNDY;
        }

        let clamped = total_cost.max(min).min(max);
        let ratio = if max > min {
            (clamped - min) / (max - min)
        } else {
            0.0
        };
        gradient(1.0 - ratio)
    }
}

/// One-off mapping of `total_cost` against `distribution`.
pub fn color_for(total_cost: f64, distribution: &[f64], ceiling: f64) -> Rgb {
    PriceColorScale::new(distribution, ceiling).color_for(total_cost)
}
