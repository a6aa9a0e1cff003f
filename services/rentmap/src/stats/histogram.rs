use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub min: f64,
    pub max: f64,
    pub bin_width: f64,
    pub bins: Vec<HistogramBin>,
}

impl Histogram {
    /// Equal-width histogram over the range of `values` itself.
    ///
    /// The width falls back to 1 when every value is identical, and the
    /// maximum lands in the last bin. `None` for empty input or zero bins.
    pub fn build(values: &[f64], bin_count: usize) -> Option<Self> {
        Self::build_with_unit(values, bin_count, "")
    }

    /// Like `build`, appending `unit` to every bin label (e.g. " m²").
    pub fn build_with_unit(values: &[f64], bin_count: usize, unit: &str) -> Option<Self> {
        if bin_count == 0 {
            return None;
        }
        let min = values.iter().copied().reduce(f64::min)?;
        let max = values.iter().copied().reduce(f64::max)?;

        let mut bin_width = (max - min) / bin_count as f64;
        if bin_width == 0.0 || !bin_width.is_finite() {
            bin_width = 1.0;
        }

        let mut counts = vec![0usize; bin_count];
        for value in values {
            counts[bin_index(*value, min, bin_width, bin_count)] += 1;
        }

        let bins = counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| {
                let start = min + i as f64 * bin_width;
                let end = min + (i + 1) as f64 * bin_width;
                HistogramBin {
                    start,
                    end,
                    count,
                    label: format!("{} - {}{}", start.round(), end.round(), unit),
                }
            })
            .collect();

        Some(Self {
            min,
            max,
            bin_width,
            bins,
        })
    }

    pub fn counts(&self) -> Vec<usize> {
        self.bins.iter().map(|b| b.count).collect()
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}

/// `floor((value - min) / width)`, clamped into `[0, bin_count - 1]`.
pub fn bin_index(value: f64, min: f64, bin_width: f64, bin_count: usize) -> usize {
    let raw = ((value - min) / bin_width).floor();
    if raw <= 0.0 || raw.is_nan() {
        0
    } else {
        (raw as usize).min(bin_count - 1)
    }
}
