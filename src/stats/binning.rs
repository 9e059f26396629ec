//! Equal-width histogram bins with "nice" bin sizes.

/// Bin sizes are one of these multiples of a power of ten.
const NICE_MULTIPLES: [f64; 5] = [1.0, 2.0, 2.5, 5.0, 10.0];

/// Left-closed bins `[start + i*size, start + (i+1)*size)`. The last bin is
/// closed on the right as well.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericBins {
    pub start: f64,
    pub size: f64,
    pub count: usize,
}

impl NumericBins {
    /// Bins covering `[min, max]` with at most `max_bins` bins.
    ///
    /// The size is rounded up to a nice number, so the actual bin count may be
    /// lower than requested.
    pub fn nice(min: f64, max: f64, max_bins: usize) -> Option<Self> {
        if !min.is_finite() || !max.is_finite() || max < min {
            return None;
        }

        if max == min {
            return Some(Self {
                start: min - 0.5,
                size: 1.0,
                count: 1,
            });
        }

        let max_bins = max_bins.max(1);
        let mut size = Self::nice_size((max - min) / max_bins as f64);
        loop {
            let start = (min / size).floor() * size;
            // Tolerance keeps an exact edge at `max` from opening another bin
            let count = ((max - start) / size - 1e-9).ceil().max(1.0) as usize;
            if count <= max_bins {
                return Some(Self { start, size, count });
            }
            // Aligning `start` down cost a bin: step to the next nice size
            size = Self::nice_size(size * (1.0 + 1e-6));
        }
    }

    /// Bins for the finite values of an iterator; `None` when there are none.
    pub fn from_values(values: impl IntoIterator<Item = f64>, max_bins: usize) -> Option<Self> {
        let (min, max) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        Self::nice(min, max, max_bins)
    }

    fn nice_size(raw: f64) -> f64 {
        let magnitude = 10f64.powf(raw.log10().floor());
        NICE_MULTIPLES
            .iter()
            .map(|m| m * magnitude)
            .find(|size| *size >= raw * (1.0 - 1e-9))
            .unwrap_or(10.0 * magnitude)
    }

    pub fn index_of(&self, value: f64) -> Option<usize> {
        if !value.is_finite() || value < self.start || self.count == 0 {
            return None;
        }
        let index = ((value - self.start) / self.size).floor() as usize;
        Some(index.min(self.count - 1))
    }

    pub fn edges(&self, index: usize) -> (f64, f64) {
        let lo = self.start + index as f64 * self.size;
        (lo, lo + self.size)
    }

    pub fn end(&self) -> f64 {
        self.start + self.count as f64 * self.size
    }
}
