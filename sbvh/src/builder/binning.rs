use crate::Axis;

/// Axes thinner than this fraction of the node's largest extent are not
/// worth binning.
const MIN_RELATIVE_EXTENT: f32 = 1e-6;

/// Mapping from positions along an axis into bins.
///
/// The same instance is used both for finding and for performing a split, so
/// that each reference lands in exactly the same bin both times.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Binning {
    pub axis: Axis,
    pub count: usize,
    start: f32,
    scale: f32,
    bin_size: f32,
}

impl Binning {
    /// Creates `count` bins spread evenly over `start .. start + extent`;
    /// returns `None` if the range is degenerate compared to `node_extent`.
    pub fn new(
        axis: Axis,
        start: f32,
        extent: f32,
        node_extent: f32,
        count: usize,
    ) -> Option<Self> {
        if count == 0
            || !extent.is_finite()
            || extent <= 0.0
            || extent <= node_extent * MIN_RELATIVE_EXTENT
        {
            return None;
        }

        Some(Self {
            axis,
            count,
            start,
            scale: (count as f32) / extent,
            bin_size: extent / (count as f32),
        })
    }

    pub fn bin_of(&self, value: f32) -> usize {
        // Negatives (and NaNs) saturate to zero
        let bin_idx = ((value - self.start) * self.scale) as usize;

        bin_idx.min(self.count - 1)
    }

    /// Returns the first and the last bin overlapped by `min ..= max`.
    ///
    /// A range that only touches a boundary with its upper end doesn't reach
    /// into the bin past that boundary; one that starts right at a boundary
    /// begins in the bin past it.
    pub fn span_of(&self, min: f32, max: f32) -> (usize, usize) {
        // `bin_of()` can be off by one near the boundaries, so both ends get
        // snapped against the exact boundary positions
        let mut first = self.bin_of(min);

        while first > 0 && min < self.position(first) {
            first -= 1;
        }

        while first + 1 < self.count && min >= self.position(first + 1) {
            first += 1;
        }

        let mut last = self.bin_of(max).max(first);

        while last + 1 < self.count && max > self.position(last + 1) {
            last += 1;
        }

        while last > first && max <= self.position(last) {
            last -= 1;
        }

        (first, last)
    }

    /// Returns the position of the boundary between bin `bin_idx - 1` and
    /// bin `bin_idx`.
    pub fn position(&self, bin_idx: usize) -> f32 {
        self.start + self.bin_size * (bin_idx as f32)
    }
}
