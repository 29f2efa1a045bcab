//! Style intervals and style layers.
//!
//! Styles are stored as half-open `[start, end)` character ranges tagged with a [`StyleId`].
//! Each producer (for example the syntax highlighter) owns one [`StyleLayerId`] and replaces
//! its whole layer on refresh.

/// Style ID type. The theme maps ids to colors.
pub type StyleId = u32;

/// Style layer ID.
///
/// Distinguishes style sources so one layer can be replaced or cleared without touching others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StyleLayerId(pub u32);

impl StyleLayerId {
    /// Create a style layer id from a raw numeric identifier.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Syntax highlighting layer.
    pub const SYNTAX: Self = Self(1);
}

/// A styled character range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    /// Start character offset.
    pub start: usize,
    /// End character offset (exclusive).
    pub end: usize,
    /// Style ID
    pub style_id: StyleId,
}

impl Interval {
    /// Create a new interval with `[start, end)` offsets and a style id.
    pub fn new(start: usize, end: usize, style_id: StyleId) -> Self {
        Self {
            start,
            end,
            style_id,
        }
    }

    /// Check if interval contains a specific position
    pub fn contains(&self, pos: usize) -> bool {
        self.start <= pos && pos < self.end
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` for an empty range.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Sorted interval collection.
///
/// Intervals are kept sorted by start offset. A prefix maximum of end offsets lets point and
/// range queries stop scanning as soon as no earlier interval can reach the query.
#[derive(Debug, Clone, Default)]
pub struct IntervalTree {
    intervals: Vec<Interval>,
    /// `prefix_max_end[i] = max(intervals[0..=i].end)`
    prefix_max_end: Vec<usize>,
}

impl IntervalTree {
    /// Create an empty interval tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from unsorted intervals, dropping empty ones.
    pub fn from_intervals(intervals: impl IntoIterator<Item = Interval>) -> Self {
        let mut intervals: Vec<Interval> =
            intervals.into_iter().filter(|i| !i.is_empty()).collect();
        intervals.sort_by_key(|i| (i.start, i.end));
        let mut tree = Self {
            intervals,
            prefix_max_end: Vec::new(),
        };
        tree.rebuild_prefix_max_end_from(0);
        tree
    }

    fn rebuild_prefix_max_end_from(&mut self, start_idx: usize) {
        self.prefix_max_end.resize(self.intervals.len(), 0);
        let mut max_end = match start_idx {
            0 => 0,
            idx => self.prefix_max_end[idx - 1],
        };
        for (idx, interval) in self.intervals.iter().enumerate().skip(start_idx) {
            max_end = max_end.max(interval.end);
            self.prefix_max_end[idx] = max_end;
        }
    }

    /// Insert an interval, keeping start order.
    pub fn insert(&mut self, interval: Interval) {
        let pos = self
            .intervals
            .partition_point(|i| i.start <= interval.start);
        self.intervals.insert(pos, interval);
        self.rebuild_prefix_max_end_from(pos);
    }

    /// Number of intervals.
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Returns `true` if the tree holds no intervals.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// All intervals in start order.
    pub fn iter(&self) -> impl Iterator<Item = &Interval> {
        self.intervals.iter()
    }

    /// Query all intervals containing `pos`.
    pub fn query_point(&self, pos: usize) -> Vec<&Interval> {
        let idx = self.intervals.partition_point(|i| i.start <= pos);
        let mut result = Vec::new();
        for i in (0..idx).rev() {
            if self.prefix_max_end[i] <= pos {
                break;
            }
            if self.intervals[i].contains(pos) {
                result.push(&self.intervals[i]);
            }
        }
        result.reverse();
        result
    }

    /// Query all intervals overlapping `[start, end)`, in start order.
    pub fn query_range(&self, start: usize, end: usize) -> Vec<&Interval> {
        if start >= end {
            return Vec::new();
        }
        let idx = self.intervals.partition_point(|i| i.start < end);
        let mut result = Vec::new();
        for i in (0..idx).rev() {
            if self.prefix_max_end[i] <= start {
                break;
            }
            let interval = &self.intervals[i];
            if interval.end > start {
                result.push(interval);
            }
        }
        result.reverse();
        result
    }
}
