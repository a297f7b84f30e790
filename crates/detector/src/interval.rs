//! Time intervals represented by each snapshot

// spectrace modules
use spectrace_utils::{f, ndigits, IndexExt, ValueExt};

/// Snapshot `index` of `count`, standing for `dt` seconds from `time`
///
/// ```rust
/// # use spectrace_detector::Interval;
/// let interval = Interval::new(3, 12, 1.5e-9, 0.5e-9);
///
/// assert_eq!(interval.label(), "time03");
/// assert_eq!(interval.header(), "time  3    1.500000e-09 s\n");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    /// Index of the snapshot
    pub index: usize,
    /// Digits needed for the largest snapshot index
    pub digits: usize,
    /// Start of the interval in s
    pub time: f64,
    /// Length of the interval in s
    pub dt: f64,
}

impl Interval {
    /// Snapshot `index` out of `count` snapshots
    pub fn new(index: usize, count: usize, time: f64, dt: f64) -> Self {
        Self {
            index,
            digits: ndigits(count),
            time,
            dt,
        }
    }

    /// Label used in file names
    pub fn label(&self) -> String {
        f!("time{}", self.index.padded(self.digits))
    }

    /// Header line giving the snapshot and its time
    pub fn header(&self) -> String {
        f!(
            "time {} {} s\n",
            self.index.aligned(self.digits),
            self.time.column()
        )
    }
}
