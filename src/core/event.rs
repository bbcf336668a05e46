use crate::error::{Error, Result};
use ordered_float::NotNan;
use std::cmp::Ordering;

/// A scheduled collision between particles `first` and `second`.
///
/// - `time`: collision time on the simulation clock (finite, non-NaN).
/// - `first`, `second`: indices into the simulation's particle collection.
/// - `cc_first`, `cc_second`: collision-count snapshots for invalidation.
///
/// Ordering and equality look at `time` only. Two events at the same time compare
/// equal whatever particles they name.
#[derive(Debug, Clone, Copy)]
pub struct Event {
    pub time: NotNan<f64>,
    pub first: usize,
    pub second: usize,
    pub cc_first: u64,
    pub cc_second: u64,
}

impl Event {
    /// Create a new event, validating that time is finite and non-NaN.
    pub fn new(time: f64, first: usize, second: usize, cc_first: u64, cc_second: u64) -> Result<Self> {
        if !time.is_finite() {
            return Err(Error::InvalidParam(format!(
                "event time must be finite and not NaN, got {time}"
            )));
        }
        let time = NotNan::new(time)
            .map_err(|_| Error::InvalidParam("event time cannot be NaN".into()))?;
        Ok(Self {
            time,
            first,
            second,
            cc_first,
            cc_second,
        })
    }

    /// Returns the raw f64 event time.
    #[inline]
    pub fn time_f64(&self) -> f64 {
        self.time.into_inner()
    }

    /// True if neither participant has collided since this event was scheduled.
    #[inline]
    pub fn is_valid(&self, cc_first_now: u64, cc_second_now: u64) -> bool {
        self.cc_first == cc_first_now && self.cc_second == cc_second_now
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time
    }
}

impl Eq for Event {}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time.cmp(&other.time)
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
