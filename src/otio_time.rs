/*!
 * Time primitives of the OTIO interchange format.
 *
 * OTIO expresses every instant as a rational value against a rate (frames
 * per second) and every span as a start plus a duration. Placement math in
 * the importer accumulates these, rescaling to a common rate, so mixed-rate
 * documents land at correct record offsets.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in time or a duration: `value` measured in units of `rate` per second
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RationalTime {
    /// Count of rate units
    pub value: f64,

    /// Units per second (e.g. 24.0 for 24 fps)
    #[serde(default = "default_rate")]
    pub rate: f64,
}

fn default_rate() -> f64 {
    24.0
}

impl RationalTime {
    /// Create a new rational time
    pub fn new(value: f64, rate: f64) -> Self {
        RationalTime { value, rate }
    }

    /// Zero at the given rate
    pub fn zero(rate: f64) -> Self {
        RationalTime { value: 0.0, rate }
    }

    /// This time expressed in seconds
    pub fn to_seconds(&self) -> f64 {
        if self.rate == 0.0 {
            0.0
        } else {
            self.value / self.rate
        }
    }

    /// The same instant re-expressed at a different rate
    pub fn rescaled_to(&self, rate: f64) -> Self {
        if self.rate == rate {
            return *self;
        }
        RationalTime {
            value: self.to_seconds() * rate,
            rate,
        }
    }

    /// Sum of the two times, expressed at self's rate
    pub fn adding(&self, other: &RationalTime) -> Self {
        let other = other.rescaled_to(self.rate);
        RationalTime {
            value: self.value + other.value,
            rate: self.rate,
        }
    }

    /// Whether this is a usable duration: finite rate and value, rate > 0
    pub fn is_valid_duration(&self) -> bool {
        self.rate > 0.0 && self.rate.is_finite() && self.value.is_finite() && self.value >= 0.0
    }
}

impl fmt::Display for RationalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}fps", self.value, self.rate)
    }
}

/// A half-open span of time: `[start_time, start_time + duration)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Where the range begins
    pub start_time: RationalTime,

    /// How long it lasts
    pub duration: RationalTime,
}

impl TimeRange {
    /// Create a new time range
    pub fn new(start_time: RationalTime, duration: RationalTime) -> Self {
        TimeRange {
            start_time,
            duration,
        }
    }

    /// A range starting at zero with the given duration
    pub fn from_duration(duration: RationalTime) -> Self {
        TimeRange {
            start_time: RationalTime::zero(duration.rate),
            duration,
        }
    }

    /// First instant after the range, at the start time's rate
    pub fn end_time_exclusive(&self) -> RationalTime {
        self.start_time.adding(&self.duration)
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} +{}]", self.start_time, self.duration)
    }
}
