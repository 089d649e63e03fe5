//! Traffic simulation parameters.

use crate::{TrafficError, TrafficResult};

/// Sampling ranges, probabilities and penalty factors for the traffic model.
///
/// `Default` gives speeds uniform in 20–60 km/h against a 60 km/h baseline,
/// a fair coin for each incident, ×10 for a roadblock and ×1.5 for an
/// accident.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TrafficConfig {
    /// Lower bound of the sampled speed (km/h, inclusive).
    pub min_speed_kmh: f64,
    /// Upper bound of the sampled speed (km/h, inclusive).  Must not exceed
    /// `baseline_speed_kmh`, otherwise a jam could lower the cost.
    pub max_speed_kmh: f64,
    /// Free-flow speed a jam is measured against.
    pub baseline_speed_kmh: f64,

    pub roadblock_probability: f64,
    pub jam_probability:       f64,
    pub accident_probability:  f64,

    /// Multiplier for a roadblock.  Also used for a jam whose sampled speed
    /// is (near) zero.
    pub roadblock_penalty: f64,
    pub accident_penalty:  f64,
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            min_speed_kmh:         20.0,
            max_speed_kmh:         60.0,
            baseline_speed_kmh:    60.0,
            roadblock_probability: 0.5,
            jam_probability:       0.5,
            accident_probability:  0.5,
            roadblock_penalty:     10.0,
            accident_penalty:      1.5,
        }
    }
}

impl TrafficConfig {
    /// Check that every multiplier the model can produce is `>= 1`.
    pub fn validate(&self) -> TrafficResult<()> {
        let bad = |msg: String| Err(TrafficError::InvalidConfig(msg));

        if !(self.baseline_speed_kmh.is_finite() && self.baseline_speed_kmh > 0.0) {
            return bad(format!("baseline speed {} must be positive", self.baseline_speed_kmh));
        }
        if !(self.min_speed_kmh.is_finite() && self.min_speed_kmh >= 0.0) {
            return bad(format!("min speed {} must be non-negative", self.min_speed_kmh));
        }
        if !(self.max_speed_kmh.is_finite() && self.max_speed_kmh >= self.min_speed_kmh) {
            return bad(format!(
                "speed range {}..={} is empty",
                self.min_speed_kmh, self.max_speed_kmh
            ));
        }
        if self.max_speed_kmh > self.baseline_speed_kmh {
            return bad(format!(
                "max speed {} exceeds baseline {}",
                self.max_speed_kmh, self.baseline_speed_kmh
            ));
        }
        for (name, p) in [
            ("roadblock", self.roadblock_probability),
            ("jam", self.jam_probability),
            ("accident", self.accident_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return bad(format!("{name} probability {p} outside [0, 1]"));
            }
        }
        for (name, f) in [
            ("roadblock", self.roadblock_penalty),
            ("accident", self.accident_penalty),
        ] {
            if !(f.is_finite() && f >= 1.0) {
                return bad(format!("{name} penalty {f} must be >= 1"));
            }
        }
        Ok(())
    }

    /// A config in which no incident ever occurs; effective cost equals
    /// length on every edge.
    pub fn calm() -> Self {
        Self {
            roadblock_probability: 0.0,
            jam_probability:       0.0,
            accident_probability:  0.0,
            ..Self::default()
        }
    }
}
