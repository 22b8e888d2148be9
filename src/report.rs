//! Change detection between successive readings.
//!
//! [`PollState`] is a plain value: [`ChangeReporter::observe`] takes the previous state and returns
//! the next one, so the polling loop owns it outright.
use crate::compensation::Reading;
use embassy_time::{Duration, Instant};

/// Baseline for the first comparison. No real reading is anywhere near it, so the first reading is
/// always reported.
pub const INITIAL_PRESSURE_HPA: f64 = 9999.0;

/// Smallest pressure change that is reported. The comparison is strict.
pub const DEFAULT_THRESHOLD_HPA: f64 = 0.05;

/// What the polling loop remembers between cycles.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollState {
    pub previous_pressure_hpa: f64,
    pub previous_timestamp: Instant,
}

impl PollState {
    pub fn new(start: Instant) -> Self {
        Self {
            previous_pressure_hpa: INITIAL_PRESSURE_HPA,
            previous_timestamp: start,
        }
    }
}

/// A pressure change large enough to be reported.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PressureChange {
    pub pressure_hpa: f64,
    /// [`None`] for pressure-only readings.
    pub temperature_celsius: Option<f64>,
    pub delta_hpa: f64,
    pub elapsed: Duration,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ChangeReporter {
    threshold_hpa: f64,
}

impl Default for ChangeReporter {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD_HPA)
    }
}

impl ChangeReporter {
    pub fn new(threshold_hpa: f64) -> Self {
        Self { threshold_hpa }
    }

    pub fn threshold_hpa(&self) -> f64 {
        self.threshold_hpa
    }

    /// Compares `reading` against `state`.
    ///
    /// Returns the state for the next cycle and the change, if it exceeds the threshold. An
    /// unavailable reading leaves the state untouched and reports nothing.
    pub fn observe(
        &self,
        state: PollState,
        reading: Option<Reading>,
        now: Instant,
    ) -> (PollState, Option<PressureChange>) {
        match reading {
            Some(reading) => self.compare(state, reading.pressure_hpa, Some(reading.temperature_celsius), now),
            None => (state, None),
        }
    }

    /// Same as [`ChangeReporter::observe`] for pressure-only readings.
    pub fn observe_pressure(
        &self,
        state: PollState,
        pressure_hpa: Option<f64>,
        now: Instant,
    ) -> (PollState, Option<PressureChange>) {
        match pressure_hpa {
            Some(pressure_hpa) => self.compare(state, pressure_hpa, None, now),
            None => (state, None),
        }
    }

    fn compare(
        &self,
        state: PollState,
        pressure_hpa: f64,
        temperature_celsius: Option<f64>,
        now: Instant,
    ) -> (PollState, Option<PressureChange>) {
        let delta_hpa = pressure_hpa - state.previous_pressure_hpa;
        let elapsed = now
            .checked_duration_since(state.previous_timestamp)
            .unwrap_or(Duration::from_ticks(0));

        let next = PollState {
            previous_pressure_hpa: pressure_hpa,
            previous_timestamp: now,
        };

        let change = if delta_hpa > self.threshold_hpa || delta_hpa < -self.threshold_hpa {
            Some(PressureChange { pressure_hpa, temperature_celsius, delta_hpa, elapsed })
        } else {
            None
        };

        (next, change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(previous_pressure_hpa: f64) -> PollState {
        PollState {
            previous_pressure_hpa,
            previous_timestamp: Instant::from_secs(10),
        }
    }

    #[test]
    fn first_reading_is_reported() {
        let reporter = ChangeReporter::default();
        let (next, change) = reporter.observe(
            PollState::new(Instant::from_secs(0)),
            Some(Reading::new(25.0, 1013.25)),
            Instant::from_millis(1500),
        );

        let change = change.unwrap();
        assert_eq!(1013.25 - 9999.0, change.delta_hpa);
        assert_eq!(Duration::from_millis(1500), change.elapsed);
        assert_eq!(Some(25.0), change.temperature_celsius);
        assert_eq!(1013.25, next.previous_pressure_hpa);
        assert_eq!(Instant::from_millis(1500), next.previous_timestamp);
    }

    #[test]
    fn threshold_is_strict() {
        let reporter = ChangeReporter::default();
        let now = Instant::from_secs(11);

        let (next, change) = reporter.observe(state(0.0), Some(Reading::new(20.0, 0.05)), now);
        assert_eq!(None, change);
        assert_eq!(0.05, next.previous_pressure_hpa);
        assert_eq!(now, next.previous_timestamp);

        let (_, change) = reporter.observe(state(0.0), Some(Reading::new(20.0, 0.0500001)), now);
        assert!(change.is_some());
    }

    #[test]
    fn falling_pressure_is_reported() {
        let reporter = ChangeReporter::default();
        let (_, change) = reporter.observe(state(1013.25), Some(Reading::new(20.0, 1013.0)), Instant::from_secs(12));

        assert_eq!(-0.25, change.unwrap().delta_hpa);
    }

    #[test]
    fn small_changes_still_update_state() {
        let reporter = ChangeReporter::default();
        let (next, change) = reporter.observe(state(1013.25), Some(Reading::new(20.0, 1013.26)), Instant::from_secs(12));

        assert_eq!(None, change);
        assert_eq!(1013.26, next.previous_pressure_hpa);
        assert_eq!(Instant::from_secs(12), next.previous_timestamp);
    }

    #[test]
    fn unavailable_reading_keeps_state() {
        let reporter = ChangeReporter::default();
        let before = state(1013.25);

        let (next, change) = reporter.observe(before, None, Instant::from_secs(20));
        assert_eq!(None, change);
        assert_eq!(before, next);

        let (next, change) = reporter.observe_pressure(before, None, Instant::from_secs(20));
        assert_eq!(None, change);
        assert_eq!(before, next);
    }

    #[test]
    fn pressure_only_has_no_temperature() {
        let reporter = ChangeReporter::new(1.0);
        let (_, change) = reporter.observe_pressure(state(1000.0), Some(1002.0), Instant::from_secs(13));

        let change = change.unwrap();
        assert_eq!(None, change.temperature_celsius);
        assert_eq!(2.0, change.delta_hpa);
        assert_eq!(Duration::from_secs(3), change.elapsed);
    }
}
