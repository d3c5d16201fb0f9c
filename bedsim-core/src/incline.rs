//! Bed inclination state machine
//!
//! Tracks whether the bed is flat, minor-inclined or meal-inclined. Meal
//! windows are driven by local wall-clock time and always win; outside them
//! the bed cycles between flat and minor inclines on randomized dwell
//! timers. The whole machine is a value transition: [`SimulatorState::advance`]
//! consumes the current state plus a [`TickInstant`] and a random source and
//! returns the next state together with the transition that occurred, if
//! any. No OS clock, no logging, no error conditions.

use crate::clock::TickInstant;
use crate::config;
use chrono::{NaiveTime, Timelike};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Internal inclination regime. Exactly one is active at any instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InclineRegime {
    Flat,
    MinorInclined,
    MealInclined,
}

impl InclineRegime {
    /// Inclination angle the regime holds the bed at.
    pub fn degrees(self) -> f64 {
        match self {
            InclineRegime::Flat => 0.0,
            InclineRegime::MinorInclined => config::MINOR_INCLINE_DEGREES,
            InclineRegime::MealInclined => config::MEAL_INCLINE_DEGREES,
        }
    }

    /// Coarse label reported in telemetry: minor and meal inclines both
    /// collapse to `INCLINED`.
    pub fn bed_state(self) -> BedState {
        match self {
            InclineRegime::Flat => BedState::Flat,
            InclineRegime::MinorInclined | InclineRegime::MealInclined => BedState::Inclined,
        }
    }
}

/// Externally visible bed state label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BedState {
    #[serde(rename = "FLAT")]
    Flat,
    #[serde(rename = "INCLINED")]
    Inclined,
}

impl fmt::Display for BedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BedState::Flat => f.write_str("FLAT"),
            BedState::Inclined => f.write_str("INCLINED"),
        }
    }
}

/// Randomized dwell timer for the non-meal regimes.
///
/// Owns the monotonic offset it started at and the drawn duration. A fresh
/// duration is drawn on every non-meal transition; durations are never
/// carried from one dwell to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DwellTimer {
    started: Duration,
    duration: Duration,
}

impl DwellTimer {
    /// Draw a flat dwell: `45 + U[0,15)` whole minutes.
    fn flat(now: Duration, rng: &mut impl Rng) -> Self {
        let minutes =
            config::FLAT_DWELL_BASE_MINUTES + rng.gen_range(0..config::FLAT_DWELL_RAND_ADD_MINUTES);
        Self {
            started: now,
            duration: Duration::from_secs(minutes * 60),
        }
    }

    /// Draw a minor-incline dwell: `10 + U[0,5)` whole minutes.
    fn minor(now: Duration, rng: &mut impl Rng) -> Self {
        let minutes = config::MINOR_DWELL_BASE_MINUTES
            + rng.gen_range(0..config::MINOR_DWELL_RAND_ADD_MINUTES);
        Self {
            started: now,
            duration: Duration::from_secs(minutes * 60),
        }
    }

    fn expired(&self, now: Duration) -> bool {
        now.saturating_sub(self.started) >= self.duration
    }

    /// Monotonic offset the current dwell started at.
    pub fn started(&self) -> Duration {
        self.started
    }

    /// Drawn length of the current dwell.
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

/// Transition observed during a tick. Only these four log; the flat
/// self-reset and steady states stay quiet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    MealIncline,
    FlatAfterMeal,
    MinorIncline,
    FlatAfterMinor,
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::MealIncline => {
                write!(f, "INCLINED for meal to {} degrees", config::MEAL_INCLINE_DEGREES)
            }
            Transition::FlatAfterMeal => f.write_str("set to FLAT after meal"),
            Transition::MinorIncline => {
                write!(f, "INCLINED (minor) to {} degrees", config::MINOR_INCLINE_DEGREES)
            }
            Transition::FlatAfterMinor => f.write_str("set to FLAT after minor incline"),
        }
    }
}

/// Complete mutable state of one simulated bed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulatorState {
    regime: InclineRegime,
    dwell: DwellTimer,
}

impl SimulatorState {
    /// Start flat with a freshly drawn flat dwell, matching power-on.
    pub fn new(now: &TickInstant, rng: &mut impl Rng) -> Self {
        Self {
            regime: InclineRegime::Flat,
            dwell: DwellTimer::flat(now.mono, rng),
        }
    }

    pub fn regime(&self) -> InclineRegime {
        self.regime
    }

    pub fn inclination_degrees(&self) -> f64 {
        self.regime.degrees()
    }

    pub fn bed_state(&self) -> BedState {
        self.regime.bed_state()
    }

    pub fn dwell(&self) -> &DwellTimer {
        &self.dwell
    }

    /// Evaluate one tick.
    ///
    /// Priority order: meal windows first (forced 60°, idempotent while the
    /// window lasts), then the meal-exit reset, then dwell-timer expiry for
    /// the flat/minor cycle. When a flat dwell expires without the 0.20
    /// draw, the bed stays flat but the timer still resets to a fresh flat
    /// dwell; callers relying on dwell start offsets must expect that.
    pub fn advance(self, now: &TickInstant, rng: &mut impl Rng) -> (Self, Option<Transition>) {
        if in_meal_window(now.wall.time()) {
            if self.regime == InclineRegime::MealInclined {
                return (self, None);
            }
            // Dwell timer is left untouched; it is redrawn on meal exit.
            let next = Self {
                regime: InclineRegime::MealInclined,
                dwell: self.dwell,
            };
            return (next, Some(Transition::MealIncline));
        }

        if self.regime == InclineRegime::MealInclined {
            let next = Self {
                regime: InclineRegime::Flat,
                dwell: DwellTimer::flat(now.mono, rng),
            };
            return (next, Some(Transition::FlatAfterMeal));
        }

        if !self.dwell.expired(now.mono) {
            return (self, None);
        }

        if self.regime == InclineRegime::MinorInclined {
            let next = Self {
                regime: InclineRegime::Flat,
                dwell: DwellTimer::flat(now.mono, rng),
            };
            return (next, Some(Transition::FlatAfterMinor));
        }

        if rng.gen::<f64>() < config::MINOR_INCLINE_PROBABILITY {
            let next = Self {
                regime: InclineRegime::MinorInclined,
                dwell: DwellTimer::minor(now.mono, rng),
            };
            (next, Some(Transition::MinorIncline))
        } else {
            // Stays flat, but the dwell timer resets anyway.
            let next = Self {
                regime: InclineRegime::Flat,
                dwell: DwellTimer::flat(now.mono, rng),
            };
            (next, None)
        }
    }
}

/// Meal window membership: `start <= now < start + 30min`, compared as
/// minutes since midnight so the check follows wall-clock drift.
pub fn in_meal_window(time: NaiveTime) -> bool {
    let now_minutes = time.hour() * 60 + time.minute();
    config::MEAL_START_TIMES.iter().any(|&(hour, minute)| {
        let start = hour * 60 + minute;
        now_minutes >= start && now_minutes < start + config::MEAL_INCLINE_DURATION_MINUTES
    })
}
