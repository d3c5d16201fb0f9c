//! Vital-sign sampling
//!
//! Heart rate and SpO2 are independent uniform draws each tick; there is no
//! physiological model behind them.

use crate::config;
use rand::Rng;

/// One tick's vital signs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vitals {
    /// Beats per minute, uniform in `[55.0, 85.0)`
    pub heart_rate: f64,
    /// Oxygen saturation percent, uniform in `[95.0, 99.5)`
    pub spo2: f64,
}

impl Vitals {
    pub fn sample(rng: &mut impl Rng) -> Self {
        Self {
            heart_rate: rng.gen_range(config::HEART_RATE_RANGE),
            spo2: rng.gen_range(config::SPO2_RANGE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn samples_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..1000 {
            let vitals = Vitals::sample(&mut rng);
            assert!((55.0..85.0).contains(&vitals.heart_rate));
            assert!((95.0..99.5).contains(&vitals.spo2));
        }
    }
}
