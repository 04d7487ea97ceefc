use crate::{BloodPressure, helpers::math::round_half_up};

/// Heuristic HRV score for feeds that carry no RR intervals.
///
/// Not a physiological model: HRV peaks at a heart rate of 70 and is nudged
/// by blood pressure, SpO2 and elevated glucose.
pub struct HrvEstimator;

impl HrvEstimator {
    pub const MIN: u8 = 20;
    pub const MAX: u8 = 120;

    pub fn estimate(heart_rate: f64, systolic: f64, diastolic: f64, spo2: f64, glucose: f64) -> u8 {
        let base = 80.0 - (70.0 - heart_rate).abs();
        let bp_factor = ((140.0 - systolic) + (90.0 - diastolic)) / 2.0;
        let hrv = base + bp_factor * 0.1 + (spo2 - 95.0) * 0.2 - (glucose - 100.0).max(0.0) * 0.1;

        if hrv.is_nan() {
            return Self::MIN;
        }

        round_half_up(hrv).clamp(f64::from(Self::MIN), f64::from(Self::MAX)) as u8
    }

    pub fn estimate_with(heart_rate: f64, bp: BloodPressure, spo2: f64, glucose: f64) -> u8 {
        Self::estimate(
            heart_rate,
            f64::from(bp.systolic),
            f64::from(bp.diastolic),
            spo2,
            glucose,
        )
    }
}
