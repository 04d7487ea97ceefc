use glucosense_types::{GlucoseStatus, VitalBand};

use crate::{BloodPressure, BloodPressureParseError};

/// Bands each vital for display. Every function is total over `f64`; callers
/// are expected to sanitize non-finite readings first.
pub struct VitalsClassifier;

impl VitalsClassifier {
    pub const GLUCOSE_LOW: f64 = 70.0;
    pub const GLUCOSE_NORMAL_MAX: f64 = 100.0;
    pub const GLUCOSE_MODERATE_MAX: f64 = 120.0;

    pub const HEART_RATE_MIN: f64 = 60.0;
    pub const HEART_RATE_MAX: f64 = 100.0;

    pub const SPO2_MIN: f64 = 95.0;

    pub const HRV_MIN: f64 = 40.0;

    pub const SYSTOLIC_MAX: i32 = 140;
    pub const DIASTOLIC_MAX: i32 = 90;

    pub fn glucose(mg_dl: f64) -> GlucoseStatus {
        if mg_dl < Self::GLUCOSE_LOW {
            GlucoseStatus::Low
        } else if mg_dl <= Self::GLUCOSE_NORMAL_MAX {
            GlucoseStatus::Normal
        } else if mg_dl <= Self::GLUCOSE_MODERATE_MAX {
            GlucoseStatus::Moderate
        } else {
            GlucoseStatus::High
        }
    }

    pub fn heart_rate(bpm: f64) -> VitalBand {
        VitalBand::from_abnormal(bpm < Self::HEART_RATE_MIN || bpm > Self::HEART_RATE_MAX)
    }

    pub fn spo2(percent: f64) -> VitalBand {
        VitalBand::from_abnormal(percent < Self::SPO2_MIN)
    }

    pub fn hrv(ms: f64) -> VitalBand {
        VitalBand::from_abnormal(ms < Self::HRV_MIN)
    }

    pub fn blood_pressure(bp: BloodPressure) -> VitalBand {
        VitalBand::from_abnormal(bp.systolic > Self::SYSTOLIC_MAX || bp.diastolic > Self::DIASTOLIC_MAX)
    }

    /// Classifies a `systolic/diastolic` string as entered or stored.
    pub fn blood_pressure_str(reading: &str) -> Result<VitalBand, BloodPressureParseError> {
        Ok(Self::blood_pressure(reading.parse()?))
    }
}
