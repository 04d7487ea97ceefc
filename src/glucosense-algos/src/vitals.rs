use std::fmt::Display;

use glucosense_types::{GlucoseStatus, Sample, Tone, VitalBand};
use serde::Serialize;

use crate::{BloodPressure, BloodPressureDeriver, HrvEstimator, TimeFormatter, VitalsClassifier};

/// Vitals computed from one sample. Recomputed on every feed update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedVitals {
    pub glucose: f64,
    pub heart_rate: f64,
    pub spo2: f64,
    pub hrv: u8,
    pub blood_pressure: BloodPressure,
    pub status: GlucoseStatus,
}

impl DerivedVitals {
    pub fn from_sample(sample: &Sample) -> Self {
        let sample = sample.sanitized();
        let blood_pressure = BloodPressureDeriver::derive(sample.heart_rate);
        let hrv = HrvEstimator::estimate_with(
            sample.heart_rate,
            blood_pressure,
            sample.spo2,
            sample.estimated_glucose,
        );

        Self {
            glucose: sample.estimated_glucose,
            heart_rate: sample.heart_rate,
            spo2: sample.spo2,
            hrv,
            blood_pressure,
            status: VitalsClassifier::glucose(sample.estimated_glucose),
        }
    }

    pub fn bands(&self) -> VitalBands {
        VitalBands {
            heart_rate: VitalsClassifier::heart_rate(self.heart_rate),
            spo2: VitalsClassifier::spo2(self.spo2),
            hrv: VitalsClassifier::hrv(f64::from(self.hrv)),
            blood_pressure: VitalsClassifier::blood_pressure(self.blood_pressure),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalBands {
    pub heart_rate: VitalBand,
    pub spo2: VitalBand,
    pub hrv: VitalBand,
    pub blood_pressure: VitalBand,
}

/// What the dashboard renders for the current reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalsReport {
    pub glucose: f64,
    pub heart_rate: f64,
    pub spo2: f64,
    pub hrv: u8,
    pub blood_pressure: BloodPressure,
    pub status: GlucoseStatus,
    pub tone: Tone,
    pub advice: &'static str,
    pub display_time: String,
    pub bands: VitalBands,
}

impl VitalsReport {
    pub fn new(vitals: &DerivedVitals, display_time: String) -> Self {
        Self {
            glucose: vitals.glucose,
            heart_rate: vitals.heart_rate,
            spo2: vitals.spo2,
            hrv: vitals.hrv,
            blood_pressure: vitals.blood_pressure,
            status: vitals.status,
            tone: vitals.status.tone(),
            advice: vitals.status.advice(),
            display_time,
            bands: vitals.bands(),
        }
    }

    pub fn from_sample(sample: &Sample, formatter: &TimeFormatter) -> Self {
        let vitals = DerivedVitals::from_sample(sample);
        Self::new(&vitals, formatter.format(sample.timestamp))
    }
}

impl Display for VitalsReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "Measured: {}\nGlucose: {} mg/dL ({})\n\t{}\n",
            self.display_time, self.glucose, self.status, self.advice,
        ))?;
        f.write_fmt(format_args!(
            "Vitals:\n\tHeart rate: {} bpm ({})\n\tSpO2: {}% ({})\n\tHRV: {} ms ({})\n\tBP: {} ({})",
            self.heart_rate,
            self.bands.heart_rate,
            self.spo2,
            self.bands.spo2,
            self.hrv,
            self.bands.hrv,
            self.blood_pressure,
            self.bands.blood_pressure,
        ))?;
        Ok(())
    }
}
