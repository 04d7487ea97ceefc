use std::{fmt::Display, str::FromStr};

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::helpers::math::round_half_up;

/// Systolic over diastolic, in mmHg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BloodPressure {
    pub systolic: i32,
    pub diastolic: i32,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("{self:?}")]
pub enum BloodPressureParseError {
    MissingSeparator(String),
    InvalidSystolic(String),
    InvalidDiastolic(String),
}

impl BloodPressure {
    pub fn new(systolic: i32, diastolic: i32) -> Self {
        Self {
            systolic,
            diastolic,
        }
    }
}

impl Display for BloodPressure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.systolic, self.diastolic)
    }
}

impl FromStr for BloodPressure {
    type Err = BloodPressureParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (systolic, diastolic) = s
            .split_once('/')
            .ok_or_else(|| BloodPressureParseError::MissingSeparator(s.to_owned()))?;

        let systolic = systolic
            .trim()
            .parse()
            .map_err(|_| BloodPressureParseError::InvalidSystolic(systolic.to_owned()))?;
        let diastolic = diastolic
            .trim()
            .parse()
            .map_err(|_| BloodPressureParseError::InvalidDiastolic(diastolic.to_owned()))?;

        Ok(Self {
            systolic,
            diastolic,
        })
    }
}

impl Serialize for BloodPressure {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Estimates blood pressure from heart rate for devices without a cuff.
pub struct BloodPressureDeriver;

impl BloodPressureDeriver {
    pub fn derive(heart_rate: f64) -> BloodPressure {
        let systolic = round_half_up(90.0 + 0.5 * heart_rate);
        let diastolic = round_half_up(60.0 + 0.3 * heart_rate);

        BloodPressure {
            systolic: systolic as i32,
            diastolic: diastolic as i32,
        }
    }
}
