use serde::{Deserialize, Serialize};

/// One raw vitals reading as delivered by the realtime feed.
///
/// `timestamp` is either seconds or milliseconds since the epoch; the feed does
/// not say which, so the unit is resolved when the reading gets formatted.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Sample {
    #[serde(default)]
    pub timestamp: Option<f64>,
    #[serde(default)]
    pub estimated_glucose: f64,
    #[serde(rename = "heartRate", default)]
    pub heart_rate: f64,
    #[serde(default)]
    pub spo2: f64,
}

impl Sample {
    pub fn new(timestamp: Option<f64>, estimated_glucose: f64, heart_rate: f64, spo2: f64) -> Self {
        Self {
            timestamp,
            estimated_glucose,
            heart_rate,
            spo2,
        }
    }

    /// Only readings with a positive glucose estimate are shown or charted.
    pub fn is_valid(&self) -> bool {
        self.estimated_glucose > 0.0
    }

    /// Replaces non-finite vitals with `0` so downstream math stays total.
    pub fn sanitized(self) -> Self {
        Self {
            timestamp: self.timestamp.filter(|t| t.is_finite()),
            estimated_glucose: finite_or_zero(self.estimated_glucose),
            heart_rate: finite_or_zero(self.heart_rate),
            spo2: finite_or_zero(self.spo2),
        }
    }
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_glucose_is_invalid() {
        assert!(!Sample::new(Some(1.0), 0.0, 70.0, 98.0).is_valid());
        assert!(!Sample::new(Some(1.0), -3.0, 70.0, 98.0).is_valid());
        assert!(Sample::new(Some(1.0), 0.5, 70.0, 98.0).is_valid());
    }

    #[test]
    fn sanitized_zeroes_non_finite() {
        let s = Sample::new(Some(f64::NAN), f64::INFINITY, f64::NAN, 97.0).sanitized();
        assert_eq!(s.timestamp, None);
        assert_eq!(s.estimated_glucose, 0.0);
        assert_eq!(s.heart_rate, 0.0);
        assert_eq!(s.spo2, 97.0);
    }

    #[test]
    fn deserializes_feed_field_names() {
        let json = r#"{"timestamp": 1735689600, "estimated_glucose": 98, "heartRate": 72, "spo2": 97}"#;
        let s: Sample = serde_json::from_str(json).unwrap();
        assert_eq!(s, Sample::new(Some(1735689600.0), 98.0, 72.0, 97.0));
    }

    #[test]
    fn missing_fields_default_to_zero() {
        let s: Sample = serde_json::from_str(r#"{"estimated_glucose": 110}"#).unwrap();
        assert_eq!(s.timestamp, None);
        assert_eq!(s.heart_rate, 0.0);
        assert_eq!(s.spo2, 0.0);
    }
}
