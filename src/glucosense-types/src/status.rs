use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Display colour attached to a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Green,
    Yellow,
    Orange,
    Red,
}

/// Four-band glucose status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlucoseStatus {
    Low,
    Normal,
    Moderate,
    High,
}

impl GlucoseStatus {
    pub fn label(self) -> &'static str {
        match self {
            GlucoseStatus::Low => "Low",
            GlucoseStatus::Normal => "Normal",
            GlucoseStatus::Moderate => "Moderate",
            GlucoseStatus::High => "High",
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            GlucoseStatus::Low => Tone::Red,
            GlucoseStatus::Normal => Tone::Green,
            GlucoseStatus::Moderate => Tone::Yellow,
            GlucoseStatus::High => Tone::Orange,
        }
    }

    pub fn advice(self) -> &'static str {
        match self {
            GlucoseStatus::Low => "Eat or drink something sugary.",
            GlucoseStatus::Normal => "Stay hydrated and maintain lifestyle.",
            GlucoseStatus::Moderate => "Monitor carefully, consult if needed.",
            GlucoseStatus::High => "Seek professional medical help.",
        }
    }
}

impl Display for GlucoseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Two-band classification used for every vital other than glucose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VitalBand {
    Normal,
    Abnormal,
}

impl VitalBand {
    pub fn from_abnormal(abnormal: bool) -> Self {
        if abnormal {
            VitalBand::Abnormal
        } else {
            VitalBand::Normal
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            VitalBand::Normal => "Normal",
            VitalBand::Abnormal => "Abnormal",
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            VitalBand::Normal => Tone::Green,
            VitalBand::Abnormal => Tone::Red,
        }
    }
}

impl Display for VitalBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glucose_tones_follow_dashboard_colours() {
        assert_eq!(GlucoseStatus::Low.tone(), Tone::Red);
        assert_eq!(GlucoseStatus::Normal.tone(), Tone::Green);
        assert_eq!(GlucoseStatus::Moderate.tone(), Tone::Yellow);
        assert_eq!(GlucoseStatus::High.tone(), Tone::Orange);
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&GlucoseStatus::Moderate).unwrap();
        assert_eq!(json, "\"moderate\"");
        let json = serde_json::to_string(&VitalBand::Abnormal).unwrap();
        assert_eq!(json, "\"abnormal\"");
    }

    #[test]
    fn band_from_flag() {
        assert_eq!(VitalBand::from_abnormal(true), VitalBand::Abnormal);
        assert_eq!(VitalBand::from_abnormal(false).to_string(), "Normal");
    }
}
