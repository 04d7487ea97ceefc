pub(crate) mod time_format;
pub use time_format::{EpochUnit, TimeFormatter};

pub(crate) mod hrv;
pub use hrv::HrvEstimator;

pub(crate) mod blood_pressure;
pub use blood_pressure::{BloodPressure, BloodPressureDeriver, BloodPressureParseError};

pub(crate) mod classifier;
pub use classifier::VitalsClassifier;

pub(crate) mod history;
pub use history::{HistoryWindow, TrendSummary, history_table, update_history};

pub(crate) mod vitals;
pub use vitals::{DerivedVitals, VitalBands, VitalsReport};

pub mod helpers;
