mod sample;
pub use sample::Sample;

mod status;
pub use status::{GlucoseStatus, Tone, VitalBand};

mod history;
pub use history::{HistoryEntry, HistoryPoint};
