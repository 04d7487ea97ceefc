use chrono::{DateTime, FixedOffset, Utc};

/// How a raw epoch number from the feed is interpreted.
///
/// The feed mixes second and millisecond timestamps, so `Auto` guesses from
/// the magnitude. Pin a concrete unit once the producer is consistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EpochUnit {
    #[default]
    Auto,
    Seconds,
    Milliseconds,
}

impl EpochUnit {
    /// Anything below this is taken to be seconds (10-digit epochs).
    pub const SECONDS_CUTOFF: f64 = 1e12;

    pub fn to_millis(self, epoch: f64) -> f64 {
        match self {
            EpochUnit::Auto if epoch < Self::SECONDS_CUTOFF => epoch * 1000.0,
            EpochUnit::Auto => epoch,
            EpochUnit::Seconds => epoch * 1000.0,
            EpochUnit::Milliseconds => epoch,
        }
    }
}

/// Renders feed timestamps as wall-clock strings in a fixed zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeFormatter {
    offset: FixedOffset,
    unit: EpochUnit,
}

impl TimeFormatter {
    /// `01 Jan 2025, 05:30:00 am`
    pub const DISPLAY_FORMAT: &'static str = "%d %b %Y, %I:%M:%S %P";

    /// Indian Standard Time, UTC+05:30.
    const IST_OFFSET_SECONDS: i32 = 5 * 3600 + 30 * 60;

    pub fn new(offset: FixedOffset, unit: EpochUnit) -> Self {
        Self { offset, unit }
    }

    pub fn ist() -> Self {
        let offset = FixedOffset::east_opt(Self::IST_OFFSET_SECONDS).expect("Invalid offset");
        Self::new(offset, EpochUnit::Auto)
    }

    pub fn with_unit(self, unit: EpochUnit) -> Self {
        Self { unit, ..self }
    }

    pub fn unit(&self) -> EpochUnit {
        self.unit
    }

    /// Resolves an epoch to an instant. Missing, non-finite, non-positive or
    /// out-of-range values yield `None`.
    pub fn resolve(&self, epoch: Option<f64>) -> Option<DateTime<Utc>> {
        let epoch = epoch.filter(|e| e.is_finite() && *e > 0.0)?;
        let millis = self.unit.to_millis(epoch).round();
        DateTime::from_timestamp_millis(millis as i64)
    }

    /// Formats `epoch`, falling back to the current time.
    pub fn format(&self, epoch: Option<f64>) -> String {
        self.format_or(epoch, Utc::now())
    }

    /// Formats `epoch`, falling back to `now` when it cannot be resolved.
    pub fn format_or(&self, epoch: Option<f64>, now: DateTime<Utc>) -> String {
        self.render(self.resolve(epoch).unwrap_or(now))
    }

    pub fn render(&self, time: DateTime<Utc>) -> String {
        time.with_timezone(&self.offset)
            .format(Self::DISPLAY_FORMAT)
            .to_string()
    }
}

impl Default for TimeFormatter {
    fn default() -> Self {
        Self::ist()
    }
}
