use std::{cmp::Ordering, path::Path};

use anyhow::{Context, bail};
use glucosense_types::Sample;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A child of the feed node together with its key.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedRecord {
    pub key: String,
    pub sample: Sample,
}

#[derive(Deserialize)]
struct RawRecord {
    #[serde(default, deserialize_with = "lenient_number")]
    timestamp: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    estimated_glucose: Option<f64>,
    #[serde(
        default,
        rename = "heartRate",
        alias = "heart_rate",
        deserialize_with = "lenient_number"
    )]
    heart_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    spo2: Option<f64>,
}

impl From<RawRecord> for Sample {
    fn from(raw: RawRecord) -> Self {
        Sample::new(
            raw.timestamp,
            raw.estimated_glucose.unwrap_or_default(),
            raw.heart_rate.unwrap_or_default(),
            raw.spo2.unwrap_or_default(),
        )
        .sanitized()
    }
}

/// Accepts JSON numbers and numeric strings; anything else reads as missing.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Realtime Database child ordering: 32-bit integer keys first in numeric
/// order, then the rest lexicographically. Push ids sort chronologically.
fn key_order(a: &str, b: &str) -> Ordering {
    match (integer_key(a), integer_key(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Canonical decimal `i32` only: no sign prefix, no leading zeros.
fn integer_key(key: &str) -> Option<i32> {
    let digits = key.strip_prefix('-').unwrap_or(key);
    let canonical = !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && (digits == "0" || !digits.starts_with('0'))
        && key != "-0";

    if canonical { key.parse().ok() } else { None }
}

/// Flattens a feed node into records in arrival order.
///
/// The node is either an object keyed by push id or, when every key is a
/// small integer, an array. Children that are not objects are skipped.
pub fn parse_snapshot(value: Value) -> anyhow::Result<Vec<FeedRecord>> {
    let mut children: Vec<(String, Value)> = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Object(map) => map.into_iter().collect(),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        other => bail!("unexpected feed node: {other}"),
    };
    children.sort_by(|(a, _), (b, _)| key_order(a, b));

    let mut records = Vec::with_capacity(children.len());
    for (key, child) in children {
        match child {
            Value::Object(_) => match serde_json::from_value::<RawRecord>(child) {
                Ok(raw) => records.push(FeedRecord {
                    key,
                    sample: raw.into(),
                }),
                Err(error) => warn!("skipping feed record `{}`: {}", key, error),
            },
            Value::Null => {}
            other => warn!("skipping feed child `{}`: {}", key, other),
        }
    }

    Ok(records)
}

pub fn load_snapshot(path: &Path) -> anyhow::Result<Vec<FeedRecord>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot {}", path.display()))?;
    let value: Value = serde_json::from_str(&contents)
        .with_context(|| format!("invalid snapshot json in {}", path.display()))?;

    parse_snapshot(value)
}
