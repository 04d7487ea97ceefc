pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0_f64
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

pub fn round_float(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Rounds halves towards positive infinity, so `-2.5` becomes `-2`.
pub fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}
