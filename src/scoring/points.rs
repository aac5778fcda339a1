//! Point values for matched runs.

/// Base points for a run of `length` tokens.
///
/// Runs shorter than three are worth nothing; past five each extra token
/// adds a flat hundred.
#[must_use]
pub fn point_value(length: usize) -> u64 {
    match length {
        0..=2 => 0,
        3 => 60,
        4 => 120,
        5 => 200,
        n => 300 + (n as u64 - 6) * 100,
    }
}

/// Points for a run scored at `multiplier`.
#[must_use]
pub fn match_score(length: usize, multiplier: u32) -> u64 {
    point_value(length) * u64::from(multiplier)
}
