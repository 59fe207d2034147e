// Frequency ladder generation for the fixed EQ resolutions.
// Bands are placed on a log scale, matching how pitch is perceived.

use crate::error::EqError;
use crate::eq::mode::EqMode;

pub const MIN_FREQUENCY_HZ: f32 = 20.0;
pub const MAX_FREQUENCY_HZ: f32 = 20_000.0;

/// ISO third-octave center frequencies used to snap generated ladders.
pub const STANDARD_FREQUENCIES: [f32; 31] = [
    20.0, 25.0, 31.0, 40.0, 50.0, 63.0, 80.0, 100.0, 125.0, 160.0, 200.0, 250.0, 315.0, 400.0,
    500.0, 630.0, 800.0, 1000.0, 1250.0, 1600.0, 2000.0, 2500.0, 3150.0, 4000.0, 5000.0, 6300.0,
    8000.0, 10000.0, 12500.0, 16000.0, 20000.0,
];

/// Sub-bass, bass, mids, presence, air.
const FIVE_BAND_LADDER: [f32; 5] = [63.0, 250.0, 1000.0, 4000.0, 16000.0];

/// Classic octave-spaced graphic EQ.
const TEN_BAND_LADDER: [f32; 10] = [
    31.0, 63.0, 125.0, 250.0, 500.0, 1000.0, 2000.0, 4000.0, 8000.0, 16000.0,
];

/// Generate the ascending center-frequency list for `band_count` bands.
///
/// 5 and 10 bands use curated lists, 20 and 32 bands are log-uniform points
/// between 20 Hz and 20 kHz snapped to [`STANDARD_FREQUENCIES`]. Any other
/// count gets plain log-uniform spacing without snapping.
pub fn generate_ladder(band_count: usize) -> Result<Vec<f32>, EqError> {
    match band_count {
        5 => Ok(FIVE_BAND_LADDER.to_vec()),
        10 => Ok(TEN_BAND_LADDER.to_vec()),
        20 | 32 => snapped_ladder(band_count),
        _ => Ok(log_uniform(band_count)),
    }
}

/// Ladder for one of the built-in modes.
pub fn ladder_for_mode(mode: EqMode) -> Vec<f32> {
    let band_count = mode.band_count();
    match generate_ladder(band_count) {
        Ok(ladder) => ladder,
        Err(err) => {
            log::error!("ladder generation failed for {}: {}", mode, err);
            debug_assert!(false, "ladder generation failed for {mode}: {err}");
            log_uniform(band_count)
        }
    }
}

/// `band_count` points log-uniformly spaced between 20 Hz and 20 kHz inclusive.
pub fn log_uniform(band_count: usize) -> Vec<f32> {
    match band_count {
        0 => Vec::new(),
        1 => vec![MIN_FREQUENCY_HZ],
        _ => {
            let log_start = MIN_FREQUENCY_HZ.ln();
            let log_end = MAX_FREQUENCY_HZ.ln();
            let step = (log_end - log_start) / (band_count - 1) as f32;
            (0..band_count)
                .map(|i| (log_start + step * i as f32).exp())
                .collect()
        }
    }
}

/// Nearest standard frequency. Ties resolve to the lower one.
pub fn snap_to_standard(freq: f32) -> f32 {
    let mut best = STANDARD_FREQUENCIES[0];
    for &candidate in &STANDARD_FREQUENCIES[1..] {
        if (candidate - freq).abs() < (best - freq).abs() {
            best = candidate;
        }
    }
    best
}

fn snapped_ladder(band_count: usize) -> Result<Vec<f32>, EqError> {
    let mut ladder: Vec<f32> = Vec::with_capacity(band_count);

    for (index, freq) in log_uniform(band_count).into_iter().enumerate() {
        let snapped = snap_to_standard(freq);
        let value = match ladder.last().copied() {
            Some(prev) if snapped <= prev => {
                let remaining = band_count - index;
                next_unused_standard(prev, remaining)
                    .or_else(|| unsnapped_above(freq, prev))
                    .ok_or(EqError::FrequencyLadderOverflow { band_count, index })?
            }
            _ => snapped,
        };
        ladder.push(value);
    }

    Ok(ladder)
}

/// Next standard frequency above `prev`, provided the set still holds enough
/// values for every band left to place.
fn next_unused_standard(prev: f32, remaining: usize) -> Option<f32> {
    let mut above = STANDARD_FREQUENCIES.iter().copied().filter(|&f| f > prev);
    let first = above.next()?;
    // `first` counts toward the remaining bands too
    if 1 + above.count() >= remaining {
        Some(first)
    } else {
        None
    }
}

// The 32-band ladder has one more point than the standard set, so one
// collision keeps its own (whole Hz) position instead of shifting the rest up.
fn unsnapped_above(freq: f32, prev: f32) -> Option<f32> {
    let rounded = freq.round();
    (rounded > prev && rounded <= MAX_FREQUENCY_HZ).then_some(rounded)
}
