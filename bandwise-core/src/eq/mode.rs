use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};

use crate::eq::ladder;

/// Lowest gain any band may hold, shared by all modes.
pub const MIN_GAIN_DB: f32 = -15.0;
/// Highest gain any band may hold, shared by all modes.
pub const MAX_GAIN_DB: f32 = 15.0;

/// Inclusive gain range in dB as `(min, max)`.
pub type GainRange = (f32, f32);

/// One of the fixed equalizer resolutions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, strum::Display, Serialize, Deserialize,
)]
pub enum EqMode {
    #[strum(serialize = "5-Band")]
    FiveBand,
    #[strum(serialize = "10-Band")]
    TenBand,
    #[strum(serialize = "20-Band")]
    TwentyBand,
    #[default]
    #[strum(serialize = "32-Band")]
    ThirtyTwoBand,
}

impl EqMode {
    /// All modes, ordered by resolution.
    pub fn all() -> Vec<EqMode> {
        EqMode::iter().collect()
    }

    pub const fn band_count(&self) -> usize {
        match self {
            EqMode::FiveBand => 5,
            EqMode::TenBand => 10,
            EqMode::TwentyBand => 20,
            EqMode::ThirtyTwoBand => 32,
        }
    }

    pub fn from_band_count(band_count: usize) -> Option<EqMode> {
        EqMode::iter().find(|mode| mode.band_count() == band_count)
    }

    pub fn display_name(&self) -> String {
        self.to_string()
    }

    pub const fn gain_range(&self) -> GainRange {
        (MIN_GAIN_DB, MAX_GAIN_DB)
    }

    /// Center frequencies (Hz) of this mode's bands, ascending.
    pub fn ladder(&self) -> Vec<f32> {
        ladder::ladder_for_mode(*self)
    }

    /// Next higher resolution, wrapping around to the lowest.
    pub fn next(&self) -> EqMode {
        let mut modes = EqMode::iter();
        for mode in modes.by_ref() {
            if mode == *self {
                break;
            }
        }
        modes.next().unwrap_or(EqMode::FiveBand)
    }

    /// Next lower resolution, wrapping around to the highest.
    pub fn prev(&self) -> EqMode {
        let modes: Vec<EqMode> = EqMode::iter().collect();
        match modes.iter().position(|mode| mode == self) {
            Some(0) | None => EqMode::ThirtyTwoBand,
            Some(i) => modes[i - 1],
        }
    }
}
