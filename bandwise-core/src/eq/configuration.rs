use serde::{Deserialize, Serialize};

use crate::error::EqError;
use crate::eq::mode::{EqMode, MAX_GAIN_DB, MIN_GAIN_DB};

/// Reject non-finite gains, clamp everything else into the engine range.
pub fn validate_gain(gain: f32) -> Result<f32, EqError> {
    if !gain.is_finite() {
        return Err(EqError::GainOutOfRange(gain));
    }
    Ok(gain.clamp(MIN_GAIN_DB, MAX_GAIN_DB))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    /// Position in the ladder, 0-based
    pub id: usize,
    /// Center frequency in Hz
    pub frequency: f32,
    /// Gain in dB, always within the mode's gain range
    pub gain: f32,
    pub enabled: bool,
}

impl Band {
    /// Gain that reaches the audio path. Disabled bands are flat.
    pub fn effective_gain(&self) -> f32 {
        if self.enabled { self.gain } else { 0.0 }
    }
}

/// A mode's ladder plus the per-band state.
///
/// Never edited in place: every `with_*` method returns a new value, so a
/// holder swapping the whole configuration never exposes a half-applied edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawConfiguration", into = "RawConfiguration")]
pub struct Configuration {
    mode: EqMode,
    frequency_ladder: Vec<f32>,
    bands: Vec<Band>,
    is_active: bool,
}

impl Configuration {
    /// All bands at 0 dB, enabled, EQ active.
    pub fn flat(mode: EqMode) -> Self {
        let ladder = mode.ladder();
        let bands = ladder
            .iter()
            .enumerate()
            .map(|(id, &frequency)| Band {
                id,
                frequency,
                gain: 0.0,
                enabled: true,
            })
            .collect();
        Self {
            mode,
            frequency_ladder: ladder,
            bands,
            is_active: true,
        }
    }

    /// Build a configuration from one gain per band. Gains are clamped,
    /// non-finite gains are rejected.
    pub fn from_gains(mode: EqMode, gains: &[f32]) -> Result<Self, EqError> {
        if gains.len() != mode.band_count() {
            return Err(EqError::PresetBandCountMismatch {
                expected: mode.band_count(),
                actual: gains.len(),
            });
        }
        let mut config = Self::flat(mode);
        for (band, &gain) in config.bands.iter_mut().zip(gains) {
            band.gain = validate_gain(gain)?;
        }
        Ok(config)
    }

    pub fn mode(&self) -> EqMode {
        self.mode
    }

    pub fn frequency_ladder(&self) -> &[f32] {
        &self.frequency_ladder
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    pub fn band(&self, band_id: usize) -> Option<&Band> {
        self.bands.get(band_id)
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn gains(&self) -> Vec<f32> {
        self.bands.iter().map(|band| band.gain).collect()
    }

    /// `(lowest, highest)` center frequency of the ladder.
    pub fn frequency_range(&self) -> (f32, f32) {
        let low = self.frequency_ladder.first().copied().unwrap_or(0.0);
        let high = self.frequency_ladder.last().copied().unwrap_or(0.0);
        (low, high)
    }

    /// True when every band sits at 0 dB.
    pub fn is_flat(&self) -> bool {
        self.bands.iter().all(|band| band.gain == 0.0)
    }

    pub fn with_band_gain(&self, band_id: usize, gain: f32) -> Result<Self, EqError> {
        self.check_band_id(band_id)?;
        let gain = validate_gain(gain)?;
        let mut next = self.clone();
        next.bands[band_id].gain = gain;
        Ok(next)
    }

    pub fn with_band_enabled(&self, band_id: usize, enabled: bool) -> Result<Self, EqError> {
        self.check_band_id(band_id)?;
        let mut next = self.clone();
        next.bands[band_id].enabled = enabled;
        Ok(next)
    }

    /// Replace every gain at once, keeping the enabled flags.
    pub fn with_gains(&self, gains: &[f32]) -> Result<Self, EqError> {
        if gains.len() != self.bands.len() {
            return Err(EqError::PresetBandCountMismatch {
                expected: self.bands.len(),
                actual: gains.len(),
            });
        }
        let mut next = self.clone();
        for (band, &gain) in next.bands.iter_mut().zip(gains) {
            band.gain = validate_gain(gain)?;
        }
        Ok(next)
    }

    pub fn with_active(&self, is_active: bool) -> Self {
        Self {
            is_active,
            ..self.clone()
        }
    }

    fn check_band_id(&self, band_id: usize) -> Result<(), EqError> {
        if band_id >= self.bands.len() {
            return Err(EqError::InvalidBandId {
                band_id,
                band_count: self.bands.len(),
            });
        }
        Ok(())
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::flat(EqMode::default())
    }
}

// Wire shape for (de)serialization. Stored configurations are re-derived
// from their mode so a stale ladder on disk cannot break the invariants.
#[derive(Serialize, Deserialize)]
struct RawConfiguration {
    mode: EqMode,
    frequency_ladder: Vec<f32>,
    bands: Vec<Band>,
    is_active: bool,
}

impl From<Configuration> for RawConfiguration {
    fn from(config: Configuration) -> Self {
        Self {
            mode: config.mode,
            frequency_ladder: config.frequency_ladder,
            bands: config.bands,
            is_active: config.is_active,
        }
    }
}

impl TryFrom<RawConfiguration> for Configuration {
    type Error = EqError;

    fn try_from(raw: RawConfiguration) -> Result<Self, Self::Error> {
        let gains: Vec<f32> = raw.bands.iter().map(|band| band.gain).collect();
        let mut config = Configuration::from_gains(raw.mode, &gains)?;
        for (band, stored) in config.bands.iter_mut().zip(&raw.bands) {
            band.enabled = stored.enabled;
        }
        config.is_active = raw.is_active;
        Ok(config)
    }
}
