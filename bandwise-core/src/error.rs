//! Error types for the equalizer engine.

use thiserror::Error;

/// Errors produced by ladder generation, configuration edits, preset
/// conversion and hardware band mapping.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EqError {
    /// An edit referenced a band outside `[0, band_count)`.
    #[error("band id {band_id} is out of range for a {band_count}-band configuration")]
    InvalidBandId { band_id: usize, band_count: usize },

    /// Inbound gain is not a usable number (NaN or infinite).
    #[error("gain {0} dB is not a finite value")]
    GainOutOfRange(f32),

    /// The hardware reports zero bands, or more bands than the UI curve has.
    #[error("hardware exposes {hardware} bands, cannot map a {ui}-band curve onto it")]
    UnsupportedHardwareBandCount { hardware: usize, ui: usize },

    /// Ladder generation ran out of distinct frequencies. Indicates a logic bug.
    #[error("frequency ladder for {band_count} bands overflowed at index {index}")]
    FrequencyLadderOverflow { band_count: usize, index: usize },

    /// A gain list does not have one entry per band of its mode.
    #[error("expected {expected} band gains, got {actual}")]
    PresetBandCountMismatch { expected: usize, actual: usize },

    /// A preset was applied directly to a configuration of another mode.
    #[error("preset '{preset}' targets {preset_mode}, current mode is {current}")]
    PresetModeMismatch {
        preset: String,
        preset_mode: String,
        current: String,
    },

    /// The hardware descriptor is internally inconsistent.
    #[error("invalid hardware descriptor: {0}")]
    InvalidHardwareDescriptor(String),

    /// A stored preset could not be encoded or decoded.
    #[error("preset serialization failed: {0}")]
    PresetSerialization(String),
}

impl From<serde_json::Error> for EqError {
    fn from(err: serde_json::Error) -> Self {
        EqError::PresetSerialization(err.to_string())
    }
}
