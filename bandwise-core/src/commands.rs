use crate::eq::{Configuration, EqMode, HardwareBandDescriptor, Preset};

/// Commands sent from the host UI to the EQ engine
#[derive(Debug, Clone)]
pub enum EqCommand {
    /// Change resolution, carrying gains over by nearest frequency
    SwitchMode(EqMode),
    /// Set one band's gain in dB
    SetBandGain { band_id: usize, gain: f32 },
    /// Enable or disable a single band
    SetBandEnabled { band_id: usize, enabled: bool },
    /// Turn the whole EQ on or off
    SetActive(bool),
    /// Apply a preset authored for the current mode
    ApplyPreset(Preset),
    /// Convert a preset to the current mode, then apply it
    ConvertAndApplyPreset(Preset),
    /// Flatten every band of the current mode
    Reset,
    /// New hardware descriptor after an audio session (re)start
    RefreshHardware(HardwareBandDescriptor),
}

/// Responses sent from the EQ engine back to the host
#[derive(Debug, Clone)]
pub enum EqResponse {
    /// The configuration was replaced. `hardware_gains` is what the applier
    /// should push, `None` when no hardware descriptor is known yet.
    ConfigurationChanged {
        configuration: Configuration,
        hardware_gains: Option<Vec<f32>>,
    },
    /// The configuration changed but the hardware cannot take it. The host
    /// should fall back to a flat response or disable the effect.
    HardwareUnavailable {
        configuration: Configuration,
        reason: String,
    },
    /// The command was rejected, configuration unchanged
    Error(String),
}
