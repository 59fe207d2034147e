use crate::error::EqError;
use crate::eq::configuration::{Band, Configuration};
use crate::eq::converter::PresetConverter;
use crate::eq::mode::{EqMode, GainRange};
use crate::eq::preset::Preset;

/// Owns the single current [`Configuration`].
///
/// Every mutation builds a new configuration and swaps it in whole.
#[derive(Debug, Clone, Default)]
pub struct EqModeManager {
    current: Configuration,
    /// Name of the last preset applied, cleared by any manual edit
    active_preset: Option<String>,
}

impl EqModeManager {
    /// Start at the 32-band mode, flat.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mode: EqMode) -> Self {
        Self {
            current: Configuration::flat(mode),
            active_preset: None,
        }
    }

    pub fn current_configuration(&self) -> &Configuration {
        &self.current
    }

    pub fn current_mode(&self) -> EqMode {
        self.current.mode()
    }

    pub fn active_preset(&self) -> Option<&str> {
        self.active_preset.as_deref()
    }

    pub fn frequency_range(&self) -> (f32, f32) {
        self.current.frequency_range()
    }

    pub fn gain_range(&self) -> GainRange {
        self.current.mode().gain_range()
    }

    /// Move to another resolution, carrying each new band's gain over from
    /// the closest-frequency band of the current configuration.
    ///
    /// Lossy: going 32 -> 5 -> 32 does not bring back the original detail.
    pub fn switch_mode(&mut self, new_mode: EqMode) -> Configuration {
        if new_mode == self.current.mode() {
            log::debug!("already in {} mode", new_mode);
            return self.current.clone();
        }

        let mut next = Configuration::flat(new_mode).with_active(self.current.is_active());
        let carried = carry_over_gains(self.current.bands(), next.frequency_ladder());
        let enabled = carry_over_enabled(self.current.bands(), next.frequency_ladder());
        let carried_config = next.with_gains(&carried).and_then(|config| {
            enabled
                .iter()
                .enumerate()
                .filter(|(_, on)| !**on)
                .try_fold(config, |config, (band_id, _)| config.with_band_enabled(band_id, false))
        });
        next = match carried_config {
            Ok(config) => config,
            Err(err) => {
                // carried gains come from an already-validated configuration
                log::error!("gain carry-over failed: {}", err);
                next
            }
        };

        log::debug!(
            "switched EQ mode {} -> {} ({} bands)",
            self.current.mode(),
            new_mode,
            new_mode.band_count()
        );
        self.replace(next, None)
    }

    pub fn update_band_gain(&mut self, band_id: usize, gain: f32) -> Result<Configuration, EqError> {
        let next = self.current.with_band_gain(band_id, gain).inspect_err(|err| {
            log::warn!("rejected gain edit on band {}: {}", band_id, err);
        })?;
        log::debug!("band {} gain -> {:.1} dB", band_id, next.bands()[band_id].gain);
        Ok(self.replace(next, None))
    }

    pub fn set_band_enabled(&mut self, band_id: usize, enabled: bool) -> Result<Configuration, EqError> {
        let next = self.current.with_band_enabled(band_id, enabled)?;
        log::debug!("band {} enabled: {}", band_id, enabled);
        let preset = self.active_preset.take();
        Ok(self.replace(next, preset))
    }

    /// Turn the whole EQ on or off. Band state is kept.
    pub fn set_active(&mut self, is_active: bool) -> Configuration {
        let next = self.current.with_active(is_active);
        log::debug!("EQ active: {}", is_active);
        let preset = self.active_preset.take();
        self.replace(next, preset)
    }

    /// Apply a preset authored for the current mode.
    pub fn apply_preset(&mut self, preset: &Preset) -> Result<Configuration, EqError> {
        if preset.target_mode() != self.current.mode() {
            return Err(EqError::PresetModeMismatch {
                preset: preset.name().to_string(),
                preset_mode: preset.target_mode().to_string(),
                current: self.current.mode().to_string(),
            });
        }
        let next = self.current.with_gains(preset.bands())?;
        log::debug!("applied preset '{}' ({})", preset.name(), preset.target_mode());
        Ok(self.replace(next, Some(preset.name().to_string())))
    }

    /// Convert a preset to the current mode first if needed, then apply it.
    pub fn convert_and_apply(
        &mut self,
        preset: &Preset,
        converter: &PresetConverter,
    ) -> Result<Configuration, EqError> {
        let converted = converter.convert(preset, self.current.mode());
        self.apply_preset(&converted)
    }

    /// Flatten the current mode.
    pub fn reset(&mut self) -> Configuration {
        let next = Configuration::flat(self.current.mode()).with_active(self.current.is_active());
        log::debug!("reset {} EQ to flat", next.mode());
        self.replace(next, None)
    }

    fn replace(&mut self, next: Configuration, active_preset: Option<String>) -> Configuration {
        self.current = next;
        self.active_preset = active_preset;
        self.current.clone()
    }
}

/// For each target frequency, the gain of the closest source band.
/// Ties go to the lower-frequency band. Empty sources yield 0 dB.
pub fn carry_over_gains(source: &[Band], target_ladder: &[f32]) -> Vec<f32> {
    target_ladder
        .iter()
        .map(|&freq| nearest_band(source, freq).map_or(0.0, |band| band.gain))
        .collect()
}

/// Enabled flag of the closest source band, paired with [`carry_over_gains`]
/// so a muted region stays muted at the new resolution.
pub fn carry_over_enabled(source: &[Band], target_ladder: &[f32]) -> Vec<bool> {
    target_ladder
        .iter()
        .map(|&freq| nearest_band(source, freq).is_none_or(|band| band.enabled))
        .collect()
}

fn nearest_band(source: &[Band], freq: f32) -> Option<&Band> {
    let mut nearest: Option<&Band> = None;
    for band in source {
        let closer = match nearest {
            None => true,
            Some(best) => (band.frequency - freq).abs() < (best.frequency - freq).abs(),
        };
        if closer {
            nearest = Some(band);
        }
    }
    nearest
}
