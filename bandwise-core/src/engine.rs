use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Context;
use crossbeam_channel::{Receiver, Sender};

use crate::commands::{EqCommand, EqResponse};
use crate::error::EqError;
use crate::eq::{
    Configuration, EqMode, EqModeManager, GainRange, HardwareBandDescriptor, HardwareBandMapper,
    Preset, PresetCatalog, PresetConverter, ladder,
};
use crate::settings::EngineSettings;

/// The equalizer engine as seen by the host: current configuration,
/// preset catalog, conversion and hardware mapping in one owned value.
pub struct EqEngine {
    manager: EqModeManager,
    converter: PresetConverter,
    mapper: HardwareBandMapper,
    catalog: PresetCatalog,
    custom_presets: Vec<Preset>,
    hardware: Option<HardwareBandDescriptor>,
}

impl Default for EqEngine {
    fn default() -> Self {
        Self::with_settings(&EngineSettings::default())
    }
}

impl EqEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: &EngineSettings) -> Self {
        log::info!("starting EQ engine in {} mode", settings.default_mode);
        Self {
            manager: EqModeManager::with_mode(settings.default_mode),
            converter: PresetConverter::new(settings.converter.clone()),
            mapper: HardwareBandMapper::new(settings.hardware.default_step_db),
            catalog: PresetCatalog::builtin(),
            custom_presets: Vec::new(),
            hardware: None,
        }
    }

    pub fn from_settings_toml(toml_str: &str) -> anyhow::Result<Self> {
        let settings = EngineSettings::from_toml(toml_str).context("cannot parse EQ engine settings")?;
        Ok(Self::with_settings(&settings))
    }

    pub fn generate_ladder(band_count: usize) -> Result<Vec<f32>, EqError> {
        ladder::generate_ladder(band_count)
    }

    pub fn current_configuration(&self) -> &Configuration {
        self.manager.current_configuration()
    }

    pub fn current_mode(&self) -> EqMode {
        self.manager.current_mode()
    }

    pub fn active_preset(&self) -> Option<&str> {
        self.manager.active_preset()
    }

    pub fn frequency_range(&self) -> (f32, f32) {
        self.manager.frequency_range()
    }

    pub fn gain_range(&self) -> GainRange {
        self.manager.gain_range()
    }

    pub fn switch_mode(&mut self, mode: EqMode) -> Configuration {
        self.manager.switch_mode(mode)
    }

    pub fn update_band_gain(&mut self, band_id: usize, gain: f32) -> Result<Configuration, EqError> {
        self.manager.update_band_gain(band_id, gain)
    }

    pub fn set_band_enabled(&mut self, band_id: usize, enabled: bool) -> Result<Configuration, EqError> {
        self.manager.set_band_enabled(band_id, enabled)
    }

    pub fn set_active(&mut self, is_active: bool) -> Configuration {
        self.manager.set_active(is_active)
    }

    pub fn apply_preset(&mut self, preset: &Preset) -> Result<Configuration, EqError> {
        self.manager.apply_preset(preset)
    }

    pub fn convert_and_apply(&mut self, preset: &Preset) -> Result<Configuration, EqError> {
        self.manager.convert_and_apply(preset, &self.converter)
    }

    pub fn reset(&mut self) -> Configuration {
        self.manager.reset()
    }

    pub fn convert_preset(&self, source: &Preset, target_mode: EqMode) -> Preset {
        self.converter.convert(source, target_mode)
    }

    /// Native built-in preset of `target_mode` that best resembles `source`.
    pub fn find_best_matching_preset(&self, source: &Preset, target_mode: EqMode) -> Option<&Preset> {
        self.converter
            .find_best_matching_preset(source, target_mode, &self.catalog)
    }

    pub fn catalog(&self) -> &PresetCatalog {
        &self.catalog
    }

    /// Replace the user's stored presets. Storage belongs to the host.
    pub fn load_custom_presets(&mut self, presets: Vec<Preset>) {
        log::info!("loaded {} custom presets", presets.len());
        self.custom_presets = presets;
    }

    pub fn custom_presets(&self) -> &[Preset] {
        &self.custom_presets
    }

    /// Built-in then custom presets that apply directly to the current mode.
    pub fn presets_for_current_mode(&self) -> Vec<&Preset> {
        let mode = self.current_mode();
        let mut presets = self.catalog.presets_for(mode);
        presets.extend(
            self.custom_presets
                .iter()
                .filter(|preset| preset.target_mode() == mode),
        );
        presets
    }

    /// Install the descriptor of a (new) audio session.
    pub fn set_hardware(&mut self, descriptor: HardwareBandDescriptor) -> Result<(), EqError> {
        descriptor.validate()?;
        log::info!(
            "hardware equalizer: {} bands, range [{}, {}] dB",
            descriptor.count,
            descriptor.gain_range_db.0,
            descriptor.gain_range_db.1
        );
        self.hardware = Some(descriptor);
        Ok(())
    }

    pub fn hardware(&self) -> Option<&HardwareBandDescriptor> {
        self.hardware.as_ref()
    }

    /// Hardware gains for the current configuration.
    pub fn map_to_hardware(&self) -> Result<Vec<f32>, EqError> {
        let config = self.current_configuration();
        match &self.hardware {
            Some(descriptor) => self.mapper.map_configuration(config, descriptor),
            None => Err(EqError::UnsupportedHardwareBandCount {
                hardware: 0,
                ui: config.bands().len(),
            }),
        }
    }

    pub fn handle_command(&mut self, command: EqCommand) -> EqResponse {
        let result = match command {
            EqCommand::SwitchMode(mode) => Ok(self.switch_mode(mode)),
            EqCommand::SetBandGain { band_id, gain } => self.update_band_gain(band_id, gain),
            EqCommand::SetBandEnabled { band_id, enabled } => self.set_band_enabled(band_id, enabled),
            EqCommand::SetActive(is_active) => Ok(self.set_active(is_active)),
            EqCommand::ApplyPreset(preset) => self.apply_preset(&preset),
            EqCommand::ConvertAndApplyPreset(preset) => self.convert_and_apply(&preset),
            EqCommand::Reset => Ok(self.reset()),
            EqCommand::RefreshHardware(descriptor) => self
                .set_hardware(descriptor)
                .map(|_| self.current_configuration().clone()),
        };

        match result {
            Ok(configuration) => self.publish(configuration),
            Err(err) => {
                log::warn!("EQ command rejected: {}", err);
                EqResponse::Error(err.to_string())
            }
        }
    }

    fn publish(&self, configuration: Configuration) -> EqResponse {
        let Some(descriptor) = &self.hardware else {
            return EqResponse::ConfigurationChanged {
                configuration,
                hardware_gains: None,
            };
        };

        match self.mapper.map_configuration(&configuration, descriptor) {
            Ok(gains) => EqResponse::ConfigurationChanged {
                configuration,
                hardware_gains: Some(gains),
            },
            Err(err) => EqResponse::HardwareUnavailable {
                configuration,
                reason: err.to_string(),
            },
        }
    }
}

/// Thread-safe handle to one [`EqEngine`].
///
/// Commands run under a single lock, so readers see either the configuration
/// before a command or after it, never a mix. Every response is also sent to
/// the channels handed out by [`SharedEqEngine::subscribe`].
#[derive(Clone)]
pub struct SharedEqEngine {
    engine: Arc<Mutex<EqEngine>>,
    listeners: Arc<Mutex<Vec<Sender<EqResponse>>>>,
}

impl SharedEqEngine {
    pub fn new(engine: EqEngine) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            listeners: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn send(&self, command: EqCommand) -> EqResponse {
        // lock order: engine, then listeners; broadcast under the engine lock
        // so subscribers see responses in state-change order
        let mut engine = self.engine.lock().unwrap_or_else(PoisonError::into_inner);
        let response = engine.handle_command(command);

        let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        // drop listeners whose receiver is gone
        listeners.retain(|tx| tx.send(response.clone()).is_ok());
        drop(listeners);
        drop(engine);

        response
    }

    pub fn subscribe(&self) -> Receiver<EqResponse> {
        let (tx, rx) = crossbeam_channel::unbounded();
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }

    /// Snapshot of the current configuration.
    pub fn current_configuration(&self) -> Configuration {
        self.read(|engine| engine.current_configuration().clone())
    }

    /// Run `f` against the engine while holding the lock.
    pub fn read<R>(&self, f: impl FnOnce(&EqEngine) -> R) -> R {
        let engine = self.engine.lock().unwrap_or_else(PoisonError::into_inner);
        f(&engine)
    }
}
