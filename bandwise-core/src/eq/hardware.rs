// Reduces the UI curve to the bands the platform equalizer exposes.

use serde::{Deserialize, Serialize};

use crate::error::EqError;
use crate::eq::configuration::{Band, Configuration};
use crate::eq::mode::{MAX_GAIN_DB, MIN_GAIN_DB};

/// What the underlying equalizer supports. Supplied by the host when an
/// audio session starts and must be refreshed if the session changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardwareBandDescriptor {
    pub count: usize,
    /// Center frequency of each hardware band in Hz
    pub frequencies: Vec<f32>,
    /// `(min, max)` gain the hardware accepts, in dB
    pub gain_range_db: (f32, f32),
    /// Native gain step in dB, `None` when the platform does not say
    #[serde(default)]
    pub step_db: Option<f32>,
}

impl HardwareBandDescriptor {
    pub fn new(frequencies: Vec<f32>, gain_range_db: (f32, f32)) -> Self {
        Self {
            count: frequencies.len(),
            frequencies,
            gain_range_db,
            step_db: None,
        }
    }

    pub fn with_step(mut self, step_db: f32) -> Self {
        self.step_db = Some(step_db);
        self
    }

    /// Check the descriptor is self-consistent.
    pub fn validate(&self) -> Result<(), EqError> {
        if self.frequencies.len() != self.count {
            return Err(EqError::InvalidHardwareDescriptor(format!(
                "{} frequencies listed for {} bands",
                self.frequencies.len(),
                self.count
            )));
        }
        let (min_db, max_db) = self.gain_range_db;
        if !min_db.is_finite() || !max_db.is_finite() || min_db >= max_db {
            return Err(EqError::InvalidHardwareDescriptor(format!(
                "gain range [{}, {}] is empty",
                min_db, max_db
            )));
        }
        if let Some(step) = self.step_db {
            if !step.is_finite() || step <= 0.0 {
                return Err(EqError::InvalidHardwareDescriptor(format!(
                    "gain step {} must be positive",
                    step
                )));
            }
        }
        Ok(())
    }
}

/// Sizes of the contiguous UI band groups feeding each hardware band.
/// The remainder goes to the earliest groups: 32 over 5 is `[7, 7, 6, 6, 6]`.
pub fn group_sizes(ui_count: usize, hardware_count: usize) -> Vec<usize> {
    if hardware_count == 0 {
        return Vec::new();
    }
    let base = ui_count / hardware_count;
    let remainder = ui_count % hardware_count;
    (0..hardware_count)
        .map(|i| base + usize::from(i < remainder))
        .collect()
}

/// Arithmetic mean of each group of `gains`. An empty group averages to 0 dB.
pub fn group_averages(gains: &[f32], hardware_count: usize) -> Vec<f32> {
    let mut start = 0;
    group_sizes(gains.len(), hardware_count)
        .into_iter()
        .map(|size| {
            let group = &gains[start..start + size];
            start += size;
            if group.is_empty() {
                0.0
            } else {
                group.iter().sum::<f32>() / group.len() as f32
            }
        })
        .collect()
}

/// Rescale a gain from the engine range into `[min_db, max_db]`, round it
/// to the hardware step and clamp.
pub fn rescale_to_hardware(gain_db: f32, gain_range_db: (f32, f32), step_db: f32) -> f32 {
    let (min_db, max_db) = gain_range_db;
    let position = (gain_db - MIN_GAIN_DB) / (MAX_GAIN_DB - MIN_GAIN_DB);
    let scaled = min_db + position * (max_db - min_db);
    let stepped = (scaled / step_db).round() * step_db;
    stepped.clamp(min_db, max_db)
}

#[derive(Debug, Clone)]
pub struct HardwareBandMapper {
    default_step_db: f32,
}

impl Default for HardwareBandMapper {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl HardwareBandMapper {
    pub fn new(default_step_db: f32) -> Self {
        Self { default_step_db }
    }

    /// One hardware gain per hardware band, in the hardware's own range.
    /// Disabled UI bands count as 0 dB.
    pub fn map_to_hardware(
        &self,
        ui_bands: &[Band],
        descriptor: &HardwareBandDescriptor,
    ) -> Result<Vec<f32>, EqError> {
        self.check_supported(ui_bands.len(), descriptor)?;
        let gains: Vec<f32> = ui_bands.iter().map(Band::effective_gain).collect();
        let step = self.step_for(descriptor);

        Ok(group_averages(&gains, descriptor.count)
            .into_iter()
            .map(|avg| rescale_to_hardware(avg, descriptor.gain_range_db, step))
            .collect())
    }

    /// Map a whole configuration. A bypassed configuration maps every
    /// hardware band to the rescaled 0 dB point.
    pub fn map_configuration(
        &self,
        config: &Configuration,
        descriptor: &HardwareBandDescriptor,
    ) -> Result<Vec<f32>, EqError> {
        if config.is_active() {
            return self.map_to_hardware(config.bands(), descriptor);
        }
        self.check_supported(config.bands().len(), descriptor)?;
        let flat = rescale_to_hardware(0.0, descriptor.gain_range_db, self.step_for(descriptor));
        Ok(vec![flat; descriptor.count])
    }

    fn step_for(&self, descriptor: &HardwareBandDescriptor) -> f32 {
        descriptor.step_db.unwrap_or(self.default_step_db)
    }

    fn check_supported(&self, ui_count: usize, descriptor: &HardwareBandDescriptor) -> Result<(), EqError> {
        if descriptor.count == 0 || descriptor.count > ui_count {
            log::warn!(
                "hardware reports {} bands for a {}-band curve, refusing to map",
                descriptor.count,
                ui_count
            );
            return Err(EqError::UnsupportedHardwareBandCount {
                hardware: descriptor.count,
                ui: ui_count,
            });
        }
        descriptor.validate()?;
        let step = self.step_for(descriptor);
        if !step.is_finite() || step <= 0.0 {
            return Err(EqError::InvalidHardwareDescriptor(format!(
                "default gain step {} must be positive",
                step
            )));
        }
        Ok(())
    }
}
