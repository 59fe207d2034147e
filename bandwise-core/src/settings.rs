//! Engine settings.
//!
//! The host owns storage and hands the settings over as TOML text.
//! Every field has a default, so an empty document is valid.

use serde::{Deserialize, Serialize};

use crate::eq::mode::EqMode;

/// Root settings structure
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Resolution the engine starts in
    pub default_mode: EqMode,
    pub converter: ConverterSettings,
    pub hardware: HardwareSettings,
}

impl EngineSettings {
    pub fn from_toml(toml_str: &str) -> anyhow::Result<Self> {
        let settings: EngineSettings = toml::from_str(toml_str)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values that would turn conversion or hardware mapping into NaN.
    pub fn validate(&self) -> anyhow::Result<()> {
        let radius = &self.converter.influence_radius;
        for (name, value) in [
            ("five_band", radius.five_band),
            ("ten_band", radius.ten_band),
            ("twenty_band", radius.twenty_band),
            ("thirty_two_band", radius.thirty_two_band),
        ] {
            anyhow::ensure!(
                value.is_finite() && value >= 0.0,
                "influence radius {} must be finite and non-negative, got {}",
                name,
                value
            );
        }
        let decay = self.converter.weight_decay;
        anyhow::ensure!(
            decay.is_finite() && decay >= 0.0,
            "weight_decay must be finite and non-negative, got {}",
            decay
        );
        let step = self.hardware.default_step_db;
        anyhow::ensure!(
            step.is_finite() && step > 0.0,
            "default_step_db must be finite and positive, got {}",
            step
        );
        Ok(())
    }

    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Preset conversion tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterSettings {
    /// Downscale influence radius in log10(Hz), per target mode
    pub influence_radius: InfluenceRadius,
    /// `k` in the downscale weight `exp(-k * |distance|)`
    pub weight_decay: f32,
}

impl Default for ConverterSettings {
    fn default() -> Self {
        Self {
            influence_radius: InfluenceRadius::default(),
            weight_decay: 2.0,
        }
    }
}

// Empirical values. Narrower as the target resolution grows, since the
// target bands sit closer together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfluenceRadius {
    pub five_band: f32,
    pub ten_band: f32,
    pub twenty_band: f32,
    pub thirty_two_band: f32,
}

impl InfluenceRadius {
    pub fn for_mode(&self, mode: EqMode) -> f32 {
        match mode {
            EqMode::FiveBand => self.five_band,
            EqMode::TenBand => self.ten_band,
            EqMode::TwentyBand => self.twenty_band,
            EqMode::ThirtyTwoBand => self.thirty_two_band,
        }
    }
}

impl Default for InfluenceRadius {
    fn default() -> Self {
        Self {
            five_band: 0.8,
            ten_band: 0.4,
            twenty_band: 0.2,
            thirty_two_band: 0.1,
        }
    }
}

/// Hardware mapping settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HardwareSettings {
    /// Gain step used when a descriptor does not report its own
    pub default_step_db: f32,
}

impl Default for HardwareSettings {
    fn default() -> Self {
        Self {
            default_step_db: 1.0,
        }
    }
}
