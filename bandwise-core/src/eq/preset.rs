use serde::{Deserialize, Serialize};
use strum::EnumIter;

use crate::error::EqError;
use crate::eq::configuration::validate_gain;
use crate::eq::mode::EqMode;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, strum::Display, Serialize, Deserialize,
)]
pub enum PresetCategory {
    /// Neutral starting points such as Flat
    #[default]
    Reference,
    Genre,
    Enhancement,
    Speech,
    /// Fine corrective curves, only meaningful at high resolutions
    Mastering,
}

/// A named gain curve tied to one [`EqMode`].
///
/// The gain list has exactly `target_mode.band_count()` entries and means
/// nothing outside that mode; use the converter to move it elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPreset", into = "RawPreset")]
pub struct Preset {
    name: String,
    description: String,
    bands: Vec<f32>,
    target_mode: EqMode,
    category: PresetCategory,
    is_custom: bool,
    tags: Vec<String>,
}

impl Preset {
    /// The reference preset of a mode: every band at 0 dB.
    pub fn flat(mode: EqMode) -> Self {
        Self {
            name: "Flat".to_string(),
            description: "Neutral response, no coloration".to_string(),
            bands: vec![0.0; mode.band_count()],
            target_mode: mode,
            category: PresetCategory::Reference,
            is_custom: false,
            tags: vec!["reference".to_string(), "neutral".to_string()],
        }
    }

    pub(crate) fn builtin(
        name: &str,
        description: &str,
        mode: EqMode,
        category: PresetCategory,
        bands: &[f32],
        tags: &[&str],
    ) -> Result<Self, EqError> {
        PresetBuilder::new(name, mode)
            .description(description)
            .category(category)
            .bands(bands.to_vec())
            .tags(tags.iter().map(|tag| tag.to_string()).collect())
            .build()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn bands(&self) -> &[f32] {
        &self.bands
    }

    pub fn target_mode(&self) -> EqMode {
        self.target_mode
    }

    pub fn category(&self) -> PresetCategory {
        self.category
    }

    pub fn is_custom(&self) -> bool {
        self.is_custom
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Number of tags both presets carry, compared case-insensitively.
    pub fn shared_tag_count(&self, other: &Preset) -> usize {
        self.tags
            .iter()
            .filter(|tag| other.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)))
            .count()
    }

    /// Copy of this preset carrying a different curve in a different mode.
    pub(crate) fn with_curve(&self, target_mode: EqMode, bands: Vec<f32>) -> Self {
        Self {
            target_mode,
            bands,
            ..self.clone()
        }
    }

    pub fn to_json(&self) -> Result<String, EqError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, EqError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Decode a list of stored custom presets.
    pub fn list_from_json(json: &str) -> Result<Vec<Self>, EqError> {
        Ok(serde_json::from_str(json)?)
    }
}

pub struct PresetBuilder {
    name: String,
    target_mode: EqMode,
    description: String,
    bands: Option<Vec<f32>>,
    category: PresetCategory,
    is_custom: bool,
    tags: Vec<String>,
}

impl PresetBuilder {
    pub fn new(name: impl Into<String>, target_mode: EqMode) -> Self {
        Self {
            name: name.into(),
            target_mode,
            description: String::new(),
            bands: None,
            category: PresetCategory::default(),
            is_custom: false,
            tags: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn bands(mut self, bands: Vec<f32>) -> Self {
        self.bands = Some(bands);
        self
    }

    pub fn category(mut self, category: PresetCategory) -> Self {
        self.category = category;
        self
    }

    pub fn custom(mut self, is_custom: bool) -> Self {
        self.is_custom = is_custom;
        self
    }

    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Validate band count and gains. Missing bands default to flat.
    pub fn build(self) -> Result<Preset, EqError> {
        let expected = self.target_mode.band_count();
        let bands = self.bands.unwrap_or_else(|| vec![0.0; expected]);
        if bands.len() != expected {
            return Err(EqError::PresetBandCountMismatch {
                expected,
                actual: bands.len(),
            });
        }
        let bands = bands
            .into_iter()
            .map(validate_gain)
            .collect::<Result<Vec<f32>, EqError>>()?;

        Ok(Preset {
            name: self.name,
            description: self.description,
            bands,
            target_mode: self.target_mode,
            category: self.category,
            is_custom: self.is_custom,
            tags: self.tags,
        })
    }
}

#[derive(Serialize, Deserialize)]
struct RawPreset {
    name: String,
    #[serde(default)]
    description: String,
    bands: Vec<f32>,
    target_mode: EqMode,
    #[serde(default)]
    category: PresetCategory,
    #[serde(default)]
    is_custom: bool,
    #[serde(default)]
    tags: Vec<String>,
}

impl From<Preset> for RawPreset {
    fn from(preset: Preset) -> Self {
        Self {
            name: preset.name,
            description: preset.description,
            bands: preset.bands,
            target_mode: preset.target_mode,
            category: preset.category,
            is_custom: preset.is_custom,
            tags: preset.tags,
        }
    }
}

impl TryFrom<RawPreset> for Preset {
    type Error = EqError;

    fn try_from(raw: RawPreset) -> Result<Self, Self::Error> {
        PresetBuilder::new(raw.name, raw.target_mode)
            .description(raw.description)
            .bands(raw.bands)
            .category(raw.category)
            .custom(raw.is_custom)
            .tags(raw.tags)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_validates_band_count() {
        let result = PresetBuilder::new("Short", EqMode::TenBand)
            .bands(vec![1.0; 5])
            .build();
        assert_eq!(
            result,
            Err(EqError::PresetBandCountMismatch {
                expected: 10,
                actual: 5
            })
        );
    }

    #[test]
    fn test_builder_clamps_and_rejects_nan() {
        let preset = PresetBuilder::new("Loud", EqMode::FiveBand)
            .bands(vec![20.0, -20.0, 0.0, 0.0, 0.0])
            .build()
            .unwrap();
        assert_eq!(preset.bands()[..2], [15.0, -15.0]);

        let result = PresetBuilder::new("Broken", EqMode::FiveBand)
            .bands(vec![f32::NAN, 0.0, 0.0, 0.0, 0.0])
            .build();
        assert!(matches!(result, Err(EqError::GainOutOfRange(_))));
    }

    #[test]
    fn test_builder_defaults_to_flat() {
        let preset = PresetBuilder::new("Empty", EqMode::TwentyBand).build().unwrap();
        assert_eq!(preset.bands(), vec![0.0; 20].as_slice());
        assert!(!preset.is_custom());
        assert_eq!(preset.category(), PresetCategory::Reference);
    }

    #[test]
    fn test_shared_tags_ignore_case() {
        let a = Preset::builtin("A", "", EqMode::FiveBand, PresetCategory::Genre, &[0.0; 5], &["Bass", "warm", "rock"])
            .unwrap();
        let b = Preset::builtin("B", "", EqMode::TenBand, PresetCategory::Genre, &[0.0; 10], &["bass", "ROCK"])
            .unwrap();
        assert_eq!(a.shared_tag_count(&b), 2);
        assert_eq!(b.shared_tag_count(&Preset::flat(EqMode::TenBand)), 0);
    }

    #[test]
    fn test_json_round_trip_keeps_custom_preset() {
        let preset = PresetBuilder::new("My Curve", EqMode::FiveBand)
            .bands(vec![1.0, 2.0, 3.0, 2.0, 1.0])
            .category(PresetCategory::Enhancement)
            .custom(true)
            .tags(vec!["mine".to_string()])
            .build()
            .unwrap();
        let json = preset.to_json().unwrap();
        assert_eq!(Preset::from_json(&json).unwrap(), preset);
    }

    #[test]
    fn test_json_with_wrong_band_count_rejected() {
        let json = r#"{"name":"Bad","bands":[1.0,2.0],"target_mode":"TenBand"}"#;
        assert!(matches!(
            Preset::from_json(json),
            Err(EqError::PresetSerialization(_))
        ));
    }

    #[test]
    fn test_list_from_json() {
        let json = r#"[
            {"name":"One","bands":[0,0,0,0,0],"target_mode":"FiveBand","is_custom":true},
            {"name":"Two","bands":[1,1,1,1,1],"target_mode":"FiveBand","category":"Genre"}
        ]"#;
        let presets = Preset::list_from_json(json).unwrap();
        assert_eq!(presets.len(), 2);
        assert!(presets[0].is_custom());
        assert_eq!(presets[1].category(), PresetCategory::Genre);
    }
}
