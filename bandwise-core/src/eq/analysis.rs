use strum::Display;

use crate::eq::preset::Preset;

const BOOST_THRESHOLD_DB: f32 = 2.0;
const SCOOP_THRESHOLD_DB: f32 = -1.0;
const FLAT_TOLERANCE_DB: f32 = 0.5;

/// Overall tonal shape of a curve, for display and diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum PresetCharacter {
    #[strum(serialize = "Flat")]
    Flat,
    #[strum(serialize = "V-Shaped")]
    VShaped,
    #[strum(serialize = "Bass Heavy")]
    BassHeavy,
    #[strum(serialize = "Bright")]
    Bright,
    #[strum(serialize = "Scooped Mids")]
    Scooped,
    #[strum(serialize = "Mid Forward")]
    MidForward,
    #[strum(serialize = "Balanced")]
    Balanced,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresetCharacteristics {
    /// Mean gain of the first quarter of the bands
    pub bass_db: f32,
    /// Mean gain of the middle half
    pub mid_db: f32,
    /// Mean gain of the last quarter
    pub treble_db: f32,
    pub character: PresetCharacter,
}

impl PresetCharacteristics {
    pub fn label(&self) -> String {
        self.character.to_string()
    }
}

pub fn analyze_preset_characteristics(preset: &Preset) -> PresetCharacteristics {
    analyze_curve(preset.bands())
}

/// Split `gains` into bass (first quarter), mid (middle half) and treble
/// (last quarter), average each region and classify the shape.
pub fn analyze_curve(gains: &[f32]) -> PresetCharacteristics {
    let len = gains.len();
    // at least one band per edge region once there are three bands
    let quarter = if len >= 3 { (len / 4).max(1) } else { 0 };

    let bass_db = mean(&gains[..quarter]);
    let mid_db = mean(&gains[quarter..len - quarter]);
    let treble_db = mean(&gains[len - quarter..]);

    let character = if gains.iter().all(|gain| gain.abs() < FLAT_TOLERANCE_DB) {
        PresetCharacter::Flat
    } else if bass_db > BOOST_THRESHOLD_DB && treble_db > BOOST_THRESHOLD_DB {
        PresetCharacter::VShaped
    } else if bass_db > BOOST_THRESHOLD_DB {
        PresetCharacter::BassHeavy
    } else if treble_db > BOOST_THRESHOLD_DB {
        PresetCharacter::Bright
    } else if mid_db < SCOOP_THRESHOLD_DB {
        PresetCharacter::Scooped
    } else if mid_db > BOOST_THRESHOLD_DB {
        PresetCharacter::MidForward
    } else {
        PresetCharacter::Balanced
    };

    PresetCharacteristics {
        bass_db,
        mid_db,
        treble_db,
        character,
    }
}

fn mean(gains: &[f32]) -> f32 {
    if gains.is_empty() {
        0.0
    } else {
        gains.iter().sum::<f32>() / gains.len() as f32
    }
}
