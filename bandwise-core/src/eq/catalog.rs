// Built-in preset catalog.
//
// Each entry is authored once as a response curve of (Hz, dB) anchor points
// and sampled at every ladder it ships for, so all modes get a native
// preset with the same shape.

use std::collections::HashSet;

use strum::IntoEnumIterator;

use crate::eq::converter::interpolate_log;
use crate::eq::mode::EqMode;
use crate::eq::preset::{Preset, PresetCategory};

/// Modes an entry ships for.
#[derive(Debug, Clone, Copy)]
enum Availability {
    AllModes,
    /// 20 bands and up; coarser ladders cannot resolve the curve
    HighResolution,
}

impl Availability {
    fn includes(self, mode: EqMode) -> bool {
        match self {
            Availability::AllModes => true,
            Availability::HighResolution => mode.band_count() >= EqMode::TwentyBand.band_count(),
        }
    }
}

struct CatalogEntry {
    name: &'static str,
    description: &'static str,
    category: PresetCategory,
    tags: &'static [&'static str],
    curve: &'static [(f32, f32)],
    availability: Availability,
}

const BUILTIN_ENTRIES: &[CatalogEntry] = &[
    CatalogEntry {
        name: "Bass Boost",
        description: "Lifts sub-bass and bass, leaves mids and highs alone",
        category: PresetCategory::Enhancement,
        tags: &["bass", "warm", "boost"],
        curve: &[(31.0, 6.0), (63.0, 6.0), (250.0, 3.0), (1000.0, 0.0), (20000.0, 0.0)],
        availability: Availability::AllModes,
    },
    CatalogEntry {
        name: "Treble Boost",
        description: "Adds presence and air above 2 kHz",
        category: PresetCategory::Enhancement,
        tags: &["treble", "bright", "boost"],
        curve: &[(20.0, 0.0), (1000.0, 0.0), (4000.0, 3.0), (16000.0, 6.0), (20000.0, 6.0)],
        availability: Availability::AllModes,
    },
    CatalogEntry {
        name: "Loudness",
        description: "Compensates for low listening levels",
        category: PresetCategory::Enhancement,
        tags: &["bass", "treble", "boost", "low-volume"],
        curve: &[
            (20.0, 5.0),
            (63.0, 4.0),
            (250.0, 1.0),
            (1000.0, 0.0),
            (4000.0, 2.0),
            (16000.0, 4.0),
            (20000.0, 4.0),
        ],
        availability: Availability::AllModes,
    },
    CatalogEntry {
        name: "Rock",
        description: "Punchy lows, slightly recessed mids, crisp highs",
        category: PresetCategory::Genre,
        tags: &["rock", "guitar", "energetic"],
        curve: &[
            (20.0, 4.0),
            (63.0, 4.0),
            (250.0, 1.0),
            (1000.0, -1.0),
            (4000.0, 2.0),
            (16000.0, 4.0),
            (20000.0, 4.0),
        ],
        availability: Availability::AllModes,
    },
    CatalogEntry {
        name: "Pop",
        description: "Forward vocals with a gentle low-mid lift",
        category: PresetCategory::Genre,
        tags: &["pop", "vocal", "bright"],
        curve: &[
            (20.0, -1.0),
            (63.0, -1.0),
            (250.0, 2.0),
            (1000.0, 4.0),
            (4000.0, 2.0),
            (16000.0, -1.0),
            (20000.0, -1.0),
        ],
        availability: Availability::AllModes,
    },
    CatalogEntry {
        name: "Jazz",
        description: "Warm bottom end and smooth top",
        category: PresetCategory::Genre,
        tags: &["jazz", "acoustic", "warm"],
        curve: &[
            (20.0, 3.0),
            (63.0, 3.0),
            (250.0, 1.0),
            (1000.0, -1.0),
            (4000.0, 1.0),
            (16000.0, 3.0),
            (20000.0, 3.0),
        ],
        availability: Availability::AllModes,
    },
    CatalogEntry {
        name: "Classical",
        description: "Natural orchestral balance with extended highs",
        category: PresetCategory::Genre,
        tags: &["classical", "acoustic", "orchestral"],
        curve: &[
            (20.0, 4.0),
            (63.0, 3.0),
            (250.0, 0.0),
            (1000.0, 0.0),
            (4000.0, -1.0),
            (16000.0, 3.0),
            (20000.0, 3.0),
        ],
        availability: Availability::AllModes,
    },
    CatalogEntry {
        name: "Electronic",
        description: "Deep sub-bass and sparkling highs",
        category: PresetCategory::Genre,
        tags: &["electronic", "dance", "bass"],
        curve: &[
            (20.0, 6.0),
            (63.0, 5.0),
            (250.0, 0.0),
            (1000.0, -2.0),
            (4000.0, 2.0),
            (16000.0, 5.0),
            (20000.0, 5.0),
        ],
        availability: Availability::AllModes,
    },
    CatalogEntry {
        name: "Hip-Hop",
        description: "Heavy low end with clear vocals",
        category: PresetCategory::Genre,
        tags: &["hip-hop", "bass", "vocal"],
        curve: &[
            (20.0, 6.0),
            (63.0, 5.0),
            (250.0, 1.0),
            (1000.0, -1.0),
            (4000.0, 1.0),
            (16000.0, 2.0),
            (20000.0, 2.0),
        ],
        availability: Availability::AllModes,
    },
    CatalogEntry {
        name: "Vocal Clarity",
        description: "Pulls voices forward, trims rumble",
        category: PresetCategory::Speech,
        tags: &["vocal", "speech", "clarity"],
        curve: &[
            (20.0, -3.0),
            (63.0, -3.0),
            (250.0, -1.0),
            (1000.0, 3.0),
            (4000.0, 4.0),
            (16000.0, 0.0),
            (20000.0, 0.0),
        ],
        availability: Availability::AllModes,
    },
    CatalogEntry {
        name: "Podcast",
        description: "Tight low end and intelligible speech band",
        category: PresetCategory::Speech,
        tags: &["speech", "podcast", "clarity"],
        curve: &[
            (20.0, -6.0),
            (63.0, -5.0),
            (250.0, 0.0),
            (1000.0, 2.0),
            (4000.0, 3.0),
            (16000.0, -2.0),
            (20000.0, -2.0),
        ],
        availability: Availability::AllModes,
    },
    CatalogEntry {
        name: "Sub Rumble Cut",
        description: "Removes infrasonic rumble below 50 Hz",
        category: PresetCategory::Mastering,
        tags: &["mastering", "bass", "corrective"],
        curve: &[(20.0, -8.0), (31.0, -6.0), (50.0, -2.0), (80.0, 0.0), (20000.0, 0.0)],
        availability: Availability::HighResolution,
    },
    CatalogEntry {
        name: "De-Mud",
        description: "Narrow cut around the boxy 300 Hz region",
        category: PresetCategory::Mastering,
        tags: &["mastering", "mid", "corrective"],
        curve: &[(20.0, 0.0), (160.0, 0.0), (315.0, -3.0), (500.0, -2.0), (800.0, 0.0), (20000.0, 0.0)],
        availability: Availability::HighResolution,
    },
    CatalogEntry {
        name: "Air Lift",
        description: "Shelf-like lift of the top octave",
        category: PresetCategory::Mastering,
        tags: &["mastering", "treble", "air"],
        curve: &[(20.0, 0.0), (8000.0, 0.0), (12500.0, 2.0), (20000.0, 4.0)],
        availability: Availability::HighResolution,
    },
];

/// Read-only collection of presets, grouped by mode and category.
#[derive(Debug, Clone, Default)]
pub struct PresetCatalog {
    presets: Vec<Preset>,
}

impl PresetCatalog {
    /// The catalog that ships with the engine.
    pub fn builtin() -> Self {
        let mut presets = Vec::new();
        for mode in EqMode::iter() {
            presets.push(Preset::flat(mode));
            for entry in BUILTIN_ENTRIES.iter().filter(|e| e.availability.includes(mode)) {
                match sample_entry(entry, mode) {
                    Ok(preset) => presets.push(preset),
                    Err(err) => log::error!("skipping built-in preset '{}': {}", entry.name, err),
                }
            }
        }
        Self { presets }
    }

    pub fn from_presets(presets: Vec<Preset>) -> Self {
        Self { presets }
    }

    pub fn all(&self) -> &[Preset] {
        &self.presets
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    pub fn presets_for(&self, mode: EqMode) -> Vec<&Preset> {
        self.presets
            .iter()
            .filter(|preset| preset.target_mode() == mode)
            .collect()
    }

    pub fn by_category(&self, mode: EqMode, category: PresetCategory) -> Vec<&Preset> {
        self.presets
            .iter()
            .filter(|preset| preset.target_mode() == mode && preset.category() == category)
            .collect()
    }

    /// Case-insensitive name lookup within one mode.
    pub fn find_by_name(&self, mode: EqMode, name: &str) -> Option<&Preset> {
        let wanted = name.to_lowercase();
        self.presets
            .iter()
            .find(|preset| preset.target_mode() == mode && preset.name().to_lowercase() == wanted)
    }

    /// The mode's neutral preset: the first `Reference` entry.
    pub fn reference_preset(&self, mode: EqMode) -> Option<&Preset> {
        self.by_category(mode, PresetCategory::Reference)
            .into_iter()
            .next()
    }

    /// Categories with at least one preset in `mode`, in catalog order.
    pub fn categories_for(&self, mode: EqMode) -> Vec<PresetCategory> {
        let mut seen = HashSet::new();
        self.presets_for(mode)
            .into_iter()
            .map(|preset| preset.category())
            .filter(|category| seen.insert(*category))
            .collect()
    }
}

fn sample_entry(entry: &CatalogEntry, mode: EqMode) -> Result<Preset, crate::error::EqError> {
    let (freqs, gains): (Vec<f32>, Vec<f32>) = entry.curve.iter().copied().unzip();
    let bands: Vec<f32> = mode
        .ladder()
        .into_iter()
        .map(|freq| round_half_db(interpolate_log(&freqs, &gains, freq)))
        .collect();
    Preset::builtin(entry.name, entry.description, mode, entry.category, &bands, entry.tags)
}

fn round_half_db(gain: f32) -> f32 {
    (gain * 2.0).round() / 2.0
}
