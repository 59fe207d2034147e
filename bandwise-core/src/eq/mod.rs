pub mod analysis;
pub mod catalog;
pub mod configuration;
pub mod converter;
pub mod hardware;
pub mod ladder;
pub mod manager;
pub mod mode;
pub mod preset;

pub use analysis::{PresetCharacter, PresetCharacteristics, analyze_preset_characteristics};
pub use catalog::PresetCatalog;
pub use configuration::{Band, Configuration};
pub use converter::{ConversionStrategy, PresetConverter};
pub use hardware::{HardwareBandDescriptor, HardwareBandMapper};
pub use ladder::generate_ladder;
pub use manager::EqModeManager;
pub use mode::{EqMode, GainRange};
pub use preset::{Preset, PresetBuilder, PresetCategory};
