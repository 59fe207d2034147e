use approx::assert_abs_diff_eq;

use bandwise_core::commands::{EqCommand, EqResponse};
use bandwise_core::eq::hardware::group_sizes;
use bandwise_core::eq::{
    EqMode, HardwareBandDescriptor, Preset, PresetBuilder, PresetCategory, analyze_preset_characteristics,
    generate_ladder,
};
use bandwise_core::{EqEngine, SharedEqEngine};

fn bass_boost_five_band() -> Preset {
    PresetBuilder::new("Bass Boost", EqMode::FiveBand)
        .bands(vec![6.0, 3.0, 0.0, 0.0, 0.0])
        .category(PresetCategory::Enhancement)
        .tags(vec!["bass".to_string()])
        .build()
        .unwrap()
}

#[test]
fn test_ladders_are_deterministic_and_cover_the_spectrum() {
    for mode in EqMode::all() {
        let ladder = generate_ladder(mode.band_count()).unwrap();
        assert_eq!(ladder, EqEngine::generate_ladder(mode.band_count()).unwrap());
        assert_eq!(ladder.len(), mode.band_count());
        assert!(ladder.windows(2).all(|w| w[0] < w[1]));
    }
    let full = generate_ladder(32).unwrap();
    assert_eq!(full[0], 20.0);
    assert!(full[31] <= 20000.0);
}

#[test]
fn test_ten_band_edit_survives_switch_to_thirty_two() {
    let mut engine = EqEngine::new();
    engine.switch_mode(EqMode::TenBand);
    let id = engine
        .current_configuration()
        .bands()
        .iter()
        .position(|band| band.frequency == 1000.0)
        .unwrap();
    engine.update_band_gain(id, 5.0).unwrap();

    let config = engine.switch_mode(EqMode::ThirtyTwoBand);
    let band = config.bands().iter().find(|b| b.frequency == 1000.0).unwrap();
    assert_eq!(band.gain, 5.0);
}

#[test]
fn test_thirty_two_bands_group_onto_five_hardware_bands() {
    assert_eq!(group_sizes(32, 5), vec![7, 7, 6, 6, 6]);

    let mut engine = EqEngine::new();
    engine
        .set_hardware(HardwareBandDescriptor::new(
            vec![60.0, 230.0, 910.0, 3600.0, 14000.0],
            (-15.0, 15.0),
        ))
        .unwrap();
    assert_eq!(engine.map_to_hardware().unwrap(), vec![0.0; 5]);
}

#[test]
fn test_flat_round_trip_through_thirty_two_bands() {
    let engine = EqEngine::new();
    let flat = Preset::flat(EqMode::FiveBand);
    let up = engine.convert_preset(&flat, EqMode::ThirtyTwoBand);
    let down = engine.convert_preset(&up, EqMode::FiveBand);
    assert!(up.bands().iter().all(|&g| g == 0.0));
    assert!(down.bands().iter().all(|&g| g == 0.0));
}

#[test]
fn test_bass_boost_upscale_reference_vector() {
    let engine = EqEngine::new();
    let converted = engine.convert_preset(&bass_boost_five_band(), EqMode::TenBand);
    // log10 interpolation between 63 Hz (+6) and 250 Hz (+3) at 125 Hz:
    // 6 - 3 * log10(125 / 63) / log10(250 / 63)
    let expected = [6.0, 6.0, 4.5087, 3.0, 1.5, 0.0, 0.0, 0.0, 0.0, 0.0];
    for (got, want) in converted.bands().iter().zip(expected) {
        assert_abs_diff_eq!(*got, want, epsilon = 1e-3);
    }
}

#[test]
fn test_matching_falls_back_to_reference_preset() {
    let engine = EqEngine::new();
    let mastering = PresetBuilder::new("Glue", EqMode::ThirtyTwoBand)
        .category(PresetCategory::Mastering)
        .build()
        .unwrap();
    for mode in [EqMode::FiveBand, EqMode::TenBand] {
        let found = engine.find_best_matching_preset(&mastering, mode).unwrap();
        assert_eq!(found.name(), "Flat");
        assert_eq!(found.target_mode(), mode);
    }
    let native = engine
        .find_best_matching_preset(&mastering, EqMode::TwentyBand)
        .unwrap();
    assert_eq!(native.category(), PresetCategory::Mastering);
}

#[test]
fn test_preset_flow_through_commands() {
    let shared = SharedEqEngine::new(EqEngine::new());
    let updates = shared.subscribe();

    shared.send(EqCommand::RefreshHardware(HardwareBandDescriptor::new(
        vec![60.0, 230.0, 910.0, 3600.0, 14000.0],
        (-15.0, 15.0),
    )));
    shared.send(EqCommand::SwitchMode(EqMode::FiveBand));
    let response = shared.send(EqCommand::ApplyPreset(bass_boost_five_band()));

    match response {
        EqResponse::ConfigurationChanged {
            configuration,
            hardware_gains,
        } => {
            assert_eq!(configuration.gains(), vec![6.0, 3.0, 0.0, 0.0, 0.0]);
            assert_eq!(hardware_gains, Some(vec![6.0, 3.0, 0.0, 0.0, 0.0]));
        }
        other => panic!("unexpected response: {:?}", other),
    }
    assert_eq!(updates.try_iter().count(), 3);
    assert_eq!(
        shared.read(|engine| engine.active_preset().map(str::to_string)),
        Some("Bass Boost".to_string())
    );

    // a preset from another mode has to go through conversion
    let ten_band = PresetBuilder::new("Ten", EqMode::TenBand).build().unwrap();
    assert!(matches!(
        shared.send(EqCommand::ApplyPreset(ten_band.clone())),
        EqResponse::Error(_)
    ));
    assert!(matches!(
        shared.send(EqCommand::ConvertAndApplyPreset(ten_band)),
        EqResponse::ConfigurationChanged { .. }
    ));
}

#[test]
fn test_characteristics_of_converted_preset() {
    let engine = EqEngine::new();
    let converted = engine.convert_preset(&bass_boost_five_band(), EqMode::ThirtyTwoBand);
    let analysis = analyze_preset_characteristics(&converted);
    assert_eq!(analysis.label(), "Bass Heavy");
    assert!(analysis.bass_db > analysis.treble_db);
}
