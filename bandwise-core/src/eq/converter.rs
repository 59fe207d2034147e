// Preset conversion between EQ resolutions.
//
// All curve math happens in log10(Hz), where equal distances are equal
// musical intervals.

use crate::eq::catalog::PresetCatalog;
use crate::eq::mode::{EqMode, MAX_GAIN_DB, MIN_GAIN_DB};
use crate::eq::preset::Preset;
use crate::settings::ConverterSettings;

/// How a curve is carried from one ladder to another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConversionStrategy {
    /// More target bands than source bands: log-domain linear interpolation
    Upscale,
    /// Fewer target bands: distance-weighted average of nearby source bands
    Downscale { radius: f32, weight_decay: f32 },
    /// Same band count, different ladder: same math as upscale
    Remap,
}

impl ConversionStrategy {
    pub fn for_counts(source_count: usize, target_count: usize, radius: f32, weight_decay: f32) -> Self {
        if target_count > source_count {
            ConversionStrategy::Upscale
        } else if target_count < source_count {
            ConversionStrategy::Downscale { radius, weight_decay }
        } else {
            ConversionStrategy::Remap
        }
    }
}

/// Gain at `target` Hz, linearly interpolated between the two bracketing
/// points in log10(Hz). Outside the source range the nearest endpoint gain
/// is held, there is no extrapolation. A NaN target has no position and
/// gives 0 dB.
pub fn interpolate_log(freqs: &[f32], gains: &[f32], target: f32) -> f32 {
    let len = freqs.len().min(gains.len());
    if len == 0 || target.is_nan() {
        return 0.0;
    }
    if target <= freqs[0] {
        return gains[0];
    }
    if target >= freqs[len - 1] {
        return gains[len - 1];
    }

    let upper = freqs[..len].partition_point(|&f| f < target);
    // target > freqs[0], so upper >= 1
    let lower = upper - 1;
    let (lo_f, hi_f) = (freqs[lower].log10(), freqs[upper].log10());
    let span = hi_f - lo_f;
    if span <= 0.0 {
        return gains[upper];
    }
    let t = (target.log10() - lo_f) / span;
    gains[lower] + t * (gains[upper] - gains[lower])
}

/// Weighted mean of the source gains within `radius` decades of `target`,
/// weight `exp(-weight_decay * |distance|)`. Nothing in range gives 0 dB.
pub fn weighted_average_log(
    freqs: &[f32],
    gains: &[f32],
    target: f32,
    radius: f32,
    weight_decay: f32,
) -> f32 {
    let target_log = target.log10();
    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;

    for (&freq, &gain) in freqs.iter().zip(gains) {
        let distance = (freq.log10() - target_log).abs();
        if distance <= radius {
            let weight = (-weight_decay * distance).exp();
            weighted_sum += weight * gain;
            weight_total += weight;
        }
    }

    if weight_total > 0.0 {
        weighted_sum / weight_total
    } else {
        0.0
    }
}

/// Carry a gain curve from one ladder to another. Output is clamped to the
/// engine gain range; a point that comes out non-finite is set to 0 dB.
pub fn convert_curve(
    source_freqs: &[f32],
    source_gains: &[f32],
    target_freqs: &[f32],
    strategy: ConversionStrategy,
) -> Vec<f32> {
    target_freqs
        .iter()
        .map(|&freq| {
            let gain = match strategy {
                ConversionStrategy::Upscale | ConversionStrategy::Remap => {
                    interpolate_log(source_freqs, source_gains, freq)
                }
                ConversionStrategy::Downscale {
                    radius,
                    weight_decay,
                } => weighted_average_log(source_freqs, source_gains, freq, radius, weight_decay),
            };
            if gain.is_finite() {
                gain.clamp(MIN_GAIN_DB, MAX_GAIN_DB)
            } else {
                0.0
            }
        })
        .collect()
}

/// Converts presets between modes and finds native look-alikes.
#[derive(Debug, Clone, Default)]
pub struct PresetConverter {
    settings: ConverterSettings,
}

impl PresetConverter {
    pub fn new(settings: ConverterSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ConverterSettings {
        &self.settings
    }

    /// Downscale influence radius in decades, narrower for finer targets.
    pub fn influence_radius(&self, target: EqMode) -> f32 {
        self.settings.influence_radius.for_mode(target)
    }

    /// A copy of `source` whose curve is valid for `target_mode`. Returns the
    /// source unchanged when it already targets that mode.
    pub fn convert(&self, source: &Preset, target_mode: EqMode) -> Preset {
        let source_mode = source.target_mode();
        if source_mode == target_mode {
            return source.clone();
        }

        let strategy = ConversionStrategy::for_counts(
            source_mode.band_count(),
            target_mode.band_count(),
            self.influence_radius(target_mode),
            self.settings.weight_decay,
        );
        let gains = convert_curve(
            &source_mode.ladder(),
            source.bands(),
            &target_mode.ladder(),
            strategy,
        );

        log::debug!(
            "converted preset '{}' {} -> {} ({:?})",
            source.name(),
            source_mode,
            target_mode,
            strategy
        );
        source.with_curve(target_mode, gains)
    }

    /// Pick the built-in preset of `target_mode` closest to `source`.
    ///
    /// An exact (case-insensitive) name match wins. Otherwise candidates in
    /// the same category are ranked by `shared_tags * 10 - edit_distance`,
    /// first one wins ties. With no same-category candidate, the mode's
    /// reference preset is returned. `None` only when the mode has no presets.
    pub fn find_best_matching_preset<'a>(
        &self,
        source: &Preset,
        target_mode: EqMode,
        catalog: &'a PresetCatalog,
    ) -> Option<&'a Preset> {
        if let Some(exact) = catalog.find_by_name(target_mode, source.name()) {
            return Some(exact);
        }

        let source_name = source.name().to_lowercase();
        let mut best: Option<(&Preset, i64)> = None;
        for candidate in catalog.by_category(target_mode, source.category()) {
            let shared = candidate.shared_tag_count(source) as i64;
            let distance = levenshtein(&candidate.name().to_lowercase(), &source_name) as i64;
            let score = shared * 10 - distance;
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((candidate, score));
            }
        }

        match best {
            Some((preset, score)) => {
                log::debug!(
                    "matched '{}' to '{}' in {} (score {})",
                    source.name(),
                    preset.name(),
                    target_mode,
                    score
                );
                Some(preset)
            }
            None => catalog
                .reference_preset(target_mode)
                .or_else(|| catalog.presets_for(target_mode).into_iter().next()),
        }
    }
}

/// Classic Levenshtein distance, counted in chars.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr = vec![0; b_chars.len() + 1];

    for (i, a_char) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, &b_char) in b_chars.iter().enumerate() {
            let cost = usize::from(a_char != b_char);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_chars.len()]
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::eq::preset::{PresetBuilder, PresetCategory};

    fn bass_boost_five() -> Preset {
        Preset::builtin(
            "Bass Boost",
            "",
            EqMode::FiveBand,
            PresetCategory::Enhancement,
            &[6.0, 3.0, 0.0, 0.0, 0.0],
            &["bass", "boost"],
        )
        .unwrap()
    }

    #[test]
    fn test_same_mode_returns_source() {
        let converter = PresetConverter::default();
        let preset = bass_boost_five();
        assert_eq!(converter.convert(&preset, EqMode::FiveBand), preset);
    }

    #[test]
    fn test_upscale_bass_boost_to_ten_band() {
        let converter = PresetConverter::default();
        let converted = converter.convert(&bass_boost_five(), EqMode::TenBand);

        assert_eq!(converted.target_mode(), EqMode::TenBand);
        assert_eq!(converted.name(), "Bass Boost");
        // 31 63 125 250 500 1k 2k 4k 8k 16k, source at 63 250 1k 4k 16k
        let expected = [6.0, 6.0, 4.508_672, 3.0, 1.5, 0.0, 0.0, 0.0, 0.0, 0.0];
        for (got, want) in converted.bands().iter().zip(expected) {
            assert_abs_diff_eq!(*got, want, epsilon = 1e-3);
        }
        for pair in converted.bands()[..5].windows(2) {
            assert!(pair[0] >= pair[1]);
        }
    }

    #[test]
    fn test_flat_is_fixed_point() {
        let converter = PresetConverter::default();
        let flat = Preset::flat(EqMode::FiveBand);
        let up = converter.convert(&flat, EqMode::ThirtyTwoBand);
        assert!(up.bands().iter().all(|&g| g == 0.0));
        let down = converter.convert(&up, EqMode::FiveBand);
        assert!(down.bands().iter().all(|&g| g == 0.0));
    }

    #[test]
    fn test_constant_curve_survives_downscale() {
        let converter = PresetConverter::default();
        let preset = PresetBuilder::new("Lift", EqMode::ThirtyTwoBand)
            .bands(vec![3.0; 32])
            .build()
            .unwrap();
        let down = converter.convert(&preset, EqMode::FiveBand);
        for gain in down.bands() {
            assert_abs_diff_eq!(*gain, 3.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_interpolation_clamps_to_endpoints() {
        let freqs = [100.0, 1000.0];
        let gains = [4.0, -2.0];
        assert_eq!(interpolate_log(&freqs, &gains, 20.0), 4.0);
        assert_eq!(interpolate_log(&freqs, &gains, 20000.0), -2.0);
        // midpoint in log space
        assert_abs_diff_eq!(
            interpolate_log(&freqs, &gains, 316.227_77),
            1.0,
            epsilon = 1e-3
        );
        assert_eq!(interpolate_log(&[], &[], 500.0), 0.0);
    }

    #[test]
    fn test_nan_frequencies_give_flat_gain() {
        let freqs = [100.0, 1000.0, 10000.0];
        let gains = [1.0, 2.0, 3.0];
        assert_eq!(interpolate_log(&freqs, &gains, f32::NAN), 0.0);

        let curve = convert_curve(&freqs, &gains, &[f32::NAN, 100.0], ConversionStrategy::Remap);
        assert_eq!(curve, vec![0.0, 1.0]);
        let down = convert_curve(
            &freqs,
            &gains,
            &[f32::NAN],
            ConversionStrategy::Downscale { radius: 0.5, weight_decay: 2.0 },
        );
        assert_eq!(down, vec![0.0]);
        let bad_source = convert_curve(&freqs, &[1.0, f32::NAN, 3.0], &[500.0], ConversionStrategy::Remap);
        assert_eq!(bad_source, vec![0.0]);
    }

    #[test]
    fn test_weighted_average_uses_exponential_weights() {
        let freqs = [100.0, 1000.0];
        let gains = [6.0, 0.0];
        // target 100 Hz: distances 0 and 1 decade
        let expected = 6.0 / (1.0 + (-2.0f32).exp());
        assert_abs_diff_eq!(
            weighted_average_log(&freqs, &gains, 100.0, 1.5, 2.0),
            expected,
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_downscale_without_contributors_is_flat() {
        let gains = weighted_average_log(&[20.0], &[9.0], 20000.0, 0.1, 2.0);
        assert_eq!(gains, 0.0);
    }

    #[test]
    fn test_downscale_output_clamped() {
        let out = convert_curve(
            &[100.0, 200.0],
            &[40.0, 40.0],
            &[150.0],
            ConversionStrategy::Downscale {
                radius: 1.0,
                weight_decay: 2.0,
            },
        );
        assert_eq!(out, vec![15.0]);
    }

    #[test]
    fn test_remap_interpolates_between_ladders() {
        let out = convert_curve(
            &[100.0, 1000.0, 10000.0],
            &[0.0, 6.0, 0.0],
            &[100.0, 316.227_77, 3162.277_7],
            ConversionStrategy::Remap,
        );
        assert_abs_diff_eq!(out[0], 0.0, epsilon = 1e-4);
        assert_abs_diff_eq!(out[1], 3.0, epsilon = 1e-3);
        assert_abs_diff_eq!(out[2], 3.0, epsilon = 1e-3);
    }

    #[test]
    fn test_strategy_selection() {
        assert_eq!(ConversionStrategy::for_counts(5, 10, 0.4, 2.0), ConversionStrategy::Upscale);
        assert_eq!(ConversionStrategy::for_counts(10, 10, 0.4, 2.0), ConversionStrategy::Remap);
        assert_eq!(
            ConversionStrategy::for_counts(32, 5, 0.8, 2.0),
            ConversionStrategy::Downscale {
                radius: 0.8,
                weight_decay: 2.0
            }
        );
    }

    #[test]
    fn test_influence_radius_per_mode() {
        let converter = PresetConverter::default();
        assert_eq!(converter.influence_radius(EqMode::FiveBand), 0.8);
        assert_eq!(converter.influence_radius(EqMode::TenBand), 0.4);
        assert_eq!(converter.influence_radius(EqMode::TwentyBand), 0.2);
        assert_eq!(converter.influence_radius(EqMode::ThirtyTwoBand), 0.1);
    }

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("", "rock"), 4);
        assert_eq!(levenshtein("jazz", "jazz"), 0);
        assert_eq!(levenshtein("bass boost", "bass"), 6);
    }

    #[test]
    fn test_exact_name_match_wins() {
        let converter = PresetConverter::default();
        let catalog = PresetCatalog::builtin();
        let source = PresetBuilder::new("ROCK", EqMode::FiveBand)
            .category(PresetCategory::Speech)
            .build()
            .unwrap();
        let found = converter
            .find_best_matching_preset(&source, EqMode::ThirtyTwoBand, &catalog)
            .unwrap();
        assert_eq!(found.name(), "Rock");
        assert_eq!(found.target_mode(), EqMode::ThirtyTwoBand);
    }

    #[test]
    fn test_category_match_ranked_by_tags_and_name() {
        let converter = PresetConverter::default();
        let catalog = PresetCatalog::builtin();
        let source = PresetBuilder::new("My Club Mix", EqMode::FiveBand)
            .category(PresetCategory::Genre)
            .tags(vec!["dance".to_string(), "electronic".to_string()])
            .build()
            .unwrap();
        let found = converter
            .find_best_matching_preset(&source, EqMode::TenBand, &catalog)
            .unwrap();
        assert_eq!(found.name(), "Electronic");
    }

    #[test]
    fn test_missing_category_falls_back_to_reference() {
        let converter = PresetConverter::default();
        let catalog = PresetCatalog::builtin();
        let source = catalog
            .find_by_name(EqMode::ThirtyTwoBand, "De-Mud")
            .unwrap()
            .clone();
        let found = converter
            .find_best_matching_preset(&source, EqMode::FiveBand, &catalog)
            .unwrap();
        assert_eq!(found.name(), "Flat");
        assert_eq!(found.target_mode(), EqMode::FiveBand);
    }

    #[test]
    fn test_empty_catalog_finds_nothing() {
        let converter = PresetConverter::default();
        let catalog = PresetCatalog::from_presets(Vec::new());
        assert!(converter
            .find_best_matching_preset(&bass_boost_five(), EqMode::TenBand, &catalog)
            .is_none());
    }
}
