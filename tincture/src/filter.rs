//! Post-clustering filters applied to the raw palette
//!
//! Every filter preserves the relative order of the colors it keeps,
//! so the palette stays sorted by descending percentage.

use crate::{
	color::{color_distance, is_neutral, NEUTRAL_THRESHOLD},
	ExtractedColor, ExtractionOptions,
};
use palette::Srgb;

/// Drop colors covering less than `min_percentage` of the sampled pixels
fn above_threshold(colors: &mut Vec<ExtractedColor>, min_percentage: f64) {
	colors.retain(|color| color.percentage >= min_percentage);
}

/// Drop grays and near grays
fn without_neutral(colors: &mut Vec<ExtractedColor>) {
	colors.retain(|color| !is_neutral(color.rgb(), NEUTRAL_THRESHOLD));
}

/// The rounded color of an entry, as floating point channels
fn rgb_f64(color: &ExtractedColor) -> Srgb<f64> {
	let rgb = color.rgb();
	Srgb::new(f64::from(rgb.r), f64::from(rgb.g), f64::from(rgb.b))
}

/// Greedily keep each color only if it is at least `min_distance` away from every color kept before it
fn without_similar(colors: Vec<ExtractedColor>, min_distance: f64) -> Vec<ExtractedColor> {
	let mut kept: Vec<ExtractedColor> = Vec::with_capacity(colors.len());
	for color in colors {
		let rgb = rgb_f64(&color);
		if kept.iter().all(|other| color_distance(rgb, rgb_f64(other)) >= min_distance) {
			kept.push(color);
		}
	}
	kept
}

/// Apply the threshold, neutral, and similarity filters in that order, then truncate to `color_count`
///
/// `colors` must already be sorted by descending percentage.
/// Applying this function to its own output with the same options changes nothing.
#[must_use]
pub fn apply(mut colors: Vec<ExtractedColor>, options: &ExtractionOptions) -> Vec<ExtractedColor> {
	above_threshold(&mut colors, options.min_color_percentage);

	if !options.include_neutral {
		without_neutral(&mut colors);
	}

	if options.exclude_similar {
		colors = without_similar(colors, options.similarity_distance());
	}

	colors.truncate(options.color_count);
	colors
}

#[cfg(test)]
mod tests {
	use super::*;

	fn color(rgb: (u8, u8, u8), population: usize) -> ExtractedColor {
		let (r, g, b) = rgb;
		ExtractedColor::from_cluster(Srgb::new(f64::from(r), f64::from(g), f64::from(b)), population, 100, 100.0)
	}

	fn raw_palette() -> Vec<ExtractedColor> {
		vec![
			color((250, 10, 10), 30),
			color((128, 128, 128), 25),
			color((240, 20, 20), 20),
			color((10, 10, 250), 15),
			color((0, 200, 0), 6),
			color((255, 255, 255), 3),
			color((200, 100, 0), 1),
		]
	}

	fn hexes(colors: &[ExtractedColor]) -> Vec<&str> {
		colors.iter().map(ExtractedColor::hex).collect()
	}

	fn options() -> ExtractionOptions {
		ExtractionOptions {
			color_count: 10,
			min_color_percentage: 0.0,
			include_neutral: true,
			exclude_similar: false,
			..Default::default()
		}
	}

	#[test]
	fn threshold_drops_rare_colors() {
		let options = ExtractionOptions { min_color_percentage: 0.06, ..options() };
		let colors = apply(raw_palette(), &options);
		assert_eq!(hexes(&colors), vec!["#fa0a0a", "#808080", "#f01414", "#0a0afa", "#00c800"]);
	}

	#[test]
	fn neutral_colors_can_be_excluded() {
		let options = ExtractionOptions { include_neutral: false, ..options() };
		let colors = apply(raw_palette(), &options);
		assert_eq!(hexes(&colors), vec!["#fa0a0a", "#f01414", "#0a0afa", "#00c800", "#c86400"]);
	}

	#[test]
	fn similar_colors_are_merged_into_the_dominant_one() {
		// (1 - 0.5) * 100 = 50, and the two reds are ~17.3 apart
		let options = ExtractionOptions { exclude_similar: true, sensitivity: 0.5, ..options() };
		let colors = apply(raw_palette(), &options);
		assert_eq!(
			hexes(&colors),
			vec!["#fa0a0a", "#808080", "#0a0afa", "#00c800", "#ffffff", "#c86400"]
		);
	}

	#[test]
	fn lower_sensitivity_keeps_fewer_colors() {
		// merge distances of 10 and 100
		let sensitive = ExtractionOptions { exclude_similar: true, sensitivity: 0.9, ..options() };
		let insensitive = ExtractionOptions { exclude_similar: true, sensitivity: 0.0, ..options() };

		assert_eq!(apply(raw_palette(), &sensitive).len(), 7);
		assert!(apply(raw_palette(), &insensitive).len() < 7);
	}

	#[test]
	fn truncates_after_filtering() {
		let options = ExtractionOptions { color_count: 2, include_neutral: false, ..options() };
		let colors = apply(raw_palette(), &options);
		assert_eq!(hexes(&colors), vec!["#fa0a0a", "#f01414"]);
	}

	#[test]
	fn filtering_is_idempotent() {
		for include_neutral in [true, false] {
			for exclude_similar in [true, false] {
				for sensitivity in [0.0, 0.3, 0.8] {
					let options = ExtractionOptions {
						color_count: 4,
						min_color_percentage: 0.02,
						include_neutral,
						exclude_similar,
						sensitivity,
						..Default::default()
					};

					let once = apply(raw_palette(), &options);
					let twice = apply(once.clone(), &options);
					assert_eq!(once, twice);
				}
			}
		}
	}

	#[test]
	fn empty_palette() {
		assert!(apply(Vec::new(), &options()).is_empty());
	}
}
