//! Bounded pixel sampling from a raw RGBA buffer

use crate::{error::ExtractionError, Pixel};
use palette::Srgb;

/// Default approximate upper bound on the number of sampled pixels
///
/// Larger values give more accurate palettes at the cost of clustering time.
pub const DEFAULT_MAX_SAMPLES: usize = 10_000;

/// Pixels with an alpha below this value do not contribute to the palette
pub const MIN_ALPHA: u8 = 128;

/// Borrowed view of an interleaved RGBA image
#[derive(Debug, Clone, Copy)]
pub struct Raster<'a> {
	/// Width in pixels
	width: u32,
	/// Height in pixels
	height: u32,
	/// `width * height * 4` bytes in RGBA order
	pixels: &'a [u8],
}

impl<'a> Raster<'a> {
	/// Wrap an RGBA buffer, checking that its length matches the dimensions
	///
	/// # Errors
	/// Returns [`ExtractionError::BufferSize`] if `pixels.len() != width * height * 4`.
	pub fn new(width: u32, height: u32, pixels: &'a [u8]) -> Result<Self, ExtractionError> {
		let expected = num_pixels(width, height).saturating_mul(4);
		if pixels.len() == expected {
			Ok(Self { width, height, pixels })
		} else {
			Err(ExtractionError::BufferSize { expected, actual: pixels.len() })
		}
	}

	/// Width in pixels
	#[must_use]
	pub const fn width(&self) -> u32 {
		self.width
	}

	/// Height in pixels
	#[must_use]
	pub const fn height(&self) -> u32 {
		self.height
	}

	/// The raw RGBA bytes
	#[must_use]
	pub const fn as_raw(&self) -> &'a [u8] {
		self.pixels
	}

	/// Total number of pixels
	#[must_use]
	pub fn len(&self) -> usize {
		num_pixels(self.width, self.height)
	}

	/// Whether the image has no pixels
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl<'a> From<&'a image::RgbaImage> for Raster<'a> {
	fn from(image: &'a image::RgbaImage) -> Self {
		// an ImageBuffer always holds exactly width * height pixels
		Self {
			width: image.width(),
			height: image.height(),
			pixels: image.as_raw(),
		}
	}
}

/// `width * height` without overflowing on 32-bit targets
fn num_pixels(width: u32, height: u32) -> usize {
	let n = u64::from(width) * u64::from(height);
	usize::try_from(n).unwrap_or(usize::MAX)
}

/// The stride between sampled pixels so that at most about `max_samples` pixels are visited
#[must_use]
pub fn sample_rate(num_pixels: usize, max_samples: usize) -> usize {
	usize::max(1, num_pixels / max_samples.max(1))
}

/// Take every `sample_rate`-th pixel of the image, dropping mostly transparent ones
///
/// # Errors
/// Returns [`ExtractionError::EmptyPixelSet`] if no pixel survives,
/// either because the image is empty or because every sampled pixel is transparent.
pub fn sample_pixels(raster: &Raster<'_>, max_samples: usize) -> Result<Vec<Pixel>, ExtractionError> {
	let rate = sample_rate(raster.len(), max_samples);

	let pixels = raster
		.as_raw()
		.chunks_exact(4)
		.step_by(rate)
		.filter(|rgba| rgba[3] >= MIN_ALPHA)
		.map(|rgba| Srgb::new(rgba[0], rgba[1], rgba[2]))
		.collect::<Vec<_>>();

	tracing::debug!(rate, samples = pixels.len(), "sampled pixels");

	if pixels.is_empty() {
		Err(ExtractionError::EmptyPixelSet)
	} else {
		Ok(pixels)
	}
}
