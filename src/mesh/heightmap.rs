use std::path::Path;

use image::DynamicImage;

use super::MeshError;
use crate::error::ReliefError;

/// A grid of 8-bit height samples, one per pixel.
///
/// Only the first channel of each source pixel is kept. Samples are stored
/// row-major: the sample for row `i`, column `j` sits at `i * width + j`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heightmap {
    width: u32,
    height: u32,
    samples: Vec<u8>,
}

impl Heightmap {
    /// Build a heightmap from an interleaved pixel buffer, keeping the first
    /// of `channels` bytes per pixel.
    ///
    /// # Errors
    ///
    /// Fails when either dimension is zero, `channels` is zero, or `pixels`
    /// is shorter than `width * height * channels`.
    pub fn from_pixels(
        width: u32,
        height: u32,
        channels: usize,
        pixels: &[u8],
    ) -> Result<Self, MeshError> {
        if width == 0 || height == 0 {
            return Err(MeshError::EmptyHeightmap);
        }
        if channels == 0 {
            return Err(MeshError::ZeroChannels);
        }
        let count = width as usize * height as usize;
        let expected = count * channels;
        if pixels.len() < expected {
            return Err(MeshError::PixelBufferTooSmall {
                expected,
                actual: pixels.len(),
            });
        }
        let samples = pixels[..expected].iter().step_by(channels).copied().collect();
        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// Build a heightmap by evaluating `f(row, column)` for every pixel.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::EmptyHeightmap`] when either dimension is zero.
    pub fn from_fn(
        width: u32,
        height: u32,
        mut f: impl FnMut(u32, u32) -> u8,
    ) -> Result<Self, MeshError> {
        if width == 0 || height == 0 {
            return Err(MeshError::EmptyHeightmap);
        }
        let mut samples = Vec::with_capacity(width as usize * height as usize);
        for i in 0..height {
            for j in 0..width {
                samples.push(f(i, j));
            }
        }
        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// Decode an image into a heightmap.
    ///
    /// 8-bit images contribute their first channel directly. Deeper formats
    /// (16-bit, float) are first reduced to 8-bit luma.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::EmptyHeightmap`] for a zero-sized image.
    pub fn from_image(image: &DynamicImage) -> Result<Self, MeshError> {
        let (width, height) = (image.width(), image.height());
        let color = image.color();
        let channels = usize::from(color.channel_count());
        if usize::from(color.bytes_per_pixel()) == channels {
            Self::from_pixels(width, height, channels, image.as_bytes())
        } else {
            let luma = image.to_luma8();
            Self::from_pixels(width, height, 1, luma.as_raw())
        }
    }

    /// Load and decode a heightmap image from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ReliefError::Image`] when the file cannot be read or decoded,
    /// or [`ReliefError::Mesh`] for a zero-sized image.
    pub fn open(path: &Path) -> Result<Self, ReliefError> {
        let image = image::open(path)?;
        let heightmap = Self::from_image(&image)?;
        log::info!(
            "Loaded heightmap {} ({}x{}, {} channel(s))",
            path.display(),
            heightmap.width,
            heightmap.height,
            image.color().channel_count()
        );
        Ok(heightmap)
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Sample at row `i`, column `j`, or `None` outside the grid.
    #[must_use]
    pub fn sample(&self, i: u32, j: u32) -> Option<u8> {
        if i >= self.height || j >= self.width {
            return None;
        }
        self.samples
            .get(i as usize * self.width as usize + j as usize)
            .copied()
    }

    /// All samples, row-major.
    #[must_use]
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }
}
