//! Size-dependent render settings
//!
//! Small icons lose detail fast, so they are rasterized from a much denser
//! intermediate and downsampled with a sharper kernel. Everything here is pure
//! and independent of the rasterizer.

use crate::constants::render::SMALL_ICON_MAX_SIZE;
use image::imageops::FilterType;

/// Effective render density for a target of `size` pixels
///
/// | size        | density   |
/// |-------------|-----------|
/// | ..=16       | base × 8  |
/// | 17..=32     | base × 6  |
/// | 33..=64     | base × 2  |
/// | 65..        | base      |
///
/// # Examples
///
/// ```
/// use faviforge::density::effective_density;
///
/// assert_eq!(effective_density(16, 300), 2400);
/// assert_eq!(effective_density(32, 300), 1800);
/// assert_eq!(effective_density(512, 300), 300);
/// ```
pub fn effective_density(size: u32, base: u32) -> u32 {
    let multiplier = match size {
        0..=16 => 8,
        17..=32 => 6,
        33..=64 => 2,
        _ => 1,
    };
    base.saturating_mul(multiplier)
}

/// Resampling kernel used to bring the intermediate raster down to target size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResampleKernel {
    /// Three-lobe Lanczos, for small icons where every pixel matters
    Lanczos3,
    /// Cubic Catmull-Rom, cheaper and close to a two-lobe Lanczos
    CatmullRom,
}

impl ResampleKernel {
    pub fn for_size(size: u32) -> Self {
        if size <= SMALL_ICON_MAX_SIZE {
            ResampleKernel::Lanczos3
        } else {
            ResampleKernel::CatmullRom
        }
    }

    pub fn filter_type(self) -> FilterType {
        match self {
            ResampleKernel::Lanczos3 => FilterType::Lanczos3,
            ResampleKernel::CatmullRom => FilterType::CatmullRom,
        }
    }
}

/// Everything the rasterizer needs to know about one target besides its source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderPlan {
    pub size: u32,
    pub density: u32,
    pub kernel: ResampleKernel,
}

impl RenderPlan {
    pub fn for_size(size: u32, base_density: u32) -> Self {
        RenderPlan {
            size,
            density: effective_density(size, base_density),
            kernel: ResampleKernel::for_size(size),
        }
    }
}
