//! SVG rasterization into square, transparent-padded icons
//!
//! The SVG is first rendered at its render density into an intermediate
//! pixmap, then resampled down (or up) so it fits inside the target square
//! without cropping. Resampling happens on premultiplied pixels so that
//! transparent edges don't pick up dark fringes.

use crate::constants::render::{MAX_INTERMEDIATE_SIDE, NATURAL_DPI};
use crate::density::RenderPlan;
use anyhow::{bail, Context, Result};
use image::{imageops, ImageFormat, Rgba, RgbaImage};
use log::debug;
use resvg::tiny_skia::{self, PremultipliedColorU8};
use resvg::usvg;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Parses and renders SVG files with a shared font database
pub struct SvgRasterizer {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl SvgRasterizer {
    /// Rasterizer with system fonts loaded, so `<text>` elements render
    pub fn new() -> Self {
        let mut fontdb = usvg::fontdb::Database::new();
        fontdb.load_system_fonts();
        SvgRasterizer {
            fontdb: Arc::new(fontdb),
        }
    }

    /// Rasterizer without any fonts; text in the SVG is not drawn
    pub fn without_fonts() -> Self {
        SvgRasterizer {
            fontdb: Arc::new(usvg::fontdb::Database::new()),
        }
    }

    /// Read and parse an SVG file
    pub fn load(&self, path: &Path) -> Result<usvg::Tree> {
        let data = fs::read(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        // Relative image hrefs resolve against the SVG's own directory
        let options = usvg::Options {
            resources_dir: path.parent().map(Path::to_path_buf),
            fontdb: Arc::clone(&self.fontdb),
            ..Default::default()
        };

        usvg::Tree::from_data(&data, &options)
            .with_context(|| format!("Failed to parse SVG {}", path.display()))
    }

    /// Load `path` and render it according to `plan`
    pub fn render_file(&self, path: &Path, plan: &RenderPlan) -> Result<RgbaImage> {
        let tree = self.load(path)?;
        render_tree(&tree, plan)
    }
}

impl Default for SvgRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a parsed SVG into a `plan.size` square with transparent padding
pub fn render_tree(tree: &usvg::Tree, plan: &RenderPlan) -> Result<RgbaImage> {
    if plan.size == 0 {
        bail!("Icon size must be greater than 0");
    }
    let intermediate = rasterize_at_density(tree, plan.density)?;
    let fitted = fit_contain(&intermediate, plan.size, plan.kernel.filter_type());
    Ok(demultiply(fitted))
}

/// Render at `density` DPI, where 72 DPI is one pixel per SVG user unit
///
/// Returns premultiplied RGBA. The longest side is capped at
/// `MAX_INTERMEDIATE_SIDE`.
fn rasterize_at_density(tree: &usvg::Tree, density: u32) -> Result<RgbaImage> {
    let svg_size = tree.size();
    let (svg_w, svg_h) = (svg_size.width(), svg_size.height());

    let mut scale = density as f32 / NATURAL_DPI;
    let longest = svg_w.max(svg_h) * scale;
    if longest > MAX_INTERMEDIATE_SIDE as f32 {
        scale *= MAX_INTERMEDIATE_SIDE as f32 / longest;
    }

    let width = ((svg_w * scale).round() as u32).clamp(1, MAX_INTERMEDIATE_SIDE);
    let height = ((svg_h * scale).round() as u32).clamp(1, MAX_INTERMEDIATE_SIDE);

    debug!(
        "Rasterizing {}x{} SVG at {} DPI into {}x{} intermediate",
        svg_w, svg_h, density, width, height
    );

    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .with_context(|| format!("Failed to allocate {}x{} pixmap", width, height))?;
    resvg::render(
        tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );

    match RgbaImage::from_raw(width, height, pixmap.take()) {
        Some(image) => Ok(image),
        None => bail!("Pixmap size does not match {}x{}", width, height),
    }
}

/// Scale `source` to fit inside a `size` square and center it on a transparent canvas
///
/// Aspect ratio is kept; nothing is cropped. Works on premultiplied or
/// straight pixels alike, since the padding is all-zero in both.
pub fn fit_contain(source: &RgbaImage, size: u32, filter: imageops::FilterType) -> RgbaImage {
    let (src_w, src_h) = source.dimensions();
    let scale = f64::min(size as f64 / src_w as f64, size as f64 / src_h as f64);

    let fit_w = ((src_w as f64 * scale).round() as u32).clamp(1, size);
    let fit_h = ((src_h as f64 * scale).round() as u32).clamp(1, size);

    let resized = imageops::resize(source, fit_w, fit_h, filter);

    let mut canvas = RgbaImage::from_pixel(size, size, Rgba([0, 0, 0, 0]));
    let x = (size - fit_w) / 2;
    let y = (size - fit_h) / 2;
    imageops::replace(&mut canvas, &resized, x as i64, y as i64);

    canvas
}

/// Convert premultiplied RGBA back to straight alpha
fn demultiply(mut image: RgbaImage) -> RgbaImage {
    for pixel in image.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        // Resampling can push a color channel slightly past its alpha
        let color = PremultipliedColorU8::from_rgba(r.min(a), g.min(a), b.min(a), a)
            .map(|c| c.demultiply());
        pixel.0 = match color {
            Some(c) => [c.red(), c.green(), c.blue(), c.alpha()],
            None => [0, 0, 0, 0],
        };
    }
    image
}

/// Write an icon as PNG, whatever extension `path` has
pub fn write_png(image: &RgbaImage, path: &Path) -> Result<()> {
    image
        .save_with_format(path, ImageFormat::Png)
        .with_context(|| format!("Failed to write {}", path.display()))
}
