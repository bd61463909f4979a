use crate::constants::favicon::FRAME_SIZES;
use crate::density::RenderPlan;
use crate::raster::{render_tree, SvgRasterizer};
use anyhow::{Context, Result};
use image::RgbaImage;
use log::debug;
use std::fs;
use std::path::Path;

/// Pack RGBA frames into an ICO container, in the order given
pub fn bundle_ico(frames: &[RgbaImage]) -> Result<Vec<u8>> {
    let mut icon_dir = ico::IconDir::new(ico::ResourceType::Icon);

    for frame in frames {
        let (width, height) = frame.dimensions();
        let icon_image = ico::IconImage::from_rgba_data(width, height, frame.as_raw().clone());
        let entry = ico::IconDirEntry::encode(&icon_image)
            .with_context(|| format!("Failed to encode {}x{} ICO frame", width, height))?;
        icon_dir.add_entry(entry);
    }

    let mut buffer = Vec::new();
    icon_dir
        .write(&mut buffer)
        .context("Failed to write ICO container")?;
    Ok(buffer)
}

/// Render plans for the favicon frames, smallest first
///
/// Sizes are fixed; the configured target lists play no part. Densities come
/// from the same size mapping as every other target.
pub fn frame_plans(base_density: u32) -> Vec<RenderPlan> {
    FRAME_SIZES
        .iter()
        .map(|&size| RenderPlan::for_size(size, base_density))
        .collect()
}

/// Render the favicon frames from `source`, smallest first
pub fn render_frames(
    rasterizer: &SvgRasterizer,
    source: &Path,
    base_density: u32,
) -> Result<Vec<RgbaImage>> {
    let tree = rasterizer.load(source)?;

    frame_plans(base_density)
        .iter()
        .map(|plan| {
            debug!("favicon frame {}x{} at {} DPI", plan.size, plan.size, plan.density);
            render_tree(&tree, plan).with_context(|| {
                format!("Failed to render {}x{} favicon frame", plan.size, plan.size)
            })
        })
        .collect()
}

/// Render, bundle, and write favicon.ico to `output_path`
pub fn generate_favicon(
    rasterizer: &SvgRasterizer,
    source: &Path,
    output_path: &Path,
    base_density: u32,
) -> Result<()> {
    let frames = render_frames(rasterizer, source, base_density)?;
    let ico = bundle_ico(&frames)?;

    fs::write(output_path, ico)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    Ok(())
}
