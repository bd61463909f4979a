//! Icon generation orchestrator
//!
//! Runs the light mode targets, then the dark mode targets, then favicon.ico,
//! one file at a time. A failing target is logged and recorded; it never stops
//! the targets or stages after it.

use crate::config::{GenerationRequest, IconTarget};
use crate::density::RenderPlan;
use crate::favicon;
use crate::raster::{self, SvgRasterizer};
use anyhow::{Context, Result};
use log::{debug, error, info};
use std::fs;
use std::path::{Path, PathBuf};

/// Result of producing one icon target
#[derive(Debug)]
pub enum TargetOutcome {
    Generated {
        name: String,
        size: u32,
        path: PathBuf,
    },
    Failed {
        name: String,
        size: u32,
        reason: String,
    },
}

impl TargetOutcome {
    pub fn name(&self) -> &str {
        match self {
            TargetOutcome::Generated { name, .. } | TargetOutcome::Failed { name, .. } => name,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TargetOutcome::Generated { .. })
    }
}

/// Outcomes of one source rendered against one target list
#[derive(Debug)]
pub struct StageReport {
    pub label: &'static str,
    pub source: PathBuf,
    pub outcomes: Vec<TargetOutcome>,
}

impl StageReport {
    pub fn generated(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.generated()
    }
}

/// Result of the favicon.ico stage
#[derive(Debug)]
pub enum FaviconOutcome {
    Generated { path: PathBuf },
    Failed { path: PathBuf, reason: String },
}

/// Everything one run produced, stage by stage
#[derive(Debug)]
pub struct GenerationReport {
    pub light: StageReport,
    /// `None` when dark mode was not requested
    pub dark: Option<StageReport>,
    /// `None` when favicon.ico generation was disabled
    pub favicon: Option<FaviconOutcome>,
}

impl GenerationReport {
    pub fn stages(&self) -> impl Iterator<Item = &StageReport> {
        std::iter::once(&self.light).chain(self.dark.as_ref())
    }

    pub fn failure_count(&self) -> usize {
        let targets: usize = self.stages().map(StageReport::failed).sum();
        let favicon = matches!(self.favicon, Some(FaviconOutcome::Failed { .. }));
        targets + usize::from(favicon)
    }

    pub fn has_failures(&self) -> bool {
        self.failure_count() > 0
    }
}

/// Run a full generation request
///
/// Only failing to create the output directory is returned as an error;
/// every other failure, the favicon directory included, ends up in the report.
pub fn generate_icons(request: &GenerationRequest) -> Result<GenerationReport> {
    let rasterizer = SvgRasterizer::new();
    generate_icons_with(&rasterizer, request)
}

/// Same as [`generate_icons`], with a caller-provided rasterizer
pub fn generate_icons_with(
    rasterizer: &SvgRasterizer,
    request: &GenerationRequest,
) -> Result<GenerationReport> {
    ensure_dir(&request.output_dir)?;

    info!("☀️  Light mode icons:");
    let light = render_targets(
        rasterizer,
        "light",
        &request.input,
        &request.targets,
        &request.output_dir,
        request.density,
    );

    let dark = match request.dark_mode() {
        Some((input_dark, dark_targets)) => {
            info!("🌙 Dark mode icons:");
            Some(render_targets(
                rasterizer,
                "dark",
                input_dark,
                dark_targets,
                &request.output_dir,
                request.density,
            ))
        }
        None => None,
    };

    let favicon = if request.generate_favicon {
        info!("🎯 Generating favicon.ico...");
        Some(build_favicon(
            rasterizer,
            &request.input,
            request.favicon_dir(),
            &request.favicon_path(),
            request.density,
        ))
    } else {
        debug!("favicon.ico generation disabled");
        None
    };

    Ok(GenerationReport {
        light,
        dark,
        favicon,
    })
}

/// Render every target from `source` into `output_dir`, continuing past failures
pub fn render_targets(
    rasterizer: &SvgRasterizer,
    label: &'static str,
    source: &Path,
    targets: &[IconTarget],
    output_dir: &Path,
    base_density: u32,
) -> StageReport {
    let outcomes = targets
        .iter()
        .map(|target| render_target(rasterizer, source, target, output_dir, base_density))
        .collect();

    StageReport {
        label,
        source: source.to_path_buf(),
        outcomes,
    }
}

fn render_target(
    rasterizer: &SvgRasterizer,
    source: &Path,
    target: &IconTarget,
    output_dir: &Path,
    base_density: u32,
) -> TargetOutcome {
    let plan = RenderPlan::for_size(target.size, base_density);
    let path = output_dir.join(&*target.name);
    debug!(
        "{}: {}x{} at {} DPI with {:?}",
        target.name, plan.size, plan.size, plan.density, plan.kernel
    );

    let result = rasterizer
        .render_file(source, &plan)
        .and_then(|image| raster::write_png(&image, &path));

    match result {
        Ok(()) => {
            info!("✓ Generated {} ({}x{})", target.name, target.size, target.size);
            TargetOutcome::Generated {
                name: target.name.to_string(),
                size: target.size,
                path,
            }
        }
        Err(e) => {
            let reason = format!("{:#}", e);
            error!("✗ Failed to generate {}: {}", target.name, reason);
            TargetOutcome::Failed {
                name: target.name.to_string(),
                size: target.size,
                reason,
            }
        }
    }
}

fn build_favicon(
    rasterizer: &SvgRasterizer,
    source: &Path,
    dir: &Path,
    path: &Path,
    base_density: u32,
) -> FaviconOutcome {
    let result = ensure_dir(dir)
        .and_then(|()| favicon::generate_favicon(rasterizer, source, path, base_density));

    match result {
        Ok(()) => {
            info!("✓ Generated favicon.ico (16x16 + 32x32)");
            FaviconOutcome::Generated {
                path: path.to_path_buf(),
            }
        }
        Err(e) => {
            let reason = format!("{:#}", e);
            error!("✗ Failed to generate favicon.ico: {}", reason);
            FaviconOutcome::Failed {
                path: path.to_path_buf(),
                reason,
            }
        }
    }
}

fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))
}
