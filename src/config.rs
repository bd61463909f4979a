use crate::constants::{favicon, render};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::borrow::Cow;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// One icon file to produce: its output name and its square pixel size
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct IconTarget {
    pub name: Cow<'static, str>,
    pub size: u32,
}

impl IconTarget {
    pub const fn new_static(name: &'static str, size: u32) -> Self {
        IconTarget {
            name: Cow::Borrowed(name),
            size,
        }
    }

    pub fn new(name: impl Into<String>, size: u32) -> Self {
        IconTarget {
            name: Cow::Owned(name.into()),
            size,
        }
    }
}

/// Light mode targets: favicons, Apple touch icon, and Android/PWA icons
pub const DEFAULT_SIZES: &[IconTarget] = &[
    IconTarget::new_static("icon-16x16.png", 16),
    IconTarget::new_static("icon-32x32.png", 32),
    IconTarget::new_static("apple-touch-icon.png", 180),
    IconTarget::new_static("android-chrome-192x192.png", 192),
    IconTarget::new_static("android-chrome-512x512.png", 512),
];

/// Dark mode targets, produced only when a dark mode source is given
pub const DARK_MODE_SIZES: &[IconTarget] = &[
    IconTarget::new_static("apple-touch-icon-dark.png", 180),
    IconTarget::new_static("android-chrome-192x192-dark.png", 192),
    IconTarget::new_static("android-chrome-512x512-dark.png", 512),
];

/// Target lists loaded from a YAML manifest
///
/// ```yaml
/// light:
///   - name: icon-16x16.png
///     size: 16
/// dark: []
/// ```
///
/// A missing list falls back to the built-in table; an empty `dark` list
/// turns dark mode output off.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct TargetManifest {
    #[serde(default = "default_light")]
    pub light: Vec<IconTarget>,
    #[serde(default = "default_dark")]
    pub dark: Vec<IconTarget>,
}

fn default_light() -> Vec<IconTarget> {
    DEFAULT_SIZES.to_vec()
}

fn default_dark() -> Vec<IconTarget> {
    DARK_MODE_SIZES.to_vec()
}

impl Default for TargetManifest {
    fn default() -> Self {
        TargetManifest {
            light: default_light(),
            dark: default_dark(),
        }
    }
}

impl TargetManifest {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read target manifest {}", path.display()))?;
        Self::from_yaml(&contents)
            .with_context(|| format!("Invalid target manifest {}", path.display()))
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        let manifest: TargetManifest =
            serde_yaml::from_str(contents).context("Failed to parse target manifest")?;

        // Validate after loading
        manifest.validate()?;

        Ok(manifest)
    }

    /// Validate target names and sizes
    pub fn validate(&self) -> Result<()> {
        validate_targets("light", &self.light)?;
        validate_targets("dark", &self.dark)?;
        Ok(())
    }
}

fn validate_targets(list: &str, targets: &[IconTarget]) -> Result<()> {
    let mut seen = HashSet::new();

    for target in targets {
        if target.name.trim().is_empty() {
            bail!("{} target name cannot be empty", list);
        }

        // Outputs are written flat into the output directory
        if target.name.contains(['/', '\\']) || target.name == "." || target.name == ".." {
            bail!("{} target name must be a plain file name: {}", list, target.name);
        }

        if target.size == 0 {
            bail!("{} target {} must have a size greater than 0", list, target.name);
        }
        if target.size > render::MAX_TARGET_SIZE {
            bail!(
                "{} target {} must have a size <= {}",
                list,
                target.name,
                render::MAX_TARGET_SIZE
            );
        }

        if !seen.insert(&*target.name) {
            bail!("{} target name is used more than once: {}", list, target.name);
        }
    }

    Ok(())
}

/// Everything one run needs, assembled once from the command line
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Light mode SVG; also the only source for favicon.ico
    pub input: PathBuf,
    /// Dark mode SVG
    pub input_dark: Option<PathBuf>,
    pub targets: Vec<IconTarget>,
    pub dark_targets: Option<Vec<IconTarget>>,
    pub output_dir: PathBuf,
    /// Where favicon.ico goes; `output_dir` when unset
    pub favicon_dir: Option<PathBuf>,
    pub density: u32,
    pub generate_favicon: bool,
}

impl GenerationRequest {
    /// Request with the built-in light targets, no dark mode, and favicon.ico enabled
    pub fn new(input: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        GenerationRequest {
            input: input.into(),
            input_dark: None,
            targets: DEFAULT_SIZES.to_vec(),
            dark_targets: None,
            output_dir: output_dir.into(),
            favicon_dir: None,
            density: render::DEFAULT_DENSITY,
            generate_favicon: true,
        }
    }

    pub fn with_targets(mut self, targets: Vec<IconTarget>) -> Self {
        self.targets = targets;
        self
    }

    pub fn with_dark(mut self, input_dark: impl Into<PathBuf>, dark_targets: Vec<IconTarget>) -> Self {
        self.input_dark = Some(input_dark.into());
        self.dark_targets = Some(dark_targets);
        self
    }

    pub fn with_density(mut self, density: u32) -> Self {
        self.density = density;
        self
    }

    pub fn with_favicon(mut self, generate_favicon: bool) -> Self {
        self.generate_favicon = generate_favicon;
        self
    }

    pub fn with_favicon_dir(mut self, favicon_dir: impl Into<PathBuf>) -> Self {
        self.favicon_dir = Some(favicon_dir.into());
        self
    }

    /// Dark mode source and targets, only when both are present and the list is non-empty
    pub fn dark_mode(&self) -> Option<(&Path, &[IconTarget])> {
        match (&self.input_dark, &self.dark_targets) {
            (Some(input), Some(targets)) if !targets.is_empty() => {
                Some((input.as_path(), targets.as_slice()))
            }
            _ => None,
        }
    }

    pub fn favicon_dir(&self) -> &Path {
        self.favicon_dir.as_deref().unwrap_or(&self.output_dir)
    }

    pub fn favicon_path(&self) -> PathBuf {
        self.favicon_dir().join(favicon::FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tables() {
        let sizes: Vec<u32> = DEFAULT_SIZES.iter().map(|t| t.size).collect();
        assert_eq!(sizes, vec![16, 32, 180, 192, 512]);

        let dark: Vec<u32> = DARK_MODE_SIZES.iter().map(|t| t.size).collect();
        assert_eq!(dark, vec![180, 192, 512]);

        assert!(TargetManifest::default().validate().is_ok());
    }

    #[test]
    fn test_manifest_missing_lists_fall_back_to_defaults() {
        let manifest = TargetManifest::from_yaml("light:\n  - name: a.png\n    size: 48\n").unwrap();
        assert_eq!(manifest.light, vec![IconTarget::new("a.png", 48)]);
        assert_eq!(manifest.dark, DARK_MODE_SIZES.to_vec());
    }

    #[test]
    fn test_manifest_empty_dark_list_is_kept() {
        let manifest = TargetManifest::from_yaml("dark: []\n").unwrap();
        assert_eq!(manifest.light, DEFAULT_SIZES.to_vec());
        assert!(manifest.dark.is_empty());
    }

    #[test]
    fn test_manifest_rejects_zero_size() {
        let err = TargetManifest::from_yaml("light:\n  - name: a.png\n    size: 0\n").unwrap_err();
        assert!(format!("{:#}", err).contains("greater than 0"));
    }

    #[test]
    fn test_manifest_rejects_oversized_target() {
        assert!(TargetManifest::from_yaml("light:\n  - name: a.png\n    size: 5000\n").is_err());
    }

    #[test]
    fn test_manifest_rejects_paths_in_names() {
        assert!(TargetManifest::from_yaml("light:\n  - name: ../a.png\n    size: 16\n").is_err());
        assert!(TargetManifest::from_yaml("dark:\n  - name: sub/a.png\n    size: 16\n").is_err());
        assert!(TargetManifest::from_yaml("light:\n  - name: \"\"\n    size: 16\n").is_err());
    }

    #[test]
    fn test_manifest_rejects_duplicate_names() {
        let yaml = "light:\n  - name: a.png\n    size: 16\n  - name: a.png\n    size: 32\n";
        let err = TargetManifest::from_yaml(yaml).unwrap_err();
        assert!(format!("{:#}", err).contains("more than once"));
    }

    #[test]
    fn test_manifest_rejects_bad_yaml() {
        assert!(TargetManifest::from_yaml("light: 12").is_err());
    }

    #[test]
    fn test_dark_mode_requires_source_and_targets() {
        let request = GenerationRequest::new("light.svg", "out");
        assert!(request.dark_mode().is_none());

        let request = GenerationRequest::new("light.svg", "out").with_dark("dark.svg", Vec::new());
        assert!(request.dark_mode().is_none());

        let mut request = GenerationRequest::new("light.svg", "out");
        request.dark_targets = Some(DARK_MODE_SIZES.to_vec());
        assert!(request.dark_mode().is_none());

        let request =
            GenerationRequest::new("light.svg", "out").with_dark("dark.svg", DARK_MODE_SIZES.to_vec());
        let (input, targets) = request.dark_mode().unwrap();
        assert_eq!(input, Path::new("dark.svg"));
        assert_eq!(targets.len(), 3);
    }

    #[test]
    fn test_favicon_dir_defaults_to_output_dir() {
        let request = GenerationRequest::new("light.svg", "out");
        assert_eq!(request.favicon_path(), Path::new("out").join("favicon.ico"));

        let request = request.with_favicon_dir("public");
        assert_eq!(request.favicon_path(), Path::new("public").join("favicon.ico"));
    }
}
