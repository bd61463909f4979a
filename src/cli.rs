use crate::config::{GenerationRequest, TargetManifest};
use crate::constants::{output, render};
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "faviforge", version)]
#[command(about = "🔥 Generate favicons and app icons from SVG files", long_about = None)]
pub struct Cli {
    /// Input SVG file (light mode)
    #[arg(short, long, value_name = "PATH")]
    pub input: PathBuf,

    /// Input SVG file for dark mode
    #[arg(long, value_name = "PATH")]
    pub input_dark: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, value_name = "DIR", default_value = output::DEFAULT_DIR)]
    pub output: PathBuf,

    /// Render density (DPI used for icons larger than 64px; smaller icons render denser)
    #[arg(
        short,
        long,
        default_value_t = render::DEFAULT_DENSITY,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub density: u32,

    /// Skip favicon.ico generation
    #[arg(long)]
    pub no_ico: bool,

    /// Directory for favicon.ico (defaults to the output directory)
    #[arg(long, value_name = "DIR")]
    pub favicon_dir: Option<PathBuf>,

    /// YAML file with `light` and `dark` target lists, replacing the built-in ones
    #[arg(short, long, value_name = "FILE")]
    pub targets: Option<PathBuf>,

    /// Exit with status 1 if any icon could not be generated
    #[arg(long)]
    pub strict: bool,
}

impl Cli {
    /// Turn command line options into a generation request
    ///
    /// Reads the target manifest when one is given; dark targets are only
    /// attached when a dark mode source is.
    pub fn to_request(&self) -> Result<GenerationRequest> {
        let manifest = match &self.targets {
            Some(path) => TargetManifest::load(path)?,
            None => TargetManifest::default(),
        };

        let mut request = GenerationRequest::new(&self.input, &self.output)
            .with_targets(manifest.light)
            .with_density(self.density)
            .with_favicon(!self.no_ico);

        if let Some(input_dark) = &self.input_dark {
            request = request.with_dark(input_dark, manifest.dark);
        }

        if let Some(favicon_dir) = &self.favicon_dir {
            request = request.with_favicon_dir(favicon_dir);
        }

        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{IconTarget, DARK_MODE_SIZES, DEFAULT_SIZES};
    use std::fs;
    use std::path::Path;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("faviforge").chain(args.iter().copied())).unwrap()
    }

    const MANIFEST: &str = "light:\n  - name: only-48.png\n    size: 48\ndark:\n  - name: only-dark-96.png\n    size: 96\n";

    #[test]
    fn test_defaults() {
        let request = parse(&["-i", "icon.svg"]).to_request().unwrap();

        assert_eq!(request.input, Path::new("icon.svg"));
        assert_eq!(request.output_dir, Path::new("public/icons"));
        assert_eq!(request.density, 300);
        assert_eq!(request.targets, DEFAULT_SIZES.to_vec());
        assert!(request.generate_favicon);
        assert_eq!(request.favicon_path(), Path::new("public/icons").join("favicon.ico"));
        assert!(request.dark_mode().is_none());
    }

    #[test]
    fn test_input_dark_uses_built_in_dark_targets() {
        let request = parse(&["-i", "icon.svg", "--input-dark", "dark.svg"])
            .to_request()
            .unwrap();

        let (input, targets) = request.dark_mode().expect("dark mode should be on");
        assert_eq!(input, Path::new("dark.svg"));
        assert_eq!(targets, DARK_MODE_SIZES);
    }

    #[test]
    fn test_manifest_replaces_both_lists() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("targets.yaml");
        fs::write(&manifest, MANIFEST).unwrap();
        let manifest = manifest.to_str().unwrap();

        let request = parse(&["-i", "icon.svg", "--input-dark", "dark.svg", "-t", manifest])
            .to_request()
            .unwrap();

        assert_eq!(request.targets, vec![IconTarget::new("only-48.png", 48)]);
        let (_, dark) = request.dark_mode().unwrap();
        assert_eq!(dark, &[IconTarget::new("only-dark-96.png", 96)]);
    }

    #[test]
    fn test_manifest_dark_list_ignored_without_dark_source() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("targets.yaml");
        fs::write(&manifest, MANIFEST).unwrap();

        let request = parse(&["-i", "icon.svg", "--targets", manifest.to_str().unwrap()])
            .to_request()
            .unwrap();

        assert!(request.input_dark.is_none());
        assert!(request.dark_targets.is_none());
        assert!(request.dark_mode().is_none());
    }

    #[test]
    fn test_invalid_manifest_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("targets.yaml");
        fs::write(&manifest, "light:\n  - name: a.png\n    size: 0\n").unwrap();

        let cli = parse(&["-i", "icon.svg", "-t", manifest.to_str().unwrap()]);
        assert!(cli.to_request().is_err());

        let cli = parse(&["-i", "icon.svg", "-t", "/nonexistent/targets.yaml"]);
        assert!(cli.to_request().is_err());
    }

    #[test]
    fn test_favicon_options() {
        let request = parse(&["-i", "icon.svg", "-o", "out", "--favicon-dir", "public"])
            .to_request()
            .unwrap();
        assert!(request.generate_favicon);
        assert_eq!(request.favicon_path(), Path::new("public").join("favicon.ico"));

        let request = parse(&["-i", "icon.svg", "--no-ico"]).to_request().unwrap();
        assert!(!request.generate_favicon);
    }

    #[test]
    fn test_density_and_output() {
        let request = parse(&["--input", "icon.svg", "--output", "dist", "-d", "150"])
            .to_request()
            .unwrap();
        assert_eq!(request.output_dir, Path::new("dist"));
        assert_eq!(request.density, 150);
    }

    #[test]
    fn test_rejects_bad_arguments() {
        let with_args = |args: &[&str]| {
            Cli::try_parse_from(std::iter::once("faviforge").chain(args.iter().copied()))
        };

        assert!(with_args(&[]).is_err());
        assert!(with_args(&["-i", "icon.svg", "-d", "0"]).is_err());
        assert!(with_args(&["-i", "icon.svg", "-d", "dense"]).is_err());
    }

    #[test]
    fn test_strict_flag() {
        assert!(!parse(&["-i", "icon.svg"]).strict);
        assert!(parse(&["-i", "icon.svg", "--strict"]).strict);
    }
}
