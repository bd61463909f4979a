use anyhow::Result;
use clap::Parser;
use faviforge::cli::Cli;
use faviforge::generator::{self, FaviconOutcome, GenerationReport, TargetOutcome};
use std::io::Write;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging();

    let request = cli.to_request()?;

    println!("🔥 faviforge - Generating icons from SVG...");
    println!();

    let report = generator::generate_icons(&request)?;

    print_summary(&report);

    if cli.strict && report.has_failures() {
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}

/// Log to stdout so status lines interleave with the summary
/// Info lines are printed bare; other levels get a prefix
fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stdout)
        .format(|buf, record| {
            if record.level() == log::Level::Info {
                writeln!(buf, "{}", record.args())
            } else {
                writeln!(buf, "[{}] {}", record.level(), record.args())
            }
        })
        .init();
}

fn print_summary(report: &GenerationReport) {
    println!();
    println!("─────────────────────────────────────────────────────");

    for stage in report.stages() {
        println!(
            "{} ({}): {} generated, {} failed",
            stage.label,
            stage.source.display(),
            stage.generated(),
            stage.failed()
        );
        for outcome in &stage.outcomes {
            if let TargetOutcome::Failed { name, reason, .. } = outcome {
                println!("   ✗ {}: {}", name, reason);
            }
        }
    }

    match &report.favicon {
        Some(FaviconOutcome::Generated { path }) => println!("favicon: {}", path.display()),
        Some(FaviconOutcome::Failed { path, reason }) => {
            println!("favicon: ✗ {}: {}", path.display(), reason)
        }
        None => println!("favicon: skipped"),
    }

    println!("─────────────────────────────────────────────────────");
    println!();

    let failures = report.failure_count();
    if failures == 0 {
        println!("✨ All icons generated successfully!");
    } else {
        println!("✨ Done, with {} icon(s) that could not be generated", failures);
    }
}
