use anyhow::{Context, Result, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::fmt::SubscriberBuilder;

use covis::config::FileConfig;
use covis::coverage::{
    CoverageCheck, CoveragePolicy, CoverageReport, PropertyRatioCheck, SpaceReport,
    nearby_sources, write_report,
};
use covis::domain::Scene;

/// Check how much of every space is covered by nearby effect sources
///
/// Examples:
///   # Line-of-sight coverage with a 4m range, at least 80% required
///   covis --scene floor1.toml --policy occluded-within-area --range 4 --min-coverage 0.8
///
///   # Effect bending around corners, writing a JSON report
///   covis --scene floor1.json --policy distance-of-travel -o report.json
///
///   # Also compare property values (e.g. lumen per m2) against a 50% ratio
///   covis --scene floor1.toml --required-ratio 0.5 --use-multipliers
#[derive(Parser, Debug)]
#[command(name = "covis")]
#[command(version, about, long_about = None)]
struct Args {
    /// Scene file with spaces and sources (TOML, or JSON by extension)
    #[arg(long)]
    scene: PathBuf,

    /// Path to config file (optional, auto-searches covis.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// How sources cover a space
    #[arg(short = 'p', long, value_enum)]
    policy: Option<CoveragePolicy>,

    /// Effect range in model units
    #[arg(short = 'r', long)]
    range: Option<f64>,

    /// Minimum covered share of each space, 0.0 - 1.0
    #[arg(short = 'm', long)]
    min_coverage: Option<f64>,

    /// Required ratio of source values to the space value; 0 disables the check
    #[arg(long)]
    required_ratio: Option<f64>,

    /// Multiply source values by their multiplier in the ratio check
    #[arg(long)]
    use_multipliers: bool,

    /// Output JSON report path
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let total_start = Instant::now();

    let file_config = if let Some(ref config_path) = args.config {
        if config_path.exists() {
            FileConfig::from_path(config_path)
                .context(format!("Failed to load config file: {:?}", config_path))?
        } else {
            bail!("Config file not found: {:?}", config_path);
        }
    } else {
        FileConfig::load().unwrap_or_default()
    };

    let verbose = args.verbose || file_config.verbose;
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    println!("covis - Effective Coverage Area Check");
    println!("=====================================");
    println!();

    let spinner = create_spinner("Loading scene...");
    let scene = Scene::from_path(&args.scene)
        .with_context(|| format!("Failed to load scene: {}", args.scene.display()))?;
    scene.validate().context("Invalid scene")?;
    spinner.finish_with_message(format!(
        "Loaded {} spaces and {} sources",
        scene.spaces.len(),
        scene.sources.len()
    ));

    // Command line, then scene, then config file
    let policy = args
        .policy
        .or(scene.policy)
        .unwrap_or(file_config.policy);
    let effect_range = args
        .range
        .or(scene.effect_range)
        .unwrap_or(file_config.effect_range);
    let minimum_coverage = args
        .min_coverage
        .or(scene.minimum_coverage)
        .unwrap_or(file_config.minimum_coverage);
    let required_ratio = args.required_ratio.unwrap_or(file_config.required_ratio);
    let use_multipliers = args.use_multipliers || file_config.use_multipliers;
    let output = args.output.clone().or_else(|| file_config.output.clone());

    if scene.spaces.is_empty() {
        bail!("Scene contains no spaces to check");
    }

    let check = CoverageCheck::new(policy, effect_range, minimum_coverage)
        .context("Invalid rule parameters")?
        .with_settings(file_config.visibility);
    let property_check = PropertyRatioCheck::new(required_ratio).with_multipliers(use_multipliers);

    if verbose {
        println!("Configuration:");
        println!("  Policy: {}", policy);
        println!("  Effect range: {}", effect_range);
        println!("  Minimum coverage: {:.1}%", minimum_coverage * 100.0);
        if property_check.is_enabled() {
            println!("  Required property ratio: {:.1}%", required_ratio * 100.0);
        }
        println!("  Source samples per edge: {}", file_config.visibility.source_samples);
        if let Some(ref path) = output {
            println!("  Output: {}", path.display());
        }
        println!();
    }

    let mut reports = Vec::with_capacity(scene.spaces.len());
    for space in &scene.spaces {
        let spinner = create_spinner(&format!("Checking {}...", space.name));
        let start = Instant::now();

        let sources = nearby_sources(space, &scene.sources, effect_range);
        let outcome = check.check(space, &sources);
        let finding = property_check.check(space, &sources);

        let status = if outcome.is_violation() { "FAIL" } else { "ok" };
        spinner.finish_with_message(format!(
            "{} {}: {:.1}% covered by {} sources [{:.1}s]",
            status,
            space.name,
            outcome.coverage.ratio * 100.0,
            sources.len(),
            start.elapsed().as_secs_f32()
        ));
        if let Some(ref violation) = outcome.violation {
            println!("  {}", violation.summary());
        }
        if let Some(ref finding) = finding {
            println!("  {}", finding.summary());
        }

        reports.push(
            SpaceReport::new(space, &sources, &outcome, minimum_coverage).with_property_ratio(finding),
        );
    }

    let report = CoverageReport {
        policy,
        effect_range,
        minimum_coverage,
        spaces: reports,
    };

    if let Some(ref path) = output {
        let spinner = create_spinner("Writing report...");
        write_report(path, &report).context("Failed to write report")?;
        spinner.finish_with_message(format!("Wrote report to {}", path.display()));
    }

    println!();
    println!(
        "{} of {} spaces below minimum coverage. Total time: {:.1}s",
        report.violation_count(),
        report.spaces.len(),
        total_start.elapsed().as_secs_f32()
    );

    Ok(())
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
        pb.set_style(style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]));
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}
