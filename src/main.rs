use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use video_insights::advice::AdviceCatalog;
use video_insights::config::InsightsConfig;
use video_insights::metrics::read_videos;
use video_insights::report::VideoReport;
use video_insights::scoring::RankingOutcome;
use video_insights::{
    analyze_video, format_duration, format_float, format_number, format_percent, rank_videos,
    InsightsError,
};

#[derive(Parser)]
#[command(name = "video-insights", about = "Video performance scoring and advice")]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score a batch of videos and print the best performers
    Rank(RankArgs),
    /// Build a performance report with advice for each video
    Analyze(AnalyzeArgs),
    /// Inspect the advice catalog
    #[command(subcommand)]
    Catalog(CatalogCommand),
    /// Manage the configuration file
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Args, Debug, Clone)]
struct RankArgs {
    /// JSON file with one video or an array of videos; stdin when omitted
    #[arg(long)]
    input: Option<PathBuf>,
    #[arg(long)]
    top: Option<usize>,
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug, Clone)]
struct AnalyzeArgs {
    #[arg(long)]
    input: Option<PathBuf>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum CatalogCommand {
    /// Check that every advice category has at least one entry
    Check {
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Write the default configuration
    Init {
        #[arg(long, default_value = "config/insights.toml")]
        path: PathBuf,
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    load_dotenv();
    if let Err(err) = run() {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<(), InsightsError> {
    let cli = Cli::parse();
    let (config, _) = InsightsConfig::load(cli.config)?;
    init_logging(&config.logging.level);

    match cli.command {
        Command::Rank(args) => run_rank(args, config),
        Command::Analyze(args) => run_analyze(args, config),
        Command::Catalog(CatalogCommand::Check { dir }) => run_catalog_check(dir, &config),
        Command::Config(ConfigCommand::Init { path, force }) => run_config_init(&path, force),
    }
}

fn run_rank(args: RankArgs, mut config: InsightsConfig) -> Result<(), InsightsError> {
    if let Some(top) = args.top {
        config.ranking.top_n = top;
        config.validate()?;
    }

    let videos = read_videos(args.input.as_deref())?;
    let outcome = rank_videos(&videos, &config);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_ranking(&outcome);
    }
    Ok(())
}

fn print_ranking(outcome: &RankingOutcome) {
    println!(
        "Top {} of {} scored videos:",
        outcome.top.len(),
        outcome.scored
    );
    for (position, score) in outcome.top.iter().enumerate() {
        println!(
            "{:>3}. {}  score {} (engagement {} | subscriber conversion {})",
            position + 1,
            score.video_id,
            format_float(score.value, 2),
            format_percent(score.engagement_rate),
            format_percent(score.subscriber_conversion)
        );
    }

    if !outcome.excluded.is_empty() {
        println!("\nExcluded:");
        for exclusion in &outcome.excluded {
            println!("- {}: {}", exclusion.video_id, exclusion.reason);
        }
    }
}

fn run_analyze(args: AnalyzeArgs, mut config: InsightsConfig) -> Result<(), InsightsError> {
    if let Some(seed) = args.seed {
        config.advice.seed = Some(seed);
    }

    let videos = read_videos(args.input.as_deref())?;
    let catalog = Arc::new(AdviceCatalog::from_config(&config.advice));

    let mut reports = Vec::new();
    let mut failures = Vec::new();
    for video in &videos {
        match analyze_video(video, &config, catalog.clone()) {
            Ok(report) => reports.push(report),
            Err(err) => failures.push(err),
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            print_report(report);
        }
    }

    for err in &failures {
        eprintln!("Skipped: {}", err);
    }
    if reports.is_empty() {
        if let Some(err) = failures.into_iter().next() {
            return Err(err);
        }
    }
    Ok(())
}

fn print_report(report: &VideoReport) {
    println!("{} ({})", report.display_title(), report.video_id);
    println!("Performance score: {}", format_float(report.score.value, 2));
    println!(
        "Views: {} | engagement: {} ({})",
        format_number(report.views),
        format_number(report.engagement_count),
        report
            .engagement_rate
            .map(format_percent)
            .unwrap_or_else(|| "n/a".to_string())
    );
    println!(
        "Average watch time: {} ({}) | card clicks: {}",
        format_duration(report.average_view_duration),
        format_percent(report.average_view_percentage),
        format_percent(report.card_click_rate)
    );
    println!(
        "Retention: intro decline {} | sustained decline {}",
        signal_label(report.retention.intro_decline),
        signal_label(report.retention.sustained_decline)
    );
    for warning in &report.retention.warnings {
        println!("  warning: {}", warning);
    }

    if !report.advice.is_empty() {
        println!("\nAdvice:");
        for message in report.advice.messages() {
            println!("- {}", message);
        }
    }
    println!();
}

fn signal_label(signal: Option<bool>) -> &'static str {
    match signal {
        Some(true) => "yes",
        Some(false) => "no",
        None => "n/a",
    }
}

fn run_catalog_check(dir: Option<PathBuf>, config: &InsightsConfig) -> Result<(), InsightsError> {
    let catalog = match dir.or_else(|| config.advice.catalog_dir.clone()) {
        Some(dir) => AdviceCatalog::load_dir(&dir)?,
        None => AdviceCatalog::builtin(),
    };

    for category in video_insights::advice::AdviceCategory::ALL {
        let entries = catalog.pool(category).map_or(0, <[String]>::len);
        println!("{:<22} {} entries", category.key(), entries);
    }
    catalog.validate()
}

fn run_config_init(path: &Path, force: bool) -> Result<(), InsightsError> {
    if path.exists() && !force {
        return Err(InsightsError::Config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    InsightsConfig::default().write(path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_dotenv() {
    let _ = dotenvy::dotenv();
}
