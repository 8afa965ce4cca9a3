use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use futures::StreamExt;
use strum::IntoEnumIterator;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use ttrm_stats::replay::discover_replays;
use ttrm_stats::{
    aggregate, AggregateResult, AnalyzerConfig, BatchOrchestrator, CancellationFlag,
    FsCacheStore, Metric, ProcessedFile, ProfileBook, ResultCache,
};

#[derive(Debug, Parser)]
#[command(name = "ttrm-stats")]
#[command(about = "Per-player statistics from versus replay files", long_about = None)]
struct Cli {
    /// Replay files, or folders containing `.ttrm` replays
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Where computed results are cached (overrides TTRM_CACHE_DIR)
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Files per progress step (overrides TTRM_BATCH_SIZE)
    #[arg(long)]
    batch_size: Option<usize>,

    /// Concurrent extractions (overrides TTRM_WORKERS)
    #[arg(long)]
    workers: Option<usize>,

    /// Ignore cached results and analyze every file again
    #[arg(long)]
    reprocess: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ttrm_stats=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = AnalyzerConfig::from_env().context("invalid environment configuration")?;
    if let Some(cache_dir) = cli.cache_dir {
        config.cache_dir = cache_dir;
    }
    if let Some(batch_size) = cli.batch_size {
        config.batch_size = batch_size;
    }
    if let Some(workers) = cli.workers {
        config.workers = workers;
    }
    config.validate().context("invalid command-line configuration")?;

    let files = expand_paths(&cli.paths)?;
    if files.is_empty() {
        warn!("No replay files found");
        return Ok(());
    }

    let cache = Arc::new(ResultCache::new(Arc::new(FsCacheStore::new(
        &config.cache_dir,
    ))));
    let orchestrator = BatchOrchestrator::builder(cache)
        .config(&config)
        .refresh(cli.reprocess)
        .build();

    let cancel = CancellationFlag::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted; finishing the current batch");
            on_interrupt.cancel();
        }
    });

    let mut processed: Vec<ProcessedFile> = Vec::with_capacity(files.len());
    let mut profiles = ProfileBook::new();
    let mut batches = orchestrator.batches(files, cancel);
    while let Some(report) = batches.next().await {
        for file in &report.files {
            match &file.error {
                Some(error) => warn!(file = %file.file_name, %error, "Skipping replay"),
                None => {
                    println!(
                        "{}: {} round(s), winner {}",
                        file.file_name,
                        file.result.rounds.len(),
                        file.result.winner.as_deref().unwrap_or("-")
                    );
                    profiles.record(&file.result);
                }
            }
        }
        info!(
            "Processed {}/{} files",
            report.files_completed, report.total_files
        );
        processed.extend(report.files);
    }

    let summary = aggregate(
        processed
            .iter()
            .filter(|file| file.succeeded())
            .map(|file| &file.result),
    );
    print_summary(&summary);
    print_profiles(&profiles);

    Ok(())
}

fn expand_paths(paths: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let found = discover_replays(path)
                .with_context(|| format!("failed to list replays in {}", path.display()))?;
            files.extend(found);
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

fn print_summary(summary: &AggregateResult) {
    if summary.players.is_empty() {
        println!("No player statistics available.");
        return;
    }

    let players: Vec<&String> = summary.players.keys().collect();
    println!();
    print!("{:<20}", "Stat");
    for player in &players {
        print!("{:>14}", truncate(player, 13));
    }
    println!();

    for metric in Metric::iter() {
        print!("{:<20}", metric.to_string());
        for player in &players {
            print!("{:>14.2}", summary.players[*player].get(metric));
        }
        println!();
    }

    println!();
    match &summary.winner {
        Some(winner) => println!(
            "Overall winner: {} ({} of {} files)",
            winner,
            summary.wins(winner),
            summary.files
        ),
        None => println!("Overall winner: -"),
    }
}

fn print_profiles(profiles: &ProfileBook) {
    if profiles.is_empty() {
        return;
    }

    println!();
    println!(
        "{:<20}{:>8}{:>8}{:>12}{:>10}",
        "Player", "Games", "Wins", "Best streak", "Best DP"
    );
    for profile in profiles.profiles() {
        println!(
            "{:<20}{:>8}{:>8}{:>12}{:>10.2}",
            truncate(&profile.player, 19),
            profile.games_played,
            profile.wins,
            profile.best_win_streak,
            profile
                .personal_best(Metric::DamagePotential)
                .unwrap_or_default()
        );
    }
}

fn truncate(name: &str, width: usize) -> String {
    name.chars().take(width).collect()
}

