mod config;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use config::{ConfigOverrides, MappingConfig};
use player_identity::{
    match_records, parse_players, parse_records, CanonicalPlayer, ForeignRecord, IdentityIndex,
};
use report::MappingReport;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Map provider player rows onto Sleeper player IDs
#[derive(Parser)]
#[command(name = "player-mapping-script")]
#[command(about = "Reconcile provider player rows (FantasyPros) onto Sleeper player IDs")]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Sleeper player dump (overrides config)
    #[arg(long)]
    players: Option<PathBuf>,

    /// Provider rows to reconcile (overrides config)
    #[arg(long)]
    records: Option<PathBuf>,

    /// Report output path (overrides config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Provider discriminator stamped on mapped rows (overrides config)
    #[arg(long)]
    source: Option<String>,

    /// Number of unmatched rows to log and keep (overrides config)
    #[arg(long)]
    unmatched_sample: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let overrides = ConfigOverrides {
        players: cli.players,
        records: cli.records,
        output: cli.output,
        source: cli.source,
        unmatched_sample: cli.unmatched_sample,
    };
    let config = MappingConfig::load(cli.config.as_deref(), overrides)?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("🚀 Starting player ID mapping for source '{}'", config.source);

    let players = load_players(&config.input.players_path).await?;
    let records = load_records(&config.input.records_path).await?;

    let index = IdentityIndex::build(&players);
    let index_stats = index.stats();
    if index_stats.total_collisions() > 0 {
        warn!(
            "⚠️  {} identifier collisions in the player set, later players won: {:?}",
            index_stats.total_collisions(),
            index_stats.collisions
        );
    }

    let outcome = match_records(records, &index);
    let stats = outcome.stats();

    info!(
        "✅ Matched {} of {} rows ({:.1}%)",
        stats.matched,
        stats.total,
        stats.match_rate() * 100.0
    );
    for (method, count) in &stats.by_method {
        info!("   {}: {}", method, count);
    }

    log_unmatched(&outcome.unmatched, config.output.unmatched_sample);

    let report = MappingReport::new(
        &config.source,
        index_stats,
        outcome,
        config.output.unmatched_sample,
    );
    report.write(&config.output.report_path).await?;

    info!("🎉 Player ID mapping complete");
    Ok(())
}

async fn load_players(path: &Path) -> Result<Vec<CanonicalPlayer>> {
    info!("Loading canonical players from: {}", path.display());

    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read player file {}", path.display()))?;
    let players = parse_players(&json)
        .with_context(|| format!("Failed to decode player file {}", path.display()))?;

    info!("📊 Loaded {} canonical players", players.len());
    Ok(players)
}

async fn load_records(path: &Path) -> Result<Vec<ForeignRecord>> {
    info!("Loading provider rows from: {}", path.display());

    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read record file {}", path.display()))?;
    let records = parse_records(&json)
        .with_context(|| format!("Failed to decode record file {}", path.display()))?;

    info!("📡 Loaded {} provider rows", records.len());
    Ok(records)
}

fn log_unmatched(unmatched: &[ForeignRecord], sample: usize) {
    if unmatched.is_empty() {
        return;
    }

    warn!("⚠️  {} rows could not be matched:", unmatched.len());
    for record in unmatched.iter().take(sample) {
        warn!("   - {}", record.name.as_deref().unwrap_or("<no name>"));
    }
    if unmatched.len() > sample {
        warn!("   ... and {} more", unmatched.len() - sample);
    }
}
