use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use valorant_predictor::catalog::{AGENTS, MapName, RankTier};
use valorant_predictor::config::Config;
use valorant_predictor::{predict, rates, refresh, store};

#[derive(Parser)]
#[command(name = "valorant_predictor")]
#[command(about = "Agent composition win predictor for competitive Valorant", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape every rank and map, then organize the store
    Refresh {
        /// Base directory (overrides AGENT_STATS_DIR)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Sort raw files into CompetitiveData/ and rebuild combined files
    Organize {
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Predict the winner of a 5v5 matchup
    Predict {
        #[arg(long)]
        rank: String,
        #[arg(long)]
        map: String,
        /// Comma separated, five agents
        #[arg(long, value_delimiter = ',')]
        team1: Vec<String>,
        #[arg(long, value_delimiter = ',')]
        team2: Vec<String>,
        /// Print the prediction as JSON
        #[arg(long)]
        json: bool,
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Pick and win rate of one agent within a roster
    Rate {
        #[arg(long)]
        agent: String,
        #[arg(long)]
        rank: String,
        #[arg(long)]
        map: String,
        /// Comma separated, all ten agents of the matchup
        #[arg(long, value_delimiter = ',')]
        roster: Vec<String>,
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// List agents, ranks and maps
    Catalog,
}

fn main() -> ExitCode {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    init_tracing();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err:#}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("valorant_predictor=info,warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn config_for(dir: Option<PathBuf>) -> Config {
    let cfg = Config::from_env();
    match dir {
        Some(dir) => cfg.with_base_dir(dir),
        None => cfg,
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Refresh { dir } => {
            let cfg = config_for(dir);
            let summary = refresh::refresh(&cfg)?;
            println!(
                "Scraped {} pages ({} rows); wrote {} combined files, {} keys without data.",
                summary.pages, summary.rows, summary.combined_written, summary.keys_skipped
            );
        }
        Commands::Organize { dir } => {
            let cfg = config_for(dir);
            let summary = store::organize_data_files(&cfg.base_dir)?;
            println!(
                "Moved {} files; wrote {} combined files ({} rows), {} keys without data.",
                summary.files_moved,
                summary.combined_written,
                summary.rows_combined,
                summary.skipped.len()
            );
        }
        Commands::Predict {
            rank,
            map,
            team1,
            team2,
            json,
            dir,
        } => {
            let cfg = config_for(dir);
            let prediction = predict::get_prediction(&cfg.base_dir, &rank, &map, &team1, &team2)?;
            if json {
                let out = serde_json::to_string_pretty(&prediction)
                    .context("failed to encode prediction")?;
                println!("{out}");
                return Ok(());
            }

            println!("{}", prediction.result);
            println!("Team 1: {:.2}%", prediction.team1_probability);
            println!("Team 2: {:.2}%", prediction.team2_probability);

            // Inputs were validated by get_prediction.
            let req = predict::validate_inputs(&rank, &map, &team1, &team2)?;
            let table = rates::roster_rates(req.rank, req.map, &cfg.base_dir, &req.roster())?;
            println!();
            println!("{:<12} {:>8} {:>8}", "Agent", "Pick %", "Win %");
            for row in table {
                println!(
                    "{:<12} {:>8} {:>8}",
                    row.agent,
                    percent(row.pick_rate),
                    percent(row.win_rate)
                );
            }
        }
        Commands::Rate {
            agent,
            rank,
            map,
            roster,
            dir,
        } => {
            let cfg = config_for(dir);
            let Some(rank) = RankTier::parse(&rank) else {
                bail!("unknown rank: {rank}");
            };
            let Some(map) = MapName::parse(&map) else {
                bail!("unknown map: {map}");
            };
            let pick = rates::get_pick_rate(&agent, rank, map, &cfg.base_dir, &roster)?;
            let win = rates::get_win_rate(&agent, rank, map, &cfg.base_dir, &roster)?;
            match (pick, win) {
                (None, None) => println!("{agent}: no data"),
                _ => println!(
                    "{agent}: pick {} win {}",
                    percent(pick),
                    percent(win)
                ),
            }
        }
        Commands::Catalog => {
            println!("Agents: {}", AGENTS.join(", "));
            println!("Ranks:");
            for tier in RankTier::ALL {
                let subs: Vec<String> = tier
                    .sub_ranks()
                    .map(|s| format!("{} (id {})", s.label, s.id))
                    .collect();
                println!("  {tier}: {}", subs.join(", "));
            }
            let maps: Vec<&str> = MapName::ALL.iter().map(|m| m.name()).collect();
            println!("Maps: {}", maps.join(", "));
        }
    }
    Ok(())
}

fn percent(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.1}%", v * 100.0))
}
