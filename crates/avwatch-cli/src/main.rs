//! AVWatch CLI - Headless Tracker Simulation
//!
//! Features:
//! - Replay canned playback sessions through a real tracker
//! - Inspect the resulting analytics event stream
//! - Dump the state-transition table

use clap::{Parser, Subcommand};

mod sim;

/// AVWatch CLI - playback tracker toolkit
#[derive(Parser)]
#[command(name = "avwatch-cli")]
#[command(version)]
#[command(about = "Playback tracker simulation and inspection", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a canned playback session through the tracker
    Simulate {
        /// Poll interval in milliseconds
        #[arg(long, default_value = "50")]
        interval_ms: u64,

        /// Interrupt playback with a rebuffer
        #[arg(long)]
        rebuffer: bool,

        /// Issue a seek mid-playback
        #[arg(long)]
        seek: bool,
    },

    /// Print the transition table over all state pairs
    Table,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();

    match cli.command {
        Commands::Simulate {
            interval_ms,
            rebuffer,
            seek,
        } => sim::run(&cli.format, interval_ms, rebuffer, seek).await,
        Commands::Table => print_table(&cli.format),
    }
}

fn print_table(format: &str) -> anyhow::Result<()> {
    use avwatch_core::{transitions::map, PlaybackState};

    const STATES: [PlaybackState; 6] = [
        PlaybackState::None,
        PlaybackState::Idle,
        PlaybackState::Ready,
        PlaybackState::Playing,
        PlaybackState::Paused,
        PlaybackState::Buffering,
    ];

    let previous: Vec<Option<PlaybackState>> =
        std::iter::once(None).chain(STATES.into_iter().map(Some)).collect();

    if format == "json" {
        let mut rows = Vec::new();
        for prev in &previous {
            for cur in STATES {
                let actions = map(*prev, cur);
                if actions.is_empty() {
                    continue;
                }
                rows.push(serde_json::json!({
                    "previous": prev,
                    "current": cur,
                    "actions": actions,
                }));
            }
        }
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("{:<12} {:<12} actions", "previous", "current");
    println!("{}", "-".repeat(48));
    for prev in &previous {
        for cur in STATES {
            let actions = map(*prev, cur);
            if actions.is_empty() {
                continue;
            }
            let prev_label = prev.map_or("(unset)".to_string(), |p| p.to_string());
            let actions: Vec<String> = actions.iter().map(|a| a.to_string()).collect();
            println!("{:<12} {:<12} {}", prev_label, cur.to_string(), actions.join(", "));
        }
    }
    Ok(())
}
