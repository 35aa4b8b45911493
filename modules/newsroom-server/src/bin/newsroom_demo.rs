//! Runs a sequence of episodes, carrying learned weights from one to the next,
//! and prints how the primitives moved.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use newsroom_common::Config;
use newsroom_core::{render_weight_bars, Session, SessionReport, DEMO_TOPICS};
use newsroom_server::deps::build_runner;

#[derive(Parser)]
#[command(name = "newsroom-demo", about = "Run a self-correcting newsroom session")]
struct Cli {
    /// File with one topic per line (defaults to the built-in stress topics)
    #[arg(long)]
    topics_file: Option<PathBuf>,

    /// Seconds to wait between episodes
    #[arg(long, default_value_t = 0)]
    pause_secs: u64,

    /// Write the full session report as JSON to this path
    #[arg(long)]
    out: Option<PathBuf>,
}

fn load_topics(path: Option<&PathBuf>) -> Result<Vec<String>> {
    let Some(path) = path else {
        return Ok(DEMO_TOPICS.iter().map(|t| t.to_string()).collect());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read topics file {}", path.display()))?;
    let topics: Vec<String> = raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(String::from)
        .collect();
    anyhow::ensure!(!topics.is_empty(), "No topics in {}", path.display());
    Ok(topics)
}

fn print_report(report: &SessionReport) {
    for episode in &report.episodes {
        println!("[{}] {}", episode.identity.episode_num, episode.topic);
        print!("  draft {}", episode.draft_eval);
        if episode.regenerated() {
            print!("  final {}", episode.final_eval);
        }
        for m in &episode.mutations {
            println!(
                "  {} {:.2} -> {:.2} ({})",
                m.primitive_name, m.old_weight, m.new_weight, m.reason
            );
        }
    }

    println!();
    println!(
        "{} of {} episodes passed, {} mutations (boot {})",
        report.passed_count(),
        report.episodes.len(),
        report.total_mutations(),
        report.boot_id,
    );
    println!("\nInitial weights:\n{}", render_weight_bars(&report.initial_primitives));
    println!("\nFinal weights:\n{}", render_weight_bars(&report.final_primitives));
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;
    let topics = load_topics(cli.topics_file.as_ref())?;

    let runner = build_runner(&config);
    let session = Session::new(&runner).with_pause(Duration::from_secs(cli.pause_secs));
    println!(
        "Running {} episodes against {} (boot {})\n",
        topics.len(),
        runner.model(),
        session.boot_id()
    );

    let report = session.run(topics.as_slice(), config.default_primitives).await;
    print_report(&report);

    if let Some(out) = cli.out {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(&out, json)
            .with_context(|| format!("Failed to write {}", out.display()))?;
        println!("\nSession written to {}", out.display());
    }

    Ok(())
}
