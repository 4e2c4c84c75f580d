//! gh-namecheck - GitHub username availability checker
//!
//! Generates candidate usernames from seed letters and checks each one
//! against GitHub, streaming progress while the check runs.

mod cli;

use anyhow::Context;
use clap::Parser;
use gh_namecheck::{
    checker::ProbeMetricsSnapshot,
    generator::CandidateGenerator,
    input::load_candidates,
    validator::UsernameValidator,
    Availability, Category, CheckConfig, CheckSession, GithubChecker, NameCheckError,
    ProgressEvent, SessionSummary, StopToken,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::process;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

use crate::cli::{CheckArgs, Cli, Commands};

/// How often the progress channel is drained
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Generations larger than this get a warning before running
const LARGE_GENERATION: u64 = 1_000_000;

/// Conventional exit status after SIGINT
const INTERRUPTED_EXIT_CODE: i32 = 130;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = gh_namecheck::init() {
        eprintln!("❌ Failed to initialize: {}", e);
        process::exit(1);
    }

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        match e.downcast_ref::<NameCheckError>() {
            Some(err) => eprintln!("{}", err.user_message()),
            None => eprintln!("❌ Error: {:#}", e),
        }
        process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate { seed, length, output } => {
            run_generate(&seed, length, output.as_deref())
        }
        Commands::Check(args) => run_check(args).await,
    }
}

/// Generate candidates and print or save them
fn run_generate(seed: &str, length: usize, output: Option<&Path>) -> anyhow::Result<()> {
    let candidates = generate_candidates(seed, length)?;

    let mut content = candidates.join("\n");
    if !content.is_empty() {
        content.push('\n');
    }

    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("failed to write candidates to {}", path.display()))?;
            eprintln!(
                "✅ Generated {} {}-letter candidates → {}",
                candidates.len(),
                length,
                path.display()
            );
        }
        None => {
            print!("{}", content);
            eprintln!("✅ Generated {} {}-letter candidates", candidates.len(), length);
        }
    }

    Ok(())
}

fn generate_candidates(seed: &str, length: usize) -> gh_namecheck::Result<Vec<String>> {
    let generator = CandidateGenerator::new(seed)?;
    let upper_bound = generator.max_candidates(length);
    if upper_bound > LARGE_GENERATION {
        tracing::warn!(
            seed_len = generator.seed_len(),
            length,
            upper_bound,
            "Large generation requested; this may take a while"
        );
    }
    Ok(generator.generate(length).into_iter().collect())
}

/// Run a check session with live progress
async fn run_check(args: CheckArgs) -> anyhow::Result<()> {
    let config = build_config(&args)?;

    let mut candidates = match (&args.file, &args.seed) {
        (Some(path), _) => load_candidates(path)?,
        (None, Some(seed)) => generate_candidates(seed, args.length)?,
        (None, None) => return Err(NameCheckError::invalid_input("No username file selected").into()),
    };

    if args.skip_invalid {
        let validator = UsernameValidator::new()?;
        let (valid, rejected) = validator.partition(candidates);
        for (candidate, reason) in &rejected {
            tracing::warn!(candidate = %candidate, reason = %reason, "Skipping invalid username");
        }
        if !rejected.is_empty() {
            eprintln!("⚠️  Skipped {} invalid username(s)", rejected.len());
        }
        candidates = valid;
    }

    if candidates.is_empty() {
        return Err(NameCheckError::invalid_input("No candidates to check").into());
    }

    println!("🔍 Checking {} username(s)...", candidates.len());
    println!("═══════════════════════════════════");

    let checker = Arc::new(GithubChecker::with_config(&config)?);
    let mut session = CheckSession::with_config(checker.clone() as Arc<dyn gh_namecheck::AvailabilityProbe>, &config)?;
    let check_start = Instant::now();
    let total = candidates.len();
    let mut events = session.start(candidates).await?;

    let progress = ProgressBar::new(total as u64);
    progress.set_style(
        ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );

    let interrupts = spawn_interrupt_handler(session.stop_token(), progress.clone());
    let mut ticker = tokio::time::interval(POLL_INTERVAL);

    while !events.is_finished() {
        ticker.tick().await;
        for event in events.drain() {
            // a hidden bar (no terminal) drops println, suspend still prints
            progress.suspend(|| println!("{}", format_event(&event)));
            progress.set_position(event.processed as u64);
            let summary = session.summary();
            progress.set_message(format!(
                "{} available, {} unavailable",
                summary.available, summary.unavailable
            ));
        }
    }

    interrupts.abort();
    let summary = session.wait().await?;
    progress.finish_and_clear();

    print_summary(&summary, check_start.elapsed(), &checker.get_metrics_snapshot());

    let results = session.results();
    if let Some(dir) = &args.export_dir {
        let written = results.export_all(dir)?;
        for (category, path) in &written {
            println!("💾 Exported {} → {}", category, path.display());
        }
        for category in Category::ALL {
            if results.len(category) == 0 {
                println!("{}", NameCheckError::empty_category(category).user_message());
            }
        }
    }
    for (category, path) in &args.exports {
        match results.export(*category, path) {
            Ok(count) => println!("💾 Exported {} {} → {}", count, category, path.display()),
            Err(e) if e.is_informational() => println!("{}", e.user_message()),
            Err(e) => return Err(e.into()),
        }
    }
    if let Some(path) = &args.report {
        results.save_report(path)?;
        println!("📄 Report written to {}", path.display());
    }

    Ok(())
}

/// What a Ctrl-C press does during a check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InterruptAction {
    /// Finish the current check, then stop and keep results
    Stop,
    /// Leave immediately
    ForceQuit,
}

#[derive(Debug, Default)]
struct InterruptCounter {
    seen: usize,
}

impl InterruptCounter {
    fn next(&mut self) -> InterruptAction {
        self.seen += 1;
        if self.seen == 1 {
            InterruptAction::Stop
        } else {
            InterruptAction::ForceQuit
        }
    }
}

/// Listen for Ctrl-C while a check runs
fn spawn_interrupt_handler(stop: StopToken, progress: ProgressBar) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interrupts = InterruptCounter::default();
        while tokio::signal::ctrl_c().await.is_ok() {
            match interrupts.next() {
                InterruptAction::Stop => {
                    stop.stop();
                    progress.suspend(|| {
                        eprintln!("⏹️  Stopping after the current check... (Ctrl-C again to quit)")
                    });
                }
                InterruptAction::ForceQuit => {
                    progress.abandon();
                    eprintln!("❌ Interrupted");
                    process::exit(INTERRUPTED_EXIT_CODE);
                }
            }
        }
    })
}

fn build_config(args: &CheckArgs) -> gh_namecheck::Result<CheckConfig> {
    let mut config = CheckConfig::from_env()?;

    if let Some(concurrency) = args.concurrency {
        config.concurrency = concurrency;
    }
    if let Some(secs) = args.timeout {
        config.timeout = Duration::from_secs(secs);
    }
    if let Some(url) = &args.base_url {
        config.base_url = url.clone();
    }
    if args.insecure {
        config.verify_tls = false;
    }

    config.validate()?;
    Ok(config)
}

fn format_event(event: &ProgressEvent) -> String {
    let icon = match event.availability {
        Availability::Available => "✅",
        Availability::Unavailable => "❌",
        Availability::Error(_) => "⚠️ ",
    };
    format!(
        "{} {:<20} {} ({:.0}%)",
        icon,
        event.candidate,
        event.status_label(),
        event.fraction() * 100.0
    )
}

fn print_summary(summary: &SessionSummary, elapsed: Duration, metrics: &ProbeMetricsSnapshot) {
    println!();
    if summary.stopped_early {
        println!("⏹️  Check stopped after {} of {} username(s)", summary.processed, summary.total);
    }
    println!("📈 Summary:");
    println!("   ✅ Available: {}", summary.available);
    println!("   ❌ Unavailable: {}", summary.unavailable);
    if summary.errors > 0 {
        println!("   ⚠️  Errors: {}", summary.errors);
    }
    println!("   📊 Total checked: {}", summary.processed);
    println!("   ⏱️  Total time: {:.2}s", elapsed.as_secs_f32());
    if metrics.probes_sent > 0 {
        println!(
            "   📡 Requests: {} (avg {:.0}ms, {} failed)",
            metrics.probes_sent,
            metrics.avg_probe_time_ms(),
            metrics.errors
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_interrupt_stops_second_quits() {
        let mut interrupts = InterruptCounter::default();
        assert_eq!(interrupts.next(), InterruptAction::Stop);
        assert_eq!(interrupts.next(), InterruptAction::ForceQuit);
        assert_eq!(interrupts.next(), InterruptAction::ForceQuit);
    }

    #[test]
    fn test_format_event_shows_status_and_progress() {
        let event = ProgressEvent {
            candidate: "octo".to_string(),
            availability: Availability::Available,
            processed: 1,
            total: 2,
        };
        let line = format_event(&event);
        assert!(line.contains("octo"));
        assert!(line.contains("available"));
        assert!(line.contains("(50%)"));
    }
}
