//! slotscope-replay - Replays an ad-library scenario through the slot tracker.
//!
//! Usage: slotscope-replay --scenario <file.jsonl> [--config <tracker.toml>]
//!        [--trigger <percent>] [--targeting-key <key>]... [--not-ready] [--log-only]
//!
//! Output: one JSON line per telemetry event on stdout,
//! `{"event": "SLOT_VIEWABLE", "attributes": {...}}`.

mod scenario;

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

use clap::Parser;
use serde_json::json;
use slotscope_core::config::{self, ConfigError};
use slotscope_core::timing::ManualClock;
use slotscope_core::{
    AdService, AdSlotTracker, LogSink, RecordingSink, SimulatedAdService, TelemetrySink,
    TrackerContext, TrackerRegistry,
};
use thiserror::Error;
use tracing_subscriber::filter::EnvFilter;

use scenario::{Action, ScenarioError, Step};

#[derive(Parser, Debug)]
#[command(version, about = "Replay ad slot events through the telemetry tracker")]
struct Cli {
    /// JSON-lines scenario file
    #[arg(short, long)]
    scenario: PathBuf,

    /// Tracker config (TOML). Defaults to the user config dir if present.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Visibility trigger level override (0-100)
    #[arg(long)]
    trigger: Option<u8>,

    /// Targeting key to report (repeatable)
    #[arg(long = "targeting-key")]
    targeting_keys: Vec<String>,

    /// Start with the ad library API not ready
    #[arg(long)]
    not_ready: bool,

    /// Log events through tracing instead of printing JSON lines
    #[arg(long)]
    log_only: bool,
}

#[derive(Debug, Error)]
enum ReplayError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Scenario(#[from] ScenarioError),
    #[error("failed writing output: {0}")]
    Output(#[from] io::Error),
    #[error("visibility trigger level {0} is out of range (0-100)")]
    Trigger(u8),
}

/// Initialize logging, writing to SLOTSCOPE_LOG_PATH if set, otherwise stderr.
fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();

    if let Ok(path) = std::env::var("SLOTSCOPE_LOG_PATH") {
        if let Ok(file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
        {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_ansi(false)
                .with_writer(file)
                .init();
            return;
        }
    }

    // Fallback to stderr; stdout carries the event stream
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), ReplayError> {
    let mut tracker_config = config::load_or_default(cli.config.as_deref())?;
    if let Some(level) = cli.trigger {
        if level > 100 {
            return Err(ReplayError::Trigger(level));
        }
        tracker_config.visibility_trigger_level = level;
    }
    tracker_config
        .targeting_keys
        .extend(cli.targeting_keys.iter().cloned());

    let steps = scenario::load(&cli.scenario)?;
    tracing::info!(steps = steps.len(), path = ?cli.scenario, "scenario loaded");

    let service = Rc::new(if cli.not_ready {
        SimulatedAdService::loading()
    } else {
        SimulatedAdService::ready()
    });
    let clock = Rc::new(ManualClock::default());
    let recorder = Rc::new(RecordingSink::new());
    let sink: Rc<dyn TelemetrySink> = if cli.log_only {
        Rc::new(LogSink)
    } else {
        recorder.clone()
    };

    let mut registry = TrackerRegistry::new();
    let ctx = TrackerContext::new(Some(service.clone() as Rc<dyn AdService>), sink)
        .with_clock(clock.clone())
        .with_config(tracker_config);
    let tracker = AdSlotTracker::init(&mut registry, ctx);

    let mut out = BufWriter::new(io::stdout().lock());
    let mut offset_ms = 0;
    let mut emitted = 0;

    for Step { at_ms, action } in steps {
        if at_ms < offset_ms {
            tracing::warn!(at_ms, offset_ms, "step goes back in time, replaying at current offset");
        } else {
            clock.advance_ms(at_ms - offset_ms);
            offset_ms = at_ms;
        }

        match action {
            Action::Event { event } => {
                if service.dispatch(&event) == 0 {
                    tracing::debug!(kind = event.kind.as_str(), "no listeners for event");
                }
            }
            Action::Ready { ready: true } => service.set_api_ready(),
            Action::Ready { ready: false } => {}
            Action::Targeting { targeting } => {
                for (key, value) in targeting {
                    service.set_targeting(&key, value);
                }
            }
        }

        for recorded in recorder.take() {
            let line = json!({ "event": recorded.name, "attributes": recorded.attributes });
            writeln!(out, "{line}")?;
            emitted += 1;
        }
    }
    out.flush()?;

    tracing::info!(
        emitted,
        slots = tracker.tracked_slots(),
        listeners = tracker.listeners_registered(),
        "replay finished"
    );
    Ok(())
}
