//! g1hud companion
//!
//! Drives heads-up display glasses from the host: renders the selected page
//! at a fixed rate and pushes each frame over the configured link.
//!
//! Type commands on stdin (`page music`, `off`, `status`, `quit`, ...) to
//! control it.

use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::Parser;
use embassy_executor::{Executor, SpawnError};
use log::{error, info, warn};
use static_cell::StaticCell;

use g1hud_core::page::LoadOutcome;
use g1hud_core::scheduler::FrameScheduler;
use g1hud_core::transport::SequencedTransport;

use crate::config::{load_config, log_config_summary, LinkKind};
use crate::feeds::{FeedPaths, FeedSignals, FeedSources};
use crate::link::open_link;
use crate::storage::FileStorage;

mod channels;
mod clock;
mod config;
mod console;
mod feeds;
mod link;
mod storage;
mod tasks;

static EXECUTOR: StaticCell<Executor> = StaticCell::new();

/// Heads-up display companion
#[derive(Debug, Parser)]
#[command(name = "g1hud-companion", version, about)]
struct Cli {
    /// Configuration file (embedded defaults when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for saved state and feed files
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Link to the glasses
    #[arg(short, long, value_enum)]
    link: Option<LinkKind>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(data_dir) = cli.data_dir {
        config.storage.data_dir = data_dir;
    }
    if let Some(kind) = cli.link {
        config.link.kind = kind;
    }

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log.level.as_str()),
    )
    .init();

    info!("g1hud companion v{} starting", env!("CARGO_PKG_VERSION"));
    log_config_summary(cli.config.as_deref(), &config);

    let storage = FileStorage::open(&config.storage.data_dir).with_context(|| {
        format!(
            "failed to open data directory {}",
            config.storage.data_dir.display()
        )
    })?;
    info!("Data directory {}", storage.dir().display());

    let (link, link_rx) = open_link(&config.link);
    let signals = FeedSignals {
        now_playing: &channels::NOW_PLAYING,
        calendar: &channels::CALENDAR,
    };
    let sources = FeedSources::new(signals);

    let hud = config.hud();
    let (scheduler, outcome): (tasks::CompanionScheduler, _) =
        FrameScheduler::restore(&hud, SequencedTransport::new(link), storage, sources);
    match outcome {
        LoadOutcome::Loaded => info!("Restored page state"),
        LoadOutcome::Initialized => info!("No saved page state, starting with defaults"),
        LoadOutcome::Reset(e) => warn!("Saved page state unusable ({:?}), reset to defaults", e),
        LoadOutcome::Unsaved(e) => warn!("Could not save default page state: {:?}", e),
    }

    let feed_paths = FeedPaths {
        now_playing: config.feed_path(&config.feeds.now_playing),
        calendar: config.feed_path(&config.feeds.calendar),
    };

    tasks::spawn_feed_reader(feed_paths, signals, config.feeds.refresh_s)
        .context("failed to start feed reader")?;
    console::install_signal_handler().context("failed to install signal handler")?;
    console::spawn_stdin_reader().context("failed to start console")?;

    let tick_ms = hud.tick_ms;
    let auto_scan = config.link.auto_scan;

    let executor = EXECUTOR.init(Executor::new());
    executor.run(move |spawner| {
        spawn_or_exit("tick", spawner.spawn(tasks::tick_task(tick_ms)));
        spawn_or_exit("link_rx", spawner.spawn(tasks::link_rx_task(link_rx)));
        spawn_or_exit("frame", spawner.spawn(tasks::frame_task(scheduler, auto_scan)));
        info!("All tasks spawned");
    })
}

fn spawn_or_exit(name: &str, result: Result<(), SpawnError>) {
    if let Err(e) = result {
        error!("Failed to spawn {} task: {:?}", name, e);
        process::exit(1);
    }
}
