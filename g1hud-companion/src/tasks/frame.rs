//! Frame task
//!
//! Owns the scheduler. Consumes ticks, console commands and link events,
//! one at a time, so a tick never overlaps anything else.

use core::ops::ControlFlow;

use embassy_futures::select::{select3, Either3};
use log::{debug, info, warn};

use g1hud_core::power::AutoOffAction;
use g1hud_core::scheduler::{FrameKind, FrameScheduler, ShutdownReport, TickReport};
use g1hud_core::sources::DataSources;
use g1hud_core::transport::{ConnectionState, LinkHealth, SendOutcome, SequencedTransport};
use g1hud_hal::{KeyValueStorage, PacketLink};

use crate::channels::{LINK_EVENTS, USER_COMMANDS};
use crate::console::UserCommand;
use crate::feeds::FeedSources;
use crate::link::AnyLink;
use crate::storage::FileStorage;
use crate::tasks::tick::TICK_SIGNAL;

/// The scheduler as wired up by the companion
pub type CompanionScheduler = FrameScheduler<SequencedTransport<AnyLink>, FileStorage, FeedSources>;

type Scheduler<L, S, D> = FrameScheduler<SequencedTransport<L>, S, D>;

/// Frame task - main coordination loop
#[embassy_executor::task]
pub async fn frame_task(mut scheduler: CompanionScheduler, auto_scan: bool) {
    info!(
        "Frame task started on page {} (display {})",
        scheduler.page_state().page,
        on_off(scheduler.page_state().display_on)
    );

    if auto_scan {
        if let Err(e) = scheduler.start_scan() {
            warn!("Scan failed: {:?}", e);
        }
    }

    let mut watch = LinkWatch::new(&scheduler);

    loop {
        match select3(TICK_SIGNAL.wait(), USER_COMMANDS.receive(), LINK_EVENTS.receive()).await {
            Either3::First(()) => {
                let report = scheduler.tick();
                log_tick(&report);
            }
            Either3::Second(command) => {
                if apply_command(&mut scheduler, command).is_break() {
                    break;
                }
            }
            Either3::Third(event) => scheduler.handle_event(event),
        }
        watch.update(&scheduler);
    }

    shut_down(&mut scheduler);
    std::process::exit(0);
}

/// Blank the display, release the glasses and drop the link
fn shut_down<L, S, D>(scheduler: &mut Scheduler<L, S, D>) -> ShutdownReport
where
    L: PacketLink,
    S: KeyValueStorage,
    D: DataSources,
{
    info!("Shutting down");
    let report = scheduler.shutdown();
    debug!("Shutdown: {:?}", report);
    if let Err(e) = report.disconnect {
        warn!("Disconnect failed: {:?}", e);
    }
    report
}

fn on_off(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        "off"
    }
}

fn log_tick(report: &TickReport) {
    if let Some(e) = report.persist_error {
        warn!("Failed to save page state: {:?}", e);
    }
    if report.auto_off == AutoOffAction::TurnOff {
        info!("Display switched off after inactivity");
    }
    match report.outcome {
        SendOutcome::Sent { packets } => debug!(
            "Tick seq={} page={} {:?} ({} packets)",
            report.sequence, report.page, report.kind, packets
        ),
        SendOutcome::Skipped => {}
        SendOutcome::Failed(e) => debug!("Tick seq={} send failed: {:?}", report.sequence, e),
    }
    if report.kind == FrameKind::Sentinel {
        debug!("Page {} had nothing to show", report.page);
    }
}

/// Apply one console command; `Break` ends the session
fn apply_command<L, S, D>(scheduler: &mut Scheduler<L, S, D>, command: UserCommand) -> ControlFlow<()>
where
    L: PacketLink,
    S: KeyValueStorage,
    D: DataSources,
{
    let persisted = match command {
        UserCommand::Page(page) => scheduler.set_page(page).map(|()| info!("Page: {}", page)),
        UserCommand::NextPage => scheduler.next_page().map(|page| info!("Page: {}", page)),
        UserCommand::DisplayOn => scheduler.set_display_on(true).map(|()| info!("Display on")),
        UserCommand::DisplayOff => scheduler.set_display_on(false).map(|()| info!("Display off")),
        UserCommand::ToggleDisplay => scheduler
            .toggle_display()
            .map(|on| info!("Display {}", on_off(on))),
        UserCommand::AutoOff(enabled) => {
            scheduler.set_auto_off(enabled);
            info!("Auto-off {}", on_off(enabled));
            Ok(())
        }
        UserCommand::Scan => {
            if let Err(e) = scheduler.start_scan() {
                warn!("Scan failed: {:?}", e);
            }
            Ok(())
        }
        UserCommand::Disconnect => {
            if let Err(e) = scheduler.disconnect() {
                warn!("Disconnect failed: {:?}", e);
            }
            Ok(())
        }
        UserCommand::Status => {
            log_status(scheduler);
            Ok(())
        }
        UserCommand::Quit => return ControlFlow::Break(()),
    };

    // The change is live either way; only the saved copy is stale
    if let Err(e) = persisted {
        warn!("Failed to save page state: {:?}", e);
    }
    ControlFlow::Continue(())
}

fn log_status<L, S, D>(scheduler: &Scheduler<L, S, D>)
where
    L: PacketLink,
    S: KeyValueStorage,
    D: DataSources,
{
    let state = scheduler.page_state();
    let auto_off = scheduler.auto_off();
    let transport = scheduler.transport();
    let stats = transport.stats();
    let monitor = transport.monitor();

    info!(
        "Page {} | display {} | auto-off {} ({}/{} ticks) | link {}",
        state.page,
        on_off(state.display_on),
        on_off(auto_off.is_enabled()),
        auto_off.ticks_on(),
        auto_off.threshold(),
        scheduler.connection_state()
    );
    info!(
        "Ticks {} | next seq {} | sent {} skipped {} failed {} ({} packets)",
        scheduler.ticks(),
        scheduler.next_sequence(),
        stats.sent,
        stats.skipped,
        stats.failed,
        stats.packets
    );
    info!(
        "Glasses: last ack {:?}, {} rejected, battery {}",
        monitor.last_acked_seq(),
        monitor.rejected(),
        monitor
            .battery_percent()
            .map(|percent| format!("{}%", percent))
            .unwrap_or_else(|| "unknown".into())
    );
}

/// Logs connection and link health changes
struct LinkWatch {
    state: ConnectionState,
    health: LinkHealth,
}

impl LinkWatch {
    fn new<L, S, D>(scheduler: &Scheduler<L, S, D>) -> Self
    where
        L: PacketLink,
        S: KeyValueStorage,
        D: DataSources,
    {
        Self {
            state: scheduler.connection_state(),
            health: scheduler.transport().monitor().check(),
        }
    }

    fn update<L, S, D>(&mut self, scheduler: &Scheduler<L, S, D>)
    where
        L: PacketLink,
        S: KeyValueStorage,
        D: DataSources,
    {
        let state = scheduler.connection_state();
        if state != self.state {
            info!("Link: {} -> {}", self.state, state);
            self.state = state;
        }

        let health = scheduler.transport().monitor().check();
        if health != self.health {
            match health {
                LinkHealth::Silent => warn!("Glasses stopped answering"),
                LinkHealth::Ok => info!("Glasses answering again"),
            }
            self.health = health;
        }
    }
}
