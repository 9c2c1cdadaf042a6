//! Frame scheduler execution
//!
//! Owns the page state, the auto-off policy and the sequence counter. The
//! transport, the preference store and the data sources are injected at
//! construction so the whole loop runs against fakes in tests.
//!
//! Each tick:
//! 1. Pull fresh snapshots from the sources
//! 2. Advance the auto-off policy; persist if it switched the display off
//! 3. Render the active page, or a blank frame while the display is off
//! 4. Hand the frame to the transport under the next sequence number

use g1hud_hal::{KeyValueStorage, LinkError};
use g1hud_protocol::{PeripheralEvent, SequenceCounter};

use super::frame::{Frame, FrameKind};
use crate::config::HudConfig;
use crate::content::{PageProviders, Snapshot};
use crate::page::{load_or_init, save_page_state, LoadOutcome, Page, PageState, PersistError};
use crate::power::{AutoOffAction, AutoOffPolicy};
use crate::sources::DataSources;
use crate::transport::{ConnectionState, HudTransport, SendOutcome};

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickReport {
    /// Sequence number the frame was sent under
    pub sequence: u8,
    pub page: Page,
    pub display_on: bool,
    pub kind: FrameKind,
    pub auto_off: AutoOffAction,
    pub outcome: SendOutcome,
    /// Set if the auto-off change could not be persisted
    pub persist_error: Option<PersistError>,
}

/// Outcome of the shutdown sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ShutdownReport {
    pub blank: SendOutcome,
    pub exit: SendOutcome,
    pub disconnect: Result<(), LinkError>,
}

/// Fixed-rate frame scheduler
pub struct FrameScheduler<T, S, D>
where
    T: HudTransport,
    S: KeyValueStorage,
    D: DataSources,
{
    state: PageState,
    auto_off: AutoOffPolicy,
    sequence: SequenceCounter,
    providers: PageProviders,
    transport: T,
    storage: S,
    sources: D,
    ticks: u64,
    last_frame: Option<Frame>,
}

impl<T, S, D> FrameScheduler<T, S, D>
where
    T: HudTransport,
    S: KeyValueStorage,
    D: DataSources,
{
    /// Create a scheduler starting from `state`
    pub fn new(config: &HudConfig, state: PageState, transport: T, storage: S, sources: D) -> Self {
        Self {
            state,
            auto_off: AutoOffPolicy::from_config(&config.auto_off),
            sequence: SequenceCounter::new(),
            providers: PageProviders::from_config(config),
            transport,
            storage,
            sources,
            ticks: 0,
            last_frame: None,
        }
    }

    /// Create a scheduler from the persisted page state
    ///
    /// A missing or unusable record is replaced by the defaults.
    pub fn restore(config: &HudConfig, transport: T, mut storage: S, sources: D) -> (Self, LoadOutcome) {
        let (state, outcome) = load_or_init(&mut storage);
        (Self::new(config, state, transport, storage, sources), outcome)
    }

    /// Run one tick
    pub fn tick(&mut self) -> TickReport {
        self.sources.refresh();
        let clock = self.sources.wall_clock();

        let auto_off = self.auto_off.advance(self.state.display_on);
        let mut persist_error = None;
        if auto_off == AutoOffAction::TurnOff {
            self.state.display_on = false;
            persist_error = self.persist().err();
        }

        let sequence = self.sequence.next_seq();
        let frame = if self.state.display_on {
            let snapshot = Snapshot {
                clock,
                now_playing: self.sources.now_playing(),
                calendar: self.sources.calendar(),
            };
            Frame::from_lines(self.providers.render(self.state.page, &snapshot), sequence)
        } else {
            Frame::blank(sequence)
        };

        let outcome = self.transport.send(frame.body(), sequence);
        self.ticks = self.ticks.wrapping_add(1);

        let report = TickReport {
            sequence,
            page: self.state.page,
            display_on: self.state.display_on,
            kind: frame.kind(),
            auto_off,
            outcome,
            persist_error,
        };
        self.last_frame = Some(frame);
        report
    }

    fn persist(&mut self) -> Result<(), PersistError> {
        save_page_state(&mut self.storage, &self.state)
    }

    /// Select a page; takes effect on the next tick
    pub fn set_page(&mut self, page: Page) -> Result<(), PersistError> {
        if self.state.page == page {
            return Ok(());
        }
        self.state.page = page;
        self.persist()
    }

    /// Select the page after the current one
    pub fn next_page(&mut self) -> Result<Page, PersistError> {
        let page = self.state.page.next();
        self.set_page(page)?;
        Ok(page)
    }

    /// Switch the display on or off
    pub fn set_display_on(&mut self, display_on: bool) -> Result<(), PersistError> {
        if self.state.display_on == display_on {
            return Ok(());
        }
        self.state.display_on = display_on;
        self.auto_off.reset();
        self.persist()
    }

    /// Flip the display; returns the new flag
    pub fn toggle_display(&mut self) -> Result<bool, PersistError> {
        let display_on = !self.state.display_on;
        self.set_display_on(display_on)?;
        Ok(display_on)
    }

    /// Enable or disable auto-off
    pub fn set_auto_off(&mut self, enabled: bool) {
        self.auto_off.set_enabled(enabled);
    }

    /// Ask the transport to connect
    pub fn start_scan(&mut self) -> Result<(), LinkError> {
        self.transport.start_scan()
    }

    /// Drop the connection without the shutdown sequence
    pub fn disconnect(&mut self) -> Result<(), LinkError> {
        self.transport.disconnect()
    }

    /// Forward an event from the glasses
    pub fn handle_event(&mut self, event: PeripheralEvent) {
        self.transport.handle_event(event);
    }

    /// Clear the display, return the glasses to their dashboard and
    /// disconnect
    pub fn shutdown(&mut self) -> ShutdownReport {
        let sequence = self.sequence.next_seq();
        let blank = self.transport.send("", sequence);
        let exit = self.transport.send_exit();
        let disconnect = self.transport.disconnect();
        ShutdownReport {
            blank,
            exit,
            disconnect,
        }
    }

    pub fn page_state(&self) -> PageState {
        self.state
    }

    pub fn auto_off(&self) -> &AutoOffPolicy {
        &self.auto_off
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.transport.status()
    }

    /// Sequence number the next frame will carry
    pub fn next_sequence(&self) -> u8 {
        self.sequence.peek()
    }

    /// Ticks run so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Frame sent by the latest tick
    pub fn last_frame(&self) -> Option<&Frame> {
        self.last_frame.as_ref()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn sources_mut(&mut self) -> &mut D {
        &mut self.sources
    }

    /// Give back the injected collaborators
    pub fn into_parts(self) -> (T, S, D) {
        (self.transport, self.storage, self.sources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AutoOffConfig;
    use crate::page::load_page_state;
    use crate::power::AutoOffState;
    use crate::scheduler::SENTINEL_BODY;
    use crate::sources::{bounded, CalendarEvent, NowPlaying, WallClock};
    use crate::testing::{FakeTransport, FixedSources, RecordingLink};
    use crate::transport::SequencedTransport;
    use g1hud_hal::MemoryStorage;
    use g1hud_protocol::{ScreenStatus, CMD_EXIT, MAX_SEQUENCE};
    use proptest::prelude::*;

    type Storage = MemoryStorage<64>;
    type Scheduler = FrameScheduler<FakeTransport, Storage, FixedSources>;

    fn sources() -> FixedSources {
        FixedSources {
            // Tuesday 14:05
            clock: WallClock::from_local_minutes(5 * 1440 + 14 * 60 + 5),
            now_playing: NowPlaying {
                title: Some(bounded("Teardrop")),
                album: Some(bounded("Mezzanine")),
                artist: Some(bounded("Massive Attack")),
                current_time_s: 65,
                duration_s: 330,
            },
            ..Default::default()
        }
    }

    fn config(auto_off: bool) -> HudConfig {
        HudConfig {
            auto_off: AutoOffConfig {
                enabled: auto_off,
                threshold_ticks: 10,
            },
            ..Default::default()
        }
    }

    fn scheduler(auto_off: bool, state: PageState) -> Scheduler {
        FrameScheduler::new(
            &config(auto_off),
            state,
            FakeTransport::default(),
            Storage::new(),
            sources(),
        )
    }

    #[test]
    fn test_tick_sends_rendered_clock() {
        let mut scheduler = scheduler(false, PageState::default());
        let report = scheduler.tick();

        assert_eq!(report.sequence, 0);
        assert_eq!(report.kind, FrameKind::Content);
        assert!(report.outcome.is_sent());
        assert_eq!(scheduler.sources_mut().refreshes, 1);

        let (body, seq) = &scheduler.transport().sends[0];
        assert_eq!(*seq, 0);
        assert_eq!(body, "14:05\nSun Mon [Tue] Wed Thu Fri Sat\n");
    }

    #[test]
    fn test_exactly_one_send_per_tick() {
        let mut scheduler = scheduler(true, PageState::default());
        for tick in 1..=50 {
            scheduler.tick();
            assert_eq!(scheduler.transport().sends.len(), tick);
        }
    }

    #[test]
    fn test_sequence_cycles_without_255() {
        let mut scheduler = scheduler(false, PageState::default());
        let total = 2 * (MAX_SEQUENCE as usize + 1) + 10;
        for _ in 0..total {
            scheduler.tick();
        }
        for (i, (_, seq)) in scheduler.transport().sends.iter().enumerate() {
            assert_eq!(*seq as usize, i % (MAX_SEQUENCE as usize + 1));
            assert_ne!(*seq, 255);
        }
    }

    #[test]
    fn test_auto_off_after_ten_ticks_and_stays_off() {
        let mut scheduler = scheduler(true, PageState::default());
        for tick in 1..10 {
            let report = scheduler.tick();
            assert!(report.display_on, "tick {tick}");
            assert_eq!(report.kind, FrameKind::Content);
        }

        let report = scheduler.tick();
        assert_eq!(report.auto_off, AutoOffAction::TurnOff);
        assert!(!report.display_on);
        assert_eq!(report.kind, FrameKind::Blank);
        assert_eq!(scheduler.auto_off().ticks_on(), 0);

        for _ in 0..10 {
            let report = scheduler.tick();
            assert!(!report.display_on);
            assert_eq!(report.auto_off, AutoOffAction::None);
        }

        // The change reached the preference store
        let (_, mut storage, _) = scheduler.into_parts();
        assert!(!load_page_state(&mut storage).unwrap().display_on);
    }

    #[test]
    fn test_disabled_auto_off_never_changes_display() {
        let mut scheduler = scheduler(false, PageState::default());
        for _ in 0..100 {
            assert!(scheduler.tick().display_on);
        }
        assert_eq!(scheduler.auto_off().state(), AutoOffState::Idle);
    }

    #[test]
    fn test_display_off_sends_blank_frames() {
        let mut scheduler = scheduler(false, PageState::new(Page::Music, false));
        for _ in 0..3 {
            let report = scheduler.tick();
            assert_eq!(report.kind, FrameKind::Blank);
        }
        assert!(scheduler.transport().sends.iter().all(|(body, _)| body.is_empty()));
    }

    #[test]
    fn test_calendar_without_events_is_sentinel() {
        let mut scheduler = scheduler(false, PageState::new(Page::Calendar, true));
        let report = scheduler.tick();
        assert_eq!(report.kind, FrameKind::Sentinel);
        assert_eq!(scheduler.transport().sends[0].0, SENTINEL_BODY);
    }

    #[test]
    fn test_calendar_with_event() {
        let mut scheduler = scheduler(false, PageState::new(Page::Calendar, true));
        let now = scheduler.sources_mut().clock.local_minutes;
        scheduler.sources_mut().calendar.push(CalendarEvent {
            title: bounded("Dentist"),
            start: now + 55,
            end: now + 85,
        });
        scheduler.tick();
        assert_eq!(scheduler.transport().sends[0].0, "Dentist 15:00-15:30\n");
    }

    #[test]
    fn test_page_switch_changes_next_tick() {
        let mut scheduler = scheduler(false, PageState::default());
        scheduler.tick();
        scheduler.set_page(Page::Music).unwrap();
        let report = scheduler.tick();

        assert_eq!(report.page, Page::Music);
        assert_eq!(
            scheduler.transport().sends[1].0,
            "Teardrop\nMezzanine\nMassive Attack\n1:05 [#---------] 5:30\n"
        );
        assert_eq!(scheduler.last_frame().map(|f| f.lines().len()), Some(4));
    }

    #[test]
    fn test_rear_view_placeholder() {
        let mut scheduler = scheduler(false, PageState::new(Page::RearView, true));
        assert_eq!(scheduler.tick().kind, FrameKind::Content);
    }

    #[test]
    fn test_user_actions_persist() {
        let mut scheduler = scheduler(false, PageState::default());
        scheduler.set_page(Page::Calendar).unwrap();
        assert_eq!(scheduler.toggle_display(), Ok(false));
        assert_eq!(scheduler.next_page(), Ok(Page::RearView));

        let (_, mut storage, _) = scheduler.into_parts();
        assert_eq!(
            load_page_state(&mut storage),
            Ok(PageState::new(Page::RearView, false))
        );
    }

    #[test]
    fn test_manual_on_restarts_countdown() {
        let mut scheduler = scheduler(true, PageState::default());
        for _ in 0..10 {
            scheduler.tick();
        }
        assert!(!scheduler.page_state().display_on);

        scheduler.set_display_on(true).unwrap();
        scheduler.tick();
        assert_eq!(scheduler.auto_off().state(), AutoOffState::Counting);
        assert_eq!(scheduler.auto_off().ticks_on(), 1);
    }

    #[test]
    fn test_restart_with_persisted_state() {
        let mut storage = Storage::new();
        save_page_state(&mut storage, &PageState::new(Page::Music, false)).unwrap();

        let (mut scheduler, outcome) =
            FrameScheduler::restore(&config(true), FakeTransport::default(), storage, sources());
        assert_eq!(outcome, LoadOutcome::Loaded);
        assert_eq!(scheduler.page_state(), PageState::new(Page::Music, false));
        assert_eq!(scheduler.auto_off().state(), AutoOffState::Idle);

        for _ in 0..20 {
            let report = scheduler.tick();
            assert_eq!(report.kind, FrameKind::Blank);
            assert_eq!(scheduler.auto_off().state(), AutoOffState::Idle);
        }
        assert!(scheduler.transport().sends.iter().all(|(body, _)| body.is_empty()));

        scheduler.set_display_on(true).unwrap();
        let report = scheduler.tick();
        assert_eq!(report.kind, FrameKind::Content);
        assert!(scheduler.transport().sends[20].0.starts_with("Teardrop\n"));
    }

    #[test]
    fn test_restore_without_record_uses_defaults() {
        let (scheduler, outcome) =
            Scheduler::restore(&config(false), FakeTransport::default(), Storage::new(), sources());
        assert_eq!(outcome, LoadOutcome::Initialized);
        assert_eq!(scheduler.page_state(), PageState::default());
    }

    #[test]
    fn test_disconnected_tick_completes() {
        let mut transport = FakeTransport::default();
        transport.state = ConnectionState::Disconnected;
        let mut scheduler =
            FrameScheduler::new(&config(false), PageState::default(), transport, Storage::new(), sources());

        let report = scheduler.tick();
        assert_eq!(report.outcome, SendOutcome::Skipped);
        // Sequence still advances
        assert_eq!(scheduler.next_sequence(), 1);
    }

    #[test]
    fn test_shutdown_sequence() {
        let mut scheduler = scheduler(false, PageState::default());
        scheduler.tick();
        let report = scheduler.shutdown();

        assert!(report.blank.is_sent());
        assert!(report.exit.is_sent());
        assert_eq!(report.disconnect, Ok(()));

        let transport = scheduler.transport();
        assert_eq!(transport.sends.last(), Some(&(String::new(), 1)));
        assert_eq!(transport.exits, 1);
        assert_eq!(transport.disconnects, 1);
    }

    #[test]
    fn test_end_to_end_over_packet_link() {
        let transport = SequencedTransport::new(RecordingLink::connected());
        let mut scheduler = FrameScheduler::new(
            &config(false),
            PageState::default(),
            transport,
            Storage::new(),
            sources(),
        );
        scheduler.tick();
        scheduler.set_display_on(false).unwrap();
        scheduler.tick();
        scheduler.shutdown();

        let link = scheduler.transport().link();
        let texts = link.texts();
        assert_eq!(texts.len(), 3);
        assert_eq!(texts[0].0, 0);
        assert_eq!(texts[0].1, ScreenStatus::NewContent as u8);
        assert_eq!((texts[1].0, texts[1].1), (1, ScreenStatus::Blank as u8));
        assert_eq!((texts[2].0, texts[2].1), (2, ScreenStatus::Blank as u8));
        assert_eq!(link.packets.last().map(|p| p[0]), Some(CMD_EXIT));
        assert_eq!(scheduler.connection_state(), ConnectionState::Disconnected);
    }

    #[test]
    fn test_events_reach_transport() {
        let mut scheduler = scheduler(false, PageState::default());
        scheduler.handle_event(PeripheralEvent::Battery { percent: 40 });
        assert_eq!(
            scheduler.transport().events,
            vec![PeripheralEvent::Battery { percent: 40 }]
        );
    }

    proptest! {
        #[test]
        fn prop_auto_off_disabled_keeps_display(
            actions in proptest::collection::vec(0u8..4, 0..200),
        ) {
            // Only user actions may change the flag
            let mut scheduler = scheduler(false, PageState::default());
            let mut expected = true;
            for action in actions {
                match action {
                    0 => { scheduler.set_display_on(true).unwrap(); expected = true; }
                    1 => { scheduler.set_display_on(false).unwrap(); expected = false; }
                    _ => {}
                }
                let report = scheduler.tick();
                prop_assert_eq!(report.display_on, expected);
                prop_assert_eq!(report.auto_off, AutoOffAction::None);
            }
        }

        #[test]
        fn prop_one_send_per_tick_any_state(
            auto_off in any::<bool>(),
            pages in proptest::collection::vec(0usize..4, 1..100),
        ) {
            let mut scheduler = scheduler(auto_off, PageState::default());
            for (i, page) in pages.iter().enumerate() {
                scheduler.set_page(Page::ALL[*page]).unwrap();
                scheduler.tick();
                prop_assert_eq!(scheduler.transport().sends.len(), i + 1);
            }
        }
    }
}
