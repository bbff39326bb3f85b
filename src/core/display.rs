use crate::core::api::QueueApi;
use crate::domain::model::BoardState;
use crate::domain::ports::DisplayView;
use chrono::{DateTime, Local, Locale, TimeZone};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Consecutive poll failures before the log escalates from warn to error.
const FAILURE_ESCALATION_THRESHOLD: u32 = 5;

/// Intervals of the two board loops.
#[derive(Debug, Clone)]
pub struct BoardTiming {
    pub clock_interval: Duration,
    pub poll_interval: Duration,
}

impl Default for BoardTiming {
    fn default() -> Self {
        Self {
            clock_interval: Duration::from_secs(1),
            poll_interval: Duration::from_secs(3),
        }
    }
}

/// Public queue display: a clock line plus the current call, each driven
/// by its own loop.
pub struct DisplayBoard<V: DisplayView> {
    api: QueueApi,
    view: Arc<V>,
    timing: BoardTiming,
}

/// Running board loops. Dropping the handle does not stop them; call
/// [`DisplayBoardHandle::stop`].
pub struct DisplayBoardHandle {
    clock: JoinHandle<()>,
    poll: JoinHandle<()>,
}

impl DisplayBoardHandle {
    /// Cancel both loops. Safe to call more than once.
    pub fn stop(&self) {
        self.clock.abort();
        self.poll.abort();
    }

    pub fn is_running(&self) -> bool {
        !self.clock.is_finished() || !self.poll.is_finished()
    }
}

impl<V: DisplayView> DisplayBoard<V> {
    pub fn new(api: QueueApi, view: Arc<V>, timing: BoardTiming) -> Self {
        Self { api, view, timing }
    }
}

impl<V: DisplayView + 'static> DisplayBoard<V> {
    /// Start the clock and queue-state loops. Both fire immediately, then
    /// keep their fixed cadence; a tick that overruns is skipped, never
    /// queued up.
    pub fn spawn(self) -> DisplayBoardHandle {
        let DisplayBoard { api, view, timing } = self;

        let clock_view = Arc::clone(&view);
        let clock = tokio::spawn(clock_loop(clock_view, timing.clock_interval));
        let poll = tokio::spawn(poll_loop(api, view, timing.poll_interval));

        tracing::info!("Display board loops started");
        DisplayBoardHandle { clock, poll }
    }
}

async fn clock_loop<V: DisplayView>(view: Arc<V>, every: Duration) {
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        view.show_timestamp(&format_timestamp(&Local::now()));
    }
}

async fn poll_loop<V: DisplayView>(api: QueueApi, view: Arc<V>, every: Duration) {
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut failures: u32 = 0;

    loop {
        ticker.tick().await;
        poll_tick(&api, view.as_ref(), &mut failures).await;
    }
}

/// One queue-state tick: fetch, derive the board state, render it.
async fn poll_tick<V: DisplayView + ?Sized>(api: &QueueApi, view: &V, failures: &mut u32) {
    match api.current_display().await {
        Ok(snapshot) => {
            if *failures > 0 {
                tracing::info!("Display poll recovered after {} failures", failures);
            }
            *failures = 0;
            render_state(view, &BoardState::from_snapshot(snapshot));
        }
        Err(error) => {
            *failures = failures.saturating_add(1);
            if *failures >= FAILURE_ESCALATION_THRESHOLD {
                tracing::error!("Display poll failed {} times in a row: {}", failures, error);
            } else {
                tracing::warn!("Display poll failed: {}", error);
            }
            render_state(view, &BoardState::ConnectionLost);
        }
    }
}

/// Apply one board state to the view. Regions without a fresh value keep
/// what they showed before.
pub fn render_state<V: DisplayView + ?Sized>(view: &V, state: &BoardState) {
    view.show_current_queue(state.queue_text());
    view.show_status_line(&state.status_line());
    if let Some(call_count) = state.call_count_text() {
        view.show_call_count(&call_count);
    }
    if let Some(waiting) = state.waiting_count() {
        view.show_waiting_count(waiting);
    }
}

/// Long-form Indonesian timestamp, the board's clock line.
pub fn format_timestamp<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format_localized("%A, %d %B %Y %H.%M.%S", Locale::id_ID)
        .to_string()
}
