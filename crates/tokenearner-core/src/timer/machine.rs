//! Reward state machine.
//!
//! Gates every reward behind a countdown. The machine owns the in-memory
//! session (phase, remaining seconds) and the loaded ledger, and persists
//! through a [`LedgerStore`]. It has no thread of its own: the caller feeds
//! it user actions, scheduler ticks and host inputs one at a time.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Claimable -> Idle
//! ```
//!
//! `Running` may be paused and resumed without leaving the phase.
//!
//! ## Usage
//!
//! ```ignore
//! let mut machine = RewardMachine::init(store, host, scheduler, clock);
//! machine.request_earn()?;
//! // On every scheduler tick:
//! machine.tick();
//! // Once TimerCompleted was emitted:
//! machine.claim()?;
//! for event in machine.drain_events() { render(event) }
//! ```

use serde::{Deserialize, Serialize};

use super::scheduler::{Scheduler, TaskHandle};
use crate::clock::Clock;
use crate::error::RewardError;
use crate::events::{Event, Severity};
use crate::host::{HapticKind, HostInput, HostShell, PrimaryAction};
use crate::ledger::{DailyProgress, LedgerState, LedgerStore};
use crate::policy::{CLAIM_LABEL, EARN_AMOUNT, TARGET_URL, TICK_PERIOD, TIMER_DURATION_SECS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    Idle,
    Running,
    /// Countdown done, reward waiting to be claimed.
    Claimable,
}

pub struct RewardMachine {
    ledger: LedgerState,
    store: LedgerStore,
    phase: TimerPhase,
    remaining_secs: u32,
    /// Live tick task; `None` while idle, claimable or paused.
    ticker: Option<Box<dyn TaskHandle>>,
    paused: bool,
    host: Box<dyn HostShell>,
    scheduler: Box<dyn Scheduler>,
    clock: Box<dyn Clock>,
    outbox: Vec<Event>,
}

impl RewardMachine {
    /// Load the ledger, roll the day if needed and queue the initial render.
    pub fn init(
        store: LedgerStore,
        host: Box<dyn HostShell>,
        scheduler: Box<dyn Scheduler>,
        clock: Box<dyn Clock>,
    ) -> Self {
        let ledger = store.load();
        let mut machine = Self {
            ledger,
            store,
            phase: TimerPhase::Idle,
            remaining_secs: 0,
            ticker: None,
            paused: false,
            host,
            scheduler,
            clock,
            outbox: Vec::new(),
        };

        machine.host.enable_closing_confirmation();
        machine.set_primary_action(false);
        let reset = machine.check_daily_reset();

        let display_name = machine
            .host
            .current_user_display_name()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| "User".to_string());
        machine.emit(Event::Greeting { display_name });
        machine.apply_theme();
        machine.emit(Event::BalanceChanged {
            balance: machine.ledger.token_balance,
            delta: 0,
            at: machine.clock.now(),
        });
        machine.emit_history();
        if !reset {
            machine.emit_progress();
        }

        tracing::debug!(
            balance = machine.ledger.token_balance,
            records = machine.ledger.earnings_history.len(),
            "reward machine ready"
        );
        machine
    }

    /// Stop ticking, save one last time and hand back the ledger.
    pub fn teardown(mut self) -> LedgerState {
        self.cancel_ticker();
        self.set_primary_action(false);
        self.persist();
        std::mem::take(&mut self.ledger)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Raw ledger. Day-scoped counters may be stale; read them through
    /// [`Self::daily_progress`].
    pub fn ledger(&self) -> &LedgerState {
        &self.ledger
    }

    pub fn balance(&self) -> u64 {
        self.ledger.token_balance
    }

    /// Today's progress. Rolls the day first if the date changed.
    pub fn daily_progress(&mut self) -> DailyProgress {
        self.check_daily_reset();
        self.ledger.daily_progress()
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&mut self) -> Event {
        let progress = self.daily_progress();
        Event::StateSnapshot {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            paused: self.paused,
            balance: self.ledger.token_balance,
            daily_earned: progress.earned,
            daily_remaining: progress.remaining,
            daily_percent: progress.percent,
            session_count: progress.session_count,
            at: self.clock.now(),
        }
    }

    pub fn pending_events(&self) -> &[Event] {
        &self.outbox
    }

    /// Take every event emitted since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.outbox)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Open the target link and start the countdown.
    ///
    /// # Errors
    /// [`RewardError::Busy`] while a countdown runs, [`RewardError::LinkOpen`]
    /// if the host could not open the link. Neither changes state.
    pub fn request_earn(&mut self) -> Result<(), RewardError> {
        if self.phase == TimerPhase::Running {
            return Err(self.reject(RewardError::Busy));
        }

        self.host.haptic_feedback(HapticKind::Light);
        self.emit(Event::Loading { visible: true });

        if let Err(e) = self.host.open_external_link(TARGET_URL) {
            tracing::warn!("error opening link: {e}");
            self.emit(Event::Loading { visible: false });
            return Err(self.reject(RewardError::LinkOpen(e)));
        }

        self.start_timer()?;
        self.emit(Event::Loading { visible: false });
        Ok(())
    }

    /// Start a full countdown without opening the link.
    ///
    /// Starting from `Claimable` forfeits the unclaimed reward.
    ///
    /// # Errors
    /// [`RewardError::Busy`] while a countdown runs.
    pub fn start_timer(&mut self) -> Result<(), RewardError> {
        if self.phase == TimerPhase::Running {
            return Err(self.reject(RewardError::Busy));
        }
        if self.phase == TimerPhase::Claimable {
            tracing::info!("unclaimed reward replaced by a new countdown");
            self.set_primary_action(false);
        }

        self.phase = TimerPhase::Running;
        self.remaining_secs = TIMER_DURATION_SECS;
        self.paused = false;
        self.arm_ticker();

        self.emit(Event::TimerStarted {
            duration_secs: TIMER_DURATION_SECS,
            at: self.clock.now(),
        });
        self.emit(Event::TimerTick {
            remaining_secs: self.remaining_secs,
        });
        Ok(())
    }

    /// Advance the countdown by one second.
    ///
    /// Ignored unless a countdown is running and not paused.
    pub fn tick(&mut self) {
        if self.phase != TimerPhase::Running || self.ticker.is_none() {
            tracing::trace!(phase = ?self.phase, paused = self.paused, "tick ignored");
            return;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        self.emit(Event::TimerTick {
            remaining_secs: self.remaining_secs,
        });
        if self.remaining_secs == 0 {
            self.complete_timer();
        }
    }

    fn complete_timer(&mut self) {
        self.cancel_ticker();
        self.phase = TimerPhase::Claimable;
        self.remaining_secs = 0;
        self.paused = false;

        self.set_primary_action(true);
        self.host.haptic_feedback(HapticKind::Success);
        self.emit(Event::TimerCompleted {
            at: self.clock.now(),
        });
        self.emit(Event::toast("Rewards ready to claim!", Severity::Success));
    }

    /// Credit the reward of a completed countdown.
    ///
    /// # Errors
    /// [`RewardError::NothingToClaim`] unless the phase is `Claimable`.
    pub fn claim(&mut self) -> Result<(), RewardError> {
        if self.phase != TimerPhase::Claimable {
            return Err(self.reject(RewardError::NothingToClaim));
        }

        self.emit(Event::Loading { visible: true });
        self.host.haptic_feedback(HapticKind::Heavy);

        // A claim after midnight belongs to the new day.
        self.check_daily_reset();

        let now = self.clock.now();
        self.ledger.credit(EARN_AMOUNT, now);
        self.persist();

        self.phase = TimerPhase::Idle;
        self.remaining_secs = 0;
        self.set_primary_action(false);

        tracing::info!(
            balance = self.ledger.token_balance,
            sessions = self.ledger.session_count,
            "reward claimed"
        );

        self.emit(Event::BalanceChanged {
            balance: self.ledger.token_balance,
            delta: EARN_AMOUNT,
            at: now,
        });
        self.emit_history();
        self.emit_progress();
        self.emit(Event::toast(
            format!("{EARN_AMOUNT} Tokens Added! 🎉"),
            Severity::Success,
        ));
        self.emit(Event::Loading { visible: false });
        Ok(())
    }

    /// Suspend ticking, keeping phase and remaining seconds.
    /// Returns whether anything changed.
    pub fn pause(&mut self) -> bool {
        if self.phase != TimerPhase::Running || self.paused {
            return false;
        }
        self.cancel_ticker();
        self.paused = true;
        self.emit(Event::TimerPaused {
            remaining_secs: self.remaining_secs,
            at: self.clock.now(),
        });
        true
    }

    /// Re-arm ticking from the remaining seconds at pause time.
    /// Returns whether anything changed.
    pub fn resume(&mut self) -> bool {
        if self.phase != TimerPhase::Running || !self.paused {
            return false;
        }
        self.paused = false;
        self.arm_ticker();
        self.emit(Event::TimerResumed {
            remaining_secs: self.remaining_secs,
            at: self.clock.now(),
        });
        true
    }

    /// Zero the day counters when the calendar day changed since the last
    /// reset. Returns whether a reset happened.
    pub fn check_daily_reset(&mut self) -> bool {
        let today = self.clock.today();
        if !self.ledger.roll_day(&today) {
            return false;
        }
        tracing::info!(%today, "daily counters reset");
        self.persist();
        self.emit_progress();
        true
    }

    /// Dispatch an input coming from the host shell.
    ///
    /// # Errors
    /// A primary-action click is a claim and fails the same way.
    pub fn handle_input(&mut self, input: HostInput) -> Result<(), RewardError> {
        match input {
            HostInput::PrimaryActionClicked => self.claim()?,
            HostInput::VisibilityChanged { hidden: true } => {
                self.pause();
            }
            HostInput::VisibilityChanged { hidden: false } => {
                self.resume();
            }
            HostInput::ThemeChanged => self.apply_theme(),
            HostInput::BackRequested => self.host.close(),
            HostInput::ViewportChanged => {
                if let Some(height) = self.host.viewport_height() {
                    self.emit(Event::ViewportChanged { height });
                }
            }
        }
        Ok(())
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn emit(&mut self, event: Event) {
        self.outbox.push(event);
    }

    fn reject(&mut self, err: RewardError) -> RewardError {
        tracing::debug!(phase = ?self.phase, "rejected: {err}");
        self.host.haptic_feedback(HapticKind::Error);
        self.emit(Event::toast(err.to_string(), Severity::Error));
        err
    }

    fn persist(&mut self) {
        if let Err(e) = self.store.save(&self.ledger) {
            tracing::warn!("error saving data: {e}");
        }
    }

    fn arm_ticker(&mut self) {
        self.cancel_ticker();
        self.ticker = Some(self.scheduler.schedule_repeating(TICK_PERIOD));
    }

    fn cancel_ticker(&mut self) {
        if let Some(mut ticker) = self.ticker.take() {
            ticker.cancel();
        }
    }

    fn set_primary_action(&mut self, active: bool) {
        self.host.show_primary_action(&PrimaryAction {
            label: CLAIM_LABEL.to_string(),
            visible: active,
            enabled: active,
        });
    }

    fn apply_theme(&mut self) {
        let theme = self.host.theme_params().resolve();
        self.emit(Event::ThemeApplied { theme });
    }

    fn emit_history(&mut self) {
        let recent = self.ledger.recent_history();
        self.emit(Event::HistoryChanged { recent });
    }

    fn emit_progress(&mut self) {
        let progress = self.ledger.daily_progress();
        self.emit(Event::ProgressChanged {
            earned: progress.earned,
            remaining: progress.remaining,
            percent: progress.percent,
            session_count: progress.session_count,
        });
    }
}

impl Drop for RewardMachine {
    fn drop(&mut self) {
        self.cancel_ticker();
    }
}
