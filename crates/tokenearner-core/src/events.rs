use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::host::Theme;
use crate::ledger::EarningRecord;
use crate::timer::TimerPhase;

/// Every state change in the system produces an Event.
/// The presentation layer drains them from the machine and renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    TimerTick {
        remaining_secs: u32,
    },
    TimerPaused {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerResumed {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    /// Countdown finished; the reward can be claimed.
    TimerCompleted {
        at: DateTime<Utc>,
    },
    BalanceChanged {
        balance: u64,
        delta: u64,
        at: DateTime<Utc>,
    },
    ProgressChanged {
        earned: u64,
        remaining: u64,
        percent: f64,
        session_count: u64,
    },
    /// Most recent records, newest first.
    HistoryChanged {
        recent: Vec<EarningRecord>,
    },
    Toast {
        message: String,
        severity: Severity,
    },
    Loading {
        visible: bool,
    },
    Greeting {
        display_name: String,
    },
    ThemeApplied {
        theme: Theme,
    },
    ViewportChanged {
        height: u32,
    },
    StateSnapshot {
        phase: TimerPhase,
        remaining_secs: u32,
        paused: bool,
        balance: u64,
        daily_earned: u64,
        daily_remaining: u64,
        daily_percent: f64,
        session_count: u64,
        at: DateTime<Utc>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
}

impl Event {
    pub fn toast(message: impl Into<String>, severity: Severity) -> Self {
        Event::Toast {
            message: message.into(),
            severity,
        }
    }
}
