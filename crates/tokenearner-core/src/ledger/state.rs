//! Persisted ledger state and its read-only projections.

use chrono::{DateTime, Local, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::policy::{DAILY_TARGET, RECENT_HISTORY_LEN};

/// A single claimed reward. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarningRecord {
    pub amount: u64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

/// The durable ledger.
///
/// Field names on the wire are fixed by the stored blob format. Missing
/// fields fall back to zero values, so older blobs keep loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerState {
    /// Lifetime balance; never reset.
    #[serde(rename = "tokenCount", default)]
    pub token_balance: u64,
    /// Chronological, oldest first.
    #[serde(default)]
    pub earnings_history: Vec<EarningRecord>,
    /// Claims since the last daily reset.
    #[serde(default)]
    pub session_count: u64,
    /// Tokens since the last daily reset.
    #[serde(default)]
    pub daily_earnings: u64,
    #[serde(default = "default_daily_target")]
    pub daily_target: u64,
    /// Calendar day of the last reset. Empty until the first check runs.
    #[serde(default)]
    pub last_reset_date: String,
}

fn default_daily_target() -> u64 {
    DAILY_TARGET
}

impl Default for LedgerState {
    fn default() -> Self {
        Self {
            token_balance: 0,
            earnings_history: Vec::new(),
            session_count: 0,
            daily_earnings: 0,
            daily_target: DAILY_TARGET,
            last_reset_date: String::new(),
        }
    }
}

/// Day-scoped progress toward the daily target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyProgress {
    pub earned: u64,
    pub remaining: u64,
    /// 0.0 ..= 100.0
    pub percent: f64,
    pub session_count: u64,
}

impl LedgerState {
    /// Tokens still needed to hit the daily target, never negative.
    pub fn remaining_to_target(&self) -> u64 {
        self.daily_target.saturating_sub(self.daily_earnings)
    }

    /// 0.0 .. 1.0 progress toward the daily target.
    pub fn progress_fraction(&self) -> f64 {
        if self.daily_target == 0 {
            return 1.0;
        }
        (self.daily_earnings as f64 / self.daily_target as f64).min(1.0)
    }

    /// The most recent records, newest first.
    pub fn recent_history(&self) -> Vec<EarningRecord> {
        self.earnings_history
            .iter()
            .rev()
            .take(RECENT_HISTORY_LEN)
            .copied()
            .collect()
    }

    pub fn daily_progress(&self) -> DailyProgress {
        DailyProgress {
            earned: self.daily_earnings,
            remaining: self.remaining_to_target(),
            percent: self.progress_fraction() * 100.0,
            session_count: self.session_count,
        }
    }

    /// Credit one claim. Callers enforce the claimable guard.
    ///
    /// The record is stamped at millisecond precision, the resolution the
    /// blob stores.
    pub(crate) fn credit(&mut self, amount: u64, at: DateTime<Utc>) {
        self.token_balance += amount;
        self.daily_earnings += amount;
        self.session_count += 1;
        self.earnings_history.push(EarningRecord {
            amount,
            timestamp: at.trunc_subsecs(3),
        });
    }

    /// Zero the day-scoped counters if `today` differs from the last reset.
    /// Returns whether a reset happened.
    pub(crate) fn roll_day(&mut self, today: &str) -> bool {
        if self.last_reset_date == today {
            return false;
        }
        self.daily_earnings = 0;
        self.session_count = 0;
        self.last_reset_date = today.to_string();
        true
    }
}

/// Human-friendly age of a record, e.g. `5m ago`.
pub fn format_relative(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now.signed_duration_since(timestamp);
    let minutes = diff.num_minutes();
    let hours = diff.num_hours();
    let days = diff.num_days();

    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{minutes}m ago")
    } else if hours < 24 {
        format!("{hours}h ago")
    } else if days < 7 {
        format!("{days}d ago")
    } else {
        timestamp
            .with_timezone(&Local)
            .format("%-m/%-d/%Y")
            .to_string()
    }
}
