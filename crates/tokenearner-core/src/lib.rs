//! # Token Earner Core Library
//!
//! This library provides the core logic of Token Earner: a timer-gated
//! reward widget. The user opens a link, waits out a short countdown, then
//! claims a fixed reward into a locally persisted ledger with a daily goal.
//! All operations are available through the standalone CLI binary; any GUI
//! is a thin layer that drains events from the same state machine.
//!
//! ## Architecture
//!
//! - **Reward Machine**: a single-threaded state machine that requires the
//!   caller to deliver scheduler ticks and user actions one at a time
//! - **Ledger**: the persisted balance, history and daily counters, stored
//!   as one JSON blob in a key-value slot (file, SQLite or memory)
//! - **Host**: capability trait for the embedding shell (links, primary
//!   action button, haptics, theme)
//!
//! ## Key Components
//!
//! - [`RewardMachine`]: timer phases, claims and daily rollover
//! - [`LedgerStore`]: load/save with silent recovery
//! - [`Config`]: application configuration management
//! - [`HostShell`]: trait for the embedding environment

pub mod clock;
pub mod error;
pub mod events;
pub mod host;
pub mod ledger;
pub mod policy;
pub mod storage;
pub mod timer;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ConfigError, CoreError, HostError, RewardError, StorageError};
pub use events::{Event, Severity};
pub use host::{HapticKind, HostInput, HostShell, NullHost, SystemHost};
pub use ledger::{DailyProgress, EarningRecord, LedgerState, LedgerStore};
pub use storage::{Config, StorageBackend};
pub use timer::{RewardMachine, TimerPhase};
