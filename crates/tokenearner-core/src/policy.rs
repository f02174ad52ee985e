//! Fixed reward policy.
//!
//! These values are constants of the product, not user configuration.

use std::time::Duration;

/// Tokens credited per successful claim.
pub const EARN_AMOUNT: u64 = 100;

/// Countdown length in seconds.
pub const TIMER_DURATION_SECS: u32 = 10;

/// Daily goal in tokens.
pub const DAILY_TARGET: u64 = 1000;

/// Link opened on every earn request.
pub const TARGET_URL: &str = "https://link.gigapub.tech/l/wcz5o9fvu";

/// Storage key of the persisted ledger blob.
pub const STORAGE_KEY: &str = "tokenEarnerData";

/// Number of history records shown to the user.
pub const RECENT_HISTORY_LEN: usize = 10;

/// Label of the host's primary action button.
pub const CLAIM_LABEL: &str = "CLAIM REWARDS";

/// Nominal period between countdown ticks.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);
