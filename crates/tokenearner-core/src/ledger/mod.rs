mod state;
mod store;

pub use state::{format_relative, DailyProgress, EarningRecord, LedgerState};
pub use store::LedgerStore;
