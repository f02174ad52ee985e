use chrono::{DateTime, Utc};
use clap::Subcommand;
use serde::Serialize;
use tokenearner_core::ledger::format_relative;
use tokenearner_core::timer::ManualScheduler;
use tokenearner_core::Config;

use super::open_machine;

#[derive(Subcommand)]
pub enum LedgerAction {
    /// Balance and today's progress as JSON
    Status,
    /// The most recent earnings, newest first
    History,
}

#[derive(Serialize)]
struct HistoryRow {
    amount: u64,
    timestamp: DateTime<Utc>,
    age: String,
}

pub fn run(action: LedgerAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut machine = open_machine(config, Box::new(ManualScheduler::new()), false)?;

    match action {
        LedgerAction::Status => {
            let snapshot = machine.snapshot();
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        LedgerAction::History => {
            let now = Utc::now();
            let rows: Vec<HistoryRow> = machine
                .ledger()
                .recent_history()
                .into_iter()
                .map(|record| HistoryRow {
                    amount: record.amount,
                    timestamp: record.timestamp,
                    age: format_relative(record.timestamp, now),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
    }

    // Persists a daily reset the snapshot may have triggered.
    machine.teardown();
    Ok(())
}
