pub mod config;
pub mod ledger;
pub mod timer;

use tokenearner_core::storage::{data_dir, open_slot};
use tokenearner_core::timer::Scheduler;
use tokenearner_core::{Config, CoreError, LedgerStore, RewardMachine, SystemClock, SystemHost};

/// Build a reward machine over the configured storage backend.
pub fn open_machine(
    config: &Config,
    scheduler: Box<dyn Scheduler>,
    open_links: bool,
) -> Result<RewardMachine, CoreError> {
    let slot = open_slot(config, data_dir()?)?;
    let mut host_config = config.host.clone();
    host_config.open_links &= open_links;

    Ok(RewardMachine::init(
        LedgerStore::new(slot),
        Box::new(SystemHost::from_config(&host_config)),
        scheduler,
        Box::new(SystemClock),
    ))
}

/// Print every pending event as one JSON line.
pub fn print_events(machine: &mut RewardMachine) -> Result<(), serde_json::Error> {
    for event in machine.drain_events() {
        println!("{}", serde_json::to_string(&event)?);
    }
    Ok(())
}
