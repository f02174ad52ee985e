mod machine;
mod scheduler;

pub use machine::{RewardMachine, TimerPhase};
pub use scheduler::{
    tokio_scheduler, ManualScheduler, Scheduler, TaskHandle, Tick, TickReceiver, TokioScheduler,
};
