use clap::Subcommand;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokenearner_core::timer::tokio_scheduler;
use tokenearner_core::{Config, HostInput, RewardMachine, TimerPhase};

use super::{open_machine, print_events};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run one full cycle: open the link, count down, claim
    Earn {
        /// Do not open the link in a browser
        #[arg(long)]
        no_open: bool,
    },
    /// Interactive session reading commands from stdin
    /// (earn, claim, pause, resume, status, history, quit)
    Session {
        /// Claim automatically as soon as the countdown completes
        #[arg(long)]
        auto_claim: bool,
        /// Do not open the link in a browser
        #[arg(long)]
        no_open: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionCommand {
    Earn,
    Claim,
    Pause,
    Resume,
    Status,
    History,
    Quit,
}

fn parse_command(line: &str) -> Option<SessionCommand> {
    match line.trim().to_ascii_lowercase().as_str() {
        "earn" => Some(SessionCommand::Earn),
        "claim" => Some(SessionCommand::Claim),
        "pause" | "hide" => Some(SessionCommand::Pause),
        "resume" | "show" => Some(SessionCommand::Resume),
        "status" => Some(SessionCommand::Status),
        "history" => Some(SessionCommand::History),
        "quit" | "exit" | "back" => Some(SessionCommand::Quit),
        _ => None,
    }
}

pub fn run(action: TimerAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match action {
        TimerAction::Earn { no_open } => runtime.block_on(earn(config, !no_open)),
        TimerAction::Session {
            auto_claim,
            no_open,
        } => runtime.block_on(session(config, auto_claim, !no_open)),
    }
}

async fn earn(config: &Config, open_links: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (scheduler, mut ticks) = tokio_scheduler();
    let mut machine = open_machine(config, Box::new(scheduler), open_links)?;
    print_events(&mut machine)?;

    let started = machine.request_earn();
    print_events(&mut machine)?;
    started?;

    while machine.phase() == TimerPhase::Running {
        if ticks.recv().await.is_none() {
            break;
        }
        machine.tick();
        print_events(&mut machine)?;
    }

    machine.claim()?;
    print_events(&mut machine)?;
    machine.teardown();
    Ok(())
}

async fn session(
    config: &Config,
    auto_claim: bool,
    open_links: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (scheduler, mut ticks) = tokio_scheduler();
    let mut machine = open_machine(config, Box::new(scheduler), open_links)?;
    print_events(&mut machine)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            Some(_) = ticks.recv() => {
                machine.tick();
                if auto_claim && machine.phase() == TimerPhase::Claimable {
                    // Rejections surface as toast events.
                    let _ = machine.claim();
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match parse_command(&line) {
                    Some(SessionCommand::Quit) => {
                        let _ = machine.handle_input(HostInput::BackRequested);
                        break;
                    }
                    Some(command) => dispatch(&mut machine, command)?,
                    None => eprintln!("unknown command: {}", line.trim()),
                }
            }
        }
        print_events(&mut machine)?;
    }

    machine.teardown();
    Ok(())
}

fn dispatch(
    machine: &mut RewardMachine,
    command: SessionCommand,
) -> Result<(), serde_json::Error> {
    tracing::debug!(?command, "session command");
    // Rejected transitions are reported through toast events.
    match command {
        SessionCommand::Earn => {
            let _ = machine.request_earn();
        }
        SessionCommand::Claim => {
            let _ = machine.handle_input(HostInput::PrimaryActionClicked);
        }
        SessionCommand::Pause => {
            let _ = machine.handle_input(HostInput::VisibilityChanged { hidden: true });
        }
        SessionCommand::Resume => {
            let _ = machine.handle_input(HostInput::VisibilityChanged { hidden: false });
        }
        SessionCommand::Status => {
            let snapshot = machine.snapshot();
            println!("{}", serde_json::to_string(&snapshot)?);
        }
        SessionCommand::History => {
            println!("{}", serde_json::to_string(&machine.ledger().recent_history())?);
        }
        SessionCommand::Quit => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_commands() {
        assert_eq!(parse_command("earn"), Some(SessionCommand::Earn));
        assert_eq!(parse_command("  CLAIM \n"), Some(SessionCommand::Claim));
        assert_eq!(parse_command("hide"), Some(SessionCommand::Pause));
        assert_eq!(parse_command("show"), Some(SessionCommand::Resume));
        assert_eq!(parse_command("exit"), Some(SessionCommand::Quit));
        assert_eq!(parse_command("back"), Some(SessionCommand::Quit));
        assert_eq!(parse_command("dance"), None);
    }
}
