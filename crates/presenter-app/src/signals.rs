//! Process signal wiring.
//!
//! SIGUSR1 only sets the advance flag. SIGINT and SIGTERM are received on a
//! dedicated thread that flushes stdout and exits with the shell convention
//! status for the signal.

use std::io::Write;

use signal_hook::consts::signal::{SIGINT, SIGTERM, SIGUSR1};
use signal_hook::iterator::Signals;

use presenter_core::exit::ExitCode;
use presenter_core::signal::AdvanceFlag;

/// Exit status for a termination signal.
pub fn exit_code_for(signal: i32) -> Option<ExitCode> {
    match signal {
        SIGINT => Some(ExitCode::KeyboardInterrupt),
        SIGTERM => Some(ExitCode::Sigterm),
        _ => None,
    }
}

/// Route SIGUSR1 into `advance`.
pub fn register_advance(advance: &AdvanceFlag) -> std::io::Result<()> {
    signal_hook::flag::register(SIGUSR1, advance.handle())?;
    Ok(())
}

/// Spawn the thread that turns SIGINT/SIGTERM into a process exit.
pub fn spawn_terminator() -> std::io::Result<()> {
    let mut signals = Signals::new([SIGINT, SIGTERM])?;
    std::thread::Builder::new()
        .name("signals".to_string())
        .spawn(move || {
            for signal in signals.forever() {
                let Some(code) = exit_code_for(signal) else {
                    continue;
                };
                log::info!("signal {signal} received, exiting with {}", code.code());
                let _ = std::io::stdout().flush();
                std::process::exit(code.code());
            }
        })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn termination_codes() {
        assert_eq!(exit_code_for(SIGINT), Some(ExitCode::KeyboardInterrupt));
        assert_eq!(exit_code_for(SIGTERM), Some(ExitCode::Sigterm));
        assert_eq!(exit_code_for(SIGUSR1), None);
    }

    #[test]
    fn sigusr1_sets_advance_flag() {
        let advance = AdvanceFlag::new();
        register_advance(&advance).unwrap();
        assert!(!advance.take());
        signal_hook::low_level::raise(SIGUSR1).unwrap();
        assert!(advance.take());
        assert!(!advance.take());
    }
}
