//! Entry point for `netcfgd`, the netcfg control-plane daemon.

use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    match netcfgd::run_daemon() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            // Telemetry may not be installed yet, so report on stderr directly.
            let _ = writeln!(io::stderr().lock(), "netcfgd: {error}");
            ExitCode::FAILURE
        }
    }
}
