//! Entry point for `netcfg`, the client of the netcfg control plane.
//!
//! All work happens in [`netcfg_cli::run`]; the binary only wires the
//! process streams in.

use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdin = io::stdin().lock();
    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr().lock();
    netcfg_cli::run(std::env::args_os(), &mut stdin, &mut stdout, &mut stderr)
}
