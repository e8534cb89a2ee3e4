//! Process-level checks of the `netcfg` binary.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::str::contains;

#[test]
fn help_succeeds() {
    let mut command = cargo_bin_cmd!("netcfg");
    command.arg("--help");
    command
        .assert()
        .success()
        .stdout(contains("NAME=VALUE"));
}

#[cfg(target_os = "linux")]
#[test]
fn missing_path_is_a_usage_error() {
    let mut command = cargo_bin_cmd!("netcfg");
    command.arg("get");
    command.assert().code(22).stderr(contains("PATH"));
}

#[cfg(target_os = "linux")]
#[test]
fn unreachable_daemon_exits_with_connection_refused() {
    let dir = tempfile::tempdir().expect("temp dir");
    let socket = dir.path().join("absent.sock");
    let endpoint = format!("unix://{}", socket.display());
    let mut command = cargo_bin_cmd!("netcfg");
    command.args(["--daemon-socket", endpoint.as_str(), "get", "/meta"]);
    command.assert().code(111);
}
