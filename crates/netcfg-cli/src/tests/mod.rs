//! End-to-end runs of the CLI against a fake daemon.

mod support;

use std::ffi::OsString;
use std::io::{Cursor, empty};
use std::net::TcpListener;
use std::process::ExitCode;

use netcfg_variant::Errno;
use rstest::rstest;
use tempfile::NamedTempFile;

use super::{exit_code, run_with_loader};
use support::{FakeDaemon, StaticConfigLoader};

struct Run {
    exit: ExitCode,
    stdout: String,
    stderr: String,
}

fn run_cli(loader: &StaticConfigLoader, args: &[&str], stdin: &str) -> Run {
    let args: Vec<OsString> = std::iter::once("netcfg")
        .chain(args.iter().copied())
        .map(OsString::from)
        .collect();
    let mut input = Cursor::new(stdin.as_bytes().to_vec());
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let exit = run_with_loader(args, &mut input, &mut stdout, &mut stderr, loader);
    Run {
        exit,
        stdout: String::from_utf8(stdout).expect("stdout utf8"),
        stderr: String::from_utf8(stderr).expect("stderr utf8"),
    }
}

#[test]
fn get_prints_the_response_document() {
    let mut daemon = FakeDaemon::spawn("OK\n<hostname>gw</hostname>\n").expect("daemon");
    let loader = StaticConfigLoader::tcp(daemon.port());

    let run = run_cli(&loader, &["get", "/system/hostname"], "");

    assert_eq!(run.exit, ExitCode::SUCCESS);
    assert_eq!(run.stdout, "<hostname>gw</hostname>\n");
    assert!(run.stderr.is_empty(), "{}", run.stderr);
    assert_eq!(
        daemon.take_request().expect("request"),
        "get /system/hostname\n\n"
    );
}

#[test]
fn bare_ok_prints_nothing() {
    let mut daemon = FakeDaemon::spawn("OK\n").expect("daemon");
    let loader = StaticConfigLoader::tcp(daemon.port());

    let run = run_cli(&loader, &["DELETE", "/config/interface/eth0"], "");

    assert_eq!(run.exit, ExitCode::SUCCESS);
    assert!(run.stdout.is_empty());
    assert_eq!(
        daemon.take_request().expect("request"),
        "delete /config/interface/eth0\n\n"
    );
}

#[test]
fn options_and_file_input_travel_with_the_request() {
    let mut daemon = FakeDaemon::spawn("OK\n").expect("daemon");
    let loader = StaticConfigLoader::tcp(daemon.port());
    let body = NamedTempFile::new().expect("input file");
    std::fs::write(body.path(), "<interface name=\"eth0\"/>").expect("write input");
    let path = body.path().to_str().expect("utf8 path");

    let run = run_cli(
        &loader,
        &[
            "put",
            "/config/interface/eth0",
            "--root",
            "/srv/netcfg",
            "--option",
            "mode=fast",
            "--input",
            path,
        ],
        "",
    );

    assert_eq!(run.exit, ExitCode::SUCCESS, "{}", run.stderr);
    assert_eq!(
        daemon.take_request().expect("request"),
        "put /config/interface/eth0\nroot: /srv/netcfg\nmode: fast\n\n<interface name=\"eth0\"/>\n"
    );
}

#[test]
fn dash_input_reads_standard_input() {
    let mut daemon = FakeDaemon::spawn("OK\n<hostname>edge-1</hostname>\n").expect("daemon");
    let loader = StaticConfigLoader::tcp(daemon.port());

    let run = run_cli(
        &loader,
        &["put", "/system/hostname", "--input", "-"],
        "<hostname>edge-1</hostname>",
    );

    assert_eq!(run.exit, ExitCode::SUCCESS, "{}", run.stderr);
    assert_eq!(run.stdout, "<hostname>edge-1</hostname>\n");
    assert_eq!(
        daemon.take_request().expect("request"),
        "put /system/hostname\n\n<hostname>edge-1</hostname>\n"
    );
}

#[test]
fn daemon_errors_are_printed_and_exit_with_eio() {
    let mut daemon = FakeDaemon::spawn("interface eth9 not known\n").expect("daemon");
    let loader = StaticConfigLoader::tcp(daemon.port());

    let run = run_cli(&loader, &["get", "/system/interface/eth9"], "");

    assert_eq!(run.exit, exit_code(Errno::EIO));
    assert_eq!(run.stderr, "interface eth9 not known\n");
    assert!(run.stdout.is_empty());
    daemon.take_request().expect("request");
}

#[test]
fn missing_daemon_exits_with_connection_refused() {
    let port = {
        let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind");
        listener.local_addr().expect("addr").port()
    };
    let loader = StaticConfigLoader::tcp(port);

    let run = run_cli(&loader, &["get", "/meta"], "");

    assert_eq!(run.exit, exit_code(Errno::ECONNREFUSED));
    assert!(!run.stderr.is_empty());
}

#[rstest]
#[case::unknown_verb(&["fetch", "/meta"])]
#[case::missing_path(&["get"])]
#[case::bad_option(&["get", "/meta", "--option", "novalue"])]
fn usage_errors_exit_with_einval(#[case] args: &[&str]) {
    let loader = StaticConfigLoader::tcp(9);
    let run = run_cli(&loader, args, "");
    assert_eq!(run.exit, exit_code(Errno::EINVAL));
    assert!(!run.stderr.is_empty());
}

#[test]
fn malformed_input_is_rejected_before_sending() {
    let loader = StaticConfigLoader::tcp(9);
    let run = run_cli(&loader, &["put", "/system/hostname", "--input", "-"], "<open>");
    assert_eq!(run.exit, exit_code(Errno::EINVAL));
    assert!(run.stderr.starts_with("input is not a valid XML document"), "{}", run.stderr);
}

#[test]
fn unreadable_input_file_reports_the_os_error() {
    let loader = StaticConfigLoader::tcp(9);
    let run = run_cli(
        &loader,
        &["put", "/system/hostname", "--input", "/nonexistent/netcfg-input.xml"],
        "",
    );
    assert_eq!(run.exit, exit_code(Errno::ENOENT));
    assert!(run.stderr.contains("/nonexistent/netcfg-input.xml"));
}

#[test]
fn help_goes_to_stdout() {
    let loader = StaticConfigLoader::tcp(9);
    let args: Vec<OsString> = ["netcfg", "--help"].into_iter().map(OsString::from).collect();
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let exit = run_with_loader(args, &mut empty(), &mut stdout, &mut stderr, &loader);
    assert_eq!(exit, ExitCode::SUCCESS);
    assert!(String::from_utf8_lossy(&stdout).contains("Usage: netcfg"));
}
