//! Precedence of configuration layers: defaults < file < environment < flags.

use std::ffi::OsString;
use std::fs;
use std::sync::{Mutex, MutexGuard};

use netcfg_config::{
    Config, LogFormat, SocketEndpoint, default_log_filter, default_log_format,
    default_socket_endpoint,
};
use once_cell::sync::Lazy;
use ortho_config::OrthoConfig;
use rstest::{fixture, rstest};
use tempfile::TempDir;

static ENV_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

struct Harness {
    temp_dir: TempDir,
    cli_args: Vec<OsString>,
    env_overrides: Vec<(String, Option<OsString>)>,
    _guard: MutexGuard<'static, ()>,
}

impl Harness {
    fn new() -> Self {
        let guard = ENV_MUTEX
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Self {
            temp_dir: TempDir::new().expect("create temp dir"),
            cli_args: vec![OsString::from("netcfg")],
            env_overrides: Vec::new(),
            _guard: guard,
        }
    }

    fn write_config(&mut self, contents: &str) {
        let path = self.temp_dir.path().join("netcfg.toml");
        fs::write(&path, contents).expect("write configuration");
        self.cli_args.push(OsString::from("--config-path"));
        self.cli_args.push(path.into_os_string());
    }

    fn set_env(&mut self, key: &str, value: &str) {
        let previous = std::env::var_os(key);
        // SAFETY: ENV_MUTEX is held for the harness lifetime.
        unsafe { std::env::set_var(key, value) };
        self.env_overrides.push((key.to_owned(), previous));
    }

    fn push_cli_arg(&mut self, arg: &str) {
        self.cli_args.push(OsString::from(arg));
    }

    fn load(&self) -> Config {
        Config::load_from_iter(self.cli_args.clone()).expect("configuration loads")
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        while let Some((key, value)) = self.env_overrides.pop() {
            // SAFETY: ENV_MUTEX is still held; it is released after this body.
            match value {
                Some(previous) => unsafe { std::env::set_var(&key, previous) },
                None => unsafe { std::env::remove_var(&key) },
            }
        }
    }
}

#[fixture]
fn harness() -> Harness {
    Harness::new()
}

fn socket(text: &str) -> SocketEndpoint {
    text.parse().expect("valid socket literal")
}

#[rstest]
fn defaults_apply_without_overrides(harness: Harness) {
    let config = harness.load();
    assert_eq!(config.daemon_socket(), &default_socket_endpoint());
    assert_eq!(config.log_filter(), default_log_filter());
    assert_eq!(config.log_format(), default_log_format());
}

#[rstest]
fn file_overrides_defaults(mut harness: Harness) {
    harness.write_config(
        "daemon_socket = { transport = \"tcp\", host = \"127.0.0.1\", port = 7001 }\n\
         log_format = \"compact\"\n",
    );
    let config = harness.load();
    assert_eq!(config.daemon_socket(), &socket("tcp://127.0.0.1:7001"));
    assert_eq!(config.log_format(), LogFormat::Compact);
}

#[rstest]
fn environment_overrides_file(mut harness: Harness) {
    harness.write_config(
        "daemon_socket = { transport = \"tcp\", host = \"127.0.0.1\", port = 7001 }\n",
    );
    harness.set_env("NETCFG_DAEMON_SOCKET", "tcp://127.0.0.1:7002");
    let config = harness.load();
    assert_eq!(config.daemon_socket(), &socket("tcp://127.0.0.1:7002"));
}

#[rstest]
fn flags_override_everything(mut harness: Harness) {
    harness.write_config(
        "daemon_socket = { transport = \"tcp\", host = \"127.0.0.1\", port = 7001 }\n",
    );
    harness.set_env("NETCFG_DAEMON_SOCKET", "tcp://127.0.0.1:7002");
    harness.push_cli_arg("--daemon-socket");
    harness.push_cli_arg("tcp://127.0.0.1:7003");
    harness.push_cli_arg("--log-filter");
    harness.push_cli_arg("debug");
    let config = harness.load();
    assert_eq!(config.daemon_socket(), &socket("tcp://127.0.0.1:7003"));
    assert_eq!(config.log_filter(), "debug");
}
