//! Separates configuration flags from the request arguments.
//!
//! Flags understood by `ortho_config` must come before the verb. Everything
//! from the first unrecognised token onwards belongs to the request parser.

use std::ffi::{OsStr, OsString};

use netcfg_config::Config;
use ortho_config::OrthoConfig;

use crate::errors::AppError;

/// Flags forwarded to the configuration loader.
///
/// Keep in step with the fields of [`netcfg_config::Config`].
pub(crate) const CONFIG_CLI_FLAGS: &[&str] = &[
    "--config-path",
    "--daemon-socket",
    "--log-filter",
    "--log-format",
    "--config-root",
];

pub(crate) trait ConfigLoader {
    /// Loads configuration from the already separated configuration flags.
    fn load(&self, args: &[OsString]) -> Result<Config, AppError>;
}

/// Loader backed by the layered `ortho_config` sources.
pub(crate) struct OrthoConfigLoader;

impl ConfigLoader for OrthoConfigLoader {
    fn load(&self, args: &[OsString]) -> Result<Config, AppError> {
        Config::load_from_iter(args.iter().cloned()).map_err(AppError::LoadConfiguration)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlagAction {
    Include { needs_value: bool },
    Stop,
}

fn classify(argument: &OsStr) -> FlagAction {
    let text = argument.to_string_lossy();
    let Some(flag) = text.split('=').next() else {
        return FlagAction::Stop;
    };
    if !CONFIG_CLI_FLAGS.contains(&flag) {
        return FlagAction::Stop;
    }
    FlagAction::Include {
        needs_value: !text.contains('='),
    }
}

/// Configuration arguments (program name first) and the index where the
/// request arguments begin.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct ConfigArgumentSplit {
    pub(crate) config_arguments: Vec<OsString>,
    pub(crate) command_start: usize,
}

pub(crate) fn split_config_arguments(args: &[OsString]) -> ConfigArgumentSplit {
    let Some((program, rest)) = args.split_first() else {
        return ConfigArgumentSplit {
            config_arguments: Vec::new(),
            command_start: 0,
        };
    };

    let mut config_arguments = vec![program.clone()];
    let mut command_start = 1usize;
    let mut expecting_value = false;
    for argument in rest {
        if expecting_value {
            expecting_value = false;
        } else {
            match classify(argument) {
                FlagAction::Include { needs_value } => expecting_value = needs_value,
                FlagAction::Stop => break,
            }
        }
        config_arguments.push(argument.clone());
        command_start += 1;
    }

    ConfigArgumentSplit {
        config_arguments,
        command_start,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn os(args: &[&str]) -> Vec<OsString> {
        args.iter().map(OsString::from).collect()
    }

    #[rstest]
    #[case::inline("--log-filter=debug", FlagAction::Include { needs_value: false })]
    #[case::separate("--daemon-socket", FlagAction::Include { needs_value: true })]
    #[case::verb("get", FlagAction::Stop)]
    #[case::request_flag("--root", FlagAction::Stop)]
    fn classifies_flags(#[case] argument: &str, #[case] expected: FlagAction) {
        assert_eq!(classify(OsStr::new(argument)), expected);
    }

    #[test]
    fn leading_config_flags_are_split_off() {
        let args = os(&[
            "netcfg",
            "--daemon-socket",
            "tcp://127.0.0.1:9779",
            "--log-format=compact",
            "get",
            "/meta",
            "--root",
            "/tmp",
        ]);
        let split = split_config_arguments(&args);
        assert_eq!(
            split.config_arguments,
            os(&[
                "netcfg",
                "--daemon-socket",
                "tcp://127.0.0.1:9779",
                "--log-format=compact"
            ])
        );
        assert_eq!(split.command_start, 4);
    }

    #[test]
    fn config_flags_after_the_verb_stay_with_the_request() {
        let args = os(&["netcfg", "get", "--config-root", "/etc"]);
        let split = split_config_arguments(&args);
        assert_eq!(split.config_arguments, os(&["netcfg"]));
        assert_eq!(split.command_start, 1);
    }

    #[test]
    fn empty_arguments_yield_empty_split() {
        let split = split_config_arguments(&[]);
        assert!(split.config_arguments.is_empty());
        assert_eq!(split.command_start, 0);
    }
}
