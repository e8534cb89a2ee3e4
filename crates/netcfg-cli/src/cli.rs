//! Request arguments accepted after the configuration flags.

use camino::Utf8PathBuf;
use clap::Parser;
use netcfg_rest::Verb;

/// Source of the request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum InputSource {
    Stdin,
    File(Utf8PathBuf),
}

impl From<&str> for InputSource {
    fn from(value: &str) -> Self {
        if value == "-" {
            Self::Stdin
        } else {
            Self::File(Utf8PathBuf::from(value))
        }
    }
}

/// Sends one request to `netcfgd` and prints the resulting document.
#[derive(Parser, Debug)]
#[command(name = "netcfg", disable_help_subcommand = true)]
pub(crate) struct Cli {
    /// Operation to perform: get, put, post or delete.
    #[arg(value_name = "VERB")]
    pub(crate) verb: Verb,
    /// Target path, for example `/config/interface/eth0`.
    #[arg(value_name = "PATH")]
    pub(crate) path: String,
    /// Configuration store directory used by `/config` paths.
    #[arg(long, value_name = "DIR")]
    pub(crate) root: Option<Utf8PathBuf>,
    /// Extra request option; may be repeated.
    #[arg(long = "option", value_name = "NAME=VALUE", value_parser = parse_option)]
    pub(crate) options: Vec<(String, String)>,
    /// XML body to send, read from FILE or from standard input for `-`.
    #[arg(long, value_name = "FILE")]
    pub(crate) input: Option<InputSource>,
}

fn parse_option(text: &str) -> Result<(String, String), String> {
    match text.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_owned(), value.to_owned()))
        }
        _ => Err(format!("expected NAME=VALUE, got {text:?}")),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::plain("mode=fast", ("mode", "fast"))]
    #[case::empty_value("mode=", ("mode", ""))]
    #[case::value_with_equals("expr=a=b", ("expr", "a=b"))]
    fn options_split_on_first_equals(#[case] text: &str, #[case] expected: (&str, &str)) {
        let (name, value) = parse_option(text).expect("option");
        assert_eq!((name.as_str(), value.as_str()), expected);
    }

    #[rstest]
    #[case::missing_equals("mode")]
    #[case::empty_name("=fast")]
    fn malformed_options_are_rejected(#[case] text: &str) {
        assert!(parse_option(text).is_err());
    }

    #[test]
    fn parses_a_full_request() {
        let cli = Cli::try_parse_from([
            "netcfg",
            "PUT",
            "/config/interface/eth0",
            "--root",
            "/srv/netcfg",
            "--option",
            "mode=fast",
            "--input",
            "-",
        ])
        .expect("parse");
        assert_eq!(cli.verb, Verb::Put);
        assert_eq!(cli.path, "/config/interface/eth0");
        assert_eq!(cli.root, Some(Utf8PathBuf::from("/srv/netcfg")));
        assert_eq!(cli.options, [("mode".to_owned(), "fast".to_owned())]);
        assert_eq!(cli.input, Some(InputSource::Stdin));
    }

    #[test]
    fn unknown_verbs_are_usage_errors() {
        assert!(Cli::try_parse_from(["netcfg", "fetch", "/meta"]).is_err());
    }
}
