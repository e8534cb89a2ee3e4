//! Command-line client for the netcfg control plane.
//!
//! `netcfg [config flags] <VERB> <PATH> [--root DIR] [--option NAME=VALUE]...
//! [--input FILE|-]` builds one [`Request`], sends it to `netcfgd` over the
//! configured socket and prints the response document. Failures are printed
//! on stderr and the process exits with the errno the failure translates to.

use std::ffi::OsString;
use std::fs;
use std::io::{Read, Write};
use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind;
use netcfg_config::Config;
use netcfg_rest::{
    CallError, IO_ERROR, NO_SERVER, Request, UNKNOWN_OBJECT, XmlNode, call_indirect,
};
use netcfg_variant::{Errno, ErrorMap, ErrorTranslator};

mod cli;
mod config;
mod errors;

use cli::{Cli, InputSource};
use config::{ConfigLoader, OrthoConfigLoader, split_config_arguments};
use errors::AppError;

/// Request option naming the configuration store directory.
const ROOT_OPTION: &str = "root";

/// Client-side errno overrides consulted before the builtin table.
fn caller_errors() -> ErrorMap {
    ErrorMap::new()
        .with(UNKNOWN_OBJECT, Errno::ENOENT)
        .with(NO_SERVER, Errno::ECONNREFUSED)
        .with(IO_ERROR, Errno::EIO)
}

fn exit_code(errno: Errno) -> ExitCode {
    u8::try_from(errno as i32).map_or(ExitCode::FAILURE, ExitCode::from)
}

/// Streams the CLI reads from and writes to.
struct IoStreams<'a, R: Read, W: Write, E: Write> {
    stdin: &'a mut R,
    stdout: &'a mut W,
    stderr: &'a mut E,
}

enum Outcome {
    Done(Option<XmlNode>),
    Help(String),
    Failed(CallError, Option<String>),
}

struct CliRunner<'a, R: Read, W: Write, E: Write, L: ConfigLoader> {
    io: IoStreams<'a, R, W, E>,
    loader: &'a L,
    translator: ErrorTranslator,
}

impl<'a, R, W, E, L> CliRunner<'a, R, W, E, L>
where
    R: Read,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    fn new(io: IoStreams<'a, R, W, E>, loader: &'a L) -> Self {
        Self {
            io,
            loader,
            translator: ErrorTranslator::default(),
        }
    }

    fn run(mut self, args: Vec<OsString>) -> ExitCode {
        match self.execute(&args) {
            Ok(Outcome::Done(output)) => match self.emit(output.as_ref()) {
                Ok(()) => ExitCode::SUCCESS,
                Err(error) => self.report(&error),
            },
            Ok(Outcome::Help(text)) => match self.io.stdout.write_all(text.as_bytes()) {
                Ok(()) => ExitCode::SUCCESS,
                Err(error) => self.report(&AppError::Emit(error)),
            },
            Ok(Outcome::Failed(error, message)) => {
                let message = message.unwrap_or_else(|| error.to_string());
                let _ = writeln!(self.io.stderr, "{message}");
                let caller = caller_errors();
                exit_code(self.translator.translate(&error.to_named(), Some(&caller)))
            }
            Err(error) => self.report(&error),
        }
    }

    fn execute(&mut self, args: &[OsString]) -> Result<Outcome, AppError> {
        let split = split_config_arguments(args);
        let request_arguments = args
            .first()
            .into_iter()
            .chain(args.get(split.command_start..).unwrap_or_default())
            .cloned();
        let cli = match Cli::try_parse_from(request_arguments) {
            Ok(cli) => cli,
            Err(error)
                if matches!(
                    error.kind(),
                    ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
                ) =>
            {
                return Ok(Outcome::Help(error.render().to_string()));
            }
            Err(error) => return Err(AppError::CliUsage(error)),
        };
        let config = self.loader.load(&split.config_arguments)?;
        let mut request = self.build_request(cli)?;
        Ok(send(&config, &mut request))
    }

    fn build_request(&mut self, cli: Cli) -> Result<Request, AppError> {
        let mut request = Request::new(cli.verb, cli.path);
        if let Some(root) = &cli.root {
            request.add_option(ROOT_OPTION, root.as_str())?;
        }
        for (name, value) in &cli.options {
            request.add_option(name, value)?;
        }
        if let Some(source) = &cli.input {
            let text = self.read_input(source)?;
            request.input = Some(XmlNode::scan(&text).map_err(AppError::ParseInput)?);
        }
        Ok(request)
    }

    fn read_input(&mut self, source: &InputSource) -> Result<String, AppError> {
        match source {
            InputSource::Stdin => {
                let mut text = String::new();
                self.io
                    .stdin
                    .read_to_string(&mut text)
                    .map_err(AppError::ReadStdin)?;
                Ok(text)
            }
            InputSource::File(path) => {
                fs::read_to_string(path).map_err(|source| AppError::ReadInput {
                    path: path.clone(),
                    source,
                })
            }
        }
    }

    fn emit(&mut self, output: Option<&XmlNode>) -> Result<(), AppError> {
        if let Some(document) = output.filter(|document| !document.is_empty()) {
            document
                .write_to(&mut *self.io.stdout)
                .map_err(AppError::Emit)?;
        }
        self.io.stdout.flush().map_err(AppError::Emit)
    }

    fn report(&mut self, error: &AppError) -> ExitCode {
        let _ = writeln!(self.io.stderr, "{error}");
        exit_code(error.errno())
    }
}

fn send(config: &Config, request: &mut Request) -> Outcome {
    match call_indirect(config.daemon_socket(), request) {
        Ok(()) => Outcome::Done(request.output.take()),
        Err(error) => Outcome::Failed(error, request.error().map(str::to_owned)),
    }
}

/// Runs the CLI with the given arguments and process streams.
///
/// The program name is expected as the first argument.
#[must_use]
pub fn run<I, R, W, E>(args: I, stdin: &mut R, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    R: Read,
    W: Write,
    E: Write,
{
    run_with_loader(args, stdin, stdout, stderr, &OrthoConfigLoader)
}

fn run_with_loader<I, R, W, E, L>(
    args: I,
    stdin: &mut R,
    stdout: &mut W,
    stderr: &mut E,
    loader: &L,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    R: Read,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    let io = IoStreams {
        stdin,
        stdout,
        stderr,
    };
    CliRunner::new(io, loader).run(args.into_iter().collect())
}

#[cfg(test)]
mod tests;
