//! Line-oriented request and response framing.
//!
//! A request is a `<verb> <path>` line, zero or more `<name>: <value>`
//! option lines, a blank line and an optional XML body running to the end of
//! the stream. A response is a single status line: `OK` followed by an XML
//! body, or the complete error message.

use std::io::{self, BufRead, Read, Write};

use crate::document::{DocumentError, XmlNode};
use crate::errors::{CallError, WireError};
use crate::request::Request;
use crate::verb::Verb;

/// Longest accepted request, option or status line, newline included.
pub const MAX_LINE_BYTES: usize = 1024;
/// Most option lines accepted in one request.
pub const MAX_OPTIONS: usize = 64;
/// Largest accepted XML body.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

const OK_STATUS: &str = "OK";

fn take_limit(bytes: usize) -> u64 {
    u64::try_from(bytes).map_or(u64::MAX, |limit| limit.saturating_add(1))
}

fn read_line<R: BufRead>(reader: &mut R) -> Result<Option<String>, WireError> {
    let mut buffer = Vec::new();
    let read = reader
        .by_ref()
        .take(take_limit(MAX_LINE_BYTES))
        .read_until(b'\n', &mut buffer)
        .map_err(WireError::unreadable)?;
    if read == 0 {
        return Ok(None);
    }
    if buffer.len() > MAX_LINE_BYTES && buffer.last() != Some(&b'\n') {
        return Err(WireError::LineTooLong {
            limit: MAX_LINE_BYTES,
        });
    }
    String::from_utf8(buffer)
        .map(Some)
        .map_err(|_| WireError::Unparseable)
}

fn read_body<R: BufRead>(reader: &mut R) -> Result<XmlNode, WireError> {
    let mut buffer = Vec::new();
    reader
        .by_ref()
        .take(take_limit(MAX_BODY_BYTES))
        .read_to_end(&mut buffer)
        .map_err(WireError::unreadable)?;
    if buffer.len() > MAX_BODY_BYTES {
        return Err(WireError::BodyTooLarge {
            limit: MAX_BODY_BYTES,
        });
    }
    let text = std::str::from_utf8(&buffer).map_err(|error| WireError::BadDocument {
        source: DocumentError::Malformed {
            position: u64::try_from(error.valid_up_to()).unwrap_or(u64::MAX),
            message: error.to_string(),
        },
    })?;
    XmlNode::scan(text).map_err(|source| WireError::BadDocument { source })
}

fn is_option_separator(c: char) -> bool {
    c == ':' || c.is_ascii_whitespace()
}

fn split_option(line: &str) -> Result<(String, &str), WireError> {
    let end = line.find(is_option_separator).unwrap_or(line.len());
    let (name, rest) = line.split_at(end);
    if name.is_empty() {
        return Err(WireError::Unparseable);
    }
    Ok((
        name.to_ascii_lowercase(),
        rest.trim_start_matches(is_option_separator),
    ))
}

fn read_options<R: BufRead>(reader: &mut R, request: &mut Request) -> Result<(), WireError> {
    while let Some(line) = read_line(reader)? {
        let trimmed = line.trim_end();
        if trimmed.is_empty() {
            break;
        }
        if request.options().len() >= MAX_OPTIONS {
            return Err(WireError::TooManyOptions { limit: MAX_OPTIONS });
        }
        let (name, value) = split_option(trimmed)?;
        request.add_option(&name, value)?;
    }
    Ok(())
}

/// Decodes one request from `reader`, consuming it to the end.
///
/// # Errors
///
/// Returns [`WireError`] for unreadable input, a malformed request line,
/// an unknown verb, oversized input or a malformed body.
pub fn parse_request<R: BufRead>(reader: &mut R) -> Result<Request, WireError> {
    let line = read_line(reader)?.ok_or(WireError::Unreadable { source: None })?;
    let (command, rest) = line
        .split_once(|c: char| c.is_ascii_whitespace())
        .unwrap_or((line.as_str(), ""));
    let path = rest.trim();
    if command.is_empty() || path.is_empty() {
        return Err(WireError::Unparseable);
    }
    let verb = command
        .parse::<Verb>()
        .map_err(|_| WireError::UnknownVerb {
            verb: command.to_owned(),
        })?;
    let mut request = Request::new(verb, path);
    read_options(reader, &mut request)?;
    request.input = Some(read_body(reader)?);
    Ok(request)
}

/// Encodes `request` onto `writer` and flushes it. The write side is left
/// open; the caller half-closes the transport.
///
/// # Errors
///
/// Fails for a request without a verb, a path containing a line break, or
/// any write failure.
pub fn write_request<W: Write>(writer: &mut W, request: &Request) -> Result<(), WireError> {
    let verb = request.verb.ok_or(WireError::MissingVerb)?;
    if request.path.contains(['\n', '\r']) {
        return Err(WireError::Unparseable);
    }
    let write_error = |source| WireError::Write { source };
    writeln!(writer, "{verb} {}", request.path).map_err(write_error)?;
    for (name, value) in request.options() {
        writeln!(writer, "{name}: {value}").map_err(write_error)?;
    }
    writer.write_all(b"\n").map_err(write_error)?;
    if let Some(input) = &request.input {
        input.write_to(&mut *writer).map_err(write_error)?;
    }
    writer.flush().map_err(write_error)
}

/// Reads the status line and, on success, the body that follows.
///
/// # Errors
///
/// Returns [`CallError::Remote`] carrying the status line when the peer
/// reported a failure, or a [`WireError`] when the response is truncated
/// or undecodable.
pub fn read_response<R: BufRead>(reader: &mut R) -> Result<XmlNode, CallError> {
    let line = read_line(reader)
        .map_err(|error| WireError::ResponseBody {
            message: error.to_string(),
        })?
        .ok_or(WireError::ResponseEof)?;
    let status = line.trim_end_matches(['\r', '\n']);
    if status != OK_STATUS {
        return Err(CallError::Remote {
            message: status.to_owned(),
        });
    }
    read_body(reader).map_err(|error| {
        CallError::Wire(WireError::ResponseBody {
            message: error.to_string(),
        })
    })
}

/// Writes a success status and optional body, or a single error line.
///
/// Line breaks inside `message` are flattened so the error stays on one
/// line.
///
/// # Errors
///
/// Propagates write failures.
pub fn write_response<W: Write>(
    writer: &mut W,
    outcome: Result<Option<&XmlNode>, &str>,
) -> io::Result<()> {
    match outcome {
        Ok(body) => {
            writeln!(writer, "{OK_STATUS}")?;
            if let Some(node) = body {
                node.write_to(&mut *writer)?;
            }
        }
        Err(message) => {
            let line: String = message
                .chars()
                .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
                .collect();
            writeln!(writer, "{line}")?;
        }
    }
    writer.flush()
}
