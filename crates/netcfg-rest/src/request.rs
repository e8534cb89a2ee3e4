//! The request object shared by both call paths.

use crate::document::XmlNode;
use crate::errors::RequestError;
use crate::verb::Verb;

/// One control-plane request together with its outcome.
///
/// `error` is write-once: the first recorded failure message is kept and
/// later ones are dropped, so a caller always sees the original cause.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    /// Slash-separated target path.
    pub path: String,
    /// Requested operation; absent only on a freshly defaulted request.
    pub verb: Option<Verb>,
    options: Vec<(String, String)>,
    /// Body sent with the request.
    pub input: Option<XmlNode>,
    /// Body produced by the handler.
    pub output: Option<XmlNode>,
    error: Option<String>,
}

impl Request {
    /// A request for `verb` on `path` with no options or body.
    pub fn new(verb: Verb, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            verb: Some(verb),
            ..Self::default()
        }
    }

    /// Attaches the request body.
    #[must_use]
    pub fn with_input(mut self, input: XmlNode) -> Self {
        self.input = Some(input);
        self
    }

    /// Appends an option. Options keep their insertion order and a name may
    /// repeat.
    ///
    /// # Errors
    ///
    /// Names and values must not contain a line break since each option
    /// travels as one line.
    pub fn add_option(&mut self, name: &str, value: &str) -> Result<(), RequestError> {
        if name.contains(['\n', '\r']) {
            return Err(RequestError::BadOptionName {
                name: name.to_owned(),
            });
        }
        if value.contains(['\n', '\r']) {
            return Err(RequestError::BadOptionValue {
                name: name.to_owned(),
            });
        }
        self.options.push((name.to_owned(), value.to_owned()));
        Ok(())
    }

    /// Value of the first option called `name`, ignoring empty values.
    #[must_use]
    pub fn option(&self, name: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|(key, value)| key == name && !value.is_empty())
            .map(|(_, value)| value.as_str())
    }

    /// Options in the order they were added.
    #[must_use]
    pub fn options(&self) -> &[(String, String)] {
        &self.options
    }

    /// Records `message` unless an earlier failure was already recorded.
    pub fn fail(&mut self, message: impl Into<String>) {
        if self.error.is_none() {
            self.error = Some(message.into());
        }
    }

    /// Failure message recorded by the last call, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Replaces the response body.
    pub fn respond(&mut self, output: XmlNode) {
        self.output = Some(output);
    }
}
