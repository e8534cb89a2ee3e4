//! Applying typed property dictionaries to caller state.

use std::fmt;

use tracing::debug;

use crate::errors::PropertyError;
use crate::kind::Kind;
use crate::value::Value;

const PROPERTIES_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::properties");

/// One named value from a property dictionary.
#[derive(Debug, Clone, PartialEq)]
pub struct DictEntry {
    /// Property name.
    pub name: String,
    /// Payload with at most one level of variant wrapping removed.
    pub value: Value,
}

impl DictEntry {
    /// Builds an entry, unwrapping one level of [`Value::Variant`].
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value: value.into_unwrapped(),
        }
    }
}

/// Receives an accepted entry together with the caller's context.
pub type PropertySetter<C> = fn(&DictEntry, &mut C);

/// Declares how one named property is validated and applied.
pub struct HandlerSpec<C> {
    /// Entry name this handler claims.
    pub name: &'static str,
    /// Required value kind.
    pub kind: Kind,
    /// Required element kind when `kind` is [`Kind::Array`].
    pub element_kind: Kind,
    /// Inclusive minimum array length.
    pub len_min: usize,
    /// Inclusive maximum array length; zero disables the length check.
    pub len_max: usize,
    /// Applies the entry.
    pub set: PropertySetter<C>,
}

impl<C> HandlerSpec<C> {
    /// Handler for a scalar property of `kind`.
    #[must_use]
    pub const fn scalar(name: &'static str, kind: Kind, set: PropertySetter<C>) -> Self {
        Self {
            name,
            kind,
            element_kind: Kind::Invalid,
            len_min: 0,
            len_max: 0,
            set,
        }
    }

    /// Handler for an array property of `element_kind` elements whose
    /// length must fall in `len_min..=len_max` (unbounded when `len_max`
    /// is zero).
    #[must_use]
    pub const fn array(
        name: &'static str,
        element_kind: Kind,
        len_min: usize,
        len_max: usize,
        set: PropertySetter<C>,
    ) -> Self {
        Self {
            name,
            kind: Kind::Array,
            element_kind,
            len_min,
            len_max,
            set,
        }
    }

    fn expected_signature(&self) -> String {
        match (self.kind, self.element_kind.code()) {
            (Kind::Array, Some(code)) => format!("a{code}"),
            (kind, _) => kind.code().map_or_else(|| kind.to_string(), String::from),
        }
    }

    fn check(&self, entry: &DictEntry) -> Result<(), PropertyError> {
        let value = &entry.value;
        let mismatch = || PropertyError::TypeMismatch {
            name: entry.name.clone(),
            expected: self.expected_signature(),
            found: value
                .signature()
                .map_or_else(|| value.kind().to_string(), str::to_owned),
        };
        if value.kind() != self.kind {
            return Err(mismatch());
        }
        if self.kind != Kind::Array {
            return Ok(());
        }
        if value.element_kind() != Some(self.element_kind) {
            return Err(mismatch());
        }
        let len = value.sequence_len().unwrap_or_default();
        if self.len_max != 0 && !(self.len_min..=self.len_max).contains(&len) {
            return Err(PropertyError::LengthViolation {
                name: entry.name.clone(),
                len,
                min: self.len_min,
                max: self.len_max,
            });
        }
        Ok(())
    }
}

impl<C> fmt::Debug for HandlerSpec<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerSpec")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("element_kind", &self.element_kind)
            .field("len_min", &self.len_min)
            .field("len_max", &self.len_max)
            .finish_non_exhaustive()
    }
}

/// A dictionary entry whose value may still be undecoded.
///
/// The processor reads the name first and decodes only entries that a
/// handler claims, so unknown entries are never inspected.
pub trait PropertySource {
    /// Failure raised while decoding or applying the entry.
    type Error: From<PropertyError>;

    /// Entry name, available without decoding the value.
    fn name(&self) -> &str;

    /// Produces the decoded entry.
    ///
    /// # Errors
    ///
    /// Implementation specific; already decoded entries never fail.
    fn decode(self) -> Result<DictEntry, Self::Error>;
}

impl PropertySource for DictEntry {
    type Error = PropertyError;

    fn name(&self) -> &str {
        &self.name
    }

    fn decode(self) -> Result<DictEntry, PropertyError> {
        Ok(self)
    }
}

impl PropertySource for &DictEntry {
    type Error = PropertyError;

    fn name(&self) -> &str {
        &self.name
    }

    fn decode(self) -> Result<DictEntry, PropertyError> {
        Ok(self.clone())
    }
}

/// Applies `entries` in order through the matching `handlers`.
///
/// Entries are consumed lazily in a single pass. Entries without a handler
/// are skipped without being decoded. The first decode, type or length
/// failure stops processing; later entries are not inspected.
///
/// # Errors
///
/// Returns the first failure encountered.
pub fn process_properties<C, I>(
    entries: I,
    handlers: &[HandlerSpec<C>],
    context: &mut C,
) -> Result<(), <I::Item as PropertySource>::Error>
where
    I: IntoIterator,
    I::Item: PropertySource,
{
    for source in entries {
        let Some(handler) = handlers
            .iter()
            .find(|handler| handler.name == source.name())
        else {
            debug!(
                target: PROPERTIES_TARGET,
                name = %source.name(),
                "ignoring unknown property"
            );
            continue;
        };
        let entry = source.decode()?;
        handler.check(&entry)?;
        (handler.set)(&entry, context);
    }
    Ok(())
}
