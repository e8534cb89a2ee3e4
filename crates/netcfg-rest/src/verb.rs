use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Operation requested on a path.
///
/// Parsing ignores ASCII case; display and the wire use lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Verb {
    /// Read the resource.
    Get,
    /// Create or replace the resource.
    Put,
    /// Submit data to the resource.
    Post,
    /// Remove the resource.
    Delete,
}

impl Verb {
    /// Lowercase wire spelling.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}
