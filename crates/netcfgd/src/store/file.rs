//! File-backed interface configuration.
//!
//! Each interface lives in `<root>/ifcfg-<name>.xml` holding a single
//! `<interface>` element. Writes go through a temporary file in the same
//! directory that is renamed into place.

use std::fs;
use std::io::{self, Write};

use camino::{Utf8Path, Utf8PathBuf};
use netcfg_rest::XmlNode;
use tempfile::Builder;
use tracing::debug;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use crate::interface::Interface;

use super::{InterfaceStore, STORE_TARGET, StoreError, check_name};

const FILE_PREFIX: &str = "ifcfg-";
const FILE_SUFFIX: &str = ".xml";

/// Interfaces stored as XML files under a root directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: Utf8PathBuf,
}

impl FileStore {
    /// A store keeping one file per interface under `root`.
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding the interface files.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> Result<Utf8PathBuf, StoreError> {
        check_name(name)?;
        Ok(self.root.join(format!("{FILE_PREFIX}{name}{FILE_SUFFIX}")))
    }

    fn read(path: &Utf8Path) -> Result<Option<Interface>, StoreError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.to_owned(),
                    source,
                });
            }
        };
        let document = XmlNode::scan(&text).map_err(|source| StoreError::Document {
            path: path.to_owned(),
            source,
        })?;
        let element = document
            .into_single_element()
            .unwrap_or_else(XmlNode::root);
        Interface::from_xml(&element)
            .map(Some)
            .map_err(|source| StoreError::Definition {
                path: path.to_owned(),
                source,
            })
    }

    fn write(&self, path: &Utf8Path, contents: &[u8]) -> Result<(), StoreError> {
        let io_error = |source| StoreError::Io {
            path: path.to_owned(),
            source,
        };
        fs::create_dir_all(&self.root).map_err(|source| StoreError::Io {
            path: self.root.clone(),
            source,
        })?;
        let mut builder = Builder::new();
        builder.prefix(FILE_PREFIX);
        #[cfg(unix)]
        builder.permissions(fs::Permissions::from_mode(0o644));
        let mut file = builder.tempfile_in(&self.root).map_err(io_error)?;
        file.write_all(contents).map_err(io_error)?;
        file.as_file().sync_all().map_err(io_error)?;
        file.persist(path).map_err(|error| io_error(error.error))?;
        Ok(())
    }
}

impl InterfaceStore for FileStore {
    fn list(&self) -> Result<Vec<Interface>, StoreError> {
        let entries = match self.root.read_dir_utf8() {
            Ok(entries) => entries,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.root.clone(),
                    source,
                });
            }
        };
        let mut interfaces = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Io {
                path: self.root.clone(),
                source,
            })?;
            let is_config = entry
                .file_name()
                .strip_prefix(FILE_PREFIX)
                .and_then(|rest| rest.strip_suffix(FILE_SUFFIX))
                .is_some_and(|name| check_name(name).is_ok());
            if !is_config {
                continue;
            }
            if let Some(interface) = Self::read(entry.path())? {
                interfaces.push(interface);
            }
        }
        interfaces.sort_by(|left, right| left.name.cmp(&right.name));
        Ok(interfaces)
    }

    fn get(&self, name: &str) -> Result<Option<Interface>, StoreError> {
        Self::read(&self.path_for(name)?)
    }

    fn put(&self, interface: Interface) -> Result<(), StoreError> {
        let path = self.path_for(&interface.name)?;
        let element = interface.to_xml().map_err(|source| StoreError::Definition {
            path: path.clone(),
            source,
        })?;
        self.write(&path, element.to_xml_string().as_bytes())?;
        debug!(target: STORE_TARGET, path = %path, "stored interface configuration");
        Ok(())
    }

    fn delete(&self, name: &str) -> Result<bool, StoreError> {
        let path = self.path_for(name)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }
}
