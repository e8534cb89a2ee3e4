//! In-memory registry of live interfaces.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::sync::{Mutex, MutexGuard};

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, warn};

use crate::interface::Interface;

use super::{InterfaceStore, STORE_TARGET, StoreError, check_name};

/// Interfaces held in a mutex-guarded map shared by connection threads.
#[derive(Debug, Default)]
pub struct MemoryStore {
    interfaces: Mutex<BTreeMap<String, Interface>>,
}

impl MemoryStore {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a registry from a sysfs `class/net` directory.
    ///
    /// Each subdirectory names an interface; `mtu`, `address` and
    /// `operstate` are read when present. A missing directory yields an
    /// empty registry.
    #[must_use]
    pub fn discover(sysfs_net: &Utf8Path) -> Self {
        let store = Self::new();
        let entries = match sysfs_net.read_dir_utf8() {
            Ok(entries) => entries,
            Err(error) => {
                debug!(
                    target: STORE_TARGET,
                    path = %sysfs_net,
                    %error,
                    "no interfaces discovered"
                );
                return store;
            }
        };
        if let Ok(mut interfaces) = store.interfaces.lock() {
            for entry in entries.flatten() {
                let interface = read_sysfs_interface(entry.path());
                interfaces.insert(interface.name.clone(), interface);
            }
            debug!(
                target: STORE_TARGET,
                path = %sysfs_net,
                count = interfaces.len(),
                "discovered interfaces"
            );
        }
        store
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, Interface>>, StoreError> {
        self.interfaces.lock().map_err(|_| StoreError::Poisoned)
    }
}

fn read_attribute(dir: &Utf8Path, name: &str) -> Option<String> {
    let path: Utf8PathBuf = dir.join(name);
    match fs::read_to_string(&path) {
        Ok(text) => Some(text.trim().to_owned()),
        Err(error) if error.kind() == io::ErrorKind::NotFound => None,
        Err(error) => {
            warn!(target: STORE_TARGET, path = %path, %error, "unreadable sysfs attribute");
            None
        }
    }
}

fn parse_hwaddr(text: &str) -> Option<Vec<u8>> {
    text.split(':')
        .map(|part| u8::from_str_radix(part, 16).ok())
        .collect()
}

fn read_sysfs_interface(dir: &Utf8Path) -> Interface {
    let mut interface = Interface::new(dir.file_name().unwrap_or_default());
    interface.mtu = read_attribute(dir, "mtu").and_then(|text| text.parse().ok());
    interface.hwaddr = read_attribute(dir, "address")
        .and_then(|text| parse_hwaddr(&text))
        .unwrap_or_default();
    interface.up = read_attribute(dir, "operstate").is_some_and(|state| state == "up");
    interface
}

impl InterfaceStore for MemoryStore {
    fn list(&self) -> Result<Vec<Interface>, StoreError> {
        Ok(self.lock()?.values().cloned().collect())
    }

    fn get(&self, name: &str) -> Result<Option<Interface>, StoreError> {
        Ok(self.lock()?.get(name).cloned())
    }

    fn put(&self, interface: Interface) -> Result<(), StoreError> {
        check_name(&interface.name)?;
        self.lock()?.insert(interface.name.clone(), interface);
        Ok(())
    }

    fn delete(&self, name: &str) -> Result<bool, StoreError> {
        Ok(self.lock()?.remove(name).is_some())
    }
}
