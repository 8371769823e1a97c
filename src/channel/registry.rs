use std::collections::HashMap;
use std::sync::Arc;

use super::logger::Logger;

/// The channels produced by one configuration load
///
/// Holds the root channel plus every named channel, keyed by `qualname`.
/// Callers obtain handles here once at startup and inject them into
/// collaborators; there is no ambient global lookup. File handles owned by
/// the channels' sinks are released when the registry (and every cloned
/// `Arc<Logger>`) is dropped.
#[derive(Debug)]
pub struct Registry {
    root: Arc<Logger>,
    channels: HashMap<String, Arc<Logger>>,
}

impl Registry {
    /// Assemble a registry from already-built channels
    pub fn new(root: Arc<Logger>, channels: HashMap<String, Arc<Logger>>) -> Self {
        Self { root, channels }
    }

    /// The root channel
    pub const fn root(&self) -> &Arc<Logger> {
        &self.root
    }

    /// Look up a channel by name; `"root"` resolves to the root channel
    pub fn get(&self, name: &str) -> Option<&Arc<Logger>> {
        if name == "root" {
            return Some(&self.root);
        }
        self.channels.get(name)
    }

    /// Names of all channels, root included
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once("root").chain(self.channels.keys().map(String::as_str))
    }

    /// Number of channels, root included
    pub fn len(&self) -> usize {
        self.channels.len() + 1
    }

    /// Always false; the root channel is always present
    pub fn is_empty(&self) -> bool {
        false
    }
}
