//! In-memory store.

use tracing::trace;

use super::KeyValueStore;
use crate::error::{Error, Result};

/// A [`KeyValueStore`] held in memory.
///
/// Keeps insertion order like the `SQLite` store. It can be switched
/// unavailable, making every call fail the way a browser store does in
/// private mode, and it can carry a byte quota over keys plus values.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    entries: Vec<(String, String)>,
    available: bool,
    quota: Option<usize>,
}

impl MemoryStore {
    /// An empty, available store with no quota.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            available: true,
            quota: None,
        }
    }

    /// A store on which every call fails.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    /// Limit the total size of keys plus values to `bytes`.
    #[must_use]
    pub fn with_quota(mut self, bytes: usize) -> Self {
        self.quota = Some(bytes);
        self
    }

    /// Seed the store with entries, in order.
    #[must_use]
    pub fn with_entries<I, K, V>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in entries {
            let (key, value) = (key.into(), value.into());
            match self.position(&key) {
                Some(index) => self.entries[index].1 = value,
                None => self.entries.push((key, value)),
            }
        }
        self
    }

    /// Make the store available or unavailable.
    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    /// Whether calls currently succeed.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Drop every entry, as if the user cleared site data.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Bytes used by keys plus values.
    #[must_use]
    pub fn used_bytes(&self) -> usize {
        self.entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }

    fn check_available(&self) -> Result<()> {
        if self.available {
            Ok(())
        } else {
            Err(Error::store_unavailable("in-memory store is disabled"))
        }
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.check_available()?;
        Ok(self.position(key).map(|index| self.entries[index].1.clone()))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.check_available()?;
        let existing = self.position(key);

        if let Some(quota) = self.quota {
            let replaced = existing.map_or(0, |index| key.len() + self.entries[index].1.len());
            let needed = self.used_bytes() - replaced + key.len() + value.len();
            if needed > quota {
                return Err(Error::QuotaExceeded { needed, quota });
            }
        }

        match existing {
            Some(index) => self.entries[index].1 = value.to_string(),
            None => self.entries.push((key.to_string(), value.to_string())),
        }
        trace!("Stored {} in memory", key);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.check_available()?;
        if let Some(index) = self.position(key) {
            self.entries.remove(index);
        }
        Ok(())
    }

    fn len(&self) -> Result<usize> {
        self.check_available()?;
        Ok(self.entries.len())
    }

    fn key(&self, index: usize) -> Result<Option<String>> {
        self.check_available()?;
        Ok(self.entries.get(index).map(|(k, _)| k.clone()))
    }
}
