// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! In-memory config store fake for serializer option tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use prefab_app_core::config::{ConfigError, ConfigStore};
use prefab_app_core::options::{SerializerOptions, OPTIONS_KEY};

/// In-memory implementation of [`ConfigStore`].
///
/// Clones share state, so a test can hand one clone to a `ConfigService`
/// and inspect the other. Read and write attempts are counted, failures
/// included.
///
/// # Example
///
/// ```
/// use prefab_dry_tests::InMemoryConfigStore;
/// use prefab_app_core::config::ConfigService;
/// use prefab_app_core::options::{ResolutionMode, SerializerOptions, OPTIONS_KEY};
///
/// let store = InMemoryConfigStore::new();
/// let service = ConfigService::new(store.clone());
///
/// service.write(&SerializerOptions::single_pass()).unwrap();
/// assert!(store.contains_key(OPTIONS_KEY));
/// assert_eq!(store.write_count(), 1);
/// assert_eq!(SerializerOptions::load(&service).resolution, ResolutionMode::SinglePass);
/// assert_eq!(store.read_count(), 1);
/// ```
#[derive(Clone, Default)]
pub struct InMemoryConfigStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    data: HashMap<String, Vec<u8>>,
    read_count: usize,
    write_count: usize,
    fail_reads: bool,
    fail_writes: bool,
}

impl InMemoryConfigStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding `options` under the serializer's config key.
    pub fn with_options(options: &SerializerOptions) -> Self {
        let store = Self::new();
        // Serializing plain option structs cannot fail.
        let bytes = serde_json::to_vec(options).unwrap_or_default();
        store.lock().data.insert(OPTIONS_KEY.to_string(), bytes);
        store
    }

    /// Store `bytes` under `key` directly, bypassing the write counter.
    pub fn put_raw(&self, key: &str, bytes: &[u8]) {
        self.lock().data.insert(key.to_string(), bytes.to_vec());
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Make every subsequent read fail with [`ConfigError::Unavailable`].
    pub fn set_fail_reads(&self, fail: bool) {
        self.lock().fail_reads = fail;
    }

    /// Make every subsequent write fail with [`ConfigError::Unavailable`].
    pub fn set_fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    /// Number of read attempts.
    pub fn read_count(&self) -> usize {
        self.lock().read_count
    }

    /// Number of write attempts.
    pub fn write_count(&self) -> usize {
        self.lock().write_count
    }

    /// True when `key` holds a value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.lock().data.contains_key(key)
    }
}

impl ConfigStore for InMemoryConfigStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, ConfigError> {
        let mut inner = self.lock();
        inner.read_count += 1;
        if inner.fail_reads {
            return Err(ConfigError::Unavailable("simulated read failure".into()));
        }
        Ok(inner.data.get(key).cloned())
    }

    fn write(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
        let mut inner = self.lock();
        inner.write_count += 1;
        if inner.fail_writes {
            return Err(ConfigError::Unavailable("simulated write failure".into()));
        }
        inner.data.insert(key.to_string(), data.to_vec());
        Ok(())
    }
}
