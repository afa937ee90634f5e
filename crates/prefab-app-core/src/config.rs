// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Serializer configuration: typed sections persisted as JSON in a host store.
//!
//! The serializer never touches the filesystem. A host hands it a
//! [`ConfigStore`]; each [`ConfigSection`] type owns one key in that store.

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Byte store the host provides for configuration.
pub trait ConfigStore {
    /// Blob stored under `key`, or `None` when nothing is stored.
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, ConfigError>;
    /// Replace the blob under `key`.
    fn write(&self, key: &str, data: &[u8]) -> Result<(), ConfigError>;
}

/// A configuration type that lives under a fixed key.
pub trait ConfigSection: Serialize + DeserializeOwned + Default {
    /// Store key of this section.
    const KEY: &'static str;
}

/// Configuration failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The host store refused the request.
    #[error("config store unavailable: {0}")]
    Unavailable(String),
    /// A stored section is not valid JSON for its type.
    #[error("config section {key:?} does not decode: {source}")]
    Decode {
        /// Section key.
        key: &'static str,
        /// Underlying decode failure.
        #[source]
        source: serde_json::Error,
    },
    /// A section could not be encoded.
    #[error("config section does not encode: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Reads and writes typed sections through a [`ConfigStore`].
pub struct ConfigService<S> {
    store: S,
}

impl<S> ConfigService<S> {
    /// Service over `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrow the store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consume the service and return the store.
    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S: ConfigStore> ConfigService<S> {
    /// Stored value of section `T`. A missing or blank blob is `Ok(None)`.
    pub fn read<T: ConfigSection>(&self) -> Result<Option<T>, ConfigError> {
        let Some(bytes) = self.store.read(T::KEY)? else {
            return Ok(None);
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| ConfigError::Decode { key: T::KEY, source })
    }

    /// Section `T`, or its default when absent or unreadable.
    ///
    /// Store and decode failures are logged and otherwise ignored.
    pub fn read_or_default<T: ConfigSection>(&self) -> T {
        match self.read::<T>() {
            Ok(Some(section)) => section,
            Ok(None) => {
                debug!(key = T::KEY, "no stored config; using defaults");
                T::default()
            }
            Err(err) => {
                warn!(key = T::KEY, %err, "config unreadable; using defaults");
                T::default()
            }
        }
    }

    /// Persist `section` under its key as pretty JSON.
    pub fn write<T: ConfigSection>(&self, section: &T) -> Result<(), ConfigError> {
        let data = serde_json::to_vec_pretty(section)?;
        self.store.write(T::KEY, &data)
    }
}
