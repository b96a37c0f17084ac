// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyed resource loading and caching.
//!
//! Resources (textures, sounds, fonts) are identified by a [`ResourceKey`]
//! hashed from their path. A [`ResourceCache`] loads each key at most once
//! through a platform [`ResourceLoader`] and hands out references to the
//! cached value afterwards. Load failures are logged and surface as `None`
//! from [`ResourceCache::get_or_load`], so a missing asset degrades to an
//! actor that draws nothing rather than a crash.

use alloc::collections::BTreeMap;
use alloc::string::String;
use core::hash::Hasher;

use rustc_hash::FxHasher;
use thiserror::Error;

/// Stable identity of a resource, hashed from its path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceKey(u64);

impl ResourceKey {
    /// Keys a resource by its path.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        let mut hasher = FxHasher::default();
        hasher.write(path.as_bytes());
        Self(hasher.finish())
    }

    /// The raw hash value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// A failed resource load.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResourceError {
    /// The path does not exist or is unreadable.
    #[error("resource not found: {path}")]
    NotFound {
        /// The requested path.
        path: String,
    },
    /// The file was read but could not be decoded.
    #[error("failed to decode {path}: {reason}")]
    Decode {
        /// The requested path.
        path: String,
        /// Decoder diagnostic.
        reason: String,
    },
    /// The format is recognized but not supported by this loader.
    #[error("unsupported resource format: {path}")]
    Unsupported {
        /// The requested path.
        path: String,
    },
}

/// Platform loader for one resource type.
///
/// Implementors own the file access and decoding; the core only sees the
/// decoded value or a [`ResourceError`].
pub trait ResourceLoader<R> {
    /// Loads and decodes the resource at `path`.
    fn load(&mut self, path: &str) -> Result<R, ResourceError>;
}

/// A load-once cache over a [`ResourceLoader`].
#[derive(Debug)]
pub struct ResourceCache<R> {
    entries: BTreeMap<ResourceKey, R>,
}

impl<R> ResourceCache<R> {
    /// An empty cache.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// The cached resource for `path`, loading it on first access.
    ///
    /// A failed load is logged and returns `None`; the failure is not
    /// cached, so a later call retries.
    pub fn get_or_load(
        &mut self,
        loader: &mut impl ResourceLoader<R>,
        path: &str,
    ) -> Option<&R> {
        let key = ResourceKey::from_path(path);
        if !self.entries.contains_key(&key) {
            match loader.load(path) {
                Ok(resource) => {
                    self.entries.insert(key, resource);
                }
                Err(error) => {
                    log::error!("resource load failed: {error}");
                    return None;
                }
            }
        }
        self.entries.get(&key)
    }

    /// Inserts a resource under an explicit key, replacing any previous
    /// occupant.
    pub fn insert(&mut self, key: ResourceKey, resource: R) -> Option<R> {
        self.entries.insert(key, resource)
    }

    /// The cached resource for `key`, if loaded.
    #[must_use]
    pub fn get(&self, key: ResourceKey) -> Option<&R> {
        self.entries.get(&key)
    }

    /// Whether `key` is cached.
    #[must_use]
    pub fn contains(&self, key: ResourceKey) -> bool {
        self.entries.contains_key(&key)
    }

    /// Evicts one entry, returning it.
    pub fn remove(&mut self, key: ResourceKey) -> Option<R> {
        self.entries.remove(&key)
    }

    /// Evicts everything.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<R> Default for ResourceCache<R> {
    fn default() -> Self {
        Self::new()
    }
}
