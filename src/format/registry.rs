// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Format registry.
//!
//! Maps numeric format ids to descriptors and codec factories. A registry is
//! assembled once through [`RegistryBuilder`] and is read-only afterwards, so
//! a shared reference can be used from any number of threads.
//!
//! # Example
//!
//! ```
//! use swathio::format::global_registry;
//!
//! let registry = global_registry();
//! let desc = registry.lookup(71)?;
//! assert_eq!(desc.name, "MBLDEOIH");
//! assert!(registry.lookup(999999).is_err());
//! # Ok::<(), swathio::SwathError>(())
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

use tracing::error;

use crate::codec::{CodecFactory, SwathCodec};
use crate::core::{FormatId, Result, SwathError};

use super::catalog;
use super::descriptor::FormatDescriptor;
use super::detection::{FormatDetector, SuffixDetector};

struct Entry {
    descriptor: FormatDescriptor,
    factory: Option<Box<dyn CodecFactory>>,
}

/// Builder for a [`FormatRegistry`].
pub struct RegistryBuilder {
    entries: BTreeMap<FormatId, Entry>,
    detector: Box<dyn FormatDetector>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            detector: Box::new(SuffixDetector),
        }
    }

    /// Register a descriptor with no codec.
    ///
    /// # Errors
    ///
    /// `DuplicateFormatIdentifier` if the id is taken, `IllegalFormatIdentifier`
    /// for ids below 1.
    pub fn register(&mut self, descriptor: FormatDescriptor) -> Result<&mut Self> {
        self.insert(descriptor, None)
    }

    /// Register a descriptor backed by a codec.
    ///
    /// The descriptor's record kinds and round-trip flags are taken from the
    /// codec's capabilities.
    pub fn register_codec(
        &mut self,
        descriptor: FormatDescriptor,
        factory: Box<dyn CodecFactory>,
    ) -> Result<&mut Self> {
        let probe = factory.create();
        let descriptor = descriptor.with_capabilities(probe.capabilities());
        self.insert(descriptor, Some(factory))
    }

    /// Add the built-in catalog.
    pub fn with_builtins(mut self) -> Result<Self> {
        catalog::register_builtins(&mut self)?;
        Ok(self)
    }

    /// Replace the filename detector.
    pub fn detector(mut self, detector: Box<dyn FormatDetector>) -> Self {
        self.detector = detector;
        self
    }

    pub fn build(self) -> FormatRegistry {
        FormatRegistry {
            entries: self.entries,
            detector: self.detector,
        }
    }

    fn insert(
        &mut self,
        descriptor: FormatDescriptor,
        factory: Option<Box<dyn CodecFactory>>,
    ) -> Result<&mut Self> {
        let id = descriptor.id;
        if id.value() < 1 {
            return Err(SwathError::IllegalFormatIdentifier(id));
        }
        if self.entries.contains_key(&id) {
            return Err(SwathError::DuplicateFormatIdentifier(id));
        }
        self.entries.insert(
            id,
            Entry {
                descriptor,
                factory,
            },
        );
        Ok(self)
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable id → format table.
pub struct FormatRegistry {
    entries: BTreeMap<FormatId, Entry>,
    detector: Box<dyn FormatDetector>,
}

impl FormatRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Registry holding the built-in catalog.
    pub fn with_builtins() -> Result<Self> {
        Ok(RegistryBuilder::new().with_builtins()?.build())
    }

    /// Descriptor for `id`.
    ///
    /// # Errors
    ///
    /// `IllegalFormatIdentifier` if `id` is not registered.
    pub fn lookup(&self, id: impl Into<FormatId>) -> Result<&FormatDescriptor> {
        let id = id.into();
        self.entries
            .get(&id)
            .map(|entry| &entry.descriptor)
            .ok_or(SwathError::IllegalFormatIdentifier(id))
    }

    pub fn contains(&self, id: impl Into<FormatId>) -> bool {
        self.entries.contains_key(&id.into())
    }

    /// Whether a codec is installed for `id`.
    pub fn has_codec(&self, id: impl Into<FormatId>) -> bool {
        self.entries
            .get(&id.into())
            .is_some_and(|entry| entry.factory.is_some())
    }

    /// Fresh codec instance for one session.
    ///
    /// # Errors
    ///
    /// `IllegalFormatIdentifier` for unknown ids, `CodecUnavailable` for
    /// descriptor-only formats.
    pub fn codec_for(&self, id: impl Into<FormatId>) -> Result<Box<dyn SwathCodec>> {
        let id = id.into();
        let entry = self
            .entries
            .get(&id)
            .ok_or(SwathError::IllegalFormatIdentifier(id))?;
        entry
            .factory
            .as_ref()
            .map(|factory| factory.create())
            .ok_or(SwathError::CodecUnavailable(id))
    }

    /// Infer the format of `path` from its name.
    ///
    /// The datalist marker is accepted even though it is never registered.
    ///
    /// # Errors
    ///
    /// `UnableToInferFormat` when no rule matches; `IllegalFormatIdentifier`
    /// when a rule yields an unregistered id.
    pub fn infer_from_path(&self, path: impl AsRef<Path>) -> Result<FormatId> {
        let path = path.as_ref();
        let id = self
            .detector
            .detect(path)
            .ok_or_else(|| SwathError::unable_to_infer(path))?;
        if id.is_datalist() || self.contains(id) {
            Ok(id)
        } else {
            Err(SwathError::IllegalFormatIdentifier(id))
        }
    }

    /// All descriptors, ordered by id.
    pub fn list_supported(&self) -> Vec<&FormatDescriptor> {
        self.entries.values().map(|entry| &entry.descriptor).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

static GLOBAL_REGISTRY: OnceLock<FormatRegistry> = OnceLock::new();

fn init_global_registry() -> FormatRegistry {
    match FormatRegistry::with_builtins() {
        Ok(registry) => registry,
        Err(e) => {
            error!(error = %e, "built-in format catalog rejected; registry is empty");
            RegistryBuilder::new().build()
        }
    }
}

/// Process-wide registry holding the built-in catalog.
///
/// Built on first use; read-only afterwards.
pub fn global_registry() -> &'static FormatRegistry {
    GLOBAL_REGISTRY.get_or_init(init_global_registry)
}
