// src/descriptor/dependency.rs

//! Dependency identity
//!
//! A dependency is identified by its name alone. Optional key/value metadata
//! (version hints, feature flags) rides along but never participates in
//! equality or hashing, so two descriptors naming the same dependency are
//! interchangeable wherever sets of dependencies are built.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// An immutable descriptor identifying a dependency by name.
///
/// Equality and hashing consider the name only; metadata is advisory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyDescriptor {
    name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    metadata: BTreeMap<String, Value>,
}

impl DependencyDescriptor {
    /// Create a descriptor for the named dependency.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metadata: BTreeMap::new(),
        }
    }

    /// Attach a metadata entry (e.g. a version hint).
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// The dependency name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The advisory metadata attached at construction.
    pub fn metadata(&self) -> &BTreeMap<String, Value> {
        &self.metadata
    }
}

impl PartialEq for DependencyDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for DependencyDescriptor {}

impl Hash for DependencyDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for DependencyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.metadata.is_empty() {
            write!(f, "{}", self.name)
        } else {
            let hints: Vec<String> = self
                .metadata
                .iter()
                .map(|(k, v)| format!("{k}: {v}"))
                .collect();
            write!(f, "{} {{{}}}", self.name, hints.join(", "))
        }
    }
}

/// A dependency as declared by a package: either a bare name or an already
/// typed descriptor.
///
/// Declarations are normalized to [`DependencyDescriptor`] the moment they
/// enter a package's category mapping, so everything downstream of ingestion
/// works with a single type.
#[derive(Debug, Clone)]
pub enum DependencySpec {
    /// A bare dependency name.
    Name(String),
    /// A fully typed descriptor, passed through unchanged.
    Descriptor(DependencyDescriptor),
}

impl DependencySpec {
    /// Normalize to a typed descriptor.
    pub fn into_descriptor(self) -> DependencyDescriptor {
        match self {
            Self::Name(name) => DependencyDescriptor::new(name),
            Self::Descriptor(descriptor) => descriptor,
        }
    }
}

impl From<&str> for DependencySpec {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for DependencySpec {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<DependencyDescriptor> for DependencySpec {
    fn from(descriptor: DependencyDescriptor) -> Self {
        Self::Descriptor(descriptor)
    }
}
