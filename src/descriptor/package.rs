// src/descriptor/package.rs

//! Descriptor for one discovered package
//!
//! A package is identified by the triplet of its `path`, `package_type` and
//! `name`. Two descriptors with the same type and name but different paths
//! are considered equal if their real (symlink-resolved) paths match.
//!
//! Dependencies are grouped by free-form category names ("build", "run",
//! "test", ...) agreed upon with the metadata producers. Declarations enter
//! the category mapping through [`DependencySpec`], so bare names are
//! normalized to [`DependencyDescriptor`] exactly once, at ingestion.
//!
//! Each entry in `hooks` is a relative path in the installation space. The
//! `metadata` mapping stores any additional information discovery extensions
//! attach.

use crate::descriptor::{DependencyDescriptor, DependencySpec};
use crate::error::{Error, Result};
use crate::resolver::DependencyWalker;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;

/// A descriptor for a package at a specific path.
///
/// Created once per discovered package, populated during discovery, and
/// treated as read-only by dependency resolution afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageDescriptor {
    /// The location of the package.
    pub path: PathBuf,
    /// The package category tag, e.g. the build-system kind.
    pub package_type: String,
    /// The package name.
    pub name: String,
    /// Dependencies grouped by category name.
    dependencies: BTreeMap<String, HashSet<DependencyDescriptor>>,
    /// Relative paths in the installation space.
    pub hooks: Vec<PathBuf>,
    /// Additional information attached by discovery extensions.
    pub metadata: HashMap<String, Value>,
}

impl PackageDescriptor {
    /// Create a descriptor for a package at the given path.
    ///
    /// Type and name start out empty and are filled in by the discovery
    /// collaborator; until then the descriptor does not identify a package.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            package_type: String::new(),
            name: String::new(),
            dependencies: BTreeMap::new(),
            hooks: Vec::new(),
            metadata: HashMap::new(),
        }
    }

    /// Check if the descriptor has a path, type and name.
    ///
    /// Descriptors that fail this check are incomplete and must not
    /// participate in dependency resolution.
    pub fn identifies_package(&self) -> bool {
        !self.path.as_os_str().is_empty()
            && !self.package_type.is_empty()
            && !self.name.is_empty()
    }

    /// Declare a dependency in the given category.
    ///
    /// Accepts bare names as well as typed descriptors; bare names are
    /// normalized to [`DependencyDescriptor`] here.
    pub fn add_dependency(
        &mut self,
        category: impl Into<String>,
        dependency: impl Into<DependencySpec>,
    ) {
        self.dependencies
            .entry(category.into())
            .or_default()
            .insert(dependency.into().into_descriptor());
    }

    /// Declare several dependencies in the given category.
    pub fn add_dependencies<I, D>(&mut self, category: impl Into<String>, dependencies: I)
    where
        I: IntoIterator<Item = D>,
        D: Into<DependencySpec>,
    {
        let entry = self.dependencies.entry(category.into()).or_default();
        for dependency in dependencies {
            entry.insert(dependency.into().into_descriptor());
        }
    }

    /// The dependency mapping, keyed by category name.
    pub fn dependencies(&self) -> &BTreeMap<String, HashSet<DependencyDescriptor>> {
        &self.dependencies
    }

    /// Get the dependencies for specific categories or for all categories.
    ///
    /// With `None` the union across all declared categories is returned,
    /// otherwise only the named categories contribute. Categories are visited
    /// in sorted order; categories the package never declared are skipped.
    ///
    /// Fails with [`Error::SelfDependency`] if the package's own name shows
    /// up among the resolved dependency names.
    pub fn get_dependencies(
        &self,
        categories: Option<&[&str]>,
    ) -> Result<HashSet<DependencyDescriptor>> {
        let mut dependencies = HashSet::new();
        match categories {
            // BTreeMap iteration is already category-sorted
            None => {
                for deps in self.dependencies.values() {
                    dependencies.extend(deps.iter().cloned());
                }
            }
            Some(names) => {
                let mut names = names.to_vec();
                names.sort_unstable();
                for name in names {
                    if let Some(deps) = self.dependencies.get(name) {
                        dependencies.extend(deps.iter().cloned());
                    }
                }
            }
        }
        if dependencies.iter().any(|d| d.name() == self.name) {
            return Err(Error::SelfDependency {
                package: self.name.clone(),
            });
        }
        Ok(dependencies)
    }

    /// Get the recursive dependencies of this package.
    ///
    /// Direct dependencies come from `direct_categories`; each of them is
    /// then expanded through a [`DependencyWalker`] restricted to
    /// `recursive_categories`. Dependencies whose name is unknown among
    /// `descriptors` are ignored.
    ///
    /// When a shared `walker` is supplied its cache carries over between
    /// calls and `descriptors`/`recursive_categories` are not consulted;
    /// otherwise a single-use walker is built for this one call.
    pub fn get_recursive_dependencies<'a, I>(
        &self,
        descriptors: I,
        direct_categories: Option<&[&str]>,
        recursive_categories: Option<&[&str]>,
        walker: Option<&mut DependencyWalker<'a>>,
    ) -> Result<HashSet<DependencyDescriptor>>
    where
        I: IntoIterator<Item = &'a PackageDescriptor>,
    {
        let direct_dependencies = self.get_dependencies(direct_categories)?;
        match walker {
            Some(walker) => walker.get_recursive_dependencies(&direct_dependencies),
            None => {
                let mut walker = DependencyWalker::new(descriptors, recursive_categories);
                walker.get_recursive_dependencies(&direct_dependencies)
            }
        }
    }

    /// The symlink-resolved location of the package.
    ///
    /// Falls back to the literal path when it cannot be canonicalized.
    pub fn real_path(&self) -> PathBuf {
        fs::canonicalize(&self.path).unwrap_or_else(|_| self.path.clone())
    }
}

impl PartialEq for PackageDescriptor {
    fn eq(&self, other: &Self) -> bool {
        if (self.package_type.as_str(), self.name.as_str())
            != (other.package_type.as_str(), other.name.as_str())
        {
            return false;
        }
        if self.path == other.path {
            return true;
        }
        // check the real path last since it is the most expensive to compute
        self.real_path() == other.real_path()
    }
}

impl Eq for PackageDescriptor {}

impl Hash for PackageDescriptor {
    // the hash doesn't include the path since different paths are considered
    // equal if their real path is the same
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.package_type.hash(state);
        self.name.hash(state);
    }
}
