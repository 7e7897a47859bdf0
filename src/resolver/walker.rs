// src/resolver/walker.rs

//! Transitive dependency closure computation
//!
//! A walker is constructed once per resolution session over the full
//! descriptor universe and the set of categories considered recursive. It
//! indexes descriptors by name (duplicate discovery of the same name is
//! tolerated; all descriptors under a name are unioned during expansion) and
//! memoizes the closure of every requested dependency name.
//!
//! Dependency names with no registered descriptor are treated as satisfied
//! outside the scanned package set (e.g. system packages) and silently
//! excluded from closures.
//!
//! The cache is not designed for concurrent mutation; share an immutable
//! descriptor set across threads and give each resolution session its own
//! walker.

use crate::descriptor::{DependencyDescriptor, PackageDescriptor};
use crate::error::Result;
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::{debug, warn};

/// Memoized closure store, keyed by dependency name.
///
/// Compute-on-first-access with an explicit [`get_or_compute`] operation: a
/// missing key runs the supplied compute function, stores its result, and
/// returns it; every later request for the key is a cache hit. The compute
/// function sees the cache by shared reference so already-resolved
/// sub-closures can be reused without re-expansion.
///
/// [`get_or_compute`]: DependencyCache::get_or_compute
#[derive(Debug, Default)]
struct DependencyCache {
    entries: HashMap<String, HashSet<DependencyDescriptor>>,
    hits: u64,
    misses: u64,
}

impl DependencyCache {
    fn get(&self, key: &str) -> Option<&HashSet<DependencyDescriptor>> {
        self.entries.get(key)
    }

    fn get_or_compute<F>(&mut self, key: &str, compute: F) -> Result<&HashSet<DependencyDescriptor>>
    where
        F: FnOnce(&Self) -> Result<HashSet<DependencyDescriptor>>,
    {
        if self.entries.contains_key(key) {
            self.hits += 1;
        } else {
            self.misses += 1;
            let closure = compute(&*self)?;
            self.entries.insert(key.to_string(), closure);
        }
        Ok(&self.entries[key])
    }
}

/// Counters describing cache effectiveness for one walker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Requests served from an already-computed closure.
    pub hits: u64,
    /// Requests that triggered a closure computation.
    pub misses: u64,
    /// Number of closures currently stored.
    pub entries: usize,
}

/// Computes recursive dependency closures over a fixed descriptor set.
#[derive(Debug)]
pub struct DependencyWalker<'a> {
    /// Category names considered recursive; `None` means all categories.
    categories: Option<Vec<String>>,
    /// All descriptors registered under each package name.
    descriptors_by_name: HashMap<&'a str, Vec<&'a PackageDescriptor>>,
    cache: DependencyCache,
}

impl<'a> DependencyWalker<'a> {
    /// Create a walker over the given descriptors.
    ///
    /// `categories` restricts which dependency categories are followed while
    /// expanding; `None` follows all of them. Descriptors that do not
    /// identify a package are skipped.
    pub fn new<I>(descriptors: I, categories: Option<&[&str]>) -> Self
    where
        I: IntoIterator<Item = &'a PackageDescriptor>,
    {
        let mut descriptors_by_name: HashMap<&str, Vec<&PackageDescriptor>> = HashMap::new();
        for descriptor in descriptors {
            if !descriptor.identifies_package() {
                warn!(
                    "skipping incomplete package descriptor at '{}'",
                    descriptor.path.display()
                );
                continue;
            }
            descriptors_by_name
                .entry(descriptor.name.as_str())
                .or_default()
                .push(descriptor);
        }
        Self {
            categories: categories.map(|c| c.iter().map(|s| s.to_string()).collect()),
            descriptors_by_name,
            cache: DependencyCache::default(),
        }
    }

    /// Get the union of the recursive dependency closures of the given
    /// dependencies.
    ///
    /// Each closure is computed lazily on first request and memoized for the
    /// lifetime of the walker.
    pub fn get_recursive_dependencies<'d, I>(
        &mut self,
        dependencies: I,
    ) -> Result<HashSet<DependencyDescriptor>>
    where
        I: IntoIterator<Item = &'d DependencyDescriptor>,
    {
        let mut total = HashSet::new();
        for dependency in dependencies {
            total.extend(self.resolve(dependency.name())?);
        }
        Ok(total)
    }

    /// Whether the given name belongs to a known package.
    pub fn knows(&self, name: &str) -> bool {
        self.descriptors_by_name.contains_key(name)
    }

    /// Cache effectiveness counters.
    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            hits: self.cache.hits,
            misses: self.cache.misses,
            entries: self.cache.entries.len(),
        }
    }

    fn resolve(&mut self, name: &str) -> Result<HashSet<DependencyDescriptor>> {
        let index = &self.descriptors_by_name;
        let categories: Option<Vec<&str>> = self
            .categories
            .as_ref()
            .map(|c| c.iter().map(String::as_str).collect());
        let closure = self
            .cache
            .get_or_compute(name, |cache| expand(name, index, categories.as_deref(), cache))?;
        Ok(closure.clone())
    }
}

/// Compute the closure of `root`: breadth-first expansion over the known
/// descriptors, following only the walker's recursive categories.
///
/// The `seen` set guards against dependency cycles: every name is expanded at
/// most once per computation, so a cyclic graph converges to the fixed point
/// where every cycle member carries the full mutual closure.
fn expand(
    root: &str,
    index: &HashMap<&str, Vec<&PackageDescriptor>>,
    categories: Option<&[&str]>,
    cache: &DependencyCache,
) -> Result<HashSet<DependencyDescriptor>> {
    let mut closure = HashSet::new();
    let mut seen: HashSet<String> = HashSet::from([root.to_string()]);
    let mut queue: VecDeque<String> = VecDeque::from([root.to_string()]);

    while let Some(name) = queue.pop_front() {
        // An already-resolved closure covers everything reachable from it
        if name != root {
            if let Some(resolved) = cache.get(&name) {
                closure.extend(resolved.iter().cloned());
                continue;
            }
        }

        let Some(descriptors) = index.get(name.as_str()) else {
            // Not a known package: satisfied outside the scanned set
            debug!("dropping unknown dependency '{name}'");
            continue;
        };

        closure.insert(DependencyDescriptor::new(name.as_str()));
        for descriptor in descriptors {
            for dependency in descriptor.get_dependencies(categories)? {
                if !seen.contains(dependency.name()) {
                    seen.insert(dependency.name().to_string());
                    queue.push_back(dependency.name().to_string());
                }
            }
        }
    }

    debug!(
        "closure of '{}' contains {} package(s)",
        root,
        closure.len()
    );
    Ok(closure)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package(name: &str, deps: &[(&str, &[&str])]) -> PackageDescriptor {
        let mut desc = PackageDescriptor::new(format!("/ws/{name}"));
        desc.package_type = "cmake".to_string();
        desc.name = name.to_string();
        for (category, names) in deps {
            desc.add_dependencies(*category, names.iter().copied());
        }
        desc
    }

    fn names(closure: &HashSet<DependencyDescriptor>) -> HashSet<&str> {
        closure.iter().map(|d| d.name()).collect()
    }

    #[test]
    fn test_closure_follows_recursive_categories_only() {
        let descriptors = vec![
            package("a", &[("build", &["b"])]),
            package("b", &[("build", &["c"]), ("test", &["d"])]),
            package("c", &[]),
            package("d", &[]),
        ];

        let mut walker = DependencyWalker::new(&descriptors, Some(&["build"]));
        let closure = walker
            .get_recursive_dependencies(&[DependencyDescriptor::new("a")])
            .unwrap();
        // d is only reachable through b's test category
        assert_eq!(names(&closure), HashSet::from(["a", "b", "c"]));
    }

    #[test]
    fn test_unknown_names_are_dropped() {
        let descriptors = vec![package("a", &[("build", &["system-lib"])])];

        let mut walker = DependencyWalker::new(&descriptors, None);
        let closure = walker
            .get_recursive_dependencies(&[DependencyDescriptor::new("system-lib")])
            .unwrap();
        assert!(closure.is_empty());

        let closure = walker
            .get_recursive_dependencies(&[DependencyDescriptor::new("a")])
            .unwrap();
        assert_eq!(names(&closure), HashSet::from(["a"]));
    }

    #[test]
    fn test_cycle_converges_to_mutual_closure() {
        let descriptors = vec![
            package("a", &[("build", &["b"])]),
            package("b", &[("build", &["a", "c"])]),
            package("c", &[]),
        ];

        let mut walker = DependencyWalker::new(&descriptors, Some(&["build"]));
        let closure_a = walker
            .get_recursive_dependencies(&[DependencyDescriptor::new("a")])
            .unwrap();
        assert_eq!(names(&closure_a), HashSet::from(["a", "b", "c"]));

        let closure_b = walker
            .get_recursive_dependencies(&[DependencyDescriptor::new("b")])
            .unwrap();
        assert_eq!(names(&closure_b), HashSet::from(["a", "b", "c"]));
    }

    #[test]
    fn test_second_request_is_served_from_cache() {
        let descriptors = vec![
            package("a", &[("build", &["b"])]),
            package("b", &[]),
        ];

        let mut walker = DependencyWalker::new(&descriptors, None);
        let first = walker
            .get_recursive_dependencies(&[DependencyDescriptor::new("a")])
            .unwrap();
        let stats = walker.cache_stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 0);

        let second = walker
            .get_recursive_dependencies(&[DependencyDescriptor::new("a")])
            .unwrap();
        assert_eq!(first, second);
        let stats = walker.cache_stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.entries, 1);
    }

    #[test]
    fn test_duplicate_descriptors_are_unioned() {
        let mut duplicate = package("a", &[("build", &["c"])]);
        duplicate.path = "/elsewhere/a".into();
        let descriptors = vec![
            package("a", &[("build", &["b"])]),
            duplicate,
            package("b", &[]),
            package("c", &[]),
        ];

        let mut walker = DependencyWalker::new(&descriptors, None);
        let closure = walker
            .get_recursive_dependencies(&[DependencyDescriptor::new("a")])
            .unwrap();
        assert_eq!(names(&closure), HashSet::from(["a", "b", "c"]));
    }

    #[test]
    fn test_incomplete_descriptors_do_not_participate() {
        let mut incomplete = PackageDescriptor::new("/ws/nameless");
        incomplete.package_type = "cmake".to_string();
        let descriptors = vec![package("a", &[]), incomplete];

        let walker = DependencyWalker::new(&descriptors, None);
        assert!(walker.knows("a"));
        assert!(!walker.knows(""));
    }
}
