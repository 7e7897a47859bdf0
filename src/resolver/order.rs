// src/resolver/order.rs

//! Topological build ordering
//!
//! Orders a package set so that every package comes after all of its
//! recursive dependencies that are themselves part of the set. One shared
//! walker serves the whole ordering, so closures are computed once per name.

use crate::descriptor::PackageDescriptor;
use crate::error::{Error, Result};
use crate::resolver::DependencyWalker;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Compute a deterministic build order for the given packages.
///
/// Direct dependencies come from `direct_categories`, their expansion follows
/// `recursive_categories` (`None` means all categories in either case).
/// Dependencies on names outside the set are ignored; ties are broken by
/// package name. Descriptors that do not identify a package are skipped.
///
/// Fails with [`Error::DependencyCycle`] when a cycle among the packages
/// leaves no valid order.
pub fn topological_order<'a, I>(
    descriptors: I,
    direct_categories: Option<&[&str]>,
    recursive_categories: Option<&[&str]>,
) -> Result<Vec<&'a PackageDescriptor>>
where
    I: IntoIterator<Item = &'a PackageDescriptor>,
{
    let mut packages: Vec<&PackageDescriptor> = Vec::new();
    for descriptor in descriptors {
        if descriptor.identifies_package() {
            packages.push(descriptor);
        } else {
            warn!(
                "not ordering incomplete package descriptor at '{}'",
                descriptor.path.display()
            );
        }
    }

    let in_set: HashSet<&str> = packages.iter().map(|p| p.name.as_str()).collect();
    let mut walker = DependencyWalker::new(packages.iter().copied(), recursive_categories);

    // Recursive dependencies restricted to the set being ordered. A package
    // caught in a cycle shows up in its own closure and can never be ordered.
    let mut remaining: Vec<(&PackageDescriptor, HashSet<String>)> = Vec::new();
    for package in &packages {
        let direct = package.get_dependencies(direct_categories)?;
        let closure = walker.get_recursive_dependencies(&direct)?;
        let blockers: HashSet<String> = closure
            .iter()
            .map(|d| d.name().to_string())
            .filter(|name| in_set.contains(name.as_str()))
            .collect();
        remaining.push((package, blockers));
    }

    let mut ordered: Vec<&PackageDescriptor> = Vec::new();
    let mut done: HashSet<String> = HashSet::new();
    while !remaining.is_empty() {
        let mut ready: Vec<&PackageDescriptor> = remaining
            .iter()
            .filter(|(_, blockers)| blockers.iter().all(|name| done.contains(name)))
            .map(|(package, _)| *package)
            .collect();

        if ready.is_empty() {
            let mut stuck: Vec<&str> = remaining.iter().map(|(p, _)| p.name.as_str()).collect();
            stuck.sort_unstable();
            stuck.dedup();
            return Err(Error::DependencyCycle(stuck.join(", ")));
        }

        ready.sort_by_key(|package| package.name.as_str());
        for package in ready {
            done.insert(package.name.clone());
            ordered.push(package);
        }
        remaining.retain(|(package, _)| !done.contains(&package.name));
    }

    debug!("ordered {} package(s)", ordered.len());
    Ok(ordered)
}
