// src/descriptor/mod.rs

//! Package and dependency descriptors
//!
//! The data model produced by package discovery and consumed by dependency
//! resolution: an immutable [`DependencyDescriptor`] identifying a dependency
//! by name, the [`DependencySpec`] ingestion boundary that accepts bare names
//! or typed descriptors, and the [`PackageDescriptor`] that carries one
//! discovered package's identity, categorized dependencies, hooks and
//! metadata.

mod dependency;
mod package;

pub use dependency::{DependencyDescriptor, DependencySpec};
pub use package::PackageDescriptor;
