// src/lib.rs

//! Convoy Build Orchestration Core
//!
//! Dependency-resolution and build-orchestration core for multi-package
//! workspaces: given a set of discovered packages with dependencies grouped
//! by category, it computes recursive dependency closures and build ordering,
//! and reports the lifecycle of concurrently executed build jobs.
//!
//! # Architecture
//!
//! - Descriptors: immutable package/dependency identity produced by an
//!   external discovery collaborator
//! - Walker: memoized, cycle-tolerant transitive closure computation over a
//!   fixed descriptor set
//! - Ordering: deterministic topological build order from the closures
//! - Events: start/end lifecycle contract for concurrently running jobs,
//!   rendered by the console reporter
//!
//! Package discovery, process execution, plugin loading and CLI parsing are
//! external collaborators feeding this core.

pub mod descriptor;
mod error;
pub mod event;
pub mod reporter;
pub mod resolver;

pub use descriptor::{DependencyDescriptor, DependencySpec, PackageDescriptor};
pub use error::{Error, Result};
pub use event::{JobEvent, SIGINT_CODE, Termination};
pub use reporter::{ConsoleStartEnd, EventHandler};
pub use resolver::{CacheStats, DependencyWalker, topological_order};
