// src/error.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

/// Errors produced by the resolution core and the job lifecycle reporter.
#[derive(Debug, Error)]
pub enum Error {
    /// A package lists itself (by name) as a dependency in one of its
    /// categories. Malformed package metadata, not a recoverable condition.
    #[error("package '{package}' has a dependency with the same name")]
    SelfDependency { package: String },

    /// An end event arrived for a job identifier with no recorded start.
    /// The start/end pairing contract is the emitting scheduler's to uphold.
    #[error("job '{identifier}' ended without a recorded start")]
    UnstartedJob { identifier: String },

    /// The package set contains a dependency cycle, so no build order exists.
    #[error("circular dependency detected among packages: {0}")]
    DependencyCycle(String),

    /// Writing to a reporter output stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
