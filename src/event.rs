// src/event.rs

//! Job lifecycle events
//!
//! The contract between the parallel job scheduler and downstream observers:
//! each job emits exactly one start event and exactly one end event, in that
//! order, for its own identifier. Events from concurrently running jobs are
//! serialized into a single consuming loop before they reach any handler.

use serde::{Deserialize, Serialize};

/// Result code reserved for jobs terminated by user interruption.
///
/// 128 + SIGINT, the shell convention for children killed by Ctrl-C. Any
/// other non-zero code is an ordinary failure.
pub const SIGINT_CODE: i32 = 130;

/// A lifecycle event for one named job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobEvent {
    /// The job started running.
    Started { identifier: String },
    /// The job finished with the given result code.
    Ended { identifier: String, rc: i32 },
}

impl JobEvent {
    /// A start event for the given job.
    pub fn started(identifier: impl Into<String>) -> Self {
        Self::Started {
            identifier: identifier.into(),
        }
    }

    /// An end event for the given job with its result code.
    pub fn ended(identifier: impl Into<String>, rc: i32) -> Self {
        Self::Ended {
            identifier: identifier.into(),
            rc,
        }
    }

    /// The identifier of the job this event belongs to.
    pub fn identifier(&self) -> &str {
        match self {
            Self::Started { identifier } | Self::Ended { identifier, .. } => identifier,
        }
    }
}

/// How a job terminated, classified from its result code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Result code zero.
    Succeeded,
    /// The reserved interruption sentinel.
    Aborted,
    /// Any other non-zero code.
    Failed(i32),
}

impl Termination {
    /// Classify a job end result code.
    pub fn classify(rc: i32) -> Self {
        match rc {
            0 => Self::Succeeded,
            SIGINT_CODE => Self::Aborted,
            other => Self::Failed(other),
        }
    }
}
