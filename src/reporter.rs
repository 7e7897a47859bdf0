// src/reporter.rs

//! Console start/end reporting for build jobs
//!
//! Renders one line per job start and one per job end, immediately flushed,
//! so progress stays visible in real time while jobs run in parallel.
//! Successes and interruptions go to the primary stream, failures to the
//! error stream so they remain distinguishable in redirected output.
//!
//! A reporter is driven from a single event-consuming loop; it holds no
//! locks and must not be invoked from multiple threads without external
//! synchronization.

use crate::error::{Error, Result};
use crate::event::{JobEvent, Termination};
use std::collections::HashMap;
use std::io::{self, Stderr, Stdout, Write};
use std::time::Instant;

/// A consumer of job lifecycle events.
///
/// The seam downstream observers implement; the scheduler serializes events
/// from all workers before handing them to a handler.
pub trait EventHandler {
    /// Handle one lifecycle event.
    fn handle_event(&mut self, event: &JobEvent) -> Result<()>;
}

/// Reporter that prints job names on start and end.
///
/// Start times are per-instance state, so independent reporters never
/// cross-contaminate. The start/end pairing contract is the emitting
/// scheduler's to uphold: an end event whose identifier was never started
/// surfaces as [`Error::UnstartedJob`].
pub struct ConsoleStartEnd<O: Write, E: Write> {
    out: O,
    err: E,
    start_times: HashMap<String, Instant>,
}

impl ConsoleStartEnd<Stdout, Stderr> {
    /// Create a reporter writing to stdout and stderr.
    pub fn new() -> Self {
        Self::with_streams(io::stdout(), io::stderr())
    }
}

impl Default for ConsoleStartEnd<Stdout, Stderr> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: Write, E: Write> ConsoleStartEnd<O, E> {
    /// Create a reporter writing to the given primary and error streams.
    pub fn with_streams(out: O, err: E) -> Self {
        Self {
            out,
            err,
            start_times: HashMap::new(),
        }
    }

    /// Consume the reporter and hand back its streams.
    pub fn into_streams(self) -> (O, E) {
        (self.out, self.err)
    }

    /// Number of jobs that have started but not yet ended.
    pub fn running(&self) -> usize {
        self.start_times.len()
    }
}

impl<O: Write, E: Write> EventHandler for ConsoleStartEnd<O, E> {
    fn handle_event(&mut self, event: &JobEvent) -> Result<()> {
        match event {
            JobEvent::Started { identifier } => {
                writeln!(self.out, "Starting >>> {identifier}")?;
                self.out.flush()?;
                self.start_times.insert(identifier.clone(), Instant::now());
            }
            JobEvent::Ended { identifier, rc } => {
                let started =
                    self.start_times
                        .remove(identifier)
                        .ok_or_else(|| Error::UnstartedJob {
                            identifier: identifier.clone(),
                        })?;
                match Termination::classify(*rc) {
                    Termination::Succeeded => {
                        let duration = started.elapsed().as_secs_f64();
                        writeln!(self.out, "Finished <<< {identifier} [{duration:.2}s]")?;
                        self.out.flush()?;
                    }
                    Termination::Aborted => {
                        writeln!(self.out, "Aborted  <<< {identifier}")?;
                        self.out.flush()?;
                    }
                    Termination::Failed(rc) => {
                        writeln!(self.err, "Failed   <<< {identifier}\t [ Exited with code {rc} ]")?;
                        self.err.flush()?;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(events: &[JobEvent]) -> (String, String) {
        let mut reporter = ConsoleStartEnd::with_streams(Vec::new(), Vec::new());
        for event in events {
            reporter.handle_event(event).unwrap();
        }
        let (out, err) = reporter.into_streams();
        (String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
    }

    #[test]
    fn test_start_line() {
        let (out, err) = report(&[JobEvent::started("pkg-a")]);
        assert_eq!(out, "Starting >>> pkg-a\n");
        assert!(err.is_empty());
    }

    #[test]
    fn test_success_goes_to_primary_stream_with_duration() {
        let (out, err) = report(&[JobEvent::started("pkg-a"), JobEvent::ended("pkg-a", 0)]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Starting >>> pkg-a");
        assert!(lines[1].starts_with("Finished <<< pkg-a ["));
        assert!(lines[1].ends_with("s]"));
        assert!(err.is_empty());
    }

    #[test]
    fn test_abort_has_no_duration() {
        use crate::event::SIGINT_CODE;

        let (out, err) = report(&[
            JobEvent::started("pkg-a"),
            JobEvent::ended("pkg-a", SIGINT_CODE),
        ]);
        assert_eq!(out, "Starting >>> pkg-a\nAborted  <<< pkg-a\n");
        assert!(err.is_empty());
    }

    #[test]
    fn test_failure_goes_to_error_stream() {
        let (out, err) = report(&[JobEvent::started("pkg-a"), JobEvent::ended("pkg-a", 2)]);
        assert_eq!(out, "Starting >>> pkg-a\n");
        assert_eq!(err, "Failed   <<< pkg-a\t [ Exited with code 2 ]\n");
    }

    #[test]
    fn test_unstarted_end_is_an_error() {
        let mut reporter = ConsoleStartEnd::with_streams(Vec::new(), Vec::new());
        let err = reporter
            .handle_event(&JobEvent::ended("pkg-a", 0))
            .unwrap_err();
        assert!(matches!(err, Error::UnstartedJob { identifier } if identifier == "pkg-a"));
    }

    #[test]
    fn test_interleaved_parallel_jobs() {
        let (out, err) = report(&[
            JobEvent::started("pkg-a"),
            JobEvent::started("pkg-b"),
            JobEvent::ended("pkg-b", 0),
            JobEvent::ended("pkg-a", 1),
        ]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Starting >>> pkg-a");
        assert_eq!(lines[1], "Starting >>> pkg-b");
        assert!(lines[2].starts_with("Finished <<< pkg-b ["));
        assert_eq!(err, "Failed   <<< pkg-a\t [ Exited with code 1 ]\n");
    }

    #[test]
    fn test_running_count() {
        let mut reporter = ConsoleStartEnd::with_streams(Vec::new(), Vec::new());
        reporter.handle_event(&JobEvent::started("pkg-a")).unwrap();
        reporter.handle_event(&JobEvent::started("pkg-b")).unwrap();
        assert_eq!(reporter.running(), 2);
        reporter.handle_event(&JobEvent::ended("pkg-a", 0)).unwrap();
        assert_eq!(reporter.running(), 1);
    }
}
