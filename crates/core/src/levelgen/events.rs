//! Optional observability boundary: pipeline phases report events and timings
//! to a caller-supplied sink. Generation output is identical with or without one.

use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

pub trait GenerationSink {
    fn event(&mut self, severity: Severity, message: &str, context: &[(&str, String)]);
    fn timing(&mut self, operation: &str, duration: Duration, metrics: &[(&str, f64)]);
}

/// Sink that discards everything. The default collaborator.
pub struct NullSink;

impl GenerationSink for NullSink {
    fn event(&mut self, _severity: Severity, _message: &str, _context: &[(&str, String)]) {}

    fn timing(&mut self, _operation: &str, _duration: Duration, _metrics: &[(&str, f64)]) {}
}

#[cfg(test)]
pub(crate) struct RecordingSink {
    pub(crate) events: Vec<(Severity, String)>,
    pub(crate) timings: Vec<String>,
}

#[cfg(test)]
impl RecordingSink {
    pub(crate) fn new() -> Self {
        Self { events: Vec::new(), timings: Vec::new() }
    }
}

#[cfg(test)]
impl GenerationSink for RecordingSink {
    fn event(&mut self, severity: Severity, message: &str, _context: &[(&str, String)]) {
        self.events.push((severity, message.to_owned()));
    }

    fn timing(&mut self, operation: &str, _duration: Duration, _metrics: &[(&str, f64)]) {
        self.timings.push(operation.to_owned());
    }
}
