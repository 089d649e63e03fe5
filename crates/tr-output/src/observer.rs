//! `IncidentOutputObserver<W>`: bridges `TrafficObserver` to an `OutputWriter`.

use tr_traffic::{TrafficEvent, TrafficObserver, TrafficSummary};

use crate::row::IncidentRow;
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`TrafficObserver`] that writes every traffic incident to any
/// [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `TrafficObserver`
/// methods have no return value.  After the traffic model returns, check for
/// errors with [`take_error`][Self::take_error].
pub struct IncidentOutputObserver<W: OutputWriter> {
    writer:     W,
    written:    usize,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> IncidentOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0, last_error: None }
    }

    /// Take the stored write error (if any).
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Number of incident rows written successfully.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Unwrap the inner writer, e.g. to write routes to the same backend.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> TrafficObserver for IncidentOutputObserver<W> {
    fn on_event(&mut self, event: &TrafficEvent) {
        let result = self.writer.write_incident(&IncidentRow::from(event));
        if result.is_ok() {
            self.written += 1;
        }
        self.store_err(result);
    }

    fn on_complete(&mut self, summary: &TrafficSummary) {
        tracing::debug!(written = self.written, incidents = summary.incidents(), "incident output done");
    }
}
