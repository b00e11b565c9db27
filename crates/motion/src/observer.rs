//! Progress callbacks for sweeps.
//!
//! Sequences block for seconds at a time, so progress is pushed to the
//! observer as it happens instead of being reported at the end.

use ptzcam_common::error::PtzError;

use crate::sequencer::SequenceReport;

/// Receives sweep progress. Every method defaults to doing nothing.
pub trait ProgressObserver {
    /// A device was listed. `name` is `None` when it has no friendly name.
    fn device_found(&mut self, _name: Option<&str>, _token: &str) {}

    /// The device was not moved (bind failed or no control interface).
    fn device_skipped(&mut self, _label: &str, _error: &PtzError) {}

    /// A pan or tilt write was refused; the sequence carries on.
    fn command_rejected(&mut self, _label: &str, _error: &PtzError) {}

    /// The device's pan/tilt sequence ran to the end.
    fn device_done(&mut self, _label: &str, _report: &SequenceReport) {}
}

/// Observer that ignores everything; tracing still records the events.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentObserver;

impl ProgressObserver for SilentObserver {}
