//! The pan/tilt sequence for one bound camera.

use std::time::Duration;

use ptzcam_common::clock::Pacer;
use ptzcam_common::config::MotionParameters;
use ptzcam_common::error::{PtzError, PtzResult};
use ptzcam_platform_core::{CameraControl, CameraDevice, ControlAxis, MotionCommand};

use crate::observer::ProgressObserver;
use crate::timing::proportional_wait;

/// Why a write was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// Platform code, when the backend supplied one.
    pub code: Option<i32>,
    pub message: String,
}

impl From<&PtzError> for Rejection {
    fn from(err: &PtzError) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
        }
    }
}

/// What happened to one axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisOutcome {
    pub command: MotionCommand,
    pub rejected: Option<Rejection>,
    /// Time blocked after the write, base plus travel.
    pub settled_for: Duration,
}

impl AxisOutcome {
    pub fn accepted(&self) -> bool {
        self.rejected.is_none()
    }
}

/// Result of a completed sequence. Rejected writes are recorded here, not
/// returned as errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceReport {
    pub pan: AxisOutcome,
    pub tilt: AxisOutcome,
}

impl SequenceReport {
    pub fn rejected_count(&self) -> usize {
        [&self.pan, &self.tilt]
            .iter()
            .filter(|outcome| !outcome.accepted())
            .count()
    }

    pub fn total_settle(&self) -> Duration {
        self.pan.settled_for + self.tilt.settled_for
    }
}

/// Issues pan then tilt, blocking through `P` after each.
///
/// Holds no per-run state: every input arrives through [`MotionSequencer::run`].
#[derive(Debug, Default)]
pub struct MotionSequencer<P> {
    pacer: P,
}

impl<P: Pacer> MotionSequencer<P> {
    pub fn new(pacer: P) -> Self {
        Self { pacer }
    }

    pub fn pacer(&self) -> &P {
        &self.pacer
    }

    /// Run the full sequence on `device`.
    ///
    /// Returns `Err` only when the device has no control interface, in which
    /// case nothing was written. Rejected writes are reported to `observer`
    /// and the sequence continues; the tilt is always attempted and both
    /// settle windows are always waited out.
    pub fn run(
        &mut self,
        device: &mut dyn CameraDevice,
        params: &MotionParameters,
        observer: &mut dyn ProgressObserver,
    ) -> PtzResult<SequenceReport> {
        let label = device.label().to_string();
        let mut control = device.acquire_control()?;

        let pan = self.step(
            control.as_mut(),
            &label,
            MotionCommand::relative(ControlAxis::Pan, params.pan_delta),
            params,
            observer,
        );
        let tilt = self.step(
            control.as_mut(),
            &label,
            MotionCommand::relative(ControlAxis::Tilt, params.tilt_delta),
            params,
            observer,
        );

        Ok(SequenceReport { pan, tilt })
    }

    fn step(
        &mut self,
        control: &mut dyn CameraControl,
        label: &str,
        command: MotionCommand,
        params: &MotionParameters,
        observer: &mut dyn ProgressObserver,
    ) -> AxisOutcome {
        let rejected = match control.set(command.axis, command.value, command.flags) {
            Ok(()) => {
                tracing::debug!(
                    device = %label,
                    axis = %command.axis,
                    value = command.value,
                    "Move accepted"
                );
                None
            }
            Err(err) => {
                tracing::warn!(device = %label, axis = %command.axis, "{err}");
                observer.command_rejected(label, &err);
                Some(Rejection::from(&err))
            }
        };

        // Both waits run whether or not the write was accepted.
        let base = params.settle_base();
        self.pacer.pause(base);
        let travel = proportional_wait(command.value, params.per_degree_wait_ms);
        self.pacer.pause(travel);

        AxisOutcome {
            command,
            rejected,
            settled_for: base + travel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::SilentObserver;
    use ptzcam_common::clock::VirtualClock;
    use ptzcam_platform_core::simulated::{SimulatedCamera, SimulatedCatalog};
    use ptzcam_platform_core::DeviceCatalog;

    /// Records every pause so the exact wait sequence can be checked.
    #[derive(Default)]
    struct RecordingPacer(Vec<Duration>);

    impl Pacer for RecordingPacer {
        fn pause(&mut self, duration: Duration) {
            self.0.push(duration);
        }
    }

    #[test]
    fn waits_base_then_travel_for_each_axis() {
        let catalog =
            SimulatedCatalog::new(VirtualClock::new()).with_camera(SimulatedCamera::new("cam"));
        let descriptor = catalog.enumerate().unwrap().next().unwrap();
        let mut device = catalog.bind(descriptor).unwrap();

        let mut sequencer = MotionSequencer::new(RecordingPacer::default());
        let params = MotionParameters::new(90, -45, 100, 9);
        let report = sequencer
            .run(device.as_mut(), &params, &mut SilentObserver)
            .unwrap();

        let ms = Duration::from_millis;
        assert_eq!(sequencer.pacer().0, vec![ms(100), ms(810), ms(100), ms(405)]);
        assert_eq!(report.pan.settled_for, ms(910));
        assert_eq!(report.tilt.settled_for, ms(505));
        assert_eq!(report.rejected_count(), 0);
    }

    #[test]
    fn rejection_is_recorded_with_code() {
        let catalog = SimulatedCatalog::new(VirtualClock::new())
            .with_camera(SimulatedCamera::new("cam").rejecting(ControlAxis::Tilt, 0x10));
        let descriptor = catalog.enumerate().unwrap().next().unwrap();
        let mut device = catalog.bind(descriptor).unwrap();

        let report = MotionSequencer::new(RecordingPacer::default())
            .run(device.as_mut(), &MotionParameters::default(), &mut SilentObserver)
            .unwrap();

        assert!(report.pan.accepted());
        let rejection = report.tilt.rejected.as_ref().unwrap();
        assert_eq!(rejection.code, Some(0x10));
        assert!(rejection.message.contains("tilt"));
        assert_eq!(report.rejected_count(), 1);
    }
}
