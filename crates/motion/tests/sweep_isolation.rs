use std::time::Duration;

use ptzcam_common::clock::VirtualClock;
use ptzcam_common::error::PtzError;
use ptzcam_motion::{
    DeviceFilter, DeviceStatus, MotionParameters, MotionSequencer, ProgressObserver,
    SequenceReport, SilentObserver, Sweep,
};
use ptzcam_platform_core::simulated::{SimEvent, SimulatedCamera, SimulatedCatalog, E_FAIL};
use ptzcam_platform_core::ControlAxis;

/// Collects observer callbacks as printable lines.
#[derive(Default)]
struct Transcript(Vec<String>);

impl ProgressObserver for Transcript {
    fn device_found(&mut self, name: Option<&str>, token: &str) {
        self.0.push(format!("found {}", name.unwrap_or(token)));
    }

    fn device_skipped(&mut self, label: &str, _error: &PtzError) {
        self.0.push(format!("skipped {label}"));
    }

    fn command_rejected(&mut self, label: &str, _error: &PtzError) {
        self.0.push(format!("rejected {label}"));
    }

    fn device_done(&mut self, label: &str, _report: &SequenceReport) {
        self.0.push(format!("done {label}"));
    }
}

fn params() -> MotionParameters {
    MotionParameters::new(90, -45, 100, 9)
}

#[test]
fn bind_failure_does_not_stop_later_devices() {
    let clock = VirtualClock::new();
    let catalog = SimulatedCatalog::new(clock.clone())
        .with_camera(SimulatedCamera::new("A").failing_bind(E_FAIL))
        .with_camera(SimulatedCamera::new("B").with_motor_model(100, 9));

    let mut transcript = Transcript::default();
    let report = Sweep::new(&catalog, params())
        .run(&mut MotionSequencer::new(clock.clone()), &mut transcript)
        .unwrap();

    assert_eq!(
        transcript.0,
        vec!["found A", "skipped A", "found B", "done B"]
    );
    assert_eq!(report.devices_found(), 2);
    assert_eq!(report.devices_skipped(), 1);
    assert_eq!(report.devices_completed(), 1);
    assert!(matches!(
        &report.outcomes[0].status,
        DeviceStatus::BindFailed(rejection) if rejection.code == Some(E_FAIL)
    ));

    let commands = catalog.commands();
    assert_eq!(commands.len(), 2);
    assert!(commands.iter().all(|(device, _, _, outcome)| device == "B" && outcome.is_ok()));
    assert_eq!(clock.now(), Duration::from_millis(1415));
}

#[test]
fn device_without_controls_is_skipped_and_released() {
    let clock = VirtualClock::new();
    let catalog = SimulatedCatalog::new(clock.clone())
        .with_camera(SimulatedCamera::new("Integrated Webcam").without_motor())
        .with_camera(SimulatedCamera::new("Orbit"));

    let report = Sweep::new(&catalog, params())
        .run(&mut MotionSequencer::new(clock.clone()), &mut SilentObserver)
        .unwrap();

    assert!(matches!(
        report.outcomes[0].status,
        DeviceStatus::NoControlInterface(_)
    ));
    assert!(matches!(report.outcomes[1].status, DeviceStatus::Completed(_)));

    let lifecycle: Vec<String> = catalog
        .events()
        .into_iter()
        .filter_map(|event| match event {
            SimEvent::Bound { device, .. } => Some(format!("bind {device}")),
            SimEvent::Released { device, .. } => Some(format!("release {device}")),
            SimEvent::Command { .. } => None,
        })
        .collect();
    assert_eq!(
        lifecycle,
        vec![
            "bind Integrated Webcam",
            "release Integrated Webcam",
            "bind Orbit",
            "release Orbit",
        ]
    );
}

#[test]
fn each_device_gets_its_own_full_sequence() {
    let clock = VirtualClock::new();
    let catalog = SimulatedCatalog::new(clock.clone())
        .with_camera(SimulatedCamera::new("left").with_motor_model(100, 9))
        .with_camera(SimulatedCamera::new("right").with_motor_model(100, 9));

    let report = Sweep::new(&catalog, params())
        .run(&mut MotionSequencer::new(clock.clone()), &mut SilentObserver)
        .unwrap();

    assert_eq!(report.commands_rejected(), 0);
    let times: Vec<u128> = catalog
        .commands()
        .iter()
        .map(|(_, _, at, _)| at.as_millis())
        .collect();
    assert_eq!(times, vec![0, 910, 1415, 2325]);
}

#[test]
fn empty_catalog_never_runs_the_sequencer() {
    let clock = VirtualClock::new();
    let catalog = SimulatedCatalog::new(clock.clone());

    let mut transcript = Transcript::default();
    let report = Sweep::new(&catalog, params())
        .run(&mut MotionSequencer::new(clock.clone()), &mut transcript)
        .unwrap();

    assert_eq!(report.devices_found(), 0);
    assert!(transcript.0.is_empty());
    assert!(catalog.events().is_empty());
    assert_eq!(clock.now(), Duration::ZERO);
}

#[test]
fn unavailable_enumerator_is_fatal() {
    let clock = VirtualClock::new();
    let catalog = SimulatedCatalog::new(clock.clone())
        .with_camera(SimulatedCamera::new("never seen"))
        .unavailable(E_FAIL);

    let err = Sweep::new(&catalog, params())
        .run(&mut MotionSequencer::new(clock.clone()), &mut SilentObserver)
        .unwrap_err();

    assert!(err.is_fatal());
    assert_eq!(err.code(), Some(E_FAIL));
    assert!(catalog.events().is_empty());
}

#[test]
fn rejected_commands_are_counted_but_not_fatal() {
    let clock = VirtualClock::new();
    let catalog = SimulatedCatalog::new(clock.clone())
        .with_camera(SimulatedCamera::new("stuck").rejecting(ControlAxis::Pan, 16))
        .with_camera(SimulatedCamera::new("fine"));

    let mut transcript = Transcript::default();
    let report = Sweep::new(&catalog, params())
        .run(&mut MotionSequencer::new(clock.clone()), &mut transcript)
        .unwrap();

    assert_eq!(report.devices_completed(), 2);
    assert_eq!(report.commands_rejected(), 1);
    assert_eq!(
        transcript.0,
        vec!["found stuck", "rejected stuck", "done stuck", "found fine", "done fine"]
    );
}

#[test]
fn unnamed_device_is_still_moved() {
    let clock = VirtualClock::new();
    let catalog =
        SimulatedCatalog::new(clock.clone()).with_camera(SimulatedCamera::unnamed("sim://7"));

    let mut transcript = Transcript::default();
    let report = Sweep::new(&catalog, params())
        .run(&mut MotionSequencer::new(clock.clone()), &mut transcript)
        .unwrap();

    assert_eq!(report.devices_completed(), 1);
    assert_eq!(report.outcomes[0].label, "sim://7");
    assert_eq!(transcript.0, vec!["found sim://7", "done sim://7"]);
}

#[test]
fn filter_limits_sweep_by_name() {
    let clock = VirtualClock::new();
    let catalog = SimulatedCatalog::new(clock.clone())
        .with_camera(SimulatedCamera::new("Logitech QuickCam Orbit"))
        .with_camera(SimulatedCamera::new("Integrated Camera"))
        .with_camera(SimulatedCamera::unnamed("sim://9"));

    let report = Sweep::new(&catalog, params())
        .with_filter(DeviceFilter::name_contains("orbit"))
        .run(&mut MotionSequencer::new(clock.clone()), &mut SilentObserver)
        .unwrap();

    assert_eq!(report.devices_found(), 1);
    assert_eq!(report.devices_completed(), 1);
    assert_eq!(report.devices_filtered(), 2);
    assert_eq!(report.outcomes.len(), 3);
    assert!(catalog
        .commands()
        .iter()
        .all(|(device, _, _, _)| device == "Logitech QuickCam Orbit"));
}

#[test]
fn listing_reports_ranges_without_moving() {
    let clock = VirtualClock::new();
    let catalog = SimulatedCatalog::new(clock.clone())
        .with_camera(SimulatedCamera::new("Orbit"))
        .with_camera(SimulatedCamera::new("Fixed").without_motor());

    let listings = Sweep::new(&catalog, params()).list().unwrap();

    assert_eq!(listings.len(), 2);
    let ranges = listings[0].control.as_ref().unwrap();
    assert_eq!(ranges.pan.map(|r| (r.min, r.max)), Some((-128, 128)));
    assert_eq!(ranges.tilt.map(|r| (r.min, r.max)), Some((-54, 54)));
    assert!(listings[1].control.is_err());
    assert!(catalog.commands().is_empty());
    assert_eq!(clock.now(), Duration::ZERO);
}
