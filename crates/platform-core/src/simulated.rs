//! Simulated camera backend.
//!
//! Scripted cameras that behave like a motorized webcam behind a
//! DirectShow-style control interface: binding can fail, the control
//! interface can be missing, axes can be refused, and the firmware rejects
//! a command that arrives while the previous move is still running.
//!
//! Time is read from a shared [`VirtualClock`], so a sequencer paced by the
//! same clock is judged against the exact intervals it waited. Every bind,
//! command and release is recorded as a [`SimEvent`].

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use ptzcam_common::clock::VirtualClock;
use ptzcam_common::error::{PtzError, PtzResult};

use crate::{
    AxisRange, BindingToken, CameraControl, CameraDevice, ControlAxis, ControlFlags,
    DeviceCatalog, DeviceDescriptor, MotionCommand,
};

/// `HRESULT_FROM_WIN32(ERROR_BUSY)`: the motor is still moving.
pub const ERROR_BUSY_HRESULT: i32 = 0x800700AAu32 as i32;

/// `E_INVALIDARG`: the flag combination is not supported.
pub const E_INVALIDARG: i32 = 0x80070057u32 as i32;

/// `E_FAIL`: generic failure.
pub const E_FAIL: i32 = 0x80004005u32 as i32;

/// Firmware timing of a simulated motor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotorModel {
    /// Time to acknowledge any command.
    pub base_ms: u32,
    /// Travel time per degree.
    pub ms_per_degree: u32,
}

impl MotorModel {
    fn busy_for(&self, value: i32) -> Duration {
        Duration::from_millis(
            u64::from(self.base_ms)
                + u64::from(value.unsigned_abs()) * u64::from(self.ms_per_degree),
        )
    }
}

/// Script for one simulated camera.
#[derive(Debug, Clone)]
pub struct SimulatedCamera {
    token: BindingToken,
    name: Option<String>,
    bind_error: Option<i32>,
    motorized: bool,
    rejections: Vec<(ControlAxis, i32)>,
    motor: Option<MotorModel>,
    pan_range: AxisRange,
    tilt_range: AxisRange,
}

impl SimulatedCamera {
    /// A motorized camera with a friendly name and QuickCam Orbit ranges.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            token: BindingToken::new(format!("sim://{name}")),
            name: Some(name),
            bind_error: None,
            motorized: true,
            rejections: Vec::new(),
            motor: None,
            pan_range: AxisRange {
                min: -128,
                max: 128,
                step: 1,
                default: 0,
                flags: 0,
            },
            tilt_range: AxisRange {
                min: -54,
                max: 54,
                step: 1,
                default: 0,
                flags: 0,
            },
        }
    }

    /// A camera whose property store has no friendly name.
    pub fn unnamed(token: impl Into<String>) -> Self {
        let mut camera = Self::new("unnamed");
        camera.token = BindingToken::new(token);
        camera.name = None;
        camera
    }

    pub fn failing_bind(mut self, code: i32) -> Self {
        self.bind_error = Some(code);
        self
    }

    /// No camera-control interface, like a fixed webcam.
    pub fn without_motor(mut self) -> Self {
        self.motorized = false;
        self
    }

    /// Refuse every write to `axis` with `code`.
    pub fn rejecting(mut self, axis: ControlAxis, code: i32) -> Self {
        self.rejections.push((axis, code));
        self
    }

    /// Reject commands that arrive while the previous move is running.
    pub fn with_motor_model(mut self, base_ms: u32, ms_per_degree: u32) -> Self {
        self.motor = Some(MotorModel {
            base_ms,
            ms_per_degree,
        });
        self
    }

    fn label(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| self.token.as_str().to_string())
    }
}

/// Something that happened to a simulated camera.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimEvent {
    Bound {
        device: String,
        at: Duration,
    },
    Command {
        device: String,
        command: MotionCommand,
        at: Duration,
        /// `Err` holds the code the firmware answered with.
        outcome: Result<(), i32>,
    },
    Released {
        device: String,
        at: Duration,
    },
}

type EventLog = Arc<Mutex<Vec<SimEvent>>>;

fn record(log: &EventLog, event: SimEvent) {
    log.lock().unwrap_or_else(PoisonError::into_inner).push(event);
}

/// In-memory catalog of scripted cameras.
#[derive(Debug, Clone)]
pub struct SimulatedCatalog {
    cameras: Vec<SimulatedCamera>,
    clock: VirtualClock,
    events: EventLog,
    unavailable: Option<i32>,
}

impl SimulatedCatalog {
    pub fn new(clock: VirtualClock) -> Self {
        Self {
            cameras: Vec::new(),
            clock,
            events: Arc::default(),
            unavailable: None,
        }
    }

    /// A single QuickCam Orbit whose firmware settles at the default tuning.
    pub fn demo(clock: VirtualClock) -> Self {
        Self::new(clock).with_camera(
            SimulatedCamera::new("Logitech QuickCam Orbit/Sphere").with_motor_model(100, 9),
        )
    }

    pub fn with_camera(mut self, camera: SimulatedCamera) -> Self {
        self.cameras.push(camera);
        self
    }

    /// Make enumeration fail as if the enumerator could not be created.
    pub fn unavailable(mut self, code: i32) -> Self {
        self.unavailable = Some(code);
        self
    }

    pub fn clock(&self) -> &VirtualClock {
        &self.clock
    }

    /// Snapshot of everything recorded so far.
    pub fn events(&self) -> Vec<SimEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Only the command events, in issue order.
    pub fn commands(&self) -> Vec<(String, MotionCommand, Duration, Result<(), i32>)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                SimEvent::Command {
                    device,
                    command,
                    at,
                    outcome,
                } => Some((device, command, at, outcome)),
                _ => None,
            })
            .collect()
    }
}

impl DeviceCatalog for SimulatedCatalog {
    fn name(&self) -> &str {
        "simulated"
    }

    fn enumerate(&self) -> PtzResult<Box<dyn Iterator<Item = DeviceDescriptor> + '_>> {
        if let Some(code) = self.unavailable {
            return Err(PtzError::platform_unavailable(
                "simulated enumerator disabled",
                code,
            ));
        }
        Ok(Box::new(self.cameras.iter().map(|camera| {
            DeviceDescriptor::new(camera.token.clone(), camera.name.clone())
        })))
    }

    fn bind(&self, descriptor: DeviceDescriptor) -> PtzResult<Box<dyn CameraDevice>> {
        let camera = self
            .cameras
            .iter()
            .find(|camera| &camera.token == descriptor.token())
            .ok_or_else(|| {
                PtzError::bind_failed(descriptor.label(), "no such simulated device", E_FAIL)
            })?;

        if let Some(code) = camera.bind_error {
            return Err(PtzError::bind_failed(
                descriptor.label(),
                "filter instantiation failed",
                code,
            ));
        }

        let label = camera.label();
        record(
            &self.events,
            SimEvent::Bound {
                device: label.clone(),
                at: self.clock.now(),
            },
        );

        Ok(Box::new(SimulatedDevice {
            camera: camera.clone(),
            label,
            clock: self.clock.clone(),
            events: Arc::clone(&self.events),
            busy_until: Duration::ZERO,
        }))
    }
}

/// A bound simulated camera.
struct SimulatedDevice {
    camera: SimulatedCamera,
    label: String,
    clock: VirtualClock,
    events: EventLog,
    busy_until: Duration,
}

impl SimulatedDevice {
    fn write(&mut self, command: MotionCommand) -> Result<(), i32> {
        if !command.flags.is_relative() || !command.flags.is_manual() {
            return Err(E_INVALIDARG);
        }
        if let Some((_, code)) = self
            .camera
            .rejections
            .iter()
            .find(|(axis, _)| *axis == command.axis)
        {
            return Err(*code);
        }
        let now = self.clock.now();
        if now < self.busy_until {
            return Err(ERROR_BUSY_HRESULT);
        }
        if let Some(motor) = self.camera.motor {
            self.busy_until = now + motor.busy_for(command.value);
        }
        Ok(())
    }
}

impl CameraDevice for SimulatedDevice {
    fn label(&self) -> &str {
        &self.label
    }

    fn acquire_control(&mut self) -> PtzResult<Box<dyn CameraControl + '_>> {
        if !self.camera.motorized {
            return Err(PtzError::control_unavailable(self.label.clone()));
        }
        Ok(Box::new(SimulatedControl { device: self }))
    }
}

impl Drop for SimulatedDevice {
    fn drop(&mut self) {
        record(
            &self.events,
            SimEvent::Released {
                device: self.label.clone(),
                at: self.clock.now(),
            },
        );
    }
}

struct SimulatedControl<'a> {
    device: &'a mut SimulatedDevice,
}

impl CameraControl for SimulatedControl<'_> {
    fn set(&mut self, axis: ControlAxis, value: i32, flags: ControlFlags) -> PtzResult<()> {
        let command = MotionCommand { axis, value, flags };
        let outcome = self.device.write(command);
        record(
            &self.device.events,
            SimEvent::Command {
                device: self.device.label.clone(),
                command,
                at: self.device.clock.now(),
                outcome,
            },
        );
        outcome.map_err(|code| PtzError::rejected(axis.as_str(), value, code))
    }

    fn range(&self, axis: ControlAxis) -> PtzResult<AxisRange> {
        Ok(match axis {
            ControlAxis::Pan => self.device.camera.pan_range,
            ControlAxis::Tilt => self.device.camera.tilt_range,
        })
    }
}
