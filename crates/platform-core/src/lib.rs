//! PtzCam platform core contracts.
//!
//! This crate contains the cross-platform device and control abstractions
//! used by the motion sequencer without coupling to a concrete OS backend.
//! A backend provides three things:
//!
//! - a [`DeviceCatalog`] that lists capture devices and binds descriptors,
//! - a [`CameraDevice`] owning the live binding to one device,
//! - a [`CameraControl`] capability borrowed from that device to issue moves.

pub mod simulated;

use std::fmt;

use ptzcam_common::error::{PtzError, PtzResult};
use serde::{Deserialize, Serialize};

/// Opaque reference a backend uses to open a device later.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BindingToken(String);

impl BindingToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BindingToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One capture device as listed by the platform, not yet opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDescriptor {
    token: BindingToken,
    friendly_name: Option<String>,
}

impl DeviceDescriptor {
    pub fn new(token: BindingToken, friendly_name: Option<String>) -> Self {
        Self {
            token,
            friendly_name,
        }
    }

    pub fn token(&self) -> &BindingToken {
        &self.token
    }

    /// Name read from the platform's property store, if it had one.
    pub fn friendly_name(&self) -> Option<&str> {
        self.friendly_name.as_deref()
    }

    /// Best label for log lines: the friendly name, else the token.
    pub fn label(&self) -> &str {
        self.friendly_name().unwrap_or_else(|| self.token.as_str())
    }
}

/// Mechanical degree of freedom targeted by a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlAxis {
    Pan,
    Tilt,
}

impl ControlAxis {
    pub const ALL: [ControlAxis; 2] = [ControlAxis::Pan, ControlAxis::Tilt];

    pub fn as_str(&self) -> &'static str {
        match self {
            ControlAxis::Pan => "pan",
            ControlAxis::Tilt => "tilt",
        }
    }
}

impl fmt::Display for ControlAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mode flags attached to a control write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ControlFlags {
    relative: bool,
    manual: bool,
}

impl ControlFlags {
    /// `{Relative, Manual}`: the only combination the sequencer issues.
    pub const RELATIVE_MANUAL: ControlFlags = ControlFlags {
        relative: true,
        manual: true,
    };

    /// `{Manual}` with an absolute target.
    pub const ABSOLUTE_MANUAL: ControlFlags = ControlFlags {
        relative: false,
        manual: true,
    };

    /// Automatic mode; the device picks the value.
    pub const AUTO: ControlFlags = ControlFlags {
        relative: false,
        manual: false,
    };

    pub fn is_relative(&self) -> bool {
        self.relative
    }

    pub fn is_manual(&self) -> bool {
        self.manual
    }
}

/// A single write to one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotionCommand {
    pub axis: ControlAxis,
    /// Degrees, relative to the current position when `flags` is relative.
    pub value: i32,
    pub flags: ControlFlags,
}

impl MotionCommand {
    /// A manual relative move of `value` degrees.
    pub fn relative(axis: ControlAxis, value: i32) -> Self {
        Self {
            axis,
            value,
            flags: ControlFlags::RELATIVE_MANUAL,
        }
    }
}

/// Range an axis accepts, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: i32,
    pub max: i32,
    pub step: i32,
    pub default: i32,
    /// Backend-specific capability bits, reported verbatim.
    pub flags: u32,
}

impl AxisRange {
    pub fn contains(&self, value: i32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Lists capture devices and turns descriptors into live handles.
pub trait DeviceCatalog {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// List the capture devices currently visible, lazily and once.
    ///
    /// An absent video-input category is an empty sequence. Only failure to
    /// reach the enumeration service itself is an error
    /// ([`PtzError::PlatformUnavailable`]).
    fn enumerate(&self) -> PtzResult<Box<dyn Iterator<Item = DeviceDescriptor> + '_>>;

    /// Friendly name for diagnostics.
    fn resolve_display_name(&self, descriptor: &DeviceDescriptor) -> PtzResult<String> {
        descriptor
            .friendly_name()
            .map(str::to_owned)
            .ok_or_else(|| PtzError::name_unavailable(descriptor.token().as_str()))
    }

    /// Open the device behind `descriptor`, consuming it.
    fn bind(&self, descriptor: DeviceDescriptor) -> PtzResult<Box<dyn CameraDevice>>;
}

/// Exclusive live binding to one device. Dropping it releases the device.
pub trait CameraDevice {
    /// Label used in diagnostics.
    fn label(&self) -> &str;

    /// Borrow the motor-control capability.
    ///
    /// Fails with [`PtzError::ControlInterfaceUnavailable`] for devices
    /// without motorized pan/tilt.
    fn acquire_control(&mut self) -> PtzResult<Box<dyn CameraControl + '_>>;
}

/// Capability through which motion commands are issued.
///
/// Implementations never retry and never wait for the motor; pacing is the
/// caller's job.
pub trait CameraControl {
    /// Write `value` to `axis` under `flags`.
    ///
    /// Fails with [`PtzError::PropertySetRejected`] carrying the platform code.
    fn set(&mut self, axis: ControlAxis, value: i32, flags: ControlFlags) -> PtzResult<()>;

    /// Report the range the axis accepts.
    fn range(&self, axis: ControlAxis) -> PtzResult<AxisRange>;
}
