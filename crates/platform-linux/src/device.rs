//! Bound V4L2 device and its pan/tilt control.

use std::fs::File;

use ptzcam_common::error::{PtzError, PtzResult};
use ptzcam_platform_core::{AxisRange, CameraControl, CameraDevice, ControlAxis, ControlFlags};

use crate::v4l2::{self, ARC_SECONDS_PER_DEGREE};

/// An open V4L2 device node. Closing the file releases the device.
#[derive(Debug)]
pub struct V4l2Device {
    file: File,
    label: String,
}

impl V4l2Device {
    pub fn new(file: File, label: impl Into<String>) -> Self {
        Self {
            file,
            label: label.into(),
        }
    }

    fn exposes(&self, axis: ControlAxis) -> bool {
        match v4l2::query_control(&self.file, v4l2::control_id(axis, true)) {
            Ok(query) => !query.is_disabled(),
            Err(e) => {
                tracing::debug!(device = %self.label, %axis, "Relative control not exposed: {e}");
                false
            }
        }
    }
}

impl CameraDevice for V4l2Device {
    fn label(&self) -> &str {
        &self.label
    }

    fn acquire_control(&mut self) -> PtzResult<Box<dyn CameraControl + '_>> {
        if !ControlAxis::ALL.iter().any(|axis| self.exposes(*axis)) {
            return Err(PtzError::control_unavailable(self.label.clone()));
        }
        Ok(Box::new(V4l2Control { device: self }))
    }
}

struct V4l2Control<'a> {
    device: &'a V4l2Device,
}

impl CameraControl for V4l2Control<'_> {
    fn set(&mut self, axis: ControlAxis, value: i32, flags: ControlFlags) -> PtzResult<()> {
        // V4L2 has no automatic mode for pan/tilt
        if !flags.is_manual() {
            return Err(PtzError::rejected(axis.as_str(), value, libc::EINVAL));
        }
        let scaled = v4l2::degrees_to_arc_seconds(value)
            .ok_or_else(|| PtzError::rejected(axis.as_str(), value, libc::ERANGE))?;
        let id = v4l2::control_id(axis, flags.is_relative());

        tracing::debug!(device = %self.device.label, %axis, value, scaled, "VIDIOC_S_CTRL");
        v4l2::set_control(&self.device.file, id, scaled).map_err(|e| {
            PtzError::rejected(axis.as_str(), value, e.raw_os_error().unwrap_or(libc::EIO))
        })
    }

    fn range(&self, axis: ControlAxis) -> PtzResult<AxisRange> {
        let query = v4l2::query_control(&self.device.file, v4l2::control_id(axis, true))
            .map_err(|e| {
                PtzError::unsupported(format!(
                    "{} does not report a {axis} range: {e}",
                    self.device.label
                ))
            })?;
        // Rounded toward zero; sub-degree steps report as 0.
        Ok(AxisRange {
            min: query.minimum / ARC_SECONDS_PER_DEGREE,
            max: query.maximum / ARC_SECONDS_PER_DEGREE,
            step: query.step / ARC_SECONDS_PER_DEGREE,
            default: query.default_value / ARC_SECONDS_PER_DEGREE,
            flags: query.flags,
        })
    }
}
