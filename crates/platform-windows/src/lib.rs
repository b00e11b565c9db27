//! Windows platform scaffolding.
//!
//! DirectShow exposes pan/tilt through `IAMCameraControl` on the capture
//! filter bound from a `CLSID_VideoInputDeviceCategory` moniker. This crate
//! ships the constants and flag mapping that backend needs and a catalog
//! that reports the enumerator as unavailable until the COM plumbing lands.
//!
//! [`camera_control_property`] and [`ks_flags`] have no caller yet outside
//! this crate's tests; they are the argument mapping for the
//! `IAMCameraControl::Set` call the COM backend will make.

use ptzcam_common::error::{PtzError, PtzResult};
use ptzcam_platform_core::{
    CameraDevice, ControlAxis, ControlFlags, DeviceCatalog, DeviceDescriptor,
};

/// `E_NOTIMPL`.
pub const E_NOTIMPL: i32 = 0x80004001u32 as i32;

/// `KSPROPERTY_CAMERACONTROL_FLAGS_AUTO`.
pub const KS_FLAGS_AUTO: i32 = 0x0001;
/// `KSPROPERTY_CAMERACONTROL_FLAGS_MANUAL`.
pub const KS_FLAGS_MANUAL: i32 = 0x0002;
/// `KSPROPERTY_CAMERACONTROL_FLAGS_ABSOLUTE`.
pub const KS_FLAGS_ABSOLUTE: i32 = 0x0000;
/// `KSPROPERTY_CAMERACONTROL_FLAGS_RELATIVE`.
pub const KS_FLAGS_RELATIVE: i32 = 0x0010;

/// `CameraControl_Pan` / `CameraControl_Tilt` property IDs.
pub fn camera_control_property(axis: ControlAxis) -> i32 {
    match axis {
        ControlAxis::Pan => 0,
        ControlAxis::Tilt => 1,
    }
}

/// The `flags` argument passed to `IAMCameraControl::Set`.
pub fn ks_flags(flags: ControlFlags) -> i32 {
    let mode = if flags.is_manual() {
        KS_FLAGS_MANUAL
    } else {
        KS_FLAGS_AUTO
    };
    let reference = if flags.is_relative() {
        KS_FLAGS_RELATIVE
    } else {
        KS_FLAGS_ABSOLUTE
    };
    mode | reference
}

/// DirectShow system device enumerator.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectShowCatalog;

impl DirectShowCatalog {
    pub fn new() -> Self {
        Self
    }
}

impl DeviceCatalog for DirectShowCatalog {
    fn name(&self) -> &str {
        "directshow"
    }

    /// TODO(platform/windows): create `CLSID_SystemDeviceEnumerator` and walk
    /// the video input category with `IEnumMoniker`.
    fn enumerate(&self) -> PtzResult<Box<dyn Iterator<Item = DeviceDescriptor> + '_>> {
        tracing::warn!("DirectShow enumeration is not implemented yet");
        Err(PtzError::platform_unavailable(
            "DirectShow device enumeration is not implemented yet",
            E_NOTIMPL,
        ))
    }

    fn bind(&self, descriptor: DeviceDescriptor) -> PtzResult<Box<dyn CameraDevice>> {
        Err(PtzError::bind_failed(
            descriptor.label(),
            "DirectShow filter binding is not implemented yet",
            E_NOTIMPL,
        ))
    }
}
