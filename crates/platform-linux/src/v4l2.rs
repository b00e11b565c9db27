//! Raw V4L2 control ioctls.
//!
//! Only the two requests needed for pan/tilt are bound: `VIDIOC_QUERYCTRL`
//! to probe a control and `VIDIOC_S_CTRL` to write it. Request numbers use
//! the generic `_IOWR` encoding (x86, ARM, RISC-V).

use std::fs::File;
use std::io;
use std::mem::size_of;
use std::os::fd::AsRawFd;

use ptzcam_platform_core::ControlAxis;

const V4L2_CID_CAMERA_CLASS_BASE: u32 = 0x009a_0900;

pub const V4L2_CID_PAN_RELATIVE: u32 = V4L2_CID_CAMERA_CLASS_BASE + 4;
pub const V4L2_CID_TILT_RELATIVE: u32 = V4L2_CID_CAMERA_CLASS_BASE + 5;
pub const V4L2_CID_PAN_ABSOLUTE: u32 = V4L2_CID_CAMERA_CLASS_BASE + 8;
pub const V4L2_CID_TILT_ABSOLUTE: u32 = V4L2_CID_CAMERA_CLASS_BASE + 9;

pub const V4L2_CTRL_FLAG_DISABLED: u32 = 0x0001;

/// V4L2 expresses pan and tilt in arc seconds.
pub const ARC_SECONDS_PER_DEGREE: i32 = 3600;

#[repr(C)]
#[derive(Debug, Default, Clone, Copy)]
#[allow(dead_code)] // read by the kernel
struct V4l2Control {
    id: u32,
    value: i32,
}

/// `struct v4l2_queryctrl`.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy)]
pub struct V4l2QueryCtrl {
    pub id: u32,
    pub kind: u32,
    pub name: [u8; 32],
    pub minimum: i32,
    pub maximum: i32,
    pub step: i32,
    pub default_value: i32,
    pub flags: u32,
    _reserved: [u32; 2],
}

impl V4l2QueryCtrl {
    pub fn is_disabled(&self) -> bool {
        self.flags & V4L2_CTRL_FLAG_DISABLED != 0
    }
}

const fn iowr(kind: u8, nr: u8, size: usize) -> u32 {
    (3 << 30) | ((size as u32) << 16) | ((kind as u32) << 8) | nr as u32
}

pub const VIDIOC_S_CTRL: u32 = iowr(b'V', 28, size_of::<V4l2Control>());
pub const VIDIOC_QUERYCTRL: u32 = iowr(b'V', 36, size_of::<V4l2QueryCtrl>());

/// Control ID for an axis, relative or absolute.
pub fn control_id(axis: ControlAxis, relative: bool) -> u32 {
    match (axis, relative) {
        (ControlAxis::Pan, true) => V4L2_CID_PAN_RELATIVE,
        (ControlAxis::Tilt, true) => V4L2_CID_TILT_RELATIVE,
        (ControlAxis::Pan, false) => V4L2_CID_PAN_ABSOLUTE,
        (ControlAxis::Tilt, false) => V4L2_CID_TILT_ABSOLUTE,
    }
}

/// Degrees to the arc seconds the driver expects; `None` on overflow.
pub fn degrees_to_arc_seconds(degrees: i32) -> Option<i32> {
    degrees.checked_mul(ARC_SECONDS_PER_DEGREE)
}

fn xioctl<T>(file: &File, request: u32, arg: &mut T) -> io::Result<()> {
    loop {
        // SAFETY: `arg` is a live, exclusively borrowed `#[repr(C)]` value
        // whose size is encoded in `request`.
        let ret = unsafe { libc::ioctl(file.as_raw_fd(), request as _, arg as *mut T) };
        if ret != -1 {
            return Ok(());
        }
        let err = io::Error::last_os_error();
        if err.kind() != io::ErrorKind::Interrupted {
            return Err(err);
        }
    }
}

/// Probe a control. `EINVAL` means the driver does not expose it.
pub fn query_control(file: &File, id: u32) -> io::Result<V4l2QueryCtrl> {
    let mut query = V4l2QueryCtrl {
        id,
        ..Default::default()
    };
    xioctl(file, VIDIOC_QUERYCTRL, &mut query)?;
    Ok(query)
}

/// Write a control value.
pub fn set_control(file: &File, id: u32, value: i32) -> io::Result<()> {
    let mut control = V4l2Control { id, value };
    xioctl(file, VIDIOC_S_CTRL, &mut control)
}
