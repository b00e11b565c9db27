//! PtzCam Linux Platform Integration
//!
//! Platform-specific implementations for Linux:
//! - **Enumeration:** capture devices listed from `/sys/class/video4linux`
//! - **Binding:** device nodes opened under `/dev`
//! - **Control:** relative pan/tilt through V4L2 camera-class controls
//! - **Permissions:** hints for device nodes the user cannot open

#![cfg(target_os = "linux")]

pub mod device;
pub mod permissions;
pub mod sysfs;
pub mod v4l2;

pub use device::V4l2Device;
pub use sysfs::V4l2Catalog;
