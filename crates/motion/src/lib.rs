//! PtzCam Motion Sequencing
//!
//! Issues relative pan and tilt moves to every controllable camera and
//! blocks between them long enough for the motor to finish. Cameras accept
//! a command and return immediately; a second command sent while the first
//! move is still running is rejected by the firmware, and there is no
//! completion signal to wait on. The only defence is a calibrated wait:
//!
//! ```text
//! set(pan)  ─► settle_base ─► |pan|  × per_degree ─►
//! set(tilt) ─► settle_base ─► |tilt| × per_degree ─► done
//! ```
//!
//! A [`Sweep`] walks the device catalog one device at a time, binding each
//! camera, handing it to the [`MotionSequencer`], and releasing it before
//! the next one. Failures stay local to the device that produced them.

pub mod observer;
pub mod sequencer;
pub mod sweep;
pub mod timing;

pub use observer::{ProgressObserver, SilentObserver};
pub use ptzcam_common::config::MotionParameters;
pub use sequencer::{AxisOutcome, MotionSequencer, Rejection, SequenceReport};
pub use sweep::{
    AxisRanges, DeviceFilter, DeviceListing, DeviceOutcome, DeviceStatus, Sweep, SweepReport,
};
pub use timing::{proportional_wait, settle_window, total_settle_time};
