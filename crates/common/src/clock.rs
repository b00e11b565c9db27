//! Clock and pacing utilities for motion sequencing.
//!
//! Cameras accept a move and return immediately while the motor keeps
//! running; the only way to avoid overlapping commands is to block for a
//! calibrated interval. This module provides:
//! - The [`Pacer`] abstraction the sequencer blocks through
//! - A real thread-sleeping pacer
//! - A simulated clock for scripted backends and tests
//! - A sweep clock that anchors log timestamps

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Something that can suspend the caller for a fixed duration.
pub trait Pacer {
    /// Block for `duration`. There is no cancellation.
    fn pause(&mut self, duration: Duration);
}

impl<P: Pacer + ?Sized> Pacer for &mut P {
    fn pause(&mut self, duration: Duration) {
        (**self).pause(duration);
    }
}

/// Pacer backed by `std::thread::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn pause(&mut self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

/// Simulated monotonic time shared between a pacer and simulated devices.
///
/// Clones observe the same time. Pausing advances the clock instantly,
/// which lets a whole sweep run in microseconds while devices still see
/// the exact intervals they would have seen on real hardware.
#[derive(Debug, Clone, Default)]
pub struct VirtualClock {
    now_ns: Arc<AtomicU64>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulated time since the clock was created.
    pub fn now(&self) -> Duration {
        Duration::from_nanos(self.now_ns.load(Ordering::SeqCst))
    }

    /// Move simulated time forward.
    pub fn advance(&self, duration: Duration) {
        let ns = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        self.now_ns.fetch_add(ns, Ordering::SeqCst);
    }
}

impl Pacer for VirtualClock {
    fn pause(&mut self, duration: Duration) {
        self.advance(duration);
    }
}

/// Anchors a sweep to a monotonic epoch and its wall-clock start.
#[derive(Debug, Clone)]
pub struct MotionClock {
    /// The instant the sweep started.
    epoch: Instant,

    /// Wall-clock time at epoch (RFC 3339 string).
    epoch_wall: String,
}

impl MotionClock {
    /// Create a new clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Milliseconds elapsed since the sweep started.
    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.epoch.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    /// Wall-clock time at sweep start.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }
}
