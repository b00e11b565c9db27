//! Backend selection.

use clap::ValueEnum;
use ptzcam_common::clock::VirtualClock;
use ptzcam_common::error::PtzResult;
use ptzcam_platform_core::simulated::SimulatedCatalog;
use ptzcam_platform_core::DeviceCatalog;

/// Which device catalog to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    /// The native backend for this platform
    Auto,
    /// Video4Linux (Linux)
    V4l2,
    /// DirectShow (Windows)
    Directshow,
    /// Scripted in-memory camera with a simulated motor
    Simulated,
}

/// A selected backend. The simulated one keeps its concrete type so the
/// caller can pace it with the matching virtual clock.
pub enum Backend {
    Native(Box<dyn DeviceCatalog>),
    Simulated(SimulatedCatalog),
}

impl Backend {
    pub fn select(kind: BackendKind) -> PtzResult<Self> {
        let catalog: Box<dyn DeviceCatalog> = match kind {
            BackendKind::Simulated => {
                return Ok(Self::Simulated(SimulatedCatalog::demo(VirtualClock::new())))
            }
            BackendKind::Auto => native()?,
            BackendKind::V4l2 => v4l2()?,
            BackendKind::Directshow => {
                Box::new(ptzcam_platform_windows::DirectShowCatalog::new())
            }
        };
        tracing::debug!(backend = catalog.name(), "Selected backend");
        Ok(Self::Native(catalog))
    }
}

fn native() -> PtzResult<Box<dyn DeviceCatalog>> {
    #[cfg(target_os = "linux")]
    {
        v4l2()
    }
    #[cfg(target_os = "windows")]
    {
        Ok(Box::new(ptzcam_platform_windows::DirectShowCatalog::new()))
    }
    #[cfg(not(any(target_os = "linux", target_os = "windows")))]
    {
        Err(ptzcam_common::error::PtzError::unsupported(
            "no camera backend for this platform; try --backend simulated",
        ))
    }
}

#[cfg(target_os = "linux")]
fn v4l2() -> PtzResult<Box<dyn DeviceCatalog>> {
    Ok(Box::new(ptzcam_platform_linux::V4l2Catalog::new()))
}

#[cfg(not(target_os = "linux"))]
fn v4l2() -> PtzResult<Box<dyn DeviceCatalog>> {
    Err(ptzcam_common::error::PtzError::unsupported(
        "the V4L2 backend is only available on Linux",
    ))
}
