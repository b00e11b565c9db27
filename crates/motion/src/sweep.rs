//! Walking the device catalog.
//!
//! Devices are processed strictly one at a time. Each bound handle is
//! dropped before the next descriptor is bound, and a failure on one device
//! never stops the others. Only an unreachable enumeration service ends a
//! sweep with an error.

use ptzcam_common::clock::{MotionClock, Pacer};
use ptzcam_common::config::MotionParameters;
use ptzcam_common::error::PtzResult;
use ptzcam_platform_core::{AxisRange, ControlAxis, DeviceCatalog, DeviceDescriptor};

use crate::observer::ProgressObserver;
use crate::sequencer::{MotionSequencer, Rejection, SequenceReport};

/// Restricts a sweep to devices whose name contains a substring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceFilter {
    needle: Option<String>,
}

impl DeviceFilter {
    /// Match every device.
    pub fn any() -> Self {
        Self::default()
    }

    /// Case-insensitive substring match on the friendly name.
    pub fn name_contains(needle: impl Into<String>) -> Self {
        Self {
            needle: Some(needle.into().to_lowercase()),
        }
    }

    /// Unnamed devices only match the empty filter.
    pub fn matches(&self, name: Option<&str>) -> bool {
        match (&self.needle, name) {
            (None, _) => true,
            (Some(needle), Some(name)) => name.to_lowercase().contains(needle.as_str()),
            (Some(_), None) => false,
        }
    }
}

/// How a single device fared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceStatus {
    Completed(SequenceReport),
    BindFailed(Rejection),
    NoControlInterface(Rejection),
    Filtered,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceOutcome {
    pub label: String,
    pub status: DeviceStatus,
}

/// Totals for a finished sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Wall-clock start (RFC 3339).
    pub started_at: String,
    pub outcomes: Vec<DeviceOutcome>,
}

impl SweepReport {
    /// Devices that passed the filter and were announced to the observer.
    pub fn devices_found(&self) -> usize {
        self.outcomes.len() - self.devices_filtered()
    }

    pub fn devices_completed(&self) -> usize {
        self.count(|status| matches!(status, DeviceStatus::Completed(_)))
    }

    pub fn devices_skipped(&self) -> usize {
        self.count(|status| {
            matches!(
                status,
                DeviceStatus::BindFailed(_) | DeviceStatus::NoControlInterface(_)
            )
        })
    }

    pub fn devices_filtered(&self) -> usize {
        self.count(|status| matches!(status, DeviceStatus::Filtered))
    }

    pub fn commands_rejected(&self) -> usize {
        self.outcomes
            .iter()
            .map(|outcome| match &outcome.status {
                DeviceStatus::Completed(report) => report.rejected_count(),
                _ => 0,
            })
            .sum()
    }

    fn count(&self, pred: impl Fn(&DeviceStatus) -> bool) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| pred(&outcome.status))
            .count()
    }
}

/// A device as seen by [`Sweep::list`], without moving it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceListing {
    pub name: Option<String>,
    pub token: String,
    /// `Ok` with the ranges the control reports (`None` when an axis does
    /// not report one); `Err` when the device could not be bound or has no
    /// control interface.
    pub control: Result<AxisRanges, Rejection>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AxisRanges {
    pub pan: Option<AxisRange>,
    pub tilt: Option<AxisRange>,
}

/// One pass over every device in a catalog.
pub struct Sweep<'a> {
    catalog: &'a dyn DeviceCatalog,
    params: MotionParameters,
    filter: DeviceFilter,
}

impl<'a> Sweep<'a> {
    pub fn new(catalog: &'a dyn DeviceCatalog, params: MotionParameters) -> Self {
        Self {
            catalog,
            params,
            filter: DeviceFilter::any(),
        }
    }

    pub fn with_filter(mut self, filter: DeviceFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Move every matching device.
    pub fn run<P: Pacer>(
        &self,
        sequencer: &mut MotionSequencer<P>,
        observer: &mut dyn ProgressObserver,
    ) -> PtzResult<SweepReport> {
        let clock = MotionClock::start();
        let descriptors = self.catalog.enumerate()?;
        tracing::info!(
            backend = self.catalog.name(),
            started_at = clock.epoch_wall(),
            "Enumerating video input devices"
        );

        let mut report = SweepReport {
            started_at: clock.epoch_wall().to_string(),
            outcomes: Vec::new(),
        };

        for descriptor in descriptors {
            let name = self.display_name(&descriptor);
            let label = name
                .clone()
                .unwrap_or_else(|| descriptor.token().to_string());

            if !self.filter.matches(name.as_deref()) {
                tracing::debug!(device = %label, "Device does not match filter");
                report.outcomes.push(DeviceOutcome {
                    label,
                    status: DeviceStatus::Filtered,
                });
                continue;
            }
            observer.device_found(name.as_deref(), descriptor.token().as_str());

            let status = self.process(descriptor, &label, sequencer, observer);
            tracing::debug!(
                device = %label,
                elapsed_ms = clock.elapsed_ms(),
                "Device finished"
            );
            report.outcomes.push(DeviceOutcome { label, status });
        }

        tracing::info!(
            found = report.devices_found(),
            filtered = report.devices_filtered(),
            completed = report.devices_completed(),
            skipped = report.devices_skipped(),
            rejected = report.commands_rejected(),
            elapsed_ms = clock.elapsed_ms(),
            "Sweep finished"
        );
        Ok(report)
    }

    /// Bind each device and read its axis ranges without moving it.
    pub fn list(&self) -> PtzResult<Vec<DeviceListing>> {
        let mut listings = Vec::new();
        for descriptor in self.catalog.enumerate()? {
            let name = self.display_name(&descriptor);
            if !self.filter.matches(name.as_deref()) {
                continue;
            }
            let token = descriptor.token().to_string();
            let control = self.probe(descriptor).map_err(|err| Rejection::from(&err));
            listings.push(DeviceListing {
                name,
                token,
                control,
            });
        }
        Ok(listings)
    }

    fn display_name(&self, descriptor: &DeviceDescriptor) -> Option<String> {
        match self.catalog.resolve_display_name(descriptor) {
            Ok(name) => Some(name),
            Err(err) => {
                tracing::warn!("{err}");
                None
            }
        }
    }

    fn process<P: Pacer>(
        &self,
        descriptor: DeviceDescriptor,
        label: &str,
        sequencer: &mut MotionSequencer<P>,
        observer: &mut dyn ProgressObserver,
    ) -> DeviceStatus {
        let mut device = match self.catalog.bind(descriptor) {
            Ok(device) => device,
            Err(err) => {
                tracing::warn!(device = %label, "{err}");
                observer.device_skipped(label, &err);
                return DeviceStatus::BindFailed(Rejection::from(&err));
            }
        };

        // `device` is dropped at the end of this call, releasing it before
        // the next descriptor is bound.
        match sequencer.run(device.as_mut(), &self.params, observer) {
            Ok(sequence) => {
                observer.device_done(label, &sequence);
                DeviceStatus::Completed(sequence)
            }
            Err(err) => {
                tracing::warn!(device = %label, "{err}");
                observer.device_skipped(label, &err);
                DeviceStatus::NoControlInterface(Rejection::from(&err))
            }
        }
    }

    fn probe(&self, descriptor: DeviceDescriptor) -> PtzResult<AxisRanges> {
        let mut device = self.catalog.bind(descriptor)?;
        let control = device.acquire_control()?;
        let range = |axis: ControlAxis| match control.range(axis) {
            Ok(range) => Some(range),
            Err(err) => {
                tracing::debug!("{err}");
                None
            }
        };
        Ok(AxisRanges {
            pan: range(ControlAxis::Pan),
            tilt: range(ControlAxis::Tilt),
        })
    }
}
