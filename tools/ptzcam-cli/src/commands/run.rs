//! Pan and tilt every matching camera.

use ptzcam_common::clock::Pacer;
use ptzcam_common::config::MotionParameters;
use ptzcam_motion::{total_settle_time, DeviceFilter, MotionSequencer, Sweep};
use ptzcam_platform_core::DeviceCatalog;

use crate::console::ConsoleObserver;

pub fn run<P: Pacer>(
    catalog: &dyn DeviceCatalog,
    pacer: P,
    params: MotionParameters,
    filter: DeviceFilter,
) -> anyhow::Result<()> {
    println!(
        "Trying Pan {}, Tilt {}, Wait {}, Time {}",
        params.pan_delta, params.tilt_delta, params.per_degree_wait_ms, params.settle_base_ms
    );
    tracing::debug!(
        per_device_ms = total_settle_time(&params).as_millis() as u64,
        "Minimum blocking time per device"
    );

    println!("Enumerating video input devices ...");
    let mut sequencer = MotionSequencer::new(pacer);
    let report = Sweep::new(catalog, params)
        .with_filter(filter)
        .run(&mut sequencer, &mut ConsoleObserver)?;

    if report.outcomes.is_empty() {
        tracing::info!("No video input devices present");
    } else if report.devices_found() == 0 {
        tracing::info!(
            filtered = report.devices_filtered(),
            "No video input device matched the filter"
        );
    }
    Ok(())
}
