//! List cameras and their pan/tilt ranges without moving them.

use ptzcam_common::config::MotionParameters;
use ptzcam_motion::{DeviceFilter, Sweep};
use ptzcam_platform_core::{AxisRange, DeviceCatalog};

/// One axis line; flags a requested move the axis would not accept.
fn describe(range: Option<AxisRange>, requested: i32) -> String {
    match range {
        Some(r) => {
            let fit = if r.contains(requested) {
                ""
            } else {
                ", outside range"
            };
            format!(
                "{}..{} step {} (default {}; requested {requested}{fit})",
                r.min, r.max, r.step, r.default
            )
        }
        None => "not reported".to_string(),
    }
}

pub fn run(
    catalog: &dyn DeviceCatalog,
    params: MotionParameters,
    filter: DeviceFilter,
) -> anyhow::Result<()> {
    println!("Enumerating video input devices ...");
    let listings = Sweep::new(catalog, params).with_filter(filter).list()?;

    for listing in &listings {
        match &listing.name {
            Some(name) => println!("  Found device: {name} ({})", listing.token),
            None => println!("  Found device: {} (no friendly name)", listing.token),
        }
        match &listing.control {
            Ok(ranges) => {
                println!("    Pan:  {}", describe(ranges.pan, params.pan_delta));
                println!("    Tilt: {}", describe(ranges.tilt, params.tilt_delta));
            }
            Err(rejection) => println!("    No pan/tilt control: {}", rejection.message),
        }
    }

    let controllable = listings.iter().filter(|l| l.control.is_ok()).count();
    println!();
    println!(
        "{} device(s) found, {} with pan/tilt control.",
        listings.len(),
        controllable
    );
    Ok(())
}
