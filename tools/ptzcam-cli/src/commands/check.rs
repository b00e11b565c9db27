//! Check system capabilities.

pub fn run() -> anyhow::Result<()> {
    println!("PtzCam System Check");
    println!("{}", "=".repeat(50));

    #[cfg(target_os = "linux")]
    {
        use ptzcam_platform_linux::permissions;

        let capabilities = permissions::check_capabilities();
        permissions::print_capability_report(&capabilities);

        let all_required_ok = capabilities
            .iter()
            .filter(|c| c.required)
            .all(|c| c.available);

        println!();
        if all_required_ok {
            println!("All required capabilities are available. PtzCam is ready.");
        } else {
            println!("Some required capabilities are missing. See above for fixes.");
        }
    }

    #[cfg(not(target_os = "linux"))]
    {
        println!("[WARN] Capability checks are only implemented for Linux.");
    }

    Ok(())
}
