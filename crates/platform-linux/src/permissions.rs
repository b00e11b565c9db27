//! Permission detection and guidance for Linux.
//!
//! Pan/tilt control needs read/write access to the camera's device node,
//! which on most distributions means membership of the `video` group.

use std::path::Path;

/// A system capability that PtzCam may need.
#[derive(Debug, Clone)]
pub struct Capability {
    pub name: String,
    pub description: String,
    pub available: bool,
    pub required: bool,
    pub fix_instructions: Option<String>,
}

/// Check all capabilities and report status.
pub fn check_capabilities() -> Vec<Capability> {
    vec![
        check_sysfs_access(Path::new("/sys/class")),
        check_video_nodes(Path::new("/dev")),
        check_video_group(),
        check_uvc_driver(Path::new("/sys/module")),
    ]
}

/// Guidance for an errno returned while opening a device node.
pub fn fix_hint(errno: i32) -> Option<&'static str> {
    match errno {
        libc::EACCES | libc::EPERM => {
            Some("add the user to the video group: sudo usermod -aG video $USER (logout required)")
        }
        libc::EBUSY => Some("another application holds the camera exclusively; close it and retry"),
        libc::ENOENT | libc::ENODEV => Some("the device was unplugged during enumeration"),
        _ => None,
    }
}

fn check_sysfs_access(class_root: &Path) -> Capability {
    let available = class_root.is_dir();

    Capability {
        name: "Device Enumeration".to_string(),
        description: "sysfs device classes used to list capture devices".to_string(),
        available,
        required: true,
        fix_instructions: if available {
            None
        } else {
            Some("Mount sysfs: sudo mount -t sysfs sysfs /sys".to_string())
        },
    }
}

fn check_video_nodes(dev_root: &Path) -> Capability {
    let available = std::fs::read_dir(dev_root)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .any(|entry| entry.file_name().to_string_lossy().starts_with("video"))
        })
        .unwrap_or(false);

    Capability {
        name: "Video Device Nodes".to_string(),
        description: "Video4Linux capture devices under /dev".to_string(),
        available,
        required: true,
        fix_instructions: if available {
            None
        } else {
            Some(
                "Connect a camera and verify /dev/video* exists (v4l2-ctl --list-devices)"
                    .to_string(),
            )
        },
    }
}

fn check_video_group() -> Capability {
    let in_video_group = std::process::Command::new("groups")
        .output()
        .map(|o| {
            String::from_utf8_lossy(&o.stdout)
                .split_whitespace()
                .any(|group| group == "video")
        })
        .unwrap_or(false);

    Capability {
        name: "Video Group Membership".to_string(),
        description: "Read/write access to camera device nodes".to_string(),
        available: in_video_group,
        // root and logind ACLs grant access without the group
        required: false,
        fix_instructions: if in_video_group {
            None
        } else {
            fix_hint(libc::EACCES).map(str::to_string)
        },
    }
}

fn check_uvc_driver(module_root: &Path) -> Capability {
    let available = module_root.join("uvcvideo").is_dir();

    Capability {
        name: "UVC Driver".to_string(),
        description: "uvcvideo kernel module exposing camera pan/tilt controls".to_string(),
        available,
        required: false,
        fix_instructions: if available {
            None
        } else {
            Some("Load the driver: sudo modprobe uvcvideo".to_string())
        },
    }
}

/// Print a user-friendly capability report.
pub fn print_capability_report(capabilities: &[Capability]) {
    println!("PtzCam System Capabilities:");
    println!("{}", "-".repeat(60));

    for cap in capabilities {
        let status = if cap.available {
            "[OK]"
        } else if cap.required {
            "[MISSING - REQUIRED]"
        } else {
            "[MISSING - OPTIONAL]"
        };

        println!("  {} {}: {}", status, cap.name, cap.description);

        if let Some(ref fix) = cap.fix_instructions {
            println!("    Fix: {fix}");
        }
    }
}
