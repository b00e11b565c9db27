//! Capture-device enumeration through sysfs.
//!
//! Every V4L2 node appears as `/sys/class/video4linux/videoN` with a `name`
//! attribute holding the driver-reported card name. UVC cameras usually
//! register two nodes (capture + metadata); both are listed and the
//! metadata node is filtered out later when it exposes no camera controls.

use std::fs::OpenOptions;
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use ptzcam_common::error::{PtzError, PtzResult};
use ptzcam_platform_core::{BindingToken, CameraDevice, DeviceCatalog, DeviceDescriptor};

use crate::device::V4l2Device;
use crate::permissions::fix_hint;

/// Catalog of Video4Linux capture devices.
#[derive(Debug, Clone)]
pub struct V4l2Catalog {
    class_root: PathBuf,
    dev_root: PathBuf,
}

impl Default for V4l2Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl V4l2Catalog {
    pub fn new() -> Self {
        Self::with_roots("/sys/class", "/dev")
    }

    /// Use alternative sysfs class and device directories.
    pub fn with_roots(class_root: impl Into<PathBuf>, dev_root: impl Into<PathBuf>) -> Self {
        Self {
            class_root: class_root.into(),
            dev_root: dev_root.into(),
        }
    }

    fn descriptor_for(&self, entry_path: &Path, node: &str) -> DeviceDescriptor {
        let friendly_name = std::fs::read_to_string(entry_path.join("name"))
            .ok()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());
        let token = BindingToken::new(self.dev_root.join(node).to_string_lossy());
        DeviceDescriptor::new(token, friendly_name)
    }
}

impl DeviceCatalog for V4l2Catalog {
    fn name(&self) -> &str {
        "v4l2"
    }

    fn enumerate(&self) -> PtzResult<Box<dyn Iterator<Item = DeviceDescriptor> + '_>> {
        if let Err(e) = std::fs::metadata(&self.class_root) {
            return Err(PtzError::platform_unavailable(
                format!("{} is not accessible: {e}", self.class_root.display()),
                e.raw_os_error().unwrap_or(libc::ENOENT),
            ));
        }

        let category = self.class_root.join("video4linux");
        let entries = match std::fs::read_dir(&category) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %category.display(), "No video input device category");
                return Ok(Box::new(std::iter::empty()));
            }
            Err(e) => {
                return Err(PtzError::platform_unavailable(
                    format!("cannot read {}: {e}", category.display()),
                    e.raw_os_error().unwrap_or(libc::EIO),
                ))
            }
        };

        Ok(Box::new(entries.filter_map(move |entry| {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable video4linux entry: {e}");
                    return None;
                }
            };
            let node = entry.file_name().to_string_lossy().into_owned();
            if !node.starts_with("video") {
                return None;
            }
            Some(self.descriptor_for(&entry.path(), &node))
        })))
    }

    fn bind(&self, descriptor: DeviceDescriptor) -> PtzResult<Box<dyn CameraDevice>> {
        let path = Path::new(descriptor.token().as_str());
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_NONBLOCK | libc::O_CLOEXEC)
            .open(path)
            .map_err(|e| {
                let code = e.raw_os_error().unwrap_or(libc::EIO);
                let message = match fix_hint(code) {
                    Some(hint) => format!("{e}; {hint}"),
                    None => e.to_string(),
                };
                PtzError::bind_failed(descriptor.label(), message, code)
            })?;

        tracing::debug!(path = %path.display(), "Opened device node");
        Ok(Box::new(V4l2Device::new(file, descriptor.label())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_node(class_root: &Path, node: &str, name: Option<&str>) {
        let dir = class_root.join("video4linux").join(node);
        std::fs::create_dir_all(&dir).unwrap();
        if let Some(name) = name {
            std::fs::write(dir.join("name"), format!("{name}\n")).unwrap();
        }
    }

    #[test]
    fn lists_video_nodes_with_names() {
        let sys = tempfile::tempdir().unwrap();
        fake_node(sys.path(), "video0", Some("QuickCam Orbit"));
        fake_node(sys.path(), "video1", None);
        fake_node(sys.path(), "v4l-subdev0", Some("sensor"));

        let catalog = V4l2Catalog::with_roots(sys.path(), "/dev");
        let mut found: Vec<_> = catalog.enumerate().unwrap().collect();
        found.sort_by(|a, b| a.token().as_str().cmp(b.token().as_str()));

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].token().as_str(), "/dev/video0");
        assert_eq!(found[0].friendly_name(), Some("QuickCam Orbit"));
        assert_eq!(found[1].friendly_name(), None);
        assert!(matches!(
            catalog.resolve_display_name(&found[1]),
            Err(PtzError::NameUnavailable { .. })
        ));
    }

    #[test]
    fn missing_category_is_empty() {
        let sys = tempfile::tempdir().unwrap();
        let catalog = V4l2Catalog::with_roots(sys.path(), "/dev");
        assert_eq!(catalog.enumerate().unwrap().count(), 0);
    }

    #[test]
    fn missing_class_root_is_platform_unavailable() {
        let sys = tempfile::tempdir().unwrap();
        let catalog = V4l2Catalog::with_roots(sys.path().join("nope"), "/dev");
        let err = catalog.enumerate().err().unwrap();
        assert!(err.is_fatal());
        assert_eq!(err.code(), Some(libc::ENOENT));
    }

    #[test]
    fn vanished_node_fails_to_bind() {
        let sys = tempfile::tempdir().unwrap();
        let dev = tempfile::tempdir().unwrap();
        fake_node(sys.path(), "video7", Some("gone"));

        let catalog = V4l2Catalog::with_roots(sys.path(), dev.path());
        let descriptor = catalog.enumerate().unwrap().next().unwrap();
        let err = catalog.bind(descriptor).err().unwrap();
        assert!(matches!(err, PtzError::BindFailed { .. }));
        assert_eq!(err.code(), Some(libc::ENOENT));
    }

    #[test]
    fn node_without_camera_controls_has_no_control_interface() {
        let sys = tempfile::tempdir().unwrap();
        let dev = tempfile::tempdir().unwrap();
        fake_node(sys.path(), "video1", Some("metadata"));
        std::fs::write(dev.path().join("video1"), b"").unwrap();

        let catalog = V4l2Catalog::with_roots(sys.path(), dev.path());
        let descriptor = catalog.enumerate().unwrap().next().unwrap();
        let mut device = catalog.bind(descriptor).unwrap();
        assert_eq!(device.label(), "metadata");
        assert!(matches!(
            device.acquire_control(),
            Err(PtzError::ControlInterfaceUnavailable { .. })
        ));
    }
}
