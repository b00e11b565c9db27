//! Error types shared across PtzCam crates.
//!
//! Platform codes are kept as raw `i32` values (HRESULTs on Windows, errno
//! on Linux) and rendered as `0x%08X` so diagnostics look the same on every
//! backend.

use std::path::PathBuf;

/// Top-level error type for PtzCam operations.
#[derive(Debug, thiserror::Error)]
pub enum PtzError {
    #[error("Unable to create system device enumerator: {message} (Error {code:#010X})")]
    PlatformUnavailable { message: String, code: i32 },

    #[error("Unable to bind device {device}: {message} (Error {code:#010X})")]
    BindFailed {
        device: String,
        message: String,
        code: i32,
    },

    #[error("Unable to access camera control interface on {device}")]
    ControlInterfaceUnavailable { device: String },

    #[error("Unable to set {axis} property value to {value}. (Error {code:#010X})")]
    PropertySetRejected {
        axis: &'static str,
        value: i32,
        code: i32,
    },

    #[error("No friendly name available for {device}")]
    NameUnavailable { device: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Unsupported operation: {message}")]
    Unsupported { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using PtzError.
pub type PtzResult<T> = Result<T, PtzError>;

impl PtzError {
    pub fn platform_unavailable(msg: impl Into<String>, code: i32) -> Self {
        Self::PlatformUnavailable {
            message: msg.into(),
            code,
        }
    }

    pub fn bind_failed(device: impl Into<String>, msg: impl Into<String>, code: i32) -> Self {
        Self::BindFailed {
            device: device.into(),
            message: msg.into(),
            code,
        }
    }

    pub fn control_unavailable(device: impl Into<String>) -> Self {
        Self::ControlInterfaceUnavailable {
            device: device.into(),
        }
    }

    pub fn rejected(axis: &'static str, value: i32, code: i32) -> Self {
        Self::PropertySetRejected { axis, value, code }
    }

    pub fn name_unavailable(device: impl Into<String>) -> Self {
        Self::NameUnavailable {
            device: device.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported {
            message: msg.into(),
        }
    }

    /// The raw platform code carried by this error, if any.
    pub fn code(&self) -> Option<i32> {
        match self {
            Self::PlatformUnavailable { code, .. }
            | Self::BindFailed { code, .. }
            | Self::PropertySetRejected { code, .. } => Some(*code),
            Self::Io(e) => e.raw_os_error(),
            _ => None,
        }
    }

    /// Only a missing enumeration service ends the whole run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::PlatformUnavailable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_renders_hresult_as_hex() {
        let err = PtzError::rejected("pan", 90, 0x800700AAu32 as i32);
        assert_eq!(
            err.to_string(),
            "Unable to set pan property value to 90. (Error 0x800700AA)"
        );
        assert_eq!(err.code(), Some(0x800700AAu32 as i32));
    }

    #[test]
    fn errno_codes_are_zero_padded() {
        let err = PtzError::bind_failed("/dev/video3", "open failed", 13);
        assert!(err.to_string().ends_with("(Error 0x0000000D)"));
    }

    #[test]
    fn only_platform_unavailable_is_fatal() {
        assert!(PtzError::platform_unavailable("no sysfs", 2).is_fatal());
        assert!(!PtzError::control_unavailable("cam").is_fatal());
        assert!(!PtzError::rejected("tilt", -45, 16).is_fatal());
        assert!(!PtzError::name_unavailable("cam").is_fatal());
    }
}
