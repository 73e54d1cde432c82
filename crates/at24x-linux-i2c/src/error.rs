//! Error types for Linux i2c-dev operations

use thiserror::Error;

/// Linux i2c-dev specific errors
#[derive(Debug, Error)]
pub enum LinuxI2cError {
    /// Failed to open device
    #[error("Failed to open {path}: {source}")]
    OpenFailed {
        /// Device path that was attempted
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to select the target device address
    #[error("Failed to select target 0x{select:02X}: {source}")]
    SetTargetFailed {
        /// 7-bit select address
        select: u8,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// No device path specified
    #[error("No device specified. Use a path like /dev/i2c-1")]
    NoDevice,
}

/// Result type for Linux i2c-dev operations
pub type Result<T> = std::result::Result<T, LinuxI2cError>;
