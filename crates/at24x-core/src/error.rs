//! Error types for at24x-core
//!
//! This module provides a no_std compatible error type that can be used
//! throughout the crate.

use core::fmt;

/// Core error type - no_std compatible, Copy for efficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Device did not acknowledge its select address
    DeviceAbsent,
    /// A read produced fewer bytes than requested; the unfilled part of
    /// the destination buffer is left unmodified
    PartialTransfer {
        /// Number of bytes the request asked for
        expected: usize,
        /// Number of bytes actually transferred before the shortfall
        transferred: usize,
    },
    /// Address range extends beyond the device capacity
    AddressOutOfBounds,
    /// Transport-level failure other than a missing acknowledgement
    Bus,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeviceAbsent => write!(f, "device did not acknowledge select address"),
            Self::PartialTransfer {
                expected,
                transferred,
            } => {
                write!(
                    f,
                    "partial transfer: {} of {} bytes",
                    transferred, expected
                )
            }
            Self::AddressOutOfBounds => write!(f, "address out of bounds"),
            Self::Bus => write!(f, "bus transport failure"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result type alias using the core Error type
pub type Result<T> = core::result::Result<T, Error>;
