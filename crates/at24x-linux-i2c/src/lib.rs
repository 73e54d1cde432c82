//! at24x-linux-i2c - Linux i2c-dev support
//!
//! This crate provides an [`at24x_core::bus::I2cBus`] implementation over
//! the Linux `/dev/i2c-N` character device interface.
//!
//! # Overview
//!
//! The kernel exposes each I2C adapter as `/dev/i2c-N`. The target
//! device is chosen with the `I2C_SLAVE` ioctl, after which plain
//! `write(2)` and `read(2)` calls become addressed bus transactions. A
//! device that does not acknowledge its select address surfaces as an
//! I/O error on those calls, which this crate maps to
//! [`DeviceAbsent`](at24x_core::Error::DeviceAbsent).
//!
//! # Example
//!
//! ```no_run
//! use at24x_linux_i2c::LinuxI2c;
//! use at24x_core::Eeprom;
//!
//! let bus = LinuxI2c::open_device("/dev/i2c-1")?;
//! let mut eeprom = Eeprom::at24c256(bus, 0);
//!
//! let mut serial = [0u8; 16];
//! eeprom.read(0, &mut serial)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # System Requirements
//!
//! - Linux kernel with i2c-dev support enabled (`CONFIG_I2C_CHARDEV`)
//! - Read/write access to `/dev/i2c-N`
//! - May require adding the user to the `i2c` group or a udev rule

pub mod device;
pub mod error;

// Re-exports
pub use device::{LinuxI2c, LinuxI2cConfig};
pub use error::{LinuxI2cError, Result};
