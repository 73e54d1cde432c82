//! Linux i2c-dev bus implementation
//!
//! This module provides the `LinuxI2c` struct that implements the
//! `I2cBus` trait on top of `/dev/i2c-N` character devices.

use crate::error::{LinuxI2cError, Result};

use at24x_core::bus::I2cBus;
use at24x_core::error::{Error as CoreError, Result as CoreResult};

use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::os::unix::io::AsRawFd;
use std::time::Duration;

/// Linux i2c-dev ioctl constants
mod ioctl {
    use nix::ioctl_write_int_bad;

    /// Set the 7-bit target address for subsequent read/write calls
    pub const I2C_SLAVE: i32 = 0x0703;
    /// Same, but take the address over from a bound kernel driver
    pub const I2C_SLAVE_FORCE: i32 = 0x0706;

    ioctl_write_int_bad!(i2c_slave, I2C_SLAVE);
    ioctl_write_int_bad!(i2c_slave_force, I2C_SLAVE_FORCE);
}

/// Configuration for opening a Linux i2c-dev device
#[derive(Debug, Clone)]
pub struct LinuxI2cConfig {
    /// Device path (e.g., "/dev/i2c-1")
    pub device: String,
    /// Use `I2C_SLAVE_FORCE` to take addresses already claimed by a
    /// kernel driver (e.g. a bound at24 driver)
    pub force: bool,
}

impl Default for LinuxI2cConfig {
    fn default() -> Self {
        Self {
            device: String::new(),
            force: false,
        }
    }
}

impl LinuxI2cConfig {
    /// Create a new configuration with the given device path
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            ..Default::default()
        }
    }

    /// Claim target addresses even when a kernel driver holds them
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}

/// Linux i2c-dev bus master
///
/// Write transactions are buffered in memory and put on the wire as one
/// `write(2)` call when the transaction ends, so each transaction is a
/// single addressed bus transfer exactly like on a microcontroller
/// two-wire peripheral.
pub struct LinuxI2c {
    file: File,
    force: bool,
    /// Target currently programmed into the file descriptor
    target: Option<u8>,
    txn: Vec<u8>,
    txn_select: u8,
    pending: VecDeque<u8>,
}

impl LinuxI2c {
    /// Open a Linux i2c-dev device with the given configuration
    pub fn open(config: &LinuxI2cConfig) -> Result<Self> {
        if config.device.is_empty() {
            return Err(LinuxI2cError::NoDevice);
        }

        log::debug!("linux_i2c: opening {}", config.device);

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&config.device)
            .map_err(|e| LinuxI2cError::OpenFailed {
                path: config.device.clone(),
                source: e,
            })?;

        Ok(Self {
            file,
            force: config.force,
            target: None,
            txn: Vec::new(),
            txn_select: 0,
            pending: VecDeque::new(),
        })
    }

    /// Open a device with default settings
    pub fn open_device(device: &str) -> Result<Self> {
        Self::open(&LinuxI2cConfig::new(device))
    }

    fn set_target(&mut self, select: u8) -> std::io::Result<()> {
        if self.target == Some(select) {
            return Ok(());
        }
        let fd = self.file.as_raw_fd();
        let result = if self.force {
            unsafe { ioctl::i2c_slave_force(fd, select as libc::c_int) }
        } else {
            unsafe { ioctl::i2c_slave(fd, select as libc::c_int) }
        };
        result.map_err(|e| std::io::Error::from_raw_os_error(e as i32))?;
        self.target = Some(select);
        Ok(())
    }
}

/// Map an I/O error from an addressed transfer to the core error.
///
/// The kernel reports a missing acknowledgement as ENXIO, EREMOTEIO or
/// EIO depending on the adapter driver.
fn map_transfer_error(e: &std::io::Error) -> CoreError {
    match e.raw_os_error() {
        Some(code)
            if code == libc::ENXIO
                || code == libc::EREMOTEIO
                || code == libc::ENODEV
                || code == libc::EIO =>
        {
            CoreError::DeviceAbsent
        }
        _ => CoreError::Bus,
    }
}

impl I2cBus for LinuxI2c {
    fn begin_transaction(&mut self, select: u8) {
        self.txn.clear();
        self.txn_select = select;
    }

    fn write_byte(&mut self, byte: u8) {
        self.txn.push(byte);
    }

    fn write_bytes(&mut self, data: &[u8]) {
        self.txn.extend_from_slice(data);
    }

    fn end_transaction(&mut self) -> CoreResult<()> {
        let payload = std::mem::take(&mut self.txn);
        let select = self.txn_select;
        self.set_target(select).map_err(|e| {
            log::debug!("linux_i2c: selecting 0x{:02X} failed: {}", select, e);
            CoreError::Bus
        })?;
        // a zero-length write is the presence probe: address and stop
        // condition only
        match (&self.file).write(&payload) {
            Ok(n) if n == payload.len() => Ok(()),
            Ok(_) => Err(CoreError::Bus),
            Err(e) => {
                log::trace!("linux_i2c: write to 0x{:02X} failed: {}", select, e);
                Err(map_transfer_error(&e))
            }
        }
    }

    fn request_read(&mut self, select: u8, len: usize) -> CoreResult<()> {
        self.pending.clear();
        if len == 0 {
            return Ok(());
        }
        self.set_target(select).map_err(|e| {
            log::debug!("linux_i2c: selecting 0x{:02X} failed: {}", select, e);
            CoreError::Bus
        })?;
        let mut buf = vec![0u8; len];
        match (&self.file).read(&mut buf) {
            Ok(n) => {
                self.pending.extend(&buf[..n]);
                Ok(())
            }
            Err(e) => {
                log::trace!("linux_i2c: read from 0x{:02X} failed: {}", select, e);
                Err(map_transfer_error(&e))
            }
        }
    }

    fn bytes_available(&self) -> usize {
        self.pending.len()
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.pending.pop_front()
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(ms.into()));
    }
}
