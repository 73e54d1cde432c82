//! EEPROM device handle
//!
//! [`Eeprom`] bundles a bus implementation with the addressing state for
//! one device and exposes the validated transfer operations. Typed scalar
//! accessors live in [`crate::scalar`], the error-swallowing interface in
//! [`crate::legacy`].

use crate::bus::I2cBus;
use crate::chip::{self, EepromChip};
use crate::device::context::DeviceContext;
use crate::device::transfer::{self, NackPolicy};
use crate::error::{Error, Result};
use crate::legacy::Legacy;

/// One EEPROM on the bus
///
/// Every operation takes `&mut self`: the select address is mutable
/// addressing state, so access to a device instance has to be serialized
/// by its single owner. Devices sharing one physical bus from multiple
/// threads need a single external lock around all bus activity.
///
/// # Example
///
/// ```ignore
/// use at24x_core::Eeprom;
///
/// let mut eeprom = Eeprom::at24cm02(bus, 0);
/// eeprom.write(0x2_0000, b"boot count")?;
///
/// let mut buf = [0u8; 10];
/// eeprom.read(0x2_0000, &mut buf)?;
/// ```
#[derive(Debug)]
pub struct Eeprom<B> {
    pub(crate) bus: B,
    pub(crate) ctx: DeviceContext,
}

impl<B: I2cBus> Eeprom<B> {
    /// Create a handle for any supported model at the given strap index
    pub fn new(bus: B, chip: &'static EepromChip, index: u8) -> Self {
        Self {
            bus,
            ctx: DeviceContext::new(chip, index),
        }
    }

    /// AT24C32 at the given strap index (0 for a single device)
    pub fn at24c32(bus: B, index: u8) -> Self {
        Self::new(bus, &chip::AT24C32, index)
    }

    /// AT24C64 at the given strap index
    pub fn at24c64(bus: B, index: u8) -> Self {
        Self::new(bus, &chip::AT24C64, index)
    }

    /// AT24C128 at the given strap index
    pub fn at24c128(bus: B, index: u8) -> Self {
        Self::new(bus, &chip::AT24C128, index)
    }

    /// AT24C256 at the given strap index
    pub fn at24c256(bus: B, index: u8) -> Self {
        Self::new(bus, &chip::AT24C256, index)
    }

    /// AT24C512 at the given strap index
    pub fn at24c512(bus: B, index: u8) -> Self {
        Self::new(bus, &chip::AT24C512, index)
    }

    /// AT24CM01 at the given strap index (only the high two select bits
    /// remain for strapping)
    pub fn at24cm01(bus: B, index: u8) -> Self {
        Self::new(bus, &chip::AT24CM01, index)
    }

    /// AT24CM02 at the given strap index (only the top select bit
    /// remains for strapping)
    pub fn at24cm02(bus: B, index: u8) -> Self {
        Self::new(bus, &chip::AT24CM02, index)
    }

    /// The device model
    pub fn chip(&self) -> &'static EepromChip {
        self.ctx.chip
    }

    /// Total capacity in bytes
    pub fn size(&self) -> u32 {
        self.ctx.total_size()
    }

    /// Select address most recently put on the bus
    pub fn select_address(&self) -> u8 {
        self.ctx.current_select()
    }

    /// Get a reference to the underlying bus
    pub fn bus(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Consume the handle and return the bus
    pub fn release(self) -> B {
        self.bus
    }

    /// Error-swallowing view of this device, see [`Legacy`]
    pub fn legacy(&mut self) -> Legacy<'_, B> {
        Legacy::new(self)
    }

    /// Read one byte at `address`.
    ///
    /// Device absence is a typed error here, distinguishable from a
    /// stored zero byte.
    pub fn read_byte(&mut self, address: u32) -> Result<u8> {
        if !self.ctx.is_valid_range(address, 1) {
            return Err(Error::AddressOutOfBounds);
        }
        transfer::read_single(&mut self.bus, &mut self.ctx, address)
    }

    /// Fill `buf` from the device starting at `address`.
    ///
    /// On [`Error::PartialTransfer`] the destination beyond the
    /// transferred count is left unmodified.
    pub fn read(&mut self, address: u32, buf: &mut [u8]) -> Result<()> {
        if !self.ctx.is_valid_range(address, buf.len()) {
            return Err(Error::AddressOutOfBounds);
        }
        transfer::read_paged(&mut self.bus, &mut self.ctx, address, buf, NackPolicy::Abort)
    }

    /// Write one byte at `address`, then wait out the write cycle.
    pub fn write_byte(&mut self, address: u32, value: u8) -> Result<()> {
        self.write(address, &[value])
    }

    /// Write `data` to the device starting at `address`.
    ///
    /// The request is fragmented along page boundaries; each fragment is
    /// followed by the write-cycle settle delay.
    pub fn write(&mut self, address: u32, data: &[u8]) -> Result<()> {
        if !self.ctx.is_valid_range(address, data.len()) {
            return Err(Error::AddressOutOfBounds);
        }
        transfer::write_paged(&mut self.bus, &mut self.ctx, address, data, NackPolicy::Abort)
    }

    /// Read `len` bytes starting at `address` into a fresh vector.
    #[cfg(feature = "alloc")]
    pub fn read_vec(&mut self, address: u32, len: usize) -> Result<alloc::vec::Vec<u8>> {
        let mut buf = alloc::vec![0u8; len];
        self.read(address, &mut buf)?;
        Ok(buf)
    }
}
