//! Error-swallowing best-effort interface
//!
//! Some deployments treat EEPROM traffic as fire-and-forget: a chunk the
//! device never acknowledged is simply lost, a short read leaves the
//! destination buffer as it was, and a single-byte read of an absent
//! device yields `0`. [`Legacy`] reproduces that contract exactly - no
//! operation here returns an error, retries, or validates its input -
//! for callers migrating code written against it and for tests that must
//! match it. New code should prefer the [`Eeprom`] methods, which report
//! what actually happened.

use crate::bus::I2cBus;
use crate::device::transfer::{self, NackPolicy};
use crate::device::Eeprom;
use crate::scalar::Scalar;

/// Best-effort view of an [`Eeprom`], obtained via [`Eeprom::legacy`]
pub struct Legacy<'a, B: I2cBus> {
    dev: &'a mut Eeprom<B>,
}

impl<'a, B: I2cBus> Legacy<'a, B> {
    pub(crate) fn new(dev: &'a mut Eeprom<B>) -> Self {
        Self { dev }
    }

    /// Write one byte; a missing acknowledgement drops it silently.
    pub fn write(&mut self, address: u32, value: u8) {
        self.write_bytes(address, &[value]);
    }

    /// Write a byte sequence; unacknowledged chunks are dropped and the
    /// remaining chunks are still issued.
    pub fn write_bytes(&mut self, address: u32, data: &[u8]) {
        let _ = transfer::write_paged(
            &mut self.dev.bus,
            &mut self.dev.ctx,
            address,
            data,
            NackPolicy::SkipChunk,
        );
    }

    /// Read one byte; returns `0` when the device does not answer,
    /// indistinguishable from a stored zero.
    pub fn read(&mut self, address: u32) -> u8 {
        transfer::read_single(&mut self.dev.bus, &mut self.dev.ctx, address).unwrap_or(0)
    }

    /// Read a byte sequence; spans the device never delivered keep
    /// whatever the buffer already held.
    pub fn read_bytes(&mut self, address: u32, buf: &mut [u8]) {
        let _ = transfer::read_paged(
            &mut self.dev.bus,
            &mut self.dev.ctx,
            address,
            buf,
            NackPolicy::SkipChunk,
        );
    }

    fn write_scalar<T: Scalar>(&mut self, address: u32, value: T) {
        let mut buf = [0u8; 8];
        value.encode(&mut buf);
        self.write_bytes(address, &buf[..T::WIDTH]);
    }

    /// Scratch starts zeroed, so a failed read decodes to zero.
    fn read_scalar<T: Scalar>(&mut self, address: u32) -> T {
        let mut buf = [0u8; 8];
        self.read_bytes(address, &mut buf[..T::WIDTH]);
        T::decode(&buf)
    }

    /// Write a 16-bit integer
    pub fn write_int(&mut self, address: u32, value: u16) {
        self.write_scalar(address, value);
    }

    /// Write a 32-bit integer
    pub fn write_long(&mut self, address: u32, value: u32) {
        self.write_scalar(address, value);
    }

    /// Write a 32-bit float
    pub fn write_float(&mut self, address: u32, value: f32) {
        self.write_scalar(address, value);
    }

    /// Write a 64-bit float
    pub fn write_double(&mut self, address: u32, value: f64) {
        self.write_scalar(address, value);
    }

    /// Write a raw character span
    pub fn write_chars(&mut self, address: u32, data: &[u8]) {
        self.write_bytes(address, data);
    }

    /// Read a 16-bit integer; `0` on failure
    pub fn read_int(&mut self, address: u32) -> u16 {
        self.read_scalar(address)
    }

    /// Read a 32-bit integer; `0` on failure
    pub fn read_long(&mut self, address: u32) -> u32 {
        self.read_scalar(address)
    }

    /// Read a 32-bit float; `0.0` on failure
    pub fn read_float(&mut self, address: u32) -> f32 {
        self.read_scalar(address)
    }

    /// Read a 64-bit float; `0.0` on failure
    pub fn read_double(&mut self, address: u32) -> f64 {
        self.read_scalar(address)
    }

    /// Read a raw character span
    pub fn read_chars(&mut self, address: u32, buf: &mut [u8]) {
        self.read_bytes(address, buf);
    }
}
