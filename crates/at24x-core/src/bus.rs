//! Two-wire bus abstraction
//!
//! The transfer engine drives the bus through this trait; implementations
//! live outside this crate (`at24x-linux-i2c` for Linux i2c-dev,
//! `at24x-dummy` for an in-memory emulator, or a board-specific
//! controller wrapper).
//!
//! The model is transaction-oriented: a write transaction is opened with
//! [`begin_transaction`](I2cBus::begin_transaction), payload bytes are
//! buffered with the write methods, and the whole frame goes on the wire
//! when [`end_transaction`](I2cBus::end_transaction) is called. An empty
//! transaction (begin immediately followed by end) carries no payload and
//! serves as a presence probe: its acknowledgement outcome tells whether
//! a device answers the select address.

use crate::error::Result;

/// Two-wire bus master
///
/// All operations are blocking; the engine issues at most one transaction
/// at a time and never interleaves transactions to different devices.
pub trait I2cBus {
    /// Open a write transaction to the given 7-bit select address.
    ///
    /// Payload bytes are buffered until [`end_transaction`](Self::end_transaction).
    fn begin_transaction(&mut self, select: u8);

    /// Append one payload byte to the open transaction.
    fn write_byte(&mut self, byte: u8);

    /// Append a run of payload bytes to the open transaction.
    fn write_bytes(&mut self, data: &[u8]) {
        for &byte in data {
            self.write_byte(byte);
        }
    }

    /// Put the buffered transaction on the wire.
    ///
    /// Returns [`Error::DeviceAbsent`](crate::Error::DeviceAbsent) when no
    /// device acknowledges the select address.
    fn end_transaction(&mut self) -> Result<()>;

    /// Issue a read request for up to `len` bytes from the given select
    /// address, making the received bytes available to
    /// [`read_byte`](Self::read_byte).
    ///
    /// Fewer than `len` bytes may become available; the engine detects the
    /// shortfall through [`bytes_available`](Self::bytes_available).
    fn request_read(&mut self, select: u8, len: usize) -> Result<()>;

    /// Number of received bytes not yet consumed.
    fn bytes_available(&self) -> usize;

    /// Consume the next received byte, if any.
    fn read_byte(&mut self) -> Option<u8>;

    /// Block for the given number of milliseconds.
    ///
    /// Used for the write-cycle settle delay; implementations on an RTOS
    /// or bare metal substitute their own timer here.
    fn delay_ms(&mut self, ms: u32);
}
