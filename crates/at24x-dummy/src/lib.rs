//! at24x-dummy - In-memory EEPROM emulator for testing
//!
//! This crate provides a dummy two-wire bus with a single emulated
//! AT24C-family EEPROM behind it. It's useful for testing and
//! development without real hardware: the backing store is inspectable,
//! every data transaction is logged with the select address that carried
//! it, and device absence or short reads can be injected.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "alloc")]
use alloc::collections::VecDeque;
#[cfg(feature = "alloc")]
use alloc::vec;
#[cfg(feature = "alloc")]
use alloc::vec::Vec;

use at24x_core::bus::I2cBus;
use at24x_core::chip::EepromChip;
use at24x_core::error::{Error, Result};

/// Configuration for the emulated device
#[derive(Debug, Clone)]
pub struct DummyConfig {
    /// Backing store size in bytes
    pub size: usize,
    /// Select address the device answers to (extension bits excluded)
    pub base_select: u8,
    /// How many low select bits carry logical address bits 16+
    pub addr_ext_bits: u8,
}

impl DummyConfig {
    /// Configuration matching a given device model at a strap index
    pub fn for_chip(chip: &EepromChip, index: u8) -> Self {
        Self {
            size: chip.total_size as usize,
            base_select: chip.base_select_address(index),
            addr_ext_bits: chip.addr_ext_bits,
        }
    }
}

impl Default for DummyConfig {
    fn default() -> Self {
        Self {
            size: 32768, // AT24C256
            base_select: 0x50,
            addr_ext_bits: 0,
        }
    }
}

/// One logged data write transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRecord {
    /// Select address the transaction was addressed to
    pub select: u8,
    /// Reassembled logical address (extension bits folded in)
    pub address: u32,
    /// Payload length
    pub len: usize,
}

/// One logged read request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadRecord {
    /// Select address the request was addressed to
    pub select: u8,
    /// Logical address the device served from
    pub address: u32,
    /// Requested length
    pub len: usize,
}

/// Dummy two-wire bus with one emulated EEPROM
///
/// The emulation decodes addressed write transactions exactly as the
/// device would: the first two payload bytes are the big-endian word
/// address, any further bytes land in the backing store, and the select
/// address's low extension bits supply logical address bits 16+.
#[cfg(feature = "alloc")]
pub struct DummyBus {
    config: DummyConfig,
    mem: Vec<u8>,
    txn: Vec<u8>,
    txn_select: u8,
    latched_addr: u32,
    pending: VecDeque<u8>,
    absent: bool,
    read_limit: Option<usize>,
    writes: Vec<WriteRecord>,
    reads: Vec<ReadRecord>,
    delays: Vec<u32>,
}

#[cfg(feature = "alloc")]
impl DummyBus {
    /// Create a new dummy bus with the given configuration
    pub fn new(config: DummyConfig) -> Self {
        let mem = vec![0xFF; config.size];
        Self {
            config,
            mem,
            txn: Vec::new(),
            txn_select: 0,
            latched_addr: 0,
            pending: VecDeque::new(),
            absent: false,
            read_limit: None,
            writes: Vec::new(),
            reads: Vec::new(),
            delays: Vec::new(),
        }
    }

    /// Create a dummy bus emulating the given device model
    pub fn for_chip(chip: &EepromChip, index: u8) -> Self {
        Self::new(DummyConfig::for_chip(chip, index))
    }

    /// Get a reference to the backing store
    pub fn data(&self) -> &[u8] {
        &self.mem
    }

    /// Get a mutable reference to the backing store
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.mem
    }

    /// Get the configuration
    pub fn config(&self) -> &DummyConfig {
        &self.config
    }

    /// Simulate an unresponsive device: every transaction and read
    /// request goes unacknowledged
    pub fn set_absent(&mut self, absent: bool) {
        self.absent = absent;
    }

    /// Serve at most this many bytes per read request
    pub fn set_read_limit(&mut self, limit: Option<usize>) {
        self.read_limit = limit;
    }

    /// Data write transactions seen so far
    pub fn writes(&self) -> &[WriteRecord] {
        &self.writes
    }

    /// Read requests seen so far
    pub fn reads(&self) -> &[ReadRecord] {
        &self.reads
    }

    /// Delays requested so far, in milliseconds
    pub fn delays(&self) -> &[u32] {
        &self.delays
    }

    /// Forget all logged transactions and delays
    pub fn clear_log(&mut self) {
        self.writes.clear();
        self.reads.clear();
        self.delays.clear();
    }

    fn ext_mask(&self) -> u8 {
        (1u8 << self.config.addr_ext_bits) - 1
    }

    /// Whether the device answers this select address
    fn selected(&self, select: u8) -> bool {
        !self.absent && (select & !self.ext_mask()) == (self.config.base_select & !self.ext_mask())
    }

    fn logical_addr(&self, select: u8, word: u16) -> u32 {
        ((select & self.ext_mask()) as u32) << 16 | word as u32
    }
}

#[cfg(feature = "alloc")]
impl Default for DummyBus {
    fn default() -> Self {
        Self::new(DummyConfig::default())
    }
}

#[cfg(feature = "alloc")]
impl I2cBus for DummyBus {
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

    fn end_transaction(&mut self) -> Result<()> {
        let txn = core::mem::take(&mut self.txn);
        if !self.selected(self.txn_select) {
            return Err(Error::DeviceAbsent);
        }
        if txn.len() >= 2 {
            let word = u16::from_be_bytes([txn[0], txn[1]]);
            self.latched_addr = self.logical_addr(self.txn_select, word);
            let payload = &txn[2..];
            if !payload.is_empty() {
                self.writes.push(WriteRecord {
                    select: self.txn_select,
                    address: self.latched_addr,
                    len: payload.len(),
                });
                for (i, &byte) in payload.iter().enumerate() {
                    let addr = self.latched_addr as usize + i;
                    if addr < self.mem.len() {
                        self.mem[addr] = byte;
                    }
                }
            }
        }
        Ok(())
    }

    fn request_read(&mut self, select: u8, len: usize) -> Result<()> {
        self.pending.clear();
        if !self.selected(select) {
            return Err(Error::DeviceAbsent);
        }
        self.reads.push(ReadRecord {
            select,
            address: self.latched_addr,
            len,
        });
        let served = self.read_limit.map_or(len, |limit| limit.min(len));
        for i in 0..served {
            let addr = self.latched_addr as usize + i;
            // the device keeps driving 0xFF past the end of the array
            self.pending
                .push_back(self.mem.get(addr).copied().unwrap_or(0xFF));
        }
        self.latched_addr += served as u32;
        Ok(())
    }

    fn bytes_available(&self) -> usize {
        self.pending.len()
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.pending.pop_front()
    }

    fn delay_ms(&mut self, ms: u32) {
        // no time passes for the in-memory device, only the accounting
        self.delays.push(ms);
    }
}
