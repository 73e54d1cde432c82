//! Paged transfer engine
//!
//! Splits arbitrary-length requests into chunks that fit both the bus
//! transaction limit and the device's internal page buffer, re-deriving
//! the select address per chunk so that transfers crossing a 64 KiB
//! segment land on the right extension bits.

use crate::bus::I2cBus;
use crate::device::context::DeviceContext;
use crate::error::{Error, Result};

/// Largest payload issued in one write transaction.
///
/// Two-wire controllers commonly buffer 32 bytes per transaction; the
/// two-byte word address takes part of that.
pub const MAX_WRITE_CHUNK: usize = 30;

/// Largest payload requested in one read transaction.
pub const MAX_READ_CHUNK: usize = 32;

/// Internal write-cycle settle time, observed after every write chunk.
pub const WRITE_CYCLE_MS: u32 = 10;

/// What to do with a chunk whose bus transactions fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NackPolicy {
    /// Abort the request and surface the error
    Abort,
    /// Drop the chunk and continue with the next one
    SkipChunk,
}

/// Empty select transaction; the acknowledgement outcome is the presence
/// check.
fn probe<B: I2cBus>(bus: &mut B, select: u8) -> Result<()> {
    bus.begin_transaction(select);
    bus.end_transaction()
}

/// One addressed write transaction, followed by the settle delay.
///
/// `data` must already respect the page and transaction limits.
fn write_chunk<B: I2cBus>(bus: &mut B, select: u8, address: u32, data: &[u8]) -> Result<()> {
    probe(bus, select)?;
    bus.begin_transaction(select);
    bus.write_byte((address >> 8) as u8);
    bus.write_byte(address as u8);
    bus.write_bytes(data);
    let result = bus.end_transaction();
    // the device starts its internal write cycle on the stop condition;
    // nothing may go on the wire until it settles
    bus.delay_ms(WRITE_CYCLE_MS);
    result
}

/// One addressed read transaction. Returns how many bytes arrived;
/// `buf` beyond that count is left unmodified.
fn read_chunk<B: I2cBus>(bus: &mut B, select: u8, address: u32, buf: &mut [u8]) -> Result<usize> {
    probe(bus, select)?;
    bus.begin_transaction(select);
    bus.write_byte((address >> 8) as u8);
    bus.write_byte(address as u8);
    bus.end_transaction()?;
    bus.request_read(select, buf.len())?;

    let mut received = 0;
    while received < buf.len() && bus.bytes_available() > 0 {
        match bus.read_byte() {
            Some(byte) => {
                buf[received] = byte;
                received += 1;
            }
            None => break,
        }
    }
    Ok(received)
}

/// Write `data` starting at `address`, chunk by chunk.
pub(crate) fn write_paged<B: I2cBus>(
    bus: &mut B,
    ctx: &mut DeviceContext,
    mut address: u32,
    data: &[u8],
    policy: NackPolicy,
) -> Result<()> {
    let page_size = ctx.page_size();
    let mut offset = 0usize;

    while offset < data.len() {
        let page_offset = address as usize % page_size;
        let remaining = data.len() - offset;
        let chunk_len = remaining.min(MAX_WRITE_CHUNK).min(page_size - page_offset);

        let select = ctx.select_for(address);
        log::trace!(
            "write chunk: select 0x{:02X} address 0x{:05X} len {}",
            select,
            address,
            chunk_len
        );

        match write_chunk(bus, select, address, &data[offset..offset + chunk_len]) {
            Ok(()) => {}
            Err(e) if policy == NackPolicy::SkipChunk => {
                log::debug!(
                    "dropping {} bytes at 0x{:05X} (select 0x{:02X}): {}",
                    chunk_len,
                    address,
                    select,
                    e
                );
            }
            Err(e) => return Err(e),
        }

        offset += chunk_len;
        address += chunk_len as u32;
    }

    Ok(())
}

/// Read into `buf` starting at `address`, chunk by chunk.
///
/// A chunk that yields fewer bytes than requested leaves the rest of its
/// destination span unmodified; under [`NackPolicy::Abort`] the request
/// then fails with [`Error::PartialTransfer`].
pub(crate) fn read_paged<B: I2cBus>(
    bus: &mut B,
    ctx: &mut DeviceContext,
    mut address: u32,
    buf: &mut [u8],
    policy: NackPolicy,
) -> Result<()> {
    let page_size = ctx.page_size();
    let mut offset = 0usize;

    while offset < buf.len() {
        let page_offset = address as usize % page_size;
        let remaining = buf.len() - offset;
        let chunk_len = remaining.min(MAX_READ_CHUNK).min(page_size - page_offset);

        let select = ctx.select_for(address);
        log::trace!(
            "read chunk: select 0x{:02X} address 0x{:05X} len {}",
            select,
            address,
            chunk_len
        );

        match read_chunk(bus, select, address, &mut buf[offset..offset + chunk_len]) {
            Ok(received) if received == chunk_len => {}
            Ok(received) => {
                if policy == NackPolicy::Abort {
                    return Err(Error::PartialTransfer {
                        expected: buf.len(),
                        transferred: offset + received,
                    });
                }
                log::debug!(
                    "short read at 0x{:05X}: {} of {} bytes",
                    address,
                    received,
                    chunk_len
                );
            }
            Err(e) if policy == NackPolicy::SkipChunk => {
                log::debug!(
                    "skipping {} bytes at 0x{:05X} (select 0x{:02X}): {}",
                    chunk_len,
                    address,
                    select,
                    e
                );
            }
            Err(e) => return Err(e),
        }

        offset += chunk_len;
        address += chunk_len as u32;
    }

    Ok(())
}

/// Read exactly one byte at `address`.
pub(crate) fn read_single<B: I2cBus>(
    bus: &mut B,
    ctx: &mut DeviceContext,
    address: u32,
) -> Result<u8> {
    let select = ctx.select_for(address);
    let mut buf = [0u8; 1];
    match read_chunk(bus, select, address, &mut buf)? {
        0 => Err(Error::PartialTransfer {
            expected: 1,
            transferred: 0,
        }),
        _ => Ok(buf[0]),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use crate::chip::{self, EepromChip};
    use crate::device::Eeprom;
    use std::collections::VecDeque;
    use std::vec;
    use std::vec::Vec;

    /// A mock bus with one simulated EEPROM behind it
    ///
    /// Decodes addressed write transactions into a flat backing store
    /// (folding select extension bits into the logical address) and
    /// records every data transaction for assertions.
    struct SimBus {
        mem: Vec<u8>,
        ext_mask: u8,
        txn: Vec<u8>,
        txn_select: u8,
        latched: u32,
        pending: VecDeque<u8>,
        /// Fail every transaction, as if no device answered
        absent: bool,
        /// Serve at most this many bytes per read request
        read_limit: Option<usize>,
        /// Data write transactions: (select, logical address, length)
        writes: Vec<(u8, u32, usize)>,
        /// Read requests: (select, logical address, length)
        requests: Vec<(u8, u32, usize)>,
        probes: u32,
        delays: Vec<u32>,
    }

    impl SimBus {
        fn for_chip(chip: &EepromChip) -> Self {
            Self {
                mem: vec![0xFF; chip.total_size as usize],
                ext_mask: chip.ext_mask(),
                txn: Vec::new(),
                txn_select: 0,
                latched: 0,
                pending: VecDeque::new(),
                absent: false,
                read_limit: None,
                writes: Vec::new(),
                requests: Vec::new(),
                probes: 0,
                delays: Vec::new(),
            }
        }
    }

    impl I2cBus for SimBus {
        fn begin_transaction(&mut self, select: u8) {
            self.txn.clear();
            self.txn_select = select;
        }

        fn write_byte(&mut self, byte: u8) {
            self.txn.push(byte);
        }

        fn end_transaction(&mut self) -> Result<()> {
            let txn = core::mem::take(&mut self.txn);
            if txn.is_empty() {
                self.probes += 1;
            }
            if self.absent {
                return Err(Error::DeviceAbsent);
            }
            if txn.len() >= 2 {
                let word = u16::from_be_bytes([txn[0], txn[1]]) as u32;
                let segment = (self.txn_select & self.ext_mask) as u32;
                self.latched = (segment << 16) | word;
                let payload = &txn[2..];
                if !payload.is_empty() {
                    self.writes
                        .push((self.txn_select, self.latched, payload.len()));
                    for (i, &byte) in payload.iter().enumerate() {
                        let a = self.latched as usize + i;
                        if a < self.mem.len() {
                            self.mem[a] = byte;
                        }
                    }
                }
            }
            Ok(())
        }

        fn request_read(&mut self, select: u8, len: usize) -> Result<()> {
            self.pending.clear();
            if self.absent {
                return Err(Error::DeviceAbsent);
            }
            self.requests.push((select, self.latched, len));
            let served = self.read_limit.map_or(len, |limit| limit.min(len));
            for i in 0..served {
                let a = self.latched as usize + i;
                self.pending
                    .push_back(self.mem.get(a).copied().unwrap_or(0xFF));
            }
            self.latched += served as u32;
            Ok(())
        }

        fn bytes_available(&self) -> usize {
            self.pending.len()
        }

        fn read_byte(&mut self) -> Option<u8> {
            self.pending.pop_front()
        }

        fn delay_ms(&mut self, ms: u32) {
            self.delays.push(ms);
        }
    }

    fn pattern(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i * 7 + 13) as u8).collect()
    }

    #[test]
    fn write_fills_page_then_whole_pages_then_remainder() {
        let mut eeprom = Eeprom::at24c256(SimBus::for_chip(&chip::AT24C256), 0);
        eeprom.write(50, &pattern(100)).unwrap();

        let bus = eeprom.release();
        let decomposition: Vec<(u32, usize)> = bus.writes.iter().map(|w| (w.1, w.2)).collect();
        // 14 bytes reach the page boundary at 64, one full page follows
        // (capped at 30+30+4 by the transaction limit), then the tail
        assert_eq!(
            decomposition,
            &[(50, 14), (64, 30), (94, 30), (124, 4), (128, 22)]
        );
        assert!(bus.writes.iter().all(|w| w.0 == 0x50));
    }

    #[test]
    fn chunk_invariants_hold_for_assorted_requests() {
        let cases: &[(u32, usize)] = &[
            (0, 1),
            (0, 200),
            (50, 100),
            (31, 33),
            (127, 1),
            (255, 513),
            (1000, 1),
            (4000, 96),
        ];
        for chip in [
            &chip::AT24C32,
            &chip::AT24C256,
            &chip::AT24C512,
            &chip::AT24CM02,
        ] {
            let page = chip.page_size as usize;
            for &(address, len) in cases {
                let mut eeprom = Eeprom::new(SimBus::for_chip(chip), chip, 0);
                eeprom.write(address, &pattern(len)).unwrap();

                let bus = eeprom.release();
                let total: usize = bus.writes.iter().map(|w| w.2).sum();
                assert_eq!(total, len, "{} @{}+{}", chip.name, address, len);

                let mut expected_addr = address;
                for &(_, a, n) in &bus.writes {
                    assert_eq!(a, expected_addr);
                    assert!(n > 0 && n <= MAX_WRITE_CHUNK);
                    assert!(a as usize % page + n <= page, "chunk crosses page");
                    expected_addr += n as u32;
                }
            }
        }
    }

    #[test]
    fn read_chunks_respect_transaction_limit_and_pages() {
        let mut eeprom = Eeprom::at24c512(SimBus::for_chip(&chip::AT24C512), 0);
        let mut buf = vec![0u8; 300];
        eeprom.read(100, &mut buf).unwrap();

        let bus = eeprom.release();
        let total: usize = bus.requests.iter().map(|r| r.2).sum();
        assert_eq!(total, 300);
        // first chunk stops at the page boundary (128), the rest are
        // capped by the transaction limit
        assert_eq!(bus.requests[0], (0x50, 100, 28));
        let mut expected_addr = 128u32;
        for &(_, a, n) in &bus.requests[1..] {
            assert_eq!(a, expected_addr);
            assert!(n <= MAX_READ_CHUNK);
            assert!(a as usize % 128 + n <= 128);
            expected_addr += n as u32;
        }
    }

    #[test]
    fn select_updates_exactly_at_segment_boundary() {
        let mut eeprom = Eeprom::at24cm01(SimBus::for_chip(&chip::AT24CM01), 0);
        eeprom.write(0xFFE0, &pattern(64)).unwrap();

        let bus = eeprom.release();
        assert_eq!(
            bus.writes,
            &[
                (0x50, 0x0FFE0, 30),
                (0x50, 0x0FFFE, 2),
                (0x51, 0x10000, 30),
                (0x51, 0x1001E, 2),
            ]
        );
        // a single switch, at the address that is a multiple of 65536
        let switches = bus.writes.windows(2).filter(|w| w[0].0 != w[1].0).count();
        assert_eq!(switches, 1);
    }

    #[test]
    fn segment_crossing_applies_to_reads_too() {
        let mut eeprom = Eeprom::at24cm02(SimBus::for_chip(&chip::AT24CM02), 0);
        let mut buf = vec![0u8; 40];
        eeprom.read(0x1_FFF0, &mut buf).unwrap();

        let bus = eeprom.release();
        assert_eq!(
            bus.requests,
            &[(0x51, 0x1FFF0, 16), (0x52, 0x20000, 24)]
        );
    }

    #[test]
    fn settle_delay_follows_every_write_chunk() {
        let mut eeprom = Eeprom::at24c256(SimBus::for_chip(&chip::AT24C256), 0);
        eeprom.write(50, &pattern(100)).unwrap();
        eeprom.read_byte(0).unwrap();

        let bus = eeprom.release();
        assert_eq!(bus.delays.len(), bus.writes.len());
        assert!(bus.delays.iter().all(|&ms| ms == WRITE_CYCLE_MS));
    }

    #[test]
    fn absent_device_aborts_strict_write() {
        let mut bus = SimBus::for_chip(&chip::AT24C256);
        bus.absent = true;
        let mut eeprom = Eeprom::at24c256(bus, 0);

        assert_eq!(eeprom.write(0, &pattern(100)), Err(Error::DeviceAbsent));

        let bus = eeprom.release();
        assert!(bus.writes.is_empty());
        assert!(bus.mem.iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn skip_policy_attempts_every_chunk_and_reports_success() {
        let mut bus = SimBus::for_chip(&chip::AT24C256);
        bus.absent = true;
        let mut ctx = DeviceContext::new(&chip::AT24C256, 0);

        let result = write_paged(&mut bus, &mut ctx, 50, &pattern(100), NackPolicy::SkipChunk);
        assert_eq!(result, Ok(()));
        assert!(bus.writes.is_empty());
        assert_eq!(bus.probes, 5);
    }

    #[test]
    fn short_read_aborts_and_leaves_tail_unmodified() {
        let mut bus = SimBus::for_chip(&chip::AT24C256);
        bus.read_limit = Some(10);
        let mut eeprom = Eeprom::at24c256(bus, 0);

        let mut buf = [0xAAu8; 40];
        assert_eq!(
            eeprom.read(0, &mut buf),
            Err(Error::PartialTransfer {
                expected: 40,
                transferred: 10,
            })
        );
        assert!(buf[10..].iter().all(|&b| b == 0xAA));
    }

    #[test]
    fn single_byte_read_distinguishes_absence_from_stored_zero() {
        let mut bus = SimBus::for_chip(&chip::AT24C256);
        bus.mem[7] = 0;
        let mut eeprom = Eeprom::at24c256(bus, 0);
        assert_eq!(eeprom.read_byte(7), Ok(0));

        eeprom.bus().absent = true;
        assert_eq!(eeprom.read_byte(7), Err(Error::DeviceAbsent));
    }
}
