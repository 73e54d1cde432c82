//! Device context - runtime addressing state for one EEPROM

use crate::chip::EepromChip;

/// Runtime state for one EEPROM on the bus
///
/// Holds the model constants plus the select address currently in effect.
/// On the address-extension models the select address changes whenever a
/// transfer touches a different 64 KiB segment, so the engine re-derives
/// it through [`select_for`](Self::select_for) before every chunk.
#[derive(Debug)]
pub struct DeviceContext {
    /// The device model
    pub chip: &'static EepromChip,
    base_select: u8,
    current_select: u8,
}

impl DeviceContext {
    /// Create a context for a device at the given strap index
    pub fn new(chip: &'static EepromChip, index: u8) -> Self {
        let base_select = chip.base_select_address(index);
        Self {
            chip,
            base_select,
            current_select: base_select,
        }
    }

    /// Select address derived from the strap index alone
    pub fn base_select(&self) -> u8 {
        self.base_select
    }

    /// Select address most recently put on the bus
    pub fn current_select(&self) -> u8 {
        self.current_select
    }

    /// Re-derive the select address for `address` and record it as
    /// current.
    ///
    /// On models without address extension this always yields the base
    /// select address.
    pub fn select_for(&mut self, address: u32) -> u8 {
        self.current_select = self.chip.select_address_for(self.base_select, address);
        self.current_select
    }

    /// Get the page size for this device
    pub fn page_size(&self) -> usize {
        self.chip.page_size as usize
    }

    /// Get the total capacity of this device
    pub fn total_size(&self) -> u32 {
        self.chip.total_size
    }

    /// Check if an address range is valid for this device
    pub fn is_valid_range(&self, address: u32, len: usize) -> bool {
        if address >= self.chip.total_size {
            return false;
        }
        // u64 arithmetic to avoid truncation on large len
        let end = address as u64 + len as u64;
        end <= self.chip.total_size as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chip::{AT24C32, AT24CM01};

    #[test]
    fn range_validation() {
        let ctx = DeviceContext::new(&AT24C32, 0);
        assert!(ctx.is_valid_range(0, 4096));
        assert!(ctx.is_valid_range(4095, 1));
        assert!(!ctx.is_valid_range(4095, 2));
        assert!(!ctx.is_valid_range(4096, 0));
        assert!(!ctx.is_valid_range(0, 4097));
    }

    #[test]
    fn select_tracks_segment() {
        let mut ctx = DeviceContext::new(&AT24CM01, 0);
        assert_eq!(ctx.current_select(), 0x50);
        assert_eq!(ctx.select_for(0x1_0000), 0x51);
        assert_eq!(ctx.current_select(), 0x51);
        assert_eq!(ctx.select_for(0x0_8000), 0x50);
        assert_eq!(ctx.current_select(), 0x50);
    }
}
