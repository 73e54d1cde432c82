//! at24x-core - Paged transfer core for AT24C-family serial EEPROMs
//!
//! This crate provides the transfer logic for reading and writing
//! AT24C-family serial EEPROMs over a two-wire bus. It is designed to be
//! `no_std` compatible for use in embedded environments.
//!
//! Requests of arbitrary length and offset are fragmented into bus
//! transactions that respect the device's internal page buffer, the bus
//! transaction size limit, and - for the megabit parts - the select-bit
//! address extension that maps logical addresses above 64 KiB onto
//! additional bus select addresses.
//!
//! # Features
//!
//! - `std` - Enable standard library support (includes `alloc`)
//! - `alloc` - Enable heap allocation for conveniences like [`Eeprom::read_vec`]
//!
//! # Example
//!
//! ```ignore
//! use at24x_core::{bus::I2cBus, Eeprom};
//!
//! fn store_calibration<B: I2cBus>(bus: B) {
//!     let mut eeprom = Eeprom::at24c256(bus, 0);
//!     match eeprom.write_f32(0x100, 1.25) {
//!         Ok(()) => {}
//!         Err(e) => log::warn!("calibration not stored: {}", e),
//!     }
//! }
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod bus;
pub mod chip;
pub mod device;
pub mod error;
pub mod legacy;
pub mod scalar;

pub use bus::I2cBus;
pub use chip::EepromChip;
pub use device::Eeprom;
pub use error::{Error, Result};
