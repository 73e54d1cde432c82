//! Device handle and paged transfer engine

mod context;
mod eeprom;
pub(crate) mod transfer;

pub use context::DeviceContext;
pub use eeprom::Eeprom;
pub use transfer::{MAX_READ_CHUNK, MAX_WRITE_CHUNK, WRITE_CYCLE_MS};
