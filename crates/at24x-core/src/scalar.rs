//! Typed scalar storage
//!
//! Fixed-width numeric values are stored in a canonical little-endian
//! encoding, so a value written on one host reads back identically on
//! any other. The accessors are a thin layer over the byte transfer
//! engine; each value occupies exactly its encoded width starting at the
//! given address.

use crate::bus::I2cBus;
use crate::device::Eeprom;
use crate::error::Result;

mod sealed {
    pub trait Sealed {}
}

/// A fixed-width value with a little-endian byte encoding
///
/// Implemented for `u16`, `u32`, `u64`, `f32` and `f64`; the trait is
/// sealed.
pub trait Scalar: sealed::Sealed + Copy {
    /// Encoded width in bytes
    const WIDTH: usize;

    /// Encode into the first [`WIDTH`](Self::WIDTH) bytes of `buf`
    fn encode(self, buf: &mut [u8]);

    /// Decode from the first [`WIDTH`](Self::WIDTH) bytes of `buf`
    fn decode(buf: &[u8]) -> Self;
}

macro_rules! impl_scalar {
    ($ty:ty) => {
        impl sealed::Sealed for $ty {}

        impl Scalar for $ty {
            const WIDTH: usize = core::mem::size_of::<$ty>();

            fn encode(self, buf: &mut [u8]) {
                buf[..Self::WIDTH].copy_from_slice(&self.to_le_bytes());
            }

            fn decode(buf: &[u8]) -> Self {
                let mut raw = [0u8; core::mem::size_of::<$ty>()];
                raw.copy_from_slice(&buf[..Self::WIDTH]);
                Self::from_le_bytes(raw)
            }
        }
    };
}

impl_scalar!(u16);
impl_scalar!(u32);
impl_scalar!(u64);
impl_scalar!(f32);
impl_scalar!(f64);

impl<B: I2cBus> Eeprom<B> {
    /// Write any [`Scalar`] at `address`
    pub fn write_scalar<T: Scalar>(&mut self, address: u32, value: T) -> Result<()> {
        let mut buf = [0u8; 8];
        value.encode(&mut buf);
        self.write(address, &buf[..T::WIDTH])
    }

    /// Read any [`Scalar`] from `address`
    pub fn read_scalar<T: Scalar>(&mut self, address: u32) -> Result<T> {
        let mut buf = [0u8; 8];
        self.read(address, &mut buf[..T::WIDTH])?;
        Ok(T::decode(&buf))
    }

    /// Write a `u16` at `address`
    pub fn write_u16(&mut self, address: u32, value: u16) -> Result<()> {
        self.write_scalar(address, value)
    }

    /// Write a `u32` at `address`
    pub fn write_u32(&mut self, address: u32, value: u32) -> Result<()> {
        self.write_scalar(address, value)
    }

    /// Write a `u64` at `address`
    pub fn write_u64(&mut self, address: u32, value: u64) -> Result<()> {
        self.write_scalar(address, value)
    }

    /// Write an `f32` at `address`
    pub fn write_f32(&mut self, address: u32, value: f32) -> Result<()> {
        self.write_scalar(address, value)
    }

    /// Write an `f64` at `address`
    pub fn write_f64(&mut self, address: u32, value: f64) -> Result<()> {
        self.write_scalar(address, value)
    }

    /// Read a `u16` from `address`
    pub fn read_u16(&mut self, address: u32) -> Result<u16> {
        self.read_scalar(address)
    }

    /// Read a `u32` from `address`
    pub fn read_u32(&mut self, address: u32) -> Result<u32> {
        self.read_scalar(address)
    }

    /// Read a `u64` from `address`
    pub fn read_u64(&mut self, address: u32) -> Result<u64> {
        self.read_scalar(address)
    }

    /// Read an `f32` from `address`
    pub fn read_f32(&mut self, address: u32) -> Result<f32> {
        self.read_scalar(address)
    }

    /// Read an `f64` from `address`
    pub fn read_f64(&mut self, address: u32) -> Result<f64> {
        self.read_scalar(address)
    }

    /// Write a raw character span at `address`.
    ///
    /// No terminator is stored; the caller owns the length convention.
    pub fn write_chars(&mut self, address: u32, data: &[u8]) -> Result<()> {
        self.write(address, data)
    }

    /// Read a raw character span from `address` into `buf`.
    pub fn read_chars(&mut self, address: u32, buf: &mut [u8]) -> Result<()> {
        self.read(address, buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_is_little_endian_fixed_width() {
        let mut buf = [0u8; 8];
        0xA1B2_C3D4u32.encode(&mut buf);
        assert_eq!(&buf[..4], &[0xD4, 0xC3, 0xB2, 0xA1]);

        0x1122u16.encode(&mut buf);
        assert_eq!(&buf[..2], &[0x22, 0x11]);
    }

    #[test]
    fn float_codec_is_bit_exact() {
        let mut buf = [0u8; 8];
        let value = core::f32::consts::PI;
        value.encode(&mut buf);
        assert_eq!(f32::decode(&buf).to_bits(), value.to_bits());

        let value = -0.0f64;
        value.encode(&mut buf);
        assert_eq!(f64::decode(&buf).to_bits(), value.to_bits());
    }
}
