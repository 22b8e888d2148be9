//! ### ID - Chip identification number (`0xD0`, 1 byte, R)
//!
//! Contains the chip identification code, which is always 0x58 for BMP280.
//! Readable as soon as the device has finished its power-on reset.
//!
//! ### Examples
//! ```rust,no_run
//! # use bmp280_rs::{Bmp280, Bmp280Result};
//! # use bmp280_rs::bus::Bus;
//! # async fn demo<B: Bus>(mut device: Bmp280<B>) -> Bmp280Result<(), B::Error>
//! # where B::Error: core::fmt::Debug {
//! use bmp280_rs::register::chip_id::ChipId;
//!
//! let id = device.read::<ChipId>().await?;
//! assert_eq!(id, 0x58);
//! # Ok(()) }
//! ```
#![doc(alias = "ID")]
use crate::register::{DecodeError, Readable, Reg};

/// Marker struct for the ID (0xD0) register
///
/// - **Length:** 1 byte
/// - **Access:** Read-only
///
/// Used with [`Bmp280::read::<ChipId>()`](crate::Bmp280::read) or [`Bmp280::identify`](crate::Bmp280::identify).
pub struct ChipId;
impl Reg for ChipId { const ADDR: u8 = 0xD0; }

impl Readable for ChipId {
    type Out = u8;
    fn decode(b: &[u8]) -> Result<Self::Out, DecodeError> {
        Ok(b[0])
    }
}
