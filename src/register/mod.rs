//! Typed catalog of the BMP280 registers used by this driver.
//!
//! Every register (or fixed-length register block) is a marker struct implementing [`Reg`] and
//! [`Readable`] and/or [`Writable`]. The marker carries the address and transfer length, the
//! associated types carry the decoded/encoded payload.
pub mod calibration;
pub mod chip_id;
pub mod config;
pub mod ctrl_meas;
pub mod data;
pub mod reset;
pub mod status;

use crate::calibration::InvalidCalibrationBlock;

/// Reasons a block of register bytes could not be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    InvalidCalibrationBlock(InvalidCalibrationBlock),
}

impl From<InvalidCalibrationBlock> for DecodeError {
    fn from(value: InvalidCalibrationBlock) -> Self {
        DecodeError::InvalidCalibrationBlock(value)
    }
}

pub trait Reg { const ADDR: u8; }

pub trait Readable: Reg {
    type Out;
    const N: usize = 1;
    fn decode(b: &[u8]) -> Result<Self::Out, DecodeError>;
}

pub trait Writable: Reg {
    type In;
    const N: usize = 1;
    fn encode(v: &Self::In, out: &mut [u8]);
}
