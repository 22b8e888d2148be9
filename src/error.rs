//! Errors that can occur when using the BMP280 device.
//!
//! This module provides an error type that encapsulates all possible errors that can occur during communication with BMP280.
//! It is generic over the underlying bus (spi/i2c) error type.
//!
//! Only startup is fatal. Once the driver is constructed, per-sample transport failures are turned into unavailable samples
//! by [`Bmp280::read_raw`](crate::Bmp280::read_raw) and friends instead of being returned as errors.

use core::fmt::{Debug, Display, Formatter};
use crate::calibration::InvalidCalibrationBlock;
use crate::register::DecodeError;

/// This represents all possible errors that can occur when using the BMP280 device.
#[derive(Debug)]
pub enum Bmp280Error<BusError> {
    /// An error has occurred in the SPI / I2C driver
    Bus(BusError),

    /// The identity register did not read back the BMP280 chip id (0x58).
    ///
    /// The device on the bus is something else, possibly a BME280 (0x60) or a BMP180 (0x55).
    UnexpectedDevice { chip_id: u8 },

    /// The calibration block was too short to hold the twelve coefficients.
    InvalidCalibrationBlock { len: usize },

    /// The device did not finish copying its NVM after a soft reset.
    Timeout,
}

impl<BusError> From<DecodeError> for Bmp280Error<BusError> {
    fn from(value: DecodeError) -> Self {
        match value {
            DecodeError::InvalidCalibrationBlock(InvalidCalibrationBlock { len }) => {
                Bmp280Error::InvalidCalibrationBlock { len }
            }
        }
    }
}

impl<BusError: Debug> Display for Bmp280Error<BusError> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Bmp280Error::Bus(e) => write!(f, "bus error: {:?}", e),
            Bmp280Error::UnexpectedDevice { chip_id } => {
                write!(f, "device is not a BMP280 (chip id {:#04x})", chip_id)
            }
            Bmp280Error::InvalidCalibrationBlock { len } => {
                write!(f, "calibration block of {} bytes is too short", len)
            }
            Bmp280Error::Timeout => write!(f, "timed out waiting for the device"),
        }
    }
}

impl<BusError: Debug> core::error::Error for Bmp280Error<BusError> {}
