//! Async `no_std` driver for the Bosch BMP280 barometric pressure and temperature sensor.
//!
//! [`Bmp280`] handles identification, calibration and configuration over any [`bus::Bus`], and
//! turns raw conversions into [`Reading`]s. [`poll::Poller`] adds a periodic loop that reports
//! pressure changes above a threshold.
#![cfg_attr(not(test), no_std)]

pub mod bus;
pub mod calibration;
pub mod compensation;
pub mod config;
pub mod error;
pub mod poll;
pub mod register;
pub mod report;

mod bmp280;
#[cfg(test)]
mod testing;

pub use bmp280::{
    BMP280_CHIP_ID, Bmp280, Bmp280I2c, Bmp280Result, Bmp280Spi, FORCED_SETTLE_TIME_US, ResetPolicy,
    SdoPinState,
};
pub use calibration::CalibrationSet;
pub use compensation::{CompensationEngine, CompensationMode, Reading};
pub use error::Bmp280Error;
pub use register::data::RawSample;
