//! ### CONFIG - Rate, filter and interface options (`0xF5`, 1 byte, R/W)
//!
//! | bits | field    |
//! |------|----------|
//! | 7..5 | t_sb     |
//! | 4..2 | filter   |
//! | 0    | spi3w_en |
//!
//! Writes to this register may be ignored while the device is in normal mode, so the driver
//! writes it before switching modes.
//!
//! ### Examples
//! ```rust,no_run
//! # use bmp280_rs::{Bmp280, Bmp280Result};
//! # use bmp280_rs::bus::Bus;
//! # async fn demo<B: Bus>(mut device: Bmp280<B>) -> Bmp280Result<(), B::Error>
//! # where B::Error: core::fmt::Debug {
//! use bmp280_rs::register::config::{Config, ConfigFields, IIRFilterCoefficient, StandbyTime};
//!
//! device.write::<Config>(&ConfigFields {
//!     standby: StandbyTime::Ms0_5,
//!     iir_filter: IIRFilterCoefficient::Coef2,
//!     spi3w_en: false,
//! }).await?;
//! # Ok(()) }
//! ```

use crate::register::{DecodeError, Readable, Reg, Writable};

/// Marker type for CONFIG (0xF5) register
pub struct Config;
impl Reg for Config { const ADDR: u8 = 0xF5; }

/// The payload for the CONFIG (0xF5) register.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConfigFields {
    /// Inactive duration between two conversions in normal mode.
    pub standby: StandbyTime,
    /// The IIR filter coefficient.
    pub iir_filter: IIRFilterCoefficient,
    /// Enables the 3-wire SPI interface.
    pub spi3w_en: bool,
}

impl Readable for Config {
    type Out = ConfigFields;

    fn decode(b: &[u8]) -> Result<Self::Out, DecodeError> {
        Ok(ConfigFields {
            standby: StandbyTime::from((b[0] >> 5) & 0b111),
            iir_filter: IIRFilterCoefficient::from((b[0] >> 2) & 0b111),
            spi3w_en: b[0] & 0b1 != 0,
        })
    }
}

impl Writable for Config {
    type In = ConfigFields;

    fn encode(v: &Self::In, out: &mut [u8]) {
        let standby: u8 = v.standby.into();
        let iir_filter: u8 = v.iir_filter.into();
        out[0] = (standby << 5) | (iir_filter << 2) | v.spi3w_en as u8;
    }
}

/// This enum holds all configurable IIR filter coefficients.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IIRFilterCoefficient {
    /// Filter off
    Off,
    Coef2,
    Coef4,
    Coef8,
    Coef16,
}

impl From<IIRFilterCoefficient> for u8 {
    fn from(value: IIRFilterCoefficient) -> Self {
        match value {
            IIRFilterCoefficient::Off => 0b000,
            IIRFilterCoefficient::Coef2 => 0b001,
            IIRFilterCoefficient::Coef4 => 0b010,
            IIRFilterCoefficient::Coef8 => 0b011,
            IIRFilterCoefficient::Coef16 => 0b100,
        }
    }
}

impl From<u8> for IIRFilterCoefficient {
    fn from(field: u8) -> Self {
        match field {
            0b000 => IIRFilterCoefficient::Off,
            0b001 => IIRFilterCoefficient::Coef2,
            0b010 => IIRFilterCoefficient::Coef4,
            0b011 => IIRFilterCoefficient::Coef8,
            _ => IIRFilterCoefficient::Coef16,
        }
    }
}

/// Standby duration between conversions in normal mode.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StandbyTime {
    Ms0_5,
    Ms62_5,
    Ms125,
    Ms250,
    Ms500,
    Ms1000,
    Ms2000,
    Ms4000,
}

impl StandbyTime {
    /// Standby duration in microseconds.
    pub fn as_micros(&self) -> u32 {
        match self {
            StandbyTime::Ms0_5 => 500,
            StandbyTime::Ms62_5 => 62_500,
            StandbyTime::Ms125 => 125_000,
            StandbyTime::Ms250 => 250_000,
            StandbyTime::Ms500 => 500_000,
            StandbyTime::Ms1000 => 1_000_000,
            StandbyTime::Ms2000 => 2_000_000,
            StandbyTime::Ms4000 => 4_000_000,
        }
    }
}

impl From<StandbyTime> for u8 {
    fn from(value: StandbyTime) -> Self {
        match value {
            StandbyTime::Ms0_5 => 0b000,
            StandbyTime::Ms62_5 => 0b001,
            StandbyTime::Ms125 => 0b010,
            StandbyTime::Ms250 => 0b011,
            StandbyTime::Ms500 => 0b100,
            StandbyTime::Ms1000 => 0b101,
            StandbyTime::Ms2000 => 0b110,
            StandbyTime::Ms4000 => 0b111,
        }
    }
}

impl From<u8> for StandbyTime {
    fn from(field: u8) -> Self {
        match field {
            0b000 => StandbyTime::Ms0_5,
            0b001 => StandbyTime::Ms62_5,
            0b010 => StandbyTime::Ms125,
            0b011 => StandbyTime::Ms250,
            0b100 => StandbyTime::Ms500,
            0b101 => StandbyTime::Ms1000,
            0b110 => StandbyTime::Ms2000,
            _ => StandbyTime::Ms4000,
        }
    }
}
