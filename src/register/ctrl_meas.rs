//! ### CTRL_MEAS - Measurement control (`0xF4`, 1 byte, R/W)
//!
//! Selects temperature and pressure oversampling and the power mode.
//!
//! | bits | field  |
//! |------|--------|
//! | 7..5 | osrs_t |
//! | 4..2 | osrs_p |
//! | 1..0 | mode   |
//!
//! Writing this register in [`PowerMode::Forced`] starts exactly one conversion, after which the
//! device returns to [`PowerMode::Sleep`] on its own.
use crate::register::{DecodeError, Readable, Reg, Writable};

pub struct CtrlMeas;
impl Reg for CtrlMeas { const ADDR: u8 = 0xF4; }

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CtrlMeasCfg {
    pub osrs_t: Oversampling,
    pub osrs_p: Oversampling,
    pub mode: PowerMode,
}

impl Readable for CtrlMeas {
    type Out = CtrlMeasCfg;

    fn decode(b: &[u8]) -> Result<Self::Out, DecodeError> {
        Ok(CtrlMeasCfg {
            osrs_t: Oversampling::from((b[0] >> 5) & 0b111),
            osrs_p: Oversampling::from((b[0] >> 2) & 0b111),
            mode: PowerMode::from(b[0] & 0b11),
        })
    }
}

impl Writable for CtrlMeas {
    type In = CtrlMeasCfg;

    fn encode(v: &Self::In, out: &mut [u8]) {
        let osrs_t: u8 = v.osrs_t.into();
        let osrs_p: u8 = v.osrs_p.into();
        let mode: u8 = v.mode.into();
        out[0] = (osrs_t << 5) | (osrs_p << 2) | mode;
    }
}

/// Oversampling setting for one of the two measurement channels.
///
/// Each step doubles the number of conversions averaged into one sample; [`Oversampling::Skipped`]
/// disables the channel and leaves its data register at `0x80000`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Oversampling {
    Skipped,
    X1,
    X2,
    X4,
    X8,
    X16,
}

impl Oversampling {
    /// Number of conversions averaged per sample.
    pub fn multiplier(&self) -> u32 {
        match self {
            Oversampling::Skipped => 0,
            Oversampling::X1 => 1,
            Oversampling::X2 => 2,
            Oversampling::X4 => 4,
            Oversampling::X8 => 8,
            Oversampling::X16 => 16,
        }
    }
}

impl From<u8> for Oversampling {
    fn from(field: u8) -> Self {
        match field {
            0b000 => Oversampling::Skipped,
            0b001 => Oversampling::X1,
            0b010 => Oversampling::X2,
            0b011 => Oversampling::X4,
            0b100 => Oversampling::X8,
            // 0b101 and above all select x16
            _ => Oversampling::X16,
        }
    }
}

impl From<Oversampling> for u8 {
    fn from(value: Oversampling) -> Self {
        match value {
            Oversampling::Skipped => 0b000,
            Oversampling::X1 => 0b001,
            Oversampling::X2 => 0b010,
            Oversampling::X4 => 0b011,
            Oversampling::X8 => 0b100,
            Oversampling::X16 => 0b101,
        }
    }
}

/// Describes the different power modes that can be set in the CTRL_MEAS register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerMode {
    /// Sleep mode. This is the default mode after power on reset.
    Sleep,
    /// Forced mode. A single measurement is performed after which the device returns to Sleep mode.
    Forced,
    /// Normal mode. Measurements are performed continuously, separated by the configured standby time.
    Normal,
}

impl From<u8> for PowerMode {
    fn from(field: u8) -> Self {
        match field {
            0b00 => PowerMode::Sleep,
            0b01 | 0b10 => PowerMode::Forced,
            _ => PowerMode::Normal,
        }
    }
}

impl From<PowerMode> for u8 {
    fn from(value: PowerMode) -> Self {
        match value {
            PowerMode::Sleep => 0b00,
            PowerMode::Forced => 0b01,
            PowerMode::Normal => 0b11,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_meas_decode() {
        let reg = CtrlMeas::decode(&[0x27]).unwrap();
        assert_eq!(Oversampling::X1, reg.osrs_t);
        assert_eq!(Oversampling::X1, reg.osrs_p);
        assert_eq!(PowerMode::Normal, reg.mode);

        let reg = CtrlMeas::decode(&[0b0100_1101]).unwrap();
        assert_eq!(Oversampling::X2, reg.osrs_t);
        assert_eq!(Oversampling::X4, reg.osrs_p);
        assert_eq!(PowerMode::Forced, reg.mode);

        let reg = CtrlMeas::decode(&[0b1111_1100]).unwrap();
        assert_eq!(Oversampling::X16, reg.osrs_t);
        assert_eq!(Oversampling::X16, reg.osrs_p);
        assert_eq!(PowerMode::Sleep, reg.mode);

        let reg = CtrlMeas::decode(&[0b1101_1010]).unwrap();
        assert_eq!(Oversampling::X16, reg.osrs_t);
        assert_eq!(Oversampling::X16, reg.osrs_p);
        assert_eq!(PowerMode::Forced, reg.mode);
    }

    #[test]
    fn ctrl_meas_encode() {
        let mut buffer = [0u8; 1];
        CtrlMeas::encode(&CtrlMeasCfg {
            osrs_t: Oversampling::X1,
            osrs_p: Oversampling::X1,
            mode: PowerMode::Normal,
        }, &mut buffer);
        assert_eq!([0x27], buffer);

        CtrlMeas::encode(&CtrlMeasCfg {
            osrs_t: Oversampling::X1,
            osrs_p: Oversampling::X1,
            mode: PowerMode::Forced,
        }, &mut buffer);
        assert_eq!([0x25], buffer);

        CtrlMeas::encode(&CtrlMeasCfg {
            osrs_t: Oversampling::X2,
            osrs_p: Oversampling::X16,
            mode: PowerMode::Sleep,
        }, &mut buffer);
        assert_eq!([0b0101_0100], buffer);
    }
}
