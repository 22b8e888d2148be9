//! Factory trimming coefficients.
//!
//! The BMP280 stores twelve 16-bit little-endian words in NVM: `dig_T1..dig_T3` for temperature and
//! `dig_P1..dig_P9` for pressure. `dig_T1` and `dig_P1` are unsigned, the rest are two's complement.
//! They are copied to the image registers at power-on and never change afterwards, so the driver
//! reads them once and keeps them for its whole lifetime.

/// Number of bytes holding coefficients. The calibration block read from the device is longer.
pub const CALIBRATION_WORDS_LEN: usize = 24;

/// The calibration block was too short to hold all twelve coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidCalibrationBlock {
    pub len: usize,
}

/// Decoded calibration coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationSet {
    pub t1: u16,
    pub t2: i16,
    pub t3: i16,
    pub p1: u16,
    pub p2: i16,
    pub p3: i16,
    pub p4: i16,
    pub p5: i16,
    pub p6: i16,
    pub p7: i16,
    pub p8: i16,
    pub p9: i16,
}

impl CalibrationSet {
    /// Decodes the coefficients from a raw calibration block starting at `calib00` (0x88).
    ///
    /// Bytes past the first 24 are ignored.
    pub fn from_bytes(b: &[u8]) -> Result<Self, InvalidCalibrationBlock> {
        if b.len() < CALIBRATION_WORDS_LEN {
            return Err(InvalidCalibrationBlock { len: b.len() });
        }

        Ok(Self {
            t1: unsigned_word(b[0], b[1]),
            t2: signed_word(b[2], b[3]),
            t3: signed_word(b[4], b[5]),
            p1: unsigned_word(b[6], b[7]),
            p2: signed_word(b[8], b[9]),
            p3: signed_word(b[10], b[11]),
            p4: signed_word(b[12], b[13]),
            p5: signed_word(b[14], b[15]),
            p6: signed_word(b[16], b[17]),
            p7: signed_word(b[18], b[19]),
            p8: signed_word(b[20], b[21]),
            p9: signed_word(b[22], b[23]),
        })
    }

    /// A coefficient set that can be fed to the compensation formulas.
    ///
    /// `dig_P1` is the pressure divisor; an all-zero or unprogrammed block leaves it at zero.
    pub fn is_usable(&self) -> bool {
        self.p1 != 0
    }
}

#[inline]
fn unsigned_word(lsb: u8, msb: u8) -> u16 {
    u16::from_le_bytes([lsb, msb])
}

/// `lsb | msb << 8`, minus 65536 when bit 15 is set.
#[inline]
pub fn signed_word(lsb: u8, msb: u8) -> i16 {
    i16::from_le_bytes([lsb, msb])
}
