use crate::calibration::CalibrationSet;
use crate::register::{DecodeError, Readable, Reg};

/// Marker struct for the calib00..calib25 (0x88 - 0xA1) registers.
///
/// The first 24 bytes hold the twelve trimming coefficients, the last two are reserved on BMP280.
///
/// - **Length:** 26 bytes
/// - **Access:** Read-only
pub struct Calibration;
impl Reg for Calibration { const ADDR: u8 = 0x88; }

impl Readable for Calibration {
    type Out = CalibrationSet;

    const N: usize = 26;
    fn decode(b: &[u8]) -> Result<Self::Out, DecodeError> {
        Ok(CalibrationSet::from_bytes(b)?)
    }
}
