use crate::register::{DecodeError, Readable, Reg};

/// Marker struct for the PRESS_MSB..TEMP_XLSB (0xF7 - 0xFC) registers.
/// The BMP280 auto-increments on multiple reads, so reading 6 bytes from 0xF7 reads pressure and
/// temperature in one burst. Burst reads are guaranteed to come from the same conversion, which is
/// not the case for separate reads.
/// Note that this returns the raw uncompensated ADC codes. For most use cases
/// [`Bmp280::read_measurement()`](crate::Bmp280::read_measurement) is recommended as it compensates the data for you.
///
/// - **Length:** 6 bytes
/// - **Access:** Read-only
pub struct Data;
impl Reg for Data { const ADDR: u8 = 0xF7; }

/// Marker struct for the PRESS_MSB..PRESS_XLSB (0xF7 - 0xF9) registers only.
///
/// - **Length:** 3 bytes
/// - **Access:** Read-only
pub struct Pressure;
impl Reg for Pressure { const ADDR: u8 = 0xF7; }

/// A pair of raw 20-bit ADC codes from one conversion.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawSample {
    pub adc_temperature: u32,
    pub adc_pressure: u32,
}

impl RawSample {
    pub fn new(adc_temperature: u32, adc_pressure: u32) -> Self {
        Self { adc_temperature, adc_pressure }
    }
}

/// Reassembles MSB, LSB and XLSB into a 20-bit code. The low nibble of XLSB carries no data at
/// x1 oversampling and is dropped.
pub(crate) fn adc_code(b: &[u8]) -> u32 {
    (((b[0] as u32) << 16) | ((b[1] as u32) << 8) | b[2] as u32) >> 4
}

impl Readable for Data {
    type Out = RawSample;

    const N: usize = 6;

    fn decode(b: &[u8]) -> Result<Self::Out, DecodeError> {
        Ok(RawSample {
            adc_pressure: adc_code(&b[0..3]),
            adc_temperature: adc_code(&b[3..6]),
        })
    }
}

impl Readable for Pressure {
    type Out = u32;

    const N: usize = 3;

    fn decode(b: &[u8]) -> Result<Self::Out, DecodeError> {
        Ok(adc_code(b))
    }
}
