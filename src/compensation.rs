//! Conversion of raw ADC codes into temperature and pressure.
//!
//! Two formulas are available, selected by [`CompensationMode`]:
//!
//! - [`CompensationMode::FloatingPoint`] is the double precision formula from the datasheet
//!   (section 8.1). Temperature is compensated first and its `t_fine` intermediate feeds the
//!   pressure polynomial. This is the default.
//! - [`CompensationMode::ReducedFixedPoint`] uses integer arithmetic only. Temperature follows the
//!   datasheet's 32-bit integer formula, but pressure uses a reduced polynomial that never looks at
//!   `t_fine`. It is **less accurate**: the further the die temperature is from the calibration
//!   reference, the further its pressure drifts from the floating point result. It only exists for
//!   targets that cannot afford floating point and for pressure-only reads where no temperature is
//!   sampled.
//!
//! All functions here are pure. The same inputs always give bit-identical outputs.
use crate::calibration::CalibrationSet;
use crate::register::data::RawSample;

/// Selects which compensation formula is applied to raw samples.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CompensationMode {
    /// Full precision floating point formula.
    #[default]
    FloatingPoint,
    /// Integer-only formula without the temperature cross-term in the pressure path.
    ///
    /// Numerically inferior to [`CompensationMode::FloatingPoint`].
    ReducedFixedPoint,
}

/// A compensated temperature and pressure pair.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    pub temperature_celsius: f64,
    pub pressure_hpa: f64,
}

impl Reading {
    pub fn new(temperature_celsius: f64, pressure_hpa: f64) -> Self {
        Self { temperature_celsius, pressure_hpa }
    }

    pub fn pressure_pa(&self) -> f64 {
        self.pressure_hpa * 100.0
    }
}

#[cfg(feature = "uom")]
impl Reading {
    pub fn pressure_uom(&self) -> uom::si::f64::Pressure {
        uom::si::f64::Pressure::new::<uom::si::pressure::hectopascal>(self.pressure_hpa)
    }

    pub fn temperature_uom(&self) -> uom::si::f64::ThermodynamicTemperature {
        uom::si::f64::ThermodynamicTemperature::new::<uom::si::thermodynamic_temperature::degree_celsius>(
            self.temperature_celsius,
        )
    }
}

/// Applies one of the compensation formulas using a fixed set of calibration coefficients.
#[derive(Copy, Clone, Debug)]
pub struct CompensationEngine {
    calibration: CalibrationSet,
    mode: CompensationMode,
}

impl CompensationEngine {
    pub fn new(calibration: CalibrationSet, mode: CompensationMode) -> Self {
        Self { calibration, mode }
    }

    pub fn calibration(&self) -> &CalibrationSet {
        &self.calibration
    }

    pub fn mode(&self) -> CompensationMode {
        self.mode
    }

    /// Compensates a raw sample with the configured formula.
    ///
    /// Returns [`None`] when the sample is unavailable or when the calibration cannot be used
    /// (`dig_P1` is zero), without touching any arithmetic.
    pub fn compensate(&self, sample: Option<RawSample>) -> Option<Reading> {
        let sample = match sample {
            Some(sample) => sample,
            None => return None,
        };

        if !self.calibration.is_usable() {
            log::warn!("dig_P1 is zero, refusing to compensate");
            return None;
        }

        let reading = match self.mode {
            CompensationMode::FloatingPoint => {
                let (temperature, t_fine) = temperature_f64(&self.calibration, sample.adc_temperature);
                let pressure = pressure_f64(&self.calibration, sample.adc_pressure, t_fine);
                Reading::new(temperature, pressure / 100.0)
            }
            CompensationMode::ReducedFixedPoint => {
                let (centi_celsius, _) = temperature_fixed(&self.calibration, sample.adc_temperature);
                let pressure = pressure_reduced_fixed(&self.calibration, sample.adc_pressure);
                Reading::new(centi_celsius as f64 / 100.0, pressure as f64 / 100.0)
            }
        };

        Some(reading)
    }

    /// Compensates a pressure-only sample, in hPa.
    ///
    /// Without a temperature sample there is no `t_fine`, so this always uses the reduced fixed
    /// point formula regardless of the configured mode.
    pub fn compensate_pressure_only(&self, adc_pressure: Option<u32>) -> Option<f64> {
        let adc_pressure = match adc_pressure {
            Some(adc_pressure) => adc_pressure,
            None => return None,
        };

        if !self.calibration.is_usable() {
            log::warn!("dig_P1 is zero, refusing to compensate");
            return None;
        }

        Some(pressure_reduced_fixed(&self.calibration, adc_pressure) as f64 / 100.0)
    }
}

/// Floating point temperature compensation.
///
/// Returns the temperature in °C and `t_fine`, which [`pressure_f64`] needs.
pub fn temperature_f64(cal: &CalibrationSet, adc_t: u32) -> (f64, f64) {
    let adc_t = adc_t as f64;
    let t1 = cal.t1 as f64;

    let var1 = (adc_t / 16384.0 - t1 / 1024.0) * cal.t2 as f64;
    let d = adc_t / 131072.0 - t1 / 8192.0;
    let var2 = (d * d) * cal.t3 as f64;
    let t_fine = var1 + var2;

    (t_fine / 5120.0, t_fine)
}

/// Floating point pressure compensation, in Pa.
///
/// Returns 0 instead of dividing by zero when the scaled `dig_P1` term vanishes.
pub fn pressure_f64(cal: &CalibrationSet, adc_p: u32, t_fine: f64) -> f64 {
    let mut var1 = t_fine / 2.0 - 64000.0;
    let mut var2 = var1 * var1 * cal.p6 as f64 / 32768.0;
    var2 += var1 * cal.p5 as f64 * 2.0;
    var2 = var2 / 4.0 + cal.p4 as f64 * 65536.0;
    var1 = (cal.p3 as f64 * var1 * var1 / 524288.0 + cal.p2 as f64 * var1) / 524288.0;
    var1 = (1.0 + var1 / 32768.0) * cal.p1 as f64;

    if var1 == 0.0 {
        return 0.0;
    }

    let mut pressure = 1048576.0 - adc_p as f64;
    pressure = (pressure - var2 / 4096.0) * 6250.0 / var1;
    let var1 = cal.p9 as f64 * pressure * pressure / 2147483648.0;
    let var2 = pressure * cal.p8 as f64 / 32768.0;

    pressure + (var1 + var2 + cal.p7 as f64) / 16.0
}

/// Integer temperature compensation.
///
/// Returns the temperature in hundredths of a degree (2508 is 25.08 °C) and the integer `t_fine`.
pub fn temperature_fixed(cal: &CalibrationSet, adc_t: u32) -> (i32, i32) {
    let adc_t = adc_t as i64;
    let t1 = cal.t1 as i64;

    let var1 = (((adc_t >> 3) - (t1 << 1)) * cal.t2 as i64) >> 11;
    let d = (adc_t >> 4) - t1;
    let var2 = (((d * d) >> 12) * cal.t3 as i64) >> 14;
    let t_fine = var1 + var2;

    (((t_fine * 5 + 128) >> 8) as i32, t_fine as i32)
}

/// Reduced integer pressure compensation, in Pa.
///
/// This polynomial has no `t_fine` term, so it ignores the die temperature entirely and only
/// agrees with [`pressure_f64`] in magnitude near the calibration reference point, if at all.
/// Returns 0 when the offset term vanishes.
pub fn pressure_reduced_fixed(cal: &CalibrationSet, adc_p: u32) -> i64 {
    let adc_p = adc_p as i64;
    let p1 = cal.p1 as i64;

    let var1 = (((adc_p >> 3) - (p1 << 1)) * cal.p2 as i64) >> 11;
    let d = (adc_p >> 4) - p1;
    let var2 = (((d * d) >> 12) * cal.p3 as i64) >> 14;
    let var1 = var1 + var2 + cal.p4 as i64;

    if var1 == 0 {
        return 0;
    }

    let true_pressure = (((1048576 - adc_p) - (var2 >> 12)) * 3125) << 1;

    true_pressure >> 8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::tests::DATASHEET_BLOCK;

    const ADC_T: u32 = 519888;
    const ADC_P: u32 = 415148;

    fn datasheet_calibration() -> CalibrationSet {
        CalibrationSet::from_bytes(&DATASHEET_BLOCK).unwrap()
    }

    #[test]
    fn floating_point_datasheet_example() {
        let engine = CompensationEngine::new(datasheet_calibration(), CompensationMode::FloatingPoint);

        let reading = engine.compensate(Some(RawSample::new(ADC_T, ADC_P))).unwrap();
        assert!((reading.temperature_celsius - 25.0825).abs() < 0.001, "{:?}", reading);
        assert!((reading.pressure_hpa - 1006.5327).abs() < 0.001, "{:?}", reading);
        assert!((reading.pressure_pa() - 100653.27).abs() < 0.1);
    }

    #[test]
    fn floating_point_without_t_fine() {
        let cal = CalibrationSet {
            t1: 0, t2: 0, t3: 0,
            p1: 36477, p2: 0, p3: 0, p4: 2855, p5: 0, p6: 0, p7: 15500, p8: 0, p9: 0,
        };

        let (temperature, t_fine) = temperature_f64(&cal, ADC_T);
        assert_eq!(0.0, temperature);
        assert_eq!(0.0, t_fine);

        // var1 collapses to dig_P1, leaving only the dig_P4 offset and the dig_P7 term.
        let offset = 2855.0 * 65536.0;
        let expected = ((1048576.0 - ADC_P as f64) - offset / 4096.0) * 6250.0 / 36477.0
            + 15500.0 / 16.0;

        let pressure = pressure_f64(&cal, ADC_P, t_fine);
        assert!((pressure - expected).abs() < 1e-6);
        assert!((pressure / 100.0 - 1016.7399).abs() < 0.001);
    }

    #[test]
    fn floating_point_zero_divisor() {
        let mut cal = datasheet_calibration();
        cal.p1 = 0;

        assert_eq!(0.0, pressure_f64(&cal, ADC_P, 128422.0));
    }

    #[test]
    fn unusable_calibration_is_not_compensated() {
        let mut cal = datasheet_calibration();
        cal.p1 = 0;

        for mode in [CompensationMode::FloatingPoint, CompensationMode::ReducedFixedPoint] {
            let engine = CompensationEngine::new(cal, mode);
            assert_eq!(None, engine.compensate(Some(RawSample::new(ADC_T, ADC_P))));
            assert_eq!(None, engine.compensate_pressure_only(Some(ADC_P)));
        }
    }

    #[test]
    fn unavailable_sample_gives_unavailable_reading() {
        for mode in [CompensationMode::FloatingPoint, CompensationMode::ReducedFixedPoint] {
            let engine = CompensationEngine::new(datasheet_calibration(), mode);
            assert_eq!(None, engine.compensate(None));
            assert_eq!(None, engine.compensate_pressure_only(None));
        }
    }

    #[test]
    fn compensation_is_idempotent() {
        for mode in [CompensationMode::FloatingPoint, CompensationMode::ReducedFixedPoint] {
            let engine = CompensationEngine::new(datasheet_calibration(), mode);
            let first = engine.compensate(Some(RawSample::new(ADC_T, ADC_P))).unwrap();
            let second = engine.compensate(Some(RawSample::new(ADC_T, ADC_P))).unwrap();

            assert_eq!(first.temperature_celsius.to_bits(), second.temperature_celsius.to_bits());
            assert_eq!(first.pressure_hpa.to_bits(), second.pressure_hpa.to_bits());
        }
    }

    #[test]
    fn fixed_point_temperature_datasheet_example() {
        let (centi_celsius, t_fine) = temperature_fixed(&datasheet_calibration(), ADC_T);
        assert_eq!(2508, centi_celsius);
        assert_eq!(128422, t_fine);
    }

    #[test]
    fn reduced_fixed_point_pressure() {
        assert_eq!(15464526, pressure_reduced_fixed(&datasheet_calibration(), ADC_P));
    }

    #[test]
    fn reduced_fixed_point_zero_offset() {
        let cal = CalibrationSet {
            t1: 0, t2: 0, t3: 0,
            p1: 1, p2: 0, p3: 0, p4: 0, p5: 0, p6: 0, p7: 0, p8: 0, p9: 0,
        };
        // adc_p >> 4 == dig_P1 zeroes var2, dig_P2 == 0 zeroes var1.
        assert_eq!(0, pressure_reduced_fixed(&cal, 0x10));
    }

    #[test]
    fn reduced_mode_diverges_when_t_fine_matters() {
        let cal = datasheet_calibration();
        let (_, t_fine) = temperature_f64(&cal, ADC_T);
        assert!(t_fine.abs() > 1000.0);

        let full = CompensationEngine::new(cal, CompensationMode::FloatingPoint)
            .compensate(Some(RawSample::new(ADC_T, ADC_P)))
            .unwrap();
        let reduced = CompensationEngine::new(cal, CompensationMode::ReducedFixedPoint)
            .compensate(Some(RawSample::new(ADC_T, ADC_P)))
            .unwrap();

        assert!((full.temperature_celsius - reduced.temperature_celsius).abs() < 0.01);
        assert!((full.pressure_hpa - reduced.pressure_hpa).abs() > 1.0);
    }

    #[test]
    fn reduced_mode_ignores_temperature() {
        let engine = CompensationEngine::new(datasheet_calibration(), CompensationMode::ReducedFixedPoint);

        let cold = engine.compensate(Some(RawSample::new(400000, ADC_P))).unwrap();
        let warm = engine.compensate(Some(RawSample::new(600000, ADC_P))).unwrap();

        assert_ne!(cold.temperature_celsius, warm.temperature_celsius);
        assert_eq!(cold.pressure_hpa, warm.pressure_hpa);
        assert_eq!(Some(cold.pressure_hpa), engine.compensate_pressure_only(Some(ADC_P)));
    }

    #[test]
    fn floating_point_is_the_default() {
        assert_eq!(CompensationMode::FloatingPoint, CompensationMode::default());
    }
}
