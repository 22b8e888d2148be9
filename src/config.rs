use crate::compensation::CompensationMode;
use crate::register::config::{ConfigFields, IIRFilterCoefficient, StandbyTime};
use crate::register::ctrl_meas::{CtrlMeasCfg, Oversampling, PowerMode};

/// Device configuration applied at startup.
///
/// The defaults select x1 oversampling for both channels in normal mode, an IIR filter coefficient
/// of 2 and a 0.5 ms standby time, i.e. CTRL_MEAS `0x27` and CONFIG `0x04`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Configuration {
    pub(crate) temperature_oversampling: Oversampling,
    pub(crate) pressure_oversampling: Oversampling,
    pub(crate) mode: PowerMode,
    pub(crate) iir_filter_coefficient: IIRFilterCoefficient,
    pub(crate) standby_time: StandbyTime,
    pub(crate) compensation_mode: CompensationMode,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            temperature_oversampling: Oversampling::X1,
            pressure_oversampling: Oversampling::X1,
            mode: PowerMode::Normal,
            iir_filter_coefficient: IIRFilterCoefficient::Coef2,
            standby_time: StandbyTime::Ms0_5,
            compensation_mode: CompensationMode::FloatingPoint,
        }
    }
}

impl Configuration {
    /// Sets the power mode entered once configuration is applied.
    ///
    /// [`PowerMode::Forced`] leaves the device asleep; every
    /// [`Bmp280::trigger_forced_sample`](crate::Bmp280::trigger_forced_sample) then starts one conversion.
    pub fn power_mode(mut self, power_mode: PowerMode) -> Self {
        self.mode = power_mode;

        self
    }

    pub fn iir_filter_coefficient(mut self, filter_coefficient: IIRFilterCoefficient) -> Self {
        self.iir_filter_coefficient = filter_coefficient;

        self
    }

    pub fn standby_time(mut self, standby_time: StandbyTime) -> Self {
        self.standby_time = standby_time;

        self
    }

    pub fn pressure_oversampling(mut self, pressure_oversampling: Oversampling) -> Self {
        self.pressure_oversampling = pressure_oversampling;

        self
    }

    /// Temperature is needed to compensate pressure, so skipping it only makes sense together with
    /// pressure-only reads.
    pub fn temperature_oversampling(mut self, temperature_oversampling: Oversampling) -> Self {
        self.temperature_oversampling = temperature_oversampling;

        self
    }

    /// Selects the compensation formula. See [`CompensationMode`] for the accuracy trade-off.
    pub fn compensation_mode(mut self, compensation_mode: CompensationMode) -> Self {
        self.compensation_mode = compensation_mode;

        self
    }

    pub fn mode(&self) -> PowerMode {
        self.mode
    }

    pub fn compensation(&self) -> CompensationMode {
        self.compensation_mode
    }

    /// CTRL_MEAS payload for the given power mode.
    pub(crate) fn ctrl_meas(&self, mode: PowerMode) -> CtrlMeasCfg {
        CtrlMeasCfg {
            osrs_t: self.temperature_oversampling,
            osrs_p: self.pressure_oversampling,
            mode,
        }
    }

    pub(crate) fn config_fields(&self) -> ConfigFields {
        ConfigFields {
            standby: self.standby_time,
            iir_filter: self.iir_filter_coefficient,
            spi3w_en: false,
        }
    }

    /// The recommended settings from datasheet table 7.
    pub fn from_preset(p: Preset) -> Self {
        match p {
            Preset::HandheldLowPower => Configuration::default()
                .pressure_oversampling(Oversampling::X16)
                .temperature_oversampling(Oversampling::X2)
                .iir_filter_coefficient(IIRFilterCoefficient::Coef4)
                .standby_time(StandbyTime::Ms62_5),
            Preset::HandheldDynamic => Configuration::default()
                .pressure_oversampling(Oversampling::X4)
                .iir_filter_coefficient(IIRFilterCoefficient::Coef16),
            Preset::WeatherMonitoring => Configuration::default()
                .power_mode(PowerMode::Forced)
                .iir_filter_coefficient(IIRFilterCoefficient::Off),
            Preset::FloorChange => Configuration::default()
                .pressure_oversampling(Oversampling::X4)
                .iir_filter_coefficient(IIRFilterCoefficient::Coef4)
                .standby_time(StandbyTime::Ms125),
            Preset::DropDetection => Configuration::default()
                .pressure_oversampling(Oversampling::X2)
                .iir_filter_coefficient(IIRFilterCoefficient::Off),
            Preset::IndoorNavigation => Configuration::default()
                .pressure_oversampling(Oversampling::X16)
                .temperature_oversampling(Oversampling::X2)
                .iir_filter_coefficient(IIRFilterCoefficient::Coef16),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Preset {
    HandheldLowPower,
    HandheldDynamic,
    WeatherMonitoring,
    FloorChange,
    DropDetection,
    IndoorNavigation,
}
