use crate::bus::{Bus, I2c, Spi};
use crate::calibration::CalibrationSet;
use crate::compensation::{CompensationEngine, CompensationMode, Reading};
use crate::config::Configuration;
use crate::error::Bmp280Error;
use crate::register::ctrl_meas::{CtrlMeas, Oversampling, PowerMode};
use crate::register::data::RawSample;
use crate::register::reset::{Reset, ResetCommand};
use crate::register::{calibration, chip_id, config, data, status, Readable, Writable};
use core::fmt::Debug;
use embedded_hal::i2c::SevenBitAddress;
use embedded_hal_async::delay::DelayNs;

/// Type alias for a Bmp280 chip communicating over I2C
pub type Bmp280I2c<T> = Bmp280<I2c<T>>;

/// Type alias for a Bmp280 chip communicating over SPI
pub type Bmp280Spi<T> = Bmp280<Spi<T>>;

pub const BMP280_CHIP_ID: u8 = 0x58;

/// Fixed wait between triggering a forced conversion and reading its result.
///
/// Covers the 6.4 ms maximum conversion time at x1/x1 oversampling with margin.
pub const FORCED_SETTLE_TIME_US: u32 = 10_000;

/// Start-up time after power-on or soft reset, datasheet table 2.
const STARTUP_TIME_MS: u32 = 2;

/// Main Bmp280 driver struct
pub struct Bmp280<B> {
    bus: B,
    engine: CompensationEngine,
    config: Configuration,
    max_measurement_time_us: u32,
}

/// Type alias used to simplify return types throughout the driver
pub type Bmp280Result<T, BusError> = Result<T, Bmp280Error<BusError>>;

impl<T> Bmp280I2c<T>
where
    T: embedded_hal_async::i2c::I2c,
{
    /// Constructs a new Bmp280 driver instance with a given configuration that communicates over I2C
    ///
    /// This function will:
    /// - Probe for a connected BMP280 device.
    /// - Perform a soft reset if `reset` == [`ResetPolicy::Soft`]
    /// - Load calibration coefficients from NVM
    /// - Apply the given configuration
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use embedded_hal_async::delay::DelayNs;
    /// # use embedded_hal_async::i2c::I2c;
    /// # use bmp280_rs::Bmp280Result;
    ///  use bmp280_rs::{Bmp280, SdoPinState, ResetPolicy};
    ///  use bmp280_rs::config::Configuration;
    /// # async fn demo<I: I2c, D: DelayNs>(i2c: I, mut delay: D) -> Bmp280Result<(), I::Error> {
    ///
    ///  let device = Bmp280::new_i2c(
    ///     i2c,
    ///     SdoPinState::Low,
    ///     Configuration::default(),
    ///     ResetPolicy::None,
    ///     &mut delay
    ///  ).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn new_i2c<D: DelayNs>(
        i2c: T,
        sdo_pin_state: SdoPinState,
        config: Configuration,
        reset: ResetPolicy,
        delay: &mut D,
    ) -> Bmp280Result<Self, T::Error> {
        Self::new(I2c::new(i2c, sdo_pin_state.into()), config, reset, delay).await
    }
}

impl<T> Bmp280Spi<T>
where
    T: embedded_hal_async::spi::SpiDevice,
{
    /// Constructs a new Bmp280 driver instance with a given configuration that communicates over SPI
    ///
    /// See [`Bmp280::new_i2c`] for the startup sequence.
    pub async fn new_spi<D: DelayNs>(
        spi: T,
        config: Configuration,
        reset: ResetPolicy,
        delay: &mut D,
    ) -> Bmp280Result<Self, T::Error> {
        Self::new(Spi::new(spi), config, reset, delay).await
    }
}

impl<B> Bmp280<B>
where
    B: Bus,
    B::Error: Debug,
{
    /// Probes the identity register up to `attempts` times with a 1 ms delay between bus failures.
    ///
    /// A readable but wrong chip id fails immediately with [`Bmp280Error::UnexpectedDevice`].
    async fn probe_ready<D: DelayNs>(
        bus: &mut B,
        delay: &mut D,
        attempts: u32,
    ) -> Bmp280Result<(), B::Error> {
        let mut result = Err(Bmp280Error::Timeout);
        for _ in 0..attempts {
            match Self::check_identity(bus).await {
                Err(Bmp280Error::Bus(e)) => result = Err(Bmp280Error::Bus(e)),
                other => return other,
            }

            delay.delay_ms(1).await;
        }

        result
    }

    async fn check_identity(bus: &mut B) -> Bmp280Result<(), B::Error> {
        let chip_id = bus.read::<chip_id::ChipId>().await?;
        log::info!("Detected chip ID: {:#x}", chip_id);

        if chip_id != BMP280_CHIP_ID {
            log::error!("Device is not a BMP280 (chip ID {:#x})", chip_id);
            return Err(Bmp280Error::UnexpectedDevice { chip_id });
        }

        Ok(())
    }

    /// Creates a new instance of the Bmp280 driver struct with the given configuration.
    ///
    /// Startup order is identify, optional reset, calibration, configuration. Any failure here is fatal.
    pub async fn new<D: DelayNs>(
        mut bus: B,
        config: Configuration,
        reset: ResetPolicy,
        delay: &mut D,
    ) -> Bmp280Result<Self, B::Error> {
        log::info!("bmp280-rs {}", env!("CARGO_PKG_VERSION"));

        // The datasheet (table 2) specifies 2ms start-up time after VDD/VDDIO > 1.8V
        Self::probe_ready(&mut bus, delay, 5).await?;

        if reset == ResetPolicy::Soft {
            Self::reset_bus(&mut bus, delay).await?;
        }

        let calibration = bus.read::<calibration::Calibration>().await?;
        log::debug!("Calibration coefficients: {:?}", calibration);

        let mut device = Bmp280 {
            bus,
            engine: CompensationEngine::new(calibration, config.compensation_mode),
            config,
            max_measurement_time_us: calculate_maximum_measurement_time(
                config.temperature_oversampling,
                config.pressure_oversampling,
            ),
        };

        device.apply_configuration(&config).await?;

        Ok(device)
    }

    /// Reads the identity register and checks it against the BMP280 chip id.
    pub async fn identify(&mut self) -> Bmp280Result<(), B::Error> {
        Self::check_identity(&mut self.bus).await
    }

    /// Determines if the BMP280 device is connected by reading the [`ChipId`](chip_id::ChipId) (0xD0) register.
    pub async fn is_connected(&mut self) -> Bmp280Result<bool, B::Error> {
        let id = self.bus.read::<chip_id::ChipId>().await?;

        Ok(id == BMP280_CHIP_ID)
    }

    /// Applies the given configuration by writing to its corresponding registers.
    ///
    /// The device is put to sleep first since CONFIG writes may be ignored in normal mode. In
    /// [`PowerMode::Forced`] it is left asleep until the next [`Bmp280::trigger_forced_sample`].
    pub async fn apply_configuration(&mut self, config: &Configuration) -> Bmp280Result<(), B::Error> {
        self.bus.write::<CtrlMeas>(&config.ctrl_meas(PowerMode::Sleep)).await?;
        self.bus.write::<config::Config>(&config.config_fields()).await?;

        if config.mode == PowerMode::Normal {
            self.bus.write::<CtrlMeas>(&config.ctrl_meas(PowerMode::Normal)).await?;
        }

        self.config = *config;
        self.max_measurement_time_us = calculate_maximum_measurement_time(
            config.temperature_oversampling,
            config.pressure_oversampling,
        );
        if self.engine.mode() != config.compensation_mode {
            self.engine = CompensationEngine::new(*self.engine.calibration(), config.compensation_mode);
        }

        log::info!("BMP280 configured: {:?}", config);
        Ok(())
    }

    /// Starts continuous sampling at the configured standby interval.
    pub async fn configure_normal_mode(&mut self) -> Bmp280Result<(), B::Error> {
        let config = self.config.power_mode(PowerMode::Normal);
        self.apply_configuration(&config).await
    }

    /// Puts the device to sleep, ready for [`Bmp280::trigger_forced_sample`].
    pub async fn configure_forced_mode(&mut self) -> Bmp280Result<(), B::Error> {
        let config = self.config.power_mode(PowerMode::Forced);
        self.apply_configuration(&config).await
    }

    /// Starts exactly one conversion.
    ///
    /// The result is available after [`Bmp280::forced_settle_time_us`]. The `read_forced_*` methods
    /// do the waiting for you.
    pub async fn trigger_forced_sample(&mut self) -> Bmp280Result<(), B::Error> {
        self.bus.write::<CtrlMeas>(&self.config.ctrl_meas(PowerMode::Forced)).await
    }

    /// How long to wait after [`Bmp280::trigger_forced_sample`] before reading results.
    ///
    /// This is [`FORCED_SETTLE_TIME_US`], or the datasheet maximum conversion time when heavier
    /// oversampling makes that longer.
    pub fn forced_settle_time_us(&self) -> u32 {
        FORCED_SETTLE_TIME_US.max(self.max_measurement_time_us)
    }

    /// Returns the datasheet maximum conversion time in microseconds for the configured oversampling.
    pub fn max_measurement_time_us(&self) -> u32 {
        self.max_measurement_time_us
    }

    /// Sets the power mode by read-modify-write of CTRL_MEAS (0xF4), keeping oversampling as is.
    pub async fn set_mode(&mut self, mode: PowerMode) -> Bmp280Result<(), B::Error> {
        let mut ctrl_meas = self.bus.read::<CtrlMeas>().await?;
        ctrl_meas.mode = mode;
        self.bus.write::<CtrlMeas>(&ctrl_meas).await?;
        Ok(())
    }

    /// Reads the current power mode from the CTRL_MEAS (0xF4) register
    pub async fn mode(&mut self) -> Bmp280Result<PowerMode, B::Error> {
        Ok(self.bus.read::<CtrlMeas>().await?.mode)
    }

    /// Returns the status from the STATUS (0xF3) register.
    pub async fn status(&mut self) -> Bmp280Result<status::StatusFlags, B::Error> {
        self.bus.read::<status::Status>().await
    }

    /// Triggers a soft reset and waits for the NVM copy to finish.
    ///
    /// **Note:** This resets the chip to factory defaults, not to the configuration that was provided when
    /// constructing the driver. Call [`Bmp280::apply_configuration`] afterwards.
    pub async fn soft_reset<D: DelayNs>(&mut self, delay: &mut D) -> Bmp280Result<(), B::Error> {
        Self::reset_bus(&mut self.bus, delay).await
    }

    async fn reset_bus<D: DelayNs>(bus: &mut B, delay: &mut D) -> Bmp280Result<(), B::Error> {
        bus.write::<Reset>(&ResetCommand::SoftReset).await?;
        delay.delay_ms(STARTUP_TIME_MS).await;

        // Poll at most 32 times (non-scientifically chosen number)
        for _ in 0..32 {
            if !bus.read::<status::Status>().await?.nvm_updating() {
                return Ok(());
            }
            delay.delay_ms(1).await;
        }

        Err(Bmp280Error::Timeout)
    }

    /// Read a register (or fixed-size register block) using a **typed marker**.
    ///
    /// This is the low-level, register-accurate entry point. You pass a marker type
    /// from [`crate::register`] and get back its decoded value (`R::Out`).
    ///
    /// ```rust,no_run
    /// # use bmp280_rs::{register, Bmp280, Bmp280Result};
    /// # use bmp280_rs::bus::Bus;
    /// # async fn demo<B: Bus>(mut device: Bmp280<B>) -> Bmp280Result<(), B::Error> where B::Error: core::fmt::Debug {
    /// use bmp280_rs::register::ctrl_meas::{CtrlMeas, CtrlMeasCfg};
    /// let cfg: CtrlMeasCfg = device.read::<CtrlMeas>().await?;
    /// # Ok(()) }
    /// ```
    pub async fn read<R: Readable>(&mut self) -> Bmp280Result<R::Out, B::Error> {
        self.bus.read::<R>().await
    }

    /// Write a register using a **typed marker**.
    ///
    /// This performs a **direct write** of the provided fields. Prefer the convenience methods,
    /// which keep the driver's cached configuration in sync.
    pub async fn write<W: Writable>(&mut self, v: &W::In) -> Bmp280Result<(), B::Error> {
        self.bus.write::<W>(v).await
    }

    /// Reads the latest raw temperature and pressure codes in one burst.
    ///
    /// A transport failure is logged and reported as [`None`]; the next call is the retry.
    pub async fn read_raw(&mut self) -> Option<RawSample> {
        match self.bus.read::<data::Data>().await {
            Ok(sample) => Some(sample),
            Err(e) => {
                log::warn!("Read of data registers failed: {:?}", e);
                None
            }
        }
    }

    /// Reads only the raw pressure code.
    pub async fn read_raw_pressure(&mut self) -> Option<u32> {
        match self.bus.read::<data::Pressure>().await {
            Ok(pressure) => Some(pressure),
            Err(e) => {
                log::warn!("Read of pressure registers failed: {:?}", e);
                None
            }
        }
    }

    async fn trigger_and_settle<D: DelayNs>(&mut self, delay: &mut D) -> bool {
        if let Err(e) = self.trigger_forced_sample().await {
            log::warn!("Forced conversion trigger failed: {:?}", e);
            return false;
        }

        delay.delay_us(self.forced_settle_time_us()).await;
        true
    }

    /// Triggers a forced conversion, waits for it and reads both raw codes.
    pub async fn read_forced_raw<D: DelayNs>(&mut self, delay: &mut D) -> Option<RawSample> {
        if !self.trigger_and_settle(delay).await {
            return None;
        }

        self.read_raw().await
    }

    /// Triggers a forced conversion, waits for it and reads only the raw pressure code.
    pub async fn read_forced_raw_pressure<D: DelayNs>(&mut self, delay: &mut D) -> Option<u32> {
        if !self.trigger_and_settle(delay).await {
            return None;
        }

        self.read_raw_pressure().await
    }

    /// Reads the latest data registers and compensates them with the configured [`CompensationMode`].
    ///
    /// Ideally, you will want to call this method only when *new* measurements have been stored, otherwise
    /// you will be reading the same conversion multiple times. In normal mode the device produces one every
    /// [`Bmp280::max_measurement_time_us`] plus the configured standby time.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use bmp280_rs::Bmp280;
    /// # use bmp280_rs::bus::Bus;
    /// # async fn demo<B: Bus>(mut device: Bmp280<B>) where B::Error: core::fmt::Debug {
    /// if let Some(reading) = device.read_measurement().await {
    ///     println!("{} °C, {} hPa", reading.temperature_celsius, reading.pressure_hpa);
    /// }
    /// # }
    /// ```
    pub async fn read_measurement(&mut self) -> Option<Reading> {
        let sample = self.read_raw().await;
        self.engine.compensate(sample)
    }

    /// Runs one forced conversion and compensates it with the configured [`CompensationMode`].
    pub async fn read_forced_measurement<D: DelayNs>(&mut self, delay: &mut D) -> Option<Reading> {
        let sample = self.read_forced_raw(delay).await;
        self.engine.compensate(sample)
    }

    /// Runs one forced conversion and returns pressure only, in hPa.
    ///
    /// Uses the reduced fixed point formula since no temperature is read.
    pub async fn read_forced_pressure<D: DelayNs>(&mut self, delay: &mut D) -> Option<f64> {
        let adc_pressure = self.read_forced_raw_pressure(delay).await;
        self.engine.compensate_pressure_only(adc_pressure)
    }
}

impl<B> Bmp280<B> {
    /// The calibration coefficients read at startup.
    pub fn calibration(&self) -> &CalibrationSet {
        self.engine.calibration()
    }

    pub fn engine(&self) -> &CompensationEngine {
        &self.engine
    }

    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    pub fn compensation_mode(&self) -> CompensationMode {
        self.engine.mode()
    }

    /// Destroys the driver and hands back the bus.
    pub fn release(self) -> B {
        self.bus
    }

    #[cfg(test)]
    pub(crate) fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }
}

/// Calculates the maximum measurement time in microseconds, datasheet section 9.1:
///
/// `1.25 + 2.3 * osrs_t + (2.3 * osrs_p + 0.575)` ms, where a skipped channel contributes nothing.
fn calculate_maximum_measurement_time(
    temperature_oversampling: Oversampling,
    pressure_oversampling: Oversampling,
) -> u32 {
    let osrs_t = temperature_oversampling.multiplier();
    let osrs_p = pressure_oversampling.multiplier();
    let pressure_time = if osrs_p > 0 { 2300 * osrs_p + 575 } else { 0 };

    1250 + 2300 * osrs_t + pressure_time
}

/// This enum should reflect the physical state of the SDO pin. This is used to determine the I2C address
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SdoPinState {
    /// SDO is pulled high by connection to VDDIO
    High,
    /// SDO is pulled low by connection to GND
    Low,
}

impl From<SdoPinState> for SevenBitAddress {
    fn from(value: SdoPinState) -> Self {
        match value {
            SdoPinState::High => 0x77,
            SdoPinState::Low => 0x76,
        }
    }
}

/// What to do at startup before reading calibration and applying [`Configuration`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ResetPolicy {
    /// Write 0xB6 to RESET and wait for the NVM copy to finish.
    Soft,
    /// Don't reset; leave the chip as-is.
    None,
}
