//! The periodic acquisition loop.
//!
//! A [`Poller`] owns an initialized [`Bmp280`], samples it once per interval and feeds the result
//! to a [`ChangeReporter`]. Changes above the threshold are logged at info level and returned from
//! [`Poller::poll_once`].
use crate::bmp280::Bmp280;
use crate::bus::Bus;
use crate::report::{ChangeReporter, PollState, PressureChange};
use core::fmt::Debug;
use embassy_time::Instant;
use embedded_hal_async::delay::DelayNs;

/// Default time between two acquisitions.
pub const DEFAULT_INTERVAL_MS: u32 = 1000;

/// How each cycle acquires a sample.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollMode {
    /// Read the latest result of a device running in normal mode.
    Normal,
    /// Trigger one forced conversion per cycle and read temperature and pressure.
    Forced,
    /// Trigger one forced conversion per cycle and read the pressure block only.
    ForcedPressureOnly,
}

pub struct Poller<B> {
    device: Bmp280<B>,
    reporter: ChangeReporter,
    state: PollState,
    mode: PollMode,
    interval_ms: u32,
}

impl<B> Poller<B>
where
    B: Bus,
    B::Error: Debug,
{
    /// Wraps an initialized device. `start` is the timestamp the first elapsed time is measured from.
    ///
    /// The device must already be configured for `mode`: normal mode for [`PollMode::Normal`],
    /// forced mode otherwise.
    pub fn new(device: Bmp280<B>, mode: PollMode, start: Instant) -> Self {
        Self {
            device,
            reporter: ChangeReporter::default(),
            state: PollState::new(start),
            mode,
            interval_ms: DEFAULT_INTERVAL_MS,
        }
    }

    pub fn with_reporter(mut self, reporter: ChangeReporter) -> Self {
        self.reporter = reporter;

        self
    }

    pub fn with_interval_ms(mut self, interval_ms: u32) -> Self {
        self.interval_ms = interval_ms;

        self
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    pub fn mode(&self) -> PollMode {
        self.mode
    }

    pub fn device_mut(&mut self) -> &mut Bmp280<B> {
        &mut self.device
    }

    /// Runs a single acquisition cycle.
    ///
    /// `now` is called once the sample has been read, so forced-mode settle time counts towards the
    /// cycle it belongs to. An unavailable sample is skipped without touching the state.
    pub async fn poll_once<D, C>(&mut self, delay: &mut D, now: C) -> Option<PressureChange>
    where
        D: DelayNs,
        C: FnOnce() -> Instant,
    {
        let (state, change) = match self.mode {
            PollMode::Normal => {
                let reading = self.device.read_measurement().await;
                self.reporter.observe(self.state, reading, now())
            }
            PollMode::Forced => {
                let reading = self.device.read_forced_measurement(delay).await;
                self.reporter.observe(self.state, reading, now())
            }
            PollMode::ForcedPressureOnly => {
                let pressure = self.device.read_forced_pressure(delay).await;
                self.reporter.observe_pressure(self.state, pressure, now())
            }
        };
        self.state = state;

        if let Some(change) = &change {
            log::info!(
                "{} hPa, delta {:.6} hPa over {:.6} s",
                change.pressure_hpa,
                change.delta_hpa,
                change.elapsed.as_micros() as f64 / 1_000_000.0
            );
        }

        change
    }

    /// Polls forever at the configured interval, timestamping with [`Instant::now`].
    ///
    /// Requires an `embassy-time` driver. Sample failures are skipped, so this never returns.
    pub async fn run<D: DelayNs>(&mut self, delay: &mut D) -> ! {
        log::info!("Polling every {} ms in {:?} mode", self.interval_ms, self.mode);

        loop {
            self.poll_once(delay, Instant::now).await;
            delay.delay_ms(self.interval_ms).await;
        }
    }
}

impl<B> Poller<B> {
    /// Stops polling and hands back the device.
    pub fn into_inner(self) -> Bmp280<B> {
        self.device
    }
}
