use crate::bus::{Bus, MAX_REG_BYTES};
use crate::error::Bmp280Error;
use crate::register::{Readable, Writable};
use embedded_hal_async::delay::DelayNs;
use heapless::{LinearMap, Vec};

#[derive(Debug)]
enum RegisterValue {
    Data { bytes: [u8; MAX_REG_BYTES], len: usize },
    DontCare,
    Fail,
}

/// A bus with canned register responses.
///
/// Reads are keyed by register address and transfer length. Accepted writes are recorded as
/// `(address, first byte)`.
pub struct FakeBus<const N: usize> {
    regs: LinearMap<(u8, usize), RegisterValue, N>,
    scratch: [u8; MAX_REG_BYTES],
    writes: Vec<(u8, u8), 32>,
    reads: usize,
    fail_writes: bool,
}

#[derive(Default)]
pub struct FakeDelay {
    pub total_ns: u64,
}

impl DelayNs for FakeDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.total_ns += ns as u64;
    }
}

impl<const N: usize> FakeBus<N> {
    pub fn new() -> Self {
        FakeBus {
            regs: LinearMap::new(),
            scratch: [0u8; MAX_REG_BYTES],
            writes: Vec::new(),
            reads: 0,
            fail_writes: false,
        }
    }

    pub fn with_response<R: Readable>(&mut self, data: &[u8]) {
        let mut register_value = [0u8; MAX_REG_BYTES];
        register_value[..data.len()].copy_from_slice(data);
        self.regs.insert((R::ADDR, R::N), RegisterValue::Data { bytes: register_value, len: data.len() }).unwrap();
    }

    pub fn with_any_response<R: Readable>(&mut self) {
        self.regs.insert((R::ADDR, R::N), RegisterValue::DontCare).unwrap();
    }

    pub fn with_failure<R: Readable>(&mut self) {
        self.regs.insert((R::ADDR, R::N), RegisterValue::Fail).unwrap();
    }

    /// Makes every following write fail with a bus error.
    pub fn with_write_failure(&mut self) {
        self.fail_writes = true;
    }

    pub fn writes(&self) -> &[(u8, u8)] {
        &self.writes
    }

    pub fn reads(&self) -> usize {
        self.reads
    }

    pub fn clear_writes(&mut self) {
        self.writes.clear();
    }
}

impl<const N: usize> Bus for FakeBus<N> {
    type Error = ();

    async fn read<R: Readable>(&mut self) -> Result<R::Out, Bmp280Error<Self::Error>> {
        self.reads += 1;
        if let Some(value) = self.regs.get(&(R::ADDR, R::N)) {
            match value {
                RegisterValue::Data { bytes, len } => {
                    if *len == R::N {
                        return Ok(R::decode(&bytes[..R::N])?)
                    }
                },
                RegisterValue::DontCare => {
                    let data = &self.scratch[0..R::N];
                    return Ok(R::decode(data)?)
                },
                RegisterValue::Fail => return Err(Bmp280Error::Bus(())),
            }
        }

        panic!("No mocked value for register 0x{:x} and length {}", R::ADDR, R::N)
    }

    async fn write<W: Writable>(&mut self, v: &W::In) -> Result<(), Bmp280Error<Self::Error>> {
        if self.fail_writes {
            return Err(Bmp280Error::Bus(()));
        }

        let mut buffer = [0u8; MAX_REG_BYTES];
        W::encode(v, &mut buffer[..W::N]);
        self.writes.push((W::ADDR, buffer[0])).unwrap();
        Ok(())
    }
}

/// An I2C peripheral that records the target address and every byte written, and answers reads
/// with `response`.
#[derive(Default)]
pub struct RecordingI2c {
    pub address: Option<u8>,
    pub written: Vec<u8, 32>,
    pub response: u8,
}

impl embedded_hal_async::i2c::ErrorType for RecordingI2c {
    type Error = core::convert::Infallible;
}

impl embedded_hal_async::i2c::I2c for RecordingI2c {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [embedded_hal_async::i2c::Operation<'_>],
    ) -> Result<(), Self::Error> {
        use embedded_hal_async::i2c::Operation;

        self.address = Some(address);
        for operation in operations {
            match operation {
                Operation::Write(bytes) => self.written.extend_from_slice(bytes).unwrap(),
                Operation::Read(buffer) => buffer.fill(self.response),
            }
        }
        Ok(())
    }
}

/// An SPI device that records every byte clocked out, and answers reads with `response`.
#[derive(Default)]
pub struct RecordingSpi {
    pub written: Vec<u8, 32>,
    pub response: u8,
}

impl embedded_hal_async::spi::ErrorType for RecordingSpi {
    type Error = core::convert::Infallible;
}

impl embedded_hal_async::spi::SpiDevice for RecordingSpi {
    async fn transaction(
        &mut self,
        operations: &mut [embedded_hal_async::spi::Operation<'_, u8>],
    ) -> Result<(), Self::Error> {
        use embedded_hal_async::spi::Operation;

        for operation in operations {
            match operation {
                Operation::Write(bytes) => self.written.extend_from_slice(bytes).unwrap(),
                Operation::Read(buffer) => buffer.fill(self.response),
                Operation::Transfer(read, write) => {
                    self.written.extend_from_slice(write).unwrap();
                    read.fill(self.response);
                }
                Operation::TransferInPlace(buffer) => {
                    self.written.extend_from_slice(buffer).unwrap();
                    buffer.fill(self.response);
                }
                Operation::DelayNs(_) => {}
            }
        }
        Ok(())
    }
}
