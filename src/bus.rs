//! Register-level transport.
//!
//! [`Bus`] is the seam between the driver and the hardware: a typed block read and a typed register
//! write. [`I2c`] and [`Spi`] implement it on top of the `embedded-hal-async` traits. Tests and
//! other transports can implement it directly.
use crate::Bmp280Error;
use crate::register::{Readable, Writable};
use embedded_hal::i2c::SevenBitAddress;

/// The longest register block this driver ever transfers (the calibration block).
pub const MAX_REG_BYTES: usize = 26;

pub trait Bus {
    type Error;

    /// Reads `R::N` bytes starting at `R::ADDR` and decodes them.
    fn read<R: Readable>(&mut self) -> impl Future<Output = Result<R::Out, Bmp280Error<Self::Error>>>;

    /// Encodes `v` and writes it to `W::ADDR`.
    fn write<W: Writable>(&mut self, v: &W::In) -> impl Future<Output = Result<(), Bmp280Error<Self::Error>>>;
}

pub struct I2c<I2cType> {
    i2c: I2cType,
    address: SevenBitAddress,
}

impl<I2cType> I2c<I2cType>
where
    I2cType: embedded_hal_async::i2c::I2c,
{
    pub fn new(i2c: I2cType, address: SevenBitAddress) -> Self {
        Self { i2c, address }
    }

    pub fn address(&self) -> SevenBitAddress {
        self.address
    }

    /// Gives back the underlying I2C peripheral.
    pub fn release(self) -> I2cType {
        self.i2c
    }
}

impl<I2cType> Bus for I2c<I2cType>
where
    I2cType: embedded_hal_async::i2c::I2c,
{
    type Error = <I2cType as embedded_hal_async::i2c::ErrorType>::Error;

    async fn read<R: Readable>(&mut self) -> Result<R::Out, Bmp280Error<Self::Error>> {
        let mut buffer = [0u8; MAX_REG_BYTES];
        self.i2c
            .write_read(self.address, &[R::ADDR], &mut buffer[..R::N])
            .await
            .map_err(Bmp280Error::Bus)?;

        Ok(R::decode(&buffer[..R::N])?)
    }

    async fn write<W: Writable>(&mut self, v: &W::In) -> Result<(), Bmp280Error<Self::Error>> {
        let mut buffer = [0u8; MAX_REG_BYTES + 1];
        buffer[0] = W::ADDR;
        W::encode(v, &mut buffer[1..=W::N]);
        self.i2c
            .write(self.address, &buffer[..=W::N])
            .await
            .map_err(Bmp280Error::Bus)?;

        Ok(())
    }
}

pub struct Spi<SpiType> {
    spi: SpiType,
}

impl<SpiType> Spi<SpiType>
where
    SpiType: embedded_hal_async::spi::SpiDevice,
{
    pub fn new(spi: SpiType) -> Self {
        Self { spi }
    }

    /// Gives back the underlying SPI device.
    pub fn release(self) -> SpiType {
        self.spi
    }
}

// In SPI mode bit 7 of the control byte is the R/W flag: 1 reads, 0 writes.
const SPI_READ: u8 = 0x80;
const SPI_WRITE_MASK: u8 = 0x7F;

impl<SpiType> Bus for Spi<SpiType>
where
    SpiType: embedded_hal_async::spi::SpiDevice,
{
    type Error = <SpiType as embedded_hal_async::spi::ErrorType>::Error;

    async fn read<R: Readable>(&mut self) -> Result<R::Out, Bmp280Error<Self::Error>> {
        use embedded_hal_async::spi::Operation;

        let mut buffer = [0u8; MAX_REG_BYTES];
        self.spi
            .transaction(&mut [
                Operation::Write(&[R::ADDR | SPI_READ]),
                Operation::Read(&mut buffer[..R::N]),
            ])
            .await
            .map_err(Bmp280Error::Bus)?;

        Ok(R::decode(&buffer[..R::N])?)
    }

    async fn write<W: Writable>(&mut self, v: &W::In) -> Result<(), Bmp280Error<Self::Error>> {
        let mut buffer = [0u8; MAX_REG_BYTES + 1];
        buffer[0] = W::ADDR & SPI_WRITE_MASK;
        W::encode(v, &mut buffer[1..=W::N]);
        self.spi
            .write(&buffer[..=W::N])
            .await
            .map_err(Bmp280Error::Bus)?;

        Ok(())
    }
}
