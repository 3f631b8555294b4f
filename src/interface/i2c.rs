//! I²C interface implementation built on top of `embedded-hal` `I2c`.

use embedded_hal::i2c::{I2c, SevenBitAddress};

use super::Mpu6050Interface;
use crate::registers::{I2C_ADDRESS_AD0_HIGH, I2C_ADDRESS_AD0_LOW};

/// I²C-based interface implementation for the MPU-6050 driver.
pub struct I2cInterface<I2C> {
    i2c: I2C,
    address: SevenBitAddress,
}

impl<I2C> I2cInterface<I2C> {
    /// Creates a new interface talking to `address`.
    ///
    /// The address is checked against the 7-bit range when the device is
    /// identified, not here.
    pub const fn new(i2c: I2C, address: SevenBitAddress) -> Self {
        Self { i2c, address }
    }

    /// Interface for a device with AD0 tied low (`0x68`).
    pub const fn ad0_low(i2c: I2C) -> Self {
        Self::new(i2c, I2C_ADDRESS_AD0_LOW)
    }

    /// Interface for a device with AD0 tied high (`0x69`).
    pub const fn ad0_high(i2c: I2C) -> Self {
        Self::new(i2c, I2C_ADDRESS_AD0_HIGH)
    }

    /// Provides mutable access to the wrapped bus.
    pub fn i2c_mut(&mut self) -> &mut I2C {
        &mut self.i2c
    }

    /// Consumes the interface and returns the owned bus.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C> Mpu6050Interface for I2cInterface<I2C>
where
    I2C: I2c,
{
    type Error = I2C::Error;

    fn read_u8(&mut self, register: u8) -> core::result::Result<u8, Self::Error> {
        let mut value = [0u8; 1];
        self.i2c.write_read(self.address, &[register], &mut value)?;
        Ok(value[0])
    }

    fn write_u8(&mut self, register: u8, value: u8) -> core::result::Result<(), Self::Error> {
        self.i2c.write(self.address, &[register, value])
    }

    fn read_block(
        &mut self,
        register: u8,
        buf: &mut [u8],
    ) -> core::result::Result<usize, Self::Error> {
        if buf.is_empty() {
            return Ok(0);
        }

        self.i2c.write_read(self.address, &[register], buf)?;
        Ok(buf.len())
    }

    fn bus_address(&self) -> Option<u8> {
        Some(self.address)
    }
}
