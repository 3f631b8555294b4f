//! SPI interface implementation built on top of `embedded-hal` `SpiDevice`.
//!
//! Only the MPU-6000 variant exposes SPI; it shares the MPU-6050 register map.

use embedded_hal::spi::{Operation, SpiDevice};

use super::Mpu6050Interface;

/// Read flag carried in bit 7 of the address byte.
const SPI_READ: u8 = 0x80;

/// SPI-based interface implementation for the MPU-6000.
pub struct SpiInterface<SPI> {
    spi: SPI,
}

impl<SPI> SpiInterface<SPI> {
    /// Creates a new interface from the provided SPI device abstraction.
    pub const fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Builds the address byte that opens every SPI transaction.
    fn command_byte(register: u8, is_read: bool) -> u8 {
        if is_read {
            register | SPI_READ
        } else {
            register & !SPI_READ
        }
    }

    /// Provides mutable access to the wrapped SPI device.
    pub fn spi_mut(&mut self) -> &mut SPI {
        &mut self.spi
    }

    /// Consumes the interface and returns the owned SPI device.
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI> Mpu6050Interface for SpiInterface<SPI>
where
    SPI: SpiDevice,
{
    type Error = SPI::Error;

    fn read_u8(&mut self, register: u8) -> core::result::Result<u8, Self::Error> {
        let mut value = [0u8; 1];
        self.read_block(register, &mut value)?;
        Ok(value[0])
    }

    fn write_u8(&mut self, register: u8, value: u8) -> core::result::Result<(), Self::Error> {
        let frame = [Self::command_byte(register, false), value];
        self.spi.write(&frame)
    }

    fn read_block(
        &mut self,
        register: u8,
        buf: &mut [u8],
    ) -> core::result::Result<usize, Self::Error> {
        if buf.is_empty() {
            return Ok(0);
        }

        let len = buf.len();
        let command = [Self::command_byte(register, true)];
        let mut operations = [Operation::Write(&command), Operation::Read(buf)];
        self.spi.transaction(&mut operations)?;
        Ok(len)
    }
}
