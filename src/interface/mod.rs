//! Bus interface abstraction for the MPU-6050 driver.

pub mod i2c;
pub mod spi;

/// Abstraction over the low-level register access required by the driver.
///
/// Implementations report failures unchanged and never retry.
pub trait Mpu6050Interface {
    /// Error type produced by the concrete bus implementation.
    type Error;

    /// Reads a single register.
    fn read_u8(&mut self, register: u8) -> core::result::Result<u8, Self::Error>;

    /// Writes a single register.
    fn write_u8(&mut self, register: u8, value: u8) -> core::result::Result<(), Self::Error>;

    /// Reads consecutive registers starting at `register` into `buf`.
    ///
    /// Returns the number of bytes actually transferred; the driver treats
    /// anything short of `buf.len()` as a partial transfer.
    fn read_block(&mut self, register: u8, buf: &mut [u8])
    -> core::result::Result<usize, Self::Error>;

    /// Bus address of the device, for transports that have one.
    fn bus_address(&self) -> Option<u8> {
        None
    }
}
