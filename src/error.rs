//! Error handling primitives for the MPU-6050 driver.

use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};
use embedded_hal::spi::ErrorKind as SpiErrorKind;

use crate::config::ConfigError;

/// Crate-wide result type alias.
pub type Result<T, E> = core::result::Result<T, Error<E>>;

/// Error variants produced by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Any error reported by the underlying bus interface, passed through unchanged.
    Interface(E),
    /// A block read transferred fewer bytes than requested.
    PartialTransfer {
        /// Number of bytes requested.
        expected: usize,
        /// Number of bytes the transport reported.
        received: usize,
    },
    /// The provided configuration parameters are invalid.
    InvalidConfig(ConfigError),
    /// The transport handle is unusable (e.g. an out-of-range bus address).
    InvalidArgument,
    /// `WHO_AM_I` returned something other than the MPU-6050 identity.
    UnexpectedIdentity(u8),
    /// The operation is not permitted in the current lifecycle state.
    NotReady,
    /// Calibration could not collect a stable set of samples.
    CalibrationUnstable,
}

impl<E> From<E> for Error<E> {
    fn from(err: E) -> Self {
        Self::Interface(err)
    }
}

impl<E> Error<E>
where
    E: embedded_hal::i2c::Error,
{
    /// Classifies transport-level failures; returns `None` for driver-level errors.
    pub fn transport_error(&self) -> Option<TransportError> {
        match self {
            Self::Interface(err) => Some(TransportError::from(err.kind())),
            Self::PartialTransfer { .. } => Some(TransportError::PartialTransfer),
            _ => None,
        }
    }
}

impl<E> Error<E>
where
    E: embedded_hal::spi::Error,
{
    /// [`transport_error`](Self::transport_error) for SPI (MPU-6000) transports.
    pub fn spi_transport_error(&self) -> Option<TransportError> {
        match self {
            Self::Interface(err) => Some(TransportError::from(err.kind())),
            Self::PartialTransfer { .. } => Some(TransportError::PartialTransfer),
            _ => None,
        }
    }
}

/// Transport failure classes a register bus can report.
///
/// Custom transports may use this directly as their error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// Generic I/O failure on the bus.
    Io,
    /// Nothing acknowledged the bus address.
    DeviceAbsent,
    /// The transfer did not complete in time.
    Timeout,
    /// The bus is held by another master.
    Busy,
    /// The bus or device node does not exist.
    NoSuchDevice,
    /// The device rejected a transfer after addressing.
    RemoteIo,
    /// Fewer bytes were transferred than requested.
    PartialTransfer,
}

impl From<ErrorKind> for TransportError {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Bus => Self::Io,
            ErrorKind::ArbitrationLoss => Self::Busy,
            ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address) => Self::DeviceAbsent,
            ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data) => Self::RemoteIo,
            ErrorKind::NoAcknowledge(NoAcknowledgeSource::Unknown) => Self::NoSuchDevice,
            ErrorKind::Overrun => Self::RemoteIo,
            _ => Self::Io,
        }
    }
}

impl From<SpiErrorKind> for TransportError {
    fn from(kind: SpiErrorKind) -> Self {
        match kind {
            SpiErrorKind::ChipSelectFault => Self::DeviceAbsent,
            SpiErrorKind::ModeFault => Self::Busy,
            SpiErrorKind::Overrun => Self::RemoteIo,
            _ => Self::Io,
        }
    }
}

impl core::fmt::Display for TransportError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let text = match self {
            Self::Io => "bus I/O failure",
            Self::DeviceAbsent => "device did not acknowledge its address",
            Self::Timeout => "bus transfer timed out",
            Self::Busy => "bus busy",
            Self::NoSuchDevice => "no such device",
            Self::RemoteIo => "remote I/O fault",
            Self::PartialTransfer => "partial transfer",
        };
        f.write_str(text)
    }
}
