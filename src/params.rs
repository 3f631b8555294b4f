//! Strongly typed parameter enumerations for the MPU-6050 driver.
//!
//! These enums map directly to register field encodings and are used across
//! [`Config`](crate::config::Config) and the high-level driver APIs. Prefer these
//! types over raw integers to keep configuration values valid and explicit.
//!
//! # Examples
//!
//! ```rust
//! use mpu6050_core::params::{AccelRange, DlpfConfig, GyroRange};
//!
//! let accel = AccelRange::G8;
//! let gyro = GyroRange::Dps500;
//! let dlpf = DlpfConfig::Bw44Hz;
//! assert_eq!(accel.full_scale_g(), 8);
//! assert_eq!(gyro.full_scale_dps(), 500);
//! let _ = dlpf;
//! ```

use modular_bitfield::prelude::Specifier;

/// Full-scale span of a signed 16-bit sample.
const FULL_SCALE_COUNTS: i64 = 32_768;

/// Accelerometer full-scale selection (`ACCEL_CONFIG.AFS_SEL`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 2]
pub enum AccelRange {
    /// ±2 g.
    G2 = 0b00,
    /// ±4 g.
    G4 = 0b01,
    /// ±8 g.
    G8 = 0b10,
    /// ±16 g.
    G16 = 0b11,
}

impl AccelRange {
    /// Decodes the two-bit field value, rejecting anything above `3`.
    pub const fn from_bits(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::G2),
            1 => Some(Self::G4),
            2 => Some(Self::G8),
            3 => Some(Self::G16),
            _ => None,
        }
    }

    /// Looks up the range whose full scale is `g`.
    pub const fn from_full_scale_g(g: u16) -> Option<Self> {
        match g {
            2 => Some(Self::G2),
            4 => Some(Self::G4),
            8 => Some(Self::G8),
            16 => Some(Self::G16),
            _ => None,
        }
    }

    /// Returns the full-scale span in g.
    pub const fn full_scale_g(self) -> i32 {
        match self {
            Self::G2 => 2,
            Self::G4 => 4,
            Self::G8 => 8,
            Self::G16 => 16,
        }
    }

    /// Converts a raw count to milli-g: `raw * 1000 * g / 32768`.
    pub const fn milli_g(self, raw: i32) -> i32 {
        (raw as i64 * 1_000 * self.full_scale_g() as i64 / FULL_SCALE_COUNTS) as i32
    }

    /// Raw count corresponding to exactly 1 g in this range.
    pub const fn counts_per_g(self) -> i32 {
        (FULL_SCALE_COUNTS / self.full_scale_g() as i64) as i32
    }
}

/// Gyroscope full-scale selection (`GYRO_CONFIG.FS_SEL`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 2]
pub enum GyroRange {
    /// ±250 °/s.
    Dps250 = 0b00,
    /// ±500 °/s.
    Dps500 = 0b01,
    /// ±1000 °/s.
    Dps1000 = 0b10,
    /// ±2000 °/s.
    Dps2000 = 0b11,
}

impl GyroRange {
    /// Decodes the two-bit field value, rejecting anything above `3`.
    pub const fn from_bits(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Dps250),
            1 => Some(Self::Dps500),
            2 => Some(Self::Dps1000),
            3 => Some(Self::Dps2000),
            _ => None,
        }
    }

    /// Looks up the range whose full scale is `dps`.
    pub const fn from_full_scale_dps(dps: u16) -> Option<Self> {
        match dps {
            250 => Some(Self::Dps250),
            500 => Some(Self::Dps500),
            1000 => Some(Self::Dps1000),
            2000 => Some(Self::Dps2000),
            _ => None,
        }
    }

    /// Returns the full-scale span in degrees per second.
    pub const fn full_scale_dps(self) -> i32 {
        match self {
            Self::Dps250 => 250,
            Self::Dps500 => 500,
            Self::Dps1000 => 1_000,
            Self::Dps2000 => 2_000,
        }
    }

    /// Converts a raw count to milli-degrees per second: `raw * 1000 * dps / 32768`.
    pub const fn milli_dps(self, raw: i32) -> i32 {
        (raw as i64 * 1_000 * self.full_scale_dps() as i64 / FULL_SCALE_COUNTS) as i32
    }
}

/// Digital low-pass filter selection (`CONFIG.DLPF_CFG`).
///
/// Bandwidths are quoted for the accelerometer path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 3]
pub enum DlpfConfig {
    /// 260 Hz, filter effectively bypassed; gyro output rate 8 kHz.
    Bw260Hz = 0,
    /// 184 Hz.
    Bw184Hz = 1,
    /// 94 Hz.
    Bw94Hz = 2,
    /// 44 Hz.
    Bw44Hz = 3,
    /// 21 Hz.
    Bw21Hz = 4,
    /// 10 Hz.
    Bw10Hz = 5,
    /// 5 Hz.
    Bw5Hz = 6,
    /// Reserved encoding; gyro output rate 8 kHz.
    Reserved = 7,
}

impl DlpfConfig {
    /// Decodes the three-bit field value, rejecting anything above `7`.
    pub const fn from_bits(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Bw260Hz),
            1 => Some(Self::Bw184Hz),
            2 => Some(Self::Bw94Hz),
            3 => Some(Self::Bw44Hz),
            4 => Some(Self::Bw21Hz),
            5 => Some(Self::Bw10Hz),
            6 => Some(Self::Bw5Hz),
            7 => Some(Self::Reserved),
            _ => None,
        }
    }

    /// Gyroscope output rate that feeds the sample-rate divider.
    pub const fn gyro_output_rate_hz(self) -> u32 {
        match self {
            Self::Bw260Hz | Self::Reserved => 8_000,
            _ => 1_000,
        }
    }
}

/// Clock source selection (`PWR_MGMT_1.CLKSEL`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 3]
pub enum ClockSource {
    /// Internal 8 MHz oscillator.
    Internal = 0,
    /// PLL with X-axis gyroscope reference.
    PllGyroX = 1,
    /// PLL with Y-axis gyroscope reference.
    PllGyroY = 2,
    /// PLL with Z-axis gyroscope reference.
    PllGyroZ = 3,
    /// PLL with external 32.768 kHz reference.
    PllExternal32k = 4,
    /// PLL with external 19.2 MHz reference.
    PllExternal19m = 5,
    /// Encoding 6 is reserved by the datasheet.
    Reserved = 6,
    /// Stops the clock and keeps the timing generator in reset.
    Stopped = 7,
}
