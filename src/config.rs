//! Configuration primitives for the MPU-6050 driver.

use crate::params::{AccelRange, DlpfConfig, GyroRange};
use crate::registers::{AccelConfig, Configuration, GyroConfig};

/// Sample-rate divider applied at attach time.
pub const DEFAULT_SAMPLE_RATE_DIV: u8 = 0x07;

/// User-facing configuration for the MPU-6050 sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Divider applied to the gyroscope output rate (`SMPLRT_DIV`).
    pub sample_rate_div: u8,
    /// Gyroscope full-scale range.
    pub gyro_range: GyroRange,
    /// Accelerometer full-scale range.
    pub accel_range: AccelRange,
    /// Digital low-pass filter selection.
    pub dlpf: DlpfConfig,
}

impl Config {
    /// Begins building a [`Config`] using the builder pattern.
    pub fn new() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Effective output data rate in hertz.
    pub const fn sample_rate_hz(&self) -> u32 {
        self.dlpf.gyro_output_rate_hz() / (1 + self.sample_rate_div as u32)
    }

    /// Value programmed into `CONFIG`.
    pub fn config_register(&self) -> u8 {
        u8::from(Configuration::new().with_dlpf(self.dlpf))
    }

    /// Value programmed into `GYRO_CONFIG`.
    pub fn gyro_config_register(&self) -> u8 {
        u8::from(GyroConfig::new().with_fs_sel(self.gyro_range))
    }

    /// Value programmed into `ACCEL_CONFIG`.
    pub fn accel_config_register(&self) -> u8 {
        u8::from(AccelConfig::new().with_afs_sel(self.accel_range))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sample_rate_div: DEFAULT_SAMPLE_RATE_DIV,
            gyro_range: GyroRange::Dps250,
            accel_range: AccelRange::G2,
            dlpf: DlpfConfig::Bw260Hz,
        }
    }
}

/// Builder for [`Config`] allowing piecemeal construction.
#[derive(Debug, Clone, Copy)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Creates a new builder seeded with [`Config::default()`].
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Overrides the sample-rate divider.
    pub fn sample_rate_div(mut self, div: u8) -> Self {
        self.config.sample_rate_div = div;
        self
    }

    /// Overrides the gyroscope range.
    pub fn gyro_range(mut self, range: GyroRange) -> Self {
        self.config.gyro_range = range;
        self
    }

    /// Overrides the accelerometer range.
    pub fn accel_range(mut self, range: AccelRange) -> Self {
        self.config.accel_range = range;
        self
    }

    /// Overrides the low-pass filter selection.
    pub fn dlpf(mut self, dlpf: DlpfConfig) -> Self {
        self.config.dlpf = dlpf;
        self
    }

    /// Finalizes the builder and returns the [`Config`].
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Untyped configuration exactly as an adapter receives it from its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawConfig {
    /// Sample-rate divider (0-255).
    pub sample_rate_div: u8,
    /// Gyroscope range index (0-3).
    pub gyro_range: u8,
    /// Accelerometer range index (0-3).
    pub accel_range: u8,
    /// Low-pass filter selection (0-7).
    pub dlpf_cfg: u8,
}

impl From<Config> for RawConfig {
    fn from(config: Config) -> Self {
        Self {
            sample_rate_div: config.sample_rate_div,
            gyro_range: config.gyro_range as u8,
            accel_range: config.accel_range as u8,
            dlpf_cfg: config.dlpf as u8,
        }
    }
}

impl TryFrom<RawConfig> for Config {
    type Error = ConfigError;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        let gyro_range = GyroRange::from_bits(raw.gyro_range)
            .ok_or(ConfigError::invalid(ConfigField::GyroRange, raw.gyro_range as u16))?;
        let accel_range = AccelRange::from_bits(raw.accel_range)
            .ok_or(ConfigError::invalid(ConfigField::AccelRange, raw.accel_range as u16))?;
        let dlpf = DlpfConfig::from_bits(raw.dlpf_cfg)
            .ok_or(ConfigError::invalid(ConfigField::Dlpf, raw.dlpf_cfg as u16))?;

        Ok(Self {
            sample_rate_div: raw.sample_rate_div,
            gyro_range,
            accel_range,
            dlpf,
        })
    }
}

/// Configuration field named in a [`ConfigError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigField {
    /// Gyroscope range index.
    GyroRange,
    /// Accelerometer range index.
    AccelRange,
    /// Low-pass filter selection.
    Dlpf,
}

/// Validation errors generated while verifying a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A field lies outside its enumerated domain.
    InvalidValue {
        /// Offending field.
        field: ConfigField,
        /// Rejected value.
        value: u16,
    },
}

impl ConfigError {
    pub(crate) const fn invalid(field: ConfigField, value: u16) -> Self {
        Self::InvalidValue { field, value }
    }
}
