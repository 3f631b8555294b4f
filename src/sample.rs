//! Sample decoding and unit conversion.

use crate::config::Config;
use crate::registers::SAMPLE_BLOCK_LEN;

/// One unconverted reading of every output channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawSample {
    /// Accelerometer X-axis counts.
    pub accel_x: i16,
    /// Accelerometer Y-axis counts.
    pub accel_y: i16,
    /// Accelerometer Z-axis counts.
    pub accel_z: i16,
    /// Temperature sensor counts.
    pub temp: i16,
    /// Gyroscope X-axis counts.
    pub gyro_x: i16,
    /// Gyroscope Y-axis counts.
    pub gyro_y: i16,
    /// Gyroscope Z-axis counts.
    pub gyro_z: i16,
}

impl RawSample {
    /// Decodes the `ACCEL_XOUT_H..=GYRO_ZOUT_L` block (big-endian words).
    pub fn from_be_bytes(block: &[u8; SAMPLE_BLOCK_LEN]) -> Self {
        let word = |index: usize| i16::from_be_bytes([block[2 * index], block[2 * index + 1]]);

        Self {
            accel_x: word(0),
            accel_y: word(1),
            accel_z: word(2),
            temp: word(3),
            gyro_x: word(4),
            gyro_y: word(5),
            gyro_z: word(6),
        }
    }

    /// Accelerometer counts as an `[x, y, z]` triplet.
    pub fn accel(&self) -> [i16; 3] {
        [self.accel_x, self.accel_y, self.accel_z]
    }

    /// Gyroscope counts as an `[x, y, z]` triplet.
    pub fn gyro(&self) -> [i16; 3] {
        [self.gyro_x, self.gyro_y, self.gyro_z]
    }
}

/// A reading converted to physical units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScaledSample {
    /// Accelerometer X-axis in milli-g.
    pub accel_x: i32,
    /// Accelerometer Y-axis in milli-g.
    pub accel_y: i32,
    /// Accelerometer Z-axis in milli-g.
    pub accel_z: i32,
    /// Die temperature in hundredths of a degree Celsius.
    pub temp: i32,
    /// Gyroscope X-axis in milli-degrees per second.
    pub gyro_x: i32,
    /// Gyroscope Y-axis in milli-degrees per second.
    pub gyro_y: i32,
    /// Gyroscope Z-axis in milli-degrees per second.
    pub gyro_z: i32,
}

impl ScaledSample {
    /// Scales `raw` with the ranges of `config`.
    ///
    /// `config` must be the configuration that was active when `raw` was captured.
    pub fn from_raw(raw: &RawSample, config: &Config) -> Self {
        let accel = |value: i16| config.accel_range.milli_g(value as i32);
        let gyro = |value: i16| config.gyro_range.milli_dps(value as i32);

        Self {
            accel_x: accel(raw.accel_x),
            accel_y: accel(raw.accel_y),
            accel_z: accel(raw.accel_z),
            temp: centi_celsius(raw.temp as i32),
            gyro_x: gyro(raw.gyro_x),
            gyro_y: gyro(raw.gyro_y),
            gyro_z: gyro(raw.gyro_z),
        }
    }
}

/// Converts temperature counts to centi-degrees: `raw * 100 / 340 + 3653`.
///
/// Derived from `T(°C) = raw / 340 + 36.53`.
pub const fn centi_celsius(raw: i32) -> i32 {
    raw * 100 / 340 + 3653
}
