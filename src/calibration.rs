//! Offset estimation for a device resting level and still.

use embedded_hal::delay::DelayNs;

use crate::device::{DeviceState, Shared};
use crate::error::{Error, Result};
use crate::interface::Mpu6050Interface;

/// Parameters for [`Mpu6050::calibrate`](crate::Mpu6050::calibrate).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationSettings {
    /// Samples averaged per attempt.
    pub samples: u16,
    /// Largest accepted peak-to-peak gyroscope spread, in raw counts.
    pub max_spread: u16,
    /// Attempts before giving up.
    pub max_attempts: u8,
}

impl Default for CalibrationSettings {
    fn default() -> Self {
        Self {
            samples: 100,
            max_spread: 100,
            max_attempts: 3,
        }
    }
}

/// Raw-count offsets that, added to a reading, cancel the resting bias.
///
/// The accelerometer Z offset leaves +1 g on the vertical axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationOffsets {
    /// Accelerometer offsets `[x, y, z]`.
    pub accel: [i16; 3],
    /// Gyroscope offsets `[x, y, z]`.
    pub gyro: [i16; 3],
}

#[derive(Default)]
struct Accumulator {
    accel_sum: [i64; 3],
    gyro_sum: [i64; 3],
    gyro_min: [i16; 3],
    gyro_max: [i16; 3],
    count: i64,
}

impl Accumulator {
    fn new() -> Self {
        Self {
            gyro_min: [i16::MAX; 3],
            gyro_max: [i16::MIN; 3],
            ..Self::default()
        }
    }

    fn add(&mut self, accel: [i16; 3], gyro: [i16; 3]) {
        for axis in 0..3 {
            self.accel_sum[axis] += accel[axis] as i64;
            self.gyro_sum[axis] += gyro[axis] as i64;
            self.gyro_min[axis] = self.gyro_min[axis].min(gyro[axis]);
            self.gyro_max[axis] = self.gyro_max[axis].max(gyro[axis]);
        }
        self.count += 1;
    }

    fn spread(&self) -> u32 {
        (0..3)
            .map(|axis| (self.gyro_max[axis] as i32 - self.gyro_min[axis] as i32).unsigned_abs())
            .max()
            .unwrap_or(0)
    }

    fn offsets(&self, counts_per_g: i32) -> CalibrationOffsets {
        let mean = |sum: i64| sum / self.count.max(1);
        let clamp = |value: i64| value.clamp(i16::MIN as i64, i16::MAX as i64) as i16;

        let mut offsets = CalibrationOffsets::default();
        for axis in 0..3 {
            offsets.accel[axis] = clamp(-mean(self.accel_sum[axis]));
            offsets.gyro[axis] = clamp(-mean(self.gyro_sum[axis]));
        }
        offsets.accel[2] = clamp(counts_per_g as i64 - mean(self.accel_sum[2]));
        offsets
    }
}

/// Averages resting samples, retrying while the gyroscope is too noisy.
///
/// Samples are spaced one output period apart.
pub(crate) fn calibrate<IFACE, CommE>(
    shared: &mut Shared<IFACE>,
    settings: &CalibrationSettings,
    delay: &mut impl DelayNs,
) -> Result<CalibrationOffsets, CommE>
where
    IFACE: Mpu6050Interface<Error = CommE>,
{
    shared.require(DeviceState::Configured)?;
    if settings.samples == 0 || settings.max_attempts == 0 {
        return Err(Error::InvalidArgument);
    }

    let period_us = 1_000_000 / shared.config.sample_rate_hz().max(1);
    let counts_per_g = shared.config.accel_range.counts_per_g();

    for attempt in 1..=settings.max_attempts {
        let mut acc = Accumulator::new();
        for _ in 0..settings.samples {
            let sample = shared.read_sample()?;
            acc.add(sample.accel(), sample.gyro());
            delay.delay_us(period_us);
        }

        let spread = acc.spread();
        if spread <= settings.max_spread as u32 {
            debug!("calibration settled after {} attempt(s)", attempt);
            return Ok(acc.offsets(counts_per_g));
        }
        debug!("calibration attempt {} rejected (spread {})", attempt, spread);
    }

    warn!("calibration did not settle");
    Err(Error::CalibrationUnstable)
}
