//! Request/response surface for adapters that dispatch on a command code.
//!
//! A character-device or IPC front end decodes its request into a
//! [`Command`], hands it to [`Mpu6050::execute`] and encodes the [`Response`].

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::delay::DelayNs;

use crate::calibration::{CalibrationOffsets, CalibrationSettings};
use crate::config::RawConfig;
use crate::device::Mpu6050;
use crate::error::Result;
use crate::interface::Mpu6050Interface;
use crate::sample::{RawSample, ScaledSample};
use crate::self_test::{SelfTestLimits, SelfTestReport};

/// One driver operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Check `WHO_AM_I` against the MPU-6050 identity.
    Identify,
    /// Read `WHO_AM_I` without judging it.
    WhoAmI,
    /// Report the active configuration.
    GetConfig,
    /// Validate and apply a configuration.
    SetConfig(RawConfig),
    /// Read one unconverted sample.
    ReadRaw,
    /// Read one sample in physical units.
    ReadScaled,
    /// Reset the device and re-apply the stored configuration.
    Reset,
    /// Run the self-test against the given limits.
    SelfTest(SelfTestLimits),
    /// Estimate resting offsets.
    Calibrate(CalibrationSettings),
    /// `true` wakes the device, `false` puts it to sleep.
    SetPower(bool),
}

/// Successful outcome of a [`Command`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Response {
    /// Confirmed identity byte.
    Identified(u8),
    /// Raw `WHO_AM_I` value.
    WhoAmI(u8),
    /// Active configuration in wire form.
    Config(RawConfig),
    /// Unconverted sample.
    Raw(RawSample),
    /// Sample in physical units.
    Scaled(ScaledSample),
    /// Self-test outcome.
    SelfTest(SelfTestReport),
    /// Estimated offsets.
    Calibrated(CalibrationOffsets),
    /// The command completed without a payload.
    Done,
}

impl<M, IFACE, CommE> Mpu6050<M, IFACE>
where
    M: RawMutex,
    IFACE: Mpu6050Interface<Error = CommE>,
{
    /// Runs `command` against the device.
    pub fn execute(
        &self,
        command: Command,
        delay: &mut impl DelayNs,
    ) -> Result<Response, CommE> {
        let response = match command {
            Command::Identify => Response::Identified(self.identify()?),
            Command::WhoAmI => Response::WhoAmI(self.who_am_i()?),
            Command::GetConfig => Response::Config(RawConfig::from(self.config())),
            Command::SetConfig(raw) => {
                self.set_raw_config(raw)?;
                Response::Done
            }
            Command::ReadRaw => Response::Raw(self.read_raw()?),
            Command::ReadScaled => Response::Scaled(self.read_scaled()?),
            Command::Reset => {
                self.reset(delay)?;
                Response::Done
            }
            Command::SelfTest(limits) => Response::SelfTest(self.run_self_test(&limits, delay)?),
            Command::Calibrate(settings) => {
                Response::Calibrated(self.calibrate(&settings, delay)?)
            }
            Command::SetPower(on) => {
                self.set_power(on)?;
                Response::Done
            }
        };
        Ok(response)
    }
}
