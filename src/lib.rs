#![no_std]

#[macro_use]
mod log;

mod error;

pub mod calibration;
pub mod command;
pub mod config;
pub mod device;
pub mod interface;
pub mod params;
pub mod registers;
pub mod sample;

pub use crate::calibration::{CalibrationOffsets, CalibrationSettings};
pub use crate::command::{Command, Response};
pub use crate::config::{Config, ConfigError, ConfigField, RawConfig};
pub use crate::device::{DeviceState, Mpu6050};
pub use crate::error::{Error, Result, TransportError};
pub use crate::sample::{RawSample, ScaledSample};
pub use crate::self_test::{SelfTestLimits, SelfTestReport};
