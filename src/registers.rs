//! Register map definitions for the MPU-6050 motion tracking device.
#![allow(unused_parens)]

use modular_bitfield::prelude::*;

use crate::params::{AccelRange, ClockSource, DlpfConfig, GyroRange};

/// I²C address with the AD0 pin tied low.
pub const I2C_ADDRESS_AD0_LOW: u8 = 0x68;
/// I²C address with the AD0 pin tied high.
pub const I2C_ADDRESS_AD0_HIGH: u8 = 0x69;

/// Register address of `SELF_TEST_X`.
pub const REG_SELF_TEST_X: u8 = 0x0D;
/// Register address of `SELF_TEST_Y`.
pub const REG_SELF_TEST_Y: u8 = 0x0E;
/// Register address of `SELF_TEST_Z`.
pub const REG_SELF_TEST_Z: u8 = 0x0F;
/// Register address of `SELF_TEST_A`.
pub const REG_SELF_TEST_A: u8 = 0x10;
/// Register address of `SMPLRT_DIV`.
pub const REG_SMPLRT_DIV: u8 = 0x19;
/// Register address of `CONFIG`.
pub const REG_CONFIG: u8 = 0x1A;
/// Register address of `GYRO_CONFIG`.
pub const REG_GYRO_CONFIG: u8 = 0x1B;
/// Register address of `ACCEL_CONFIG`.
pub const REG_ACCEL_CONFIG: u8 = 0x1C;
/// Register address of `FIFO_EN`.
pub const REG_FIFO_EN: u8 = 0x23;
/// Register address of `INT_PIN_CFG`.
pub const REG_INT_PIN_CFG: u8 = 0x37;
/// Register address of `INT_ENABLE`.
pub const REG_INT_ENABLE: u8 = 0x38;
/// Register address of `INT_STATUS`.
pub const REG_INT_STATUS: u8 = 0x3A;
/// Register address of `ACCEL_XOUT_H`, the base of the 14-byte sample block.
pub const REG_ACCEL_XOUT_H: u8 = 0x3B;
/// Register address of `TEMP_OUT_H`.
pub const REG_TEMP_OUT_H: u8 = 0x41;
/// Register address of `GYRO_XOUT_H`.
pub const REG_GYRO_XOUT_H: u8 = 0x43;
/// Register address of `GYRO_ZOUT_L`, the last byte of the sample block.
pub const REG_GYRO_ZOUT_L: u8 = 0x48;
/// Register address of `PWR_MGMT_1`.
pub const REG_PWR_MGMT_1: u8 = 0x6B;
/// Register address of `PWR_MGMT_2`.
pub const REG_PWR_MGMT_2: u8 = 0x6C;
/// Register address of `WHO_AM_I`.
pub const REG_WHO_AM_I: u8 = 0x75;

/// Value reported by `WHO_AM_I` on a genuine MPU-6050.
pub const EXPECTED_WHO_AM_I: u8 = 0x68;

/// `PWR_MGMT_1` value that triggers a full device reset.
pub const PWR1_DEVICE_RESET: u8 = 0x80;
/// `PWR_MGMT_1` value that puts the device to sleep.
pub const PWR1_SLEEP: u8 = 0x40;
/// `PWR_MGMT_1` value for full power on the internal oscillator.
pub const PWR1_FULL_POWER: u8 = 0x00;

/// Axis self-test enable bits shared by `GYRO_CONFIG` and `ACCEL_CONFIG`.
pub const SELF_TEST_ENABLE_MASK: u8 = 0xE0;

/// Number of bytes spanning accel, temperature and gyro outputs.
pub const SAMPLE_BLOCK_LEN: usize = (REG_GYRO_ZOUT_L - REG_ACCEL_XOUT_H + 1) as usize;

/// Access permissions encoded for each register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterAccess {
    /// Read-only register.
    ReadOnly,
    /// Write-only register.
    WriteOnly,
    /// Read/write register.
    ReadWrite,
}

/// Minimal metadata exposed by every register value type.
pub trait Register {
    /// Raw storage backing the register payload.
    type Raw: Copy;
    /// Register address as documented in the register map.
    const ADDRESS: u8;
    /// Access permission classification.
    const ACCESS: RegisterAccess;
    /// Power-on reset value defined by the register map.
    const RESET_VALUE: Option<Self::Raw>;
}

/// Bitfield representation of the `CONFIG` register (address `0x1A`).
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Configuration {
    // Digital low-pass filter selection (bits 2:0).
    pub dlpf: DlpfConfig,
    // FSYNC pin sampling location (bits 5:3).
    pub ext_sync_set: B3,
    #[skip]
    __: B2,
}

/// Bitfield representation of the `GYRO_CONFIG` register (address `0x1B`).
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GyroConfig {
    #[skip]
    __: B3,
    // Full-scale range selection (bits 4:3).
    pub fs_sel: GyroRange,
    // Z-axis self-test enable (bit 5).
    pub zg_st: bool,
    // Y-axis self-test enable (bit 6).
    pub yg_st: bool,
    // X-axis self-test enable (bit 7).
    pub xg_st: bool,
}

/// Bitfield representation of the `ACCEL_CONFIG` register (address `0x1C`).
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccelConfig {
    // Digital high-pass filter selection (bits 2:0).
    pub accel_hpf: B3,
    // Full-scale range selection (bits 4:3).
    pub afs_sel: AccelRange,
    // Z-axis self-test enable (bit 5).
    pub za_st: bool,
    // Y-axis self-test enable (bit 6).
    pub ya_st: bool,
    // X-axis self-test enable (bit 7).
    pub xa_st: bool,
}

/// Bitfield representation of the `PWR_MGMT_1` register (address `0x6B`).
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerManagement1 {
    // Clock source selection (bits 2:0).
    pub clksel: ClockSource,
    // Temperature sensor disable (bit 3).
    pub temp_dis: bool,
    #[skip]
    __: B1,
    // Cycle between sleep and single samples (bit 5).
    pub cycle: bool,
    // Low-power sleep mode (bit 6).
    pub sleep: bool,
    // Reset all internal registers to defaults (bit 7).
    pub device_reset: bool,
}

macro_rules! impl_u8_register {
    ($ty:ty, $addr:expr, $access:expr, $reset:expr) => {
        impl From<u8> for $ty {
            fn from(value: u8) -> Self {
                Self::from_bytes([value])
            }
        }

        impl From<$ty> for u8 {
            fn from(value: $ty) -> Self {
                value.into_bytes()[0]
            }
        }

        impl Register for $ty {
            type Raw = u8;
            const ADDRESS: u8 = $addr;
            const ACCESS: RegisterAccess = $access;
            const RESET_VALUE: Option<Self::Raw> = $reset;
        }
    };
}

impl_u8_register!(Configuration, REG_CONFIG, RegisterAccess::ReadWrite, Some(0x00));
impl_u8_register!(GyroConfig, REG_GYRO_CONFIG, RegisterAccess::ReadWrite, Some(0x00));
impl_u8_register!(AccelConfig, REG_ACCEL_CONFIG, RegisterAccess::ReadWrite, Some(0x00));
impl_u8_register!(PowerManagement1, REG_PWR_MGMT_1, RegisterAccess::ReadWrite, Some(PWR1_SLEEP));

impl GyroConfig {
    /// Sets or clears the self-test bits of all three axes.
    pub fn with_self_test(self, enabled: bool) -> Self {
        self.with_xg_st(enabled).with_yg_st(enabled).with_zg_st(enabled)
    }
}

impl AccelConfig {
    /// Sets or clears the self-test bits of all three axes.
    pub fn with_self_test(self, enabled: bool) -> Self {
        self.with_xa_st(enabled).with_ya_st(enabled).with_za_st(enabled)
    }
}

/// `PWR_MGMT_1` value that runs the device awake on `clock`.
pub fn normal_run_value(clock: ClockSource) -> u8 {
    u8::from(PowerManagement1::new().with_clksel(clock))
}
