//! High-level MPU-6050 device driver implementation.
//!
//! [`Mpu6050`] owns the bus interface and the driver state behind one blocking
//! mutex. Every public operation takes that lock once and keeps it for its
//! whole register sequence, so concurrent callers observe each operation as a
//! single atomic step.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{I2c, SevenBitAddress};
use embedded_hal::spi::SpiDevice;

use crate::calibration::{self, CalibrationOffsets, CalibrationSettings};
use crate::config::{Config, ConfigError, ConfigField, RawConfig};
use crate::error::{Error, Result};
use crate::interface::Mpu6050Interface;
use crate::interface::i2c::I2cInterface;
use crate::interface::spi::SpiInterface;
use crate::params::{AccelRange, ClockSource, GyroRange};
use crate::registers::{
    EXPECTED_WHO_AM_I,
    PWR1_FULL_POWER,
    PWR1_SLEEP,
    PowerManagement1,
    REG_ACCEL_CONFIG,
    REG_ACCEL_XOUT_H,
    REG_CONFIG,
    REG_GYRO_CONFIG,
    REG_PWR_MGMT_1,
    REG_SMPLRT_DIV,
    REG_WHO_AM_I,
    Register,
    SAMPLE_BLOCK_LEN,
    normal_run_value,
};
use crate::sample::{RawSample, ScaledSample};
use crate::self_test::{self, SelfTestLimits, SelfTestReport};

// Settle time after the device-reset bit is written (milliseconds).
const RESET_SETTLE_MS: u32 = 100;
// Settle time after waking the device and selecting its clock (milliseconds).
const WAKE_SETTLE_MS: u32 = 50;
// Valid 7-bit I²C addresses outside the reserved blocks.
const VALID_BUS_ADDRESSES: core::ops::RangeInclusive<u8> = 0x08..=0x77;

/// Lifecycle of a device handle.
///
/// Reading, reconfiguring, self-testing and resetting all happen inside the
/// handle's critical section and are never observable from outside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceState {
    /// Attached, identity not yet confirmed.
    Uninitialized,
    /// `WHO_AM_I` matched; no configuration applied yet.
    Identified,
    /// A configuration has been fully applied.
    Configured,
}

/// State guarded by the handle's lock.
pub(crate) struct Shared<IFACE> {
    pub(crate) interface: IFACE,
    pub(crate) config: Config,
    pub(crate) identity: Option<u8>,
    pub(crate) state: DeviceState,
    pub(crate) clock: ClockSource,
    pub(crate) config_in_sync: bool,
}

/// High-level synchronous driver for the MPU-6050.
///
/// `M` selects the raw mutex guarding the device: `CriticalSectionRawMutex`
/// when the handle is shared between threads or interrupt contexts,
/// `NoopRawMutex` when it never leaves one context.
pub struct Mpu6050<M, IFACE> {
    shared: Mutex<M, RefCell<Shared<IFACE>>>,
}

impl<M, IFACE> Mpu6050<M, IFACE>
where
    M: RawMutex,
{
    // ==================================================================
    // == Driver Construction & Ownership ===============================
    // ==================================================================
    /// Creates a new driver instance from the provided bus interface.
    ///
    /// `config` is the configuration [`init`](Self::init) will apply. The
    /// device is woken on the PLL with X-gyro reference.
    pub fn new(interface: IFACE, config: Config) -> Self {
        Self::with_clock(interface, config, ClockSource::PllGyroX)
    }

    /// Creates a new driver instance that runs the device on `clock`.
    pub fn with_clock(interface: IFACE, config: Config, clock: ClockSource) -> Self {
        Self {
            shared: Mutex::new(RefCell::new(Shared {
                interface,
                config,
                identity: None,
                state: DeviceState::Uninitialized,
                clock,
                config_in_sync: false,
            })),
        }
    }

    /// Consumes the driver and returns the owned interface and last applied configuration.
    pub fn release(self) -> (IFACE, Config) {
        let shared = self.shared.into_inner().into_inner();
        (shared.interface, shared.config)
    }

    /// Runs `f` with exclusive access to the guarded state.
    pub(crate) fn locked<R>(&self, f: impl FnOnce(&mut Shared<IFACE>) -> R) -> R {
        self.shared.lock(|cell| f(&mut cell.borrow_mut()))
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> DeviceState {
        self.locked(|shared| shared.state)
    }

    /// Returns a copy of the active configuration (GET_CONFIG).
    pub fn config(&self) -> Config {
        self.locked(|shared| shared.config)
    }

    /// Identity byte cached by the last successful identification.
    pub fn identity(&self) -> Option<u8> {
        self.locked(|shared| shared.identity)
    }

    /// Clock source written whenever the device is brought out of reset.
    pub fn clock_source(&self) -> ClockSource {
        self.locked(|shared| shared.clock)
    }

    /// `false` while the hardware may not match the stored configuration.
    ///
    /// Cleared when a configuration write, a reset or a self-test restore fails
    /// after the device was already touched; the handle also drops back to
    /// [`DeviceState::Identified`] so reads are refused. A later successful
    /// apply or reset sets it again.
    pub fn config_in_sync(&self) -> bool {
        self.locked(|shared| shared.config_in_sync)
    }
}

impl<M, I2C> Mpu6050<M, I2cInterface<I2C>>
where
    M: RawMutex,
    I2C: I2c,
{
    // ==================================================================
    // == Bus Convenience Constructors ==================================
    // ==================================================================
    /// Convenience constructor for I²C transports.
    pub fn new_i2c(i2c: I2C, address: SevenBitAddress, config: Config) -> Self {
        Self::new(I2cInterface::new(i2c, address), config)
    }

    /// Releases the driver, returning the I²C bus and configuration.
    pub fn release_i2c(self) -> (I2C, Config) {
        let (iface, config) = self.release();
        (iface.release(), config)
    }
}

impl<M, SPI> Mpu6050<M, SpiInterface<SPI>>
where
    M: RawMutex,
    SPI: SpiDevice,
{
    /// Convenience constructor for MPU-6000 SPI transports.
    pub fn new_spi(spi: SPI, config: Config) -> Self {
        Self::new(SpiInterface::new(spi), config)
    }

    /// Releases the driver, returning the SPI device and configuration.
    pub fn release_spi(self) -> (SPI, Config) {
        let (iface, config) = self.release();
        (iface.release(), config)
    }
}

impl<M, IFACE, CommE> Mpu6050<M, IFACE>
where
    M: RawMutex,
    IFACE: Mpu6050Interface<Error = CommE>,
{
    // ==================================================================
    // == Initialization & Identification ===============================
    // ==================================================================
    /// Identifies the device, wakes it and applies the stored configuration.
    pub fn init(&self, delay: &mut impl DelayNs) -> Result<(), CommE> {
        self.locked(|shared| -> Result<(), CommE> {
            shared.identify()?;

            let wake = normal_run_value(shared.clock);
            shared.write_register(REG_PWR_MGMT_1, wake)?;
            delay.delay_ms(WAKE_SETTLE_MS);

            let config = shared.config;
            shared.apply_config(config)?;
            info!("MPU-6050 initialized");
            Ok(())
        })
    }

    /// Confirms the device answers with the MPU-6050 identity (IDENTIFY).
    pub fn identify(&self) -> Result<u8, CommE> {
        self.locked(|shared| shared.identify())
    }

    /// Reads `WHO_AM_I` without judging the value.
    pub fn who_am_i(&self) -> Result<u8, CommE> {
        self.locked(|shared| -> Result<u8, CommE> {
            shared.check_bus_address()?;
            Ok(shared.interface.read_u8(REG_WHO_AM_I)?)
        })
    }

    /// Returns `true` when an MPU-6050 answers on the bus; never fails.
    pub fn is_present(&self) -> bool {
        self.locked(|shared| shared.read_identity().is_ok())
    }

    // ==================================================================
    // == Configuration =================================================
    // ==================================================================
    /// Applies a new configuration to the device (SET_CONFIG).
    ///
    /// The stored configuration changes only after every register write succeeded.
    pub fn set_config(&self, config: Config) -> Result<(), CommE> {
        self.locked(|shared| shared.apply_config(config))
    }

    /// Validates and applies an untyped configuration.
    ///
    /// Out-of-range fields are rejected before the lock is taken, so the bus sees
    /// no traffic and the active configuration stays in effect.
    pub fn set_raw_config(&self, raw: RawConfig) -> Result<(), CommE> {
        match Config::try_from(raw) {
            Ok(config) => self.set_config(config),
            Err(err) => Err(Error::InvalidConfig(err)),
        }
    }

    /// Selects ranges by physical full scale (2/4/8/16 g, 250/500/1000/2000 °/s),
    /// keeping the divider and filter settings.
    pub fn configure_ranges(&self, accel_g: u16, gyro_dps: u16) -> Result<(), CommE> {
        let Some(accel_range) = AccelRange::from_full_scale_g(accel_g) else {
            return Err(Error::InvalidConfig(ConfigError::invalid(
                ConfigField::AccelRange,
                accel_g,
            )));
        };
        let Some(gyro_range) = GyroRange::from_full_scale_dps(gyro_dps) else {
            return Err(Error::InvalidConfig(ConfigError::invalid(
                ConfigField::GyroRange,
                gyro_dps,
            )));
        };

        self.locked(|shared| {
            let config = Config {
                accel_range,
                gyro_range,
                ..shared.config
            };
            shared.apply_config(config)
        })
    }

    // ==================================================================
    // == Data Acquisition ==============================================
    // ==================================================================
    /// Reads one raw sample of every channel (READ_RAW).
    pub fn read_raw(&self) -> Result<RawSample, CommE> {
        self.locked(|shared| -> Result<RawSample, CommE> {
            shared.require(DeviceState::Configured)?;
            shared.read_sample()
        })
    }

    /// Reads one sample converted to physical units (READ_SCALED).
    pub fn read_scaled(&self) -> Result<ScaledSample, CommE> {
        self.read_scaled_with_config().map(|(scaled, _)| scaled)
    }

    /// Reads one scaled sample together with the configuration that scaled it.
    ///
    /// The configuration snapshot and the block read share one critical
    /// section; only the arithmetic runs after the lock is released.
    pub fn read_scaled_with_config(&self) -> Result<(ScaledSample, Config), CommE> {
        let (raw, config) = self.locked(|shared| -> Result<(RawSample, Config), CommE> {
            shared.require(DeviceState::Configured)?;
            let config = shared.config;
            let raw = shared.read_sample()?;
            Ok((raw, config))
        })?;

        Ok((ScaledSample::from_raw(&raw, &config), config))
    }

    // ==================================================================
    // == Reset & Power =================================================
    // ==================================================================
    /// Resets the device and brings it back to the stored configuration (RESET).
    ///
    /// The reset bit is always written before the normal-run clock selection.
    /// Once the reset bit is accepted the hardware is back at power-on values,
    /// so any later failure leaves the handle out of sync until the next
    /// successful apply or reset.
    pub fn reset(&self, delay: &mut impl DelayNs) -> Result<(), CommE> {
        self.locked(|shared| -> Result<(), CommE> {
            shared.write(PowerManagement1::new().with_device_reset(true))?;
            shared.mark_out_of_sync();
            delay.delay_ms(RESET_SETTLE_MS);

            let run = normal_run_value(shared.clock);
            shared.write_register(REG_PWR_MGMT_1, run)?;

            if shared.state >= DeviceState::Identified {
                let config = shared.config;
                shared.apply_config(config)?;
            }
            debug!("device reset complete");
            Ok(())
        })
    }

    /// Switches between full power and sleep.
    pub fn set_power(&self, on: bool) -> Result<(), CommE> {
        let value = if on { PWR1_FULL_POWER } else { PWR1_SLEEP };
        self.locked(|shared| shared.write_register(REG_PWR_MGMT_1, value))
    }

    // ==================================================================
    // == Self-Test & Calibration =======================================
    // ==================================================================
    /// Executes the self-test routine against caller-supplied limits (SELF_TEST).
    pub fn run_self_test(
        &self,
        limits: &SelfTestLimits,
        delay: &mut impl DelayNs,
    ) -> Result<SelfTestReport, CommE> {
        self.locked(|shared| self_test::run_self_test(shared, limits, delay))
    }

    /// Estimates per-axis offsets while the device rests level and still.
    pub fn calibrate(
        &self,
        settings: &CalibrationSettings,
        delay: &mut impl DelayNs,
    ) -> Result<CalibrationOffsets, CommE> {
        self.locked(|shared| calibration::calibrate(shared, settings, delay))
    }
}

impl<IFACE, CommE> Shared<IFACE>
where
    IFACE: Mpu6050Interface<Error = CommE>,
{
    /// Hardware no longer matches `config`; refuse reads until it is re-applied.
    pub(crate) fn mark_out_of_sync(&mut self) {
        self.config_in_sync = false;
        if self.state == DeviceState::Configured {
            self.state = DeviceState::Identified;
        }
    }

    pub(crate) fn require(&self, state: DeviceState) -> Result<(), CommE> {
        if self.state < state {
            return Err(Error::NotReady);
        }
        Ok(())
    }

    fn check_bus_address(&self) -> Result<(), CommE> {
        match self.interface.bus_address() {
            Some(address) if !VALID_BUS_ADDRESSES.contains(&address) => {
                warn!("invalid bus address {:#x}", address);
                Err(Error::InvalidArgument)
            }
            _ => Ok(()),
        }
    }

    fn read_identity(&mut self) -> Result<u8, CommE> {
        self.check_bus_address()?;

        let found = self.interface.read_u8(REG_WHO_AM_I)?;
        if found != EXPECTED_WHO_AM_I {
            warn!("unexpected WHO_AM_I value {:#x}", found);
            return Err(Error::UnexpectedIdentity(found));
        }
        Ok(found)
    }

    fn identify(&mut self) -> Result<u8, CommE> {
        let found = self.read_identity()?;
        self.identity = Some(found);
        if self.state == DeviceState::Uninitialized {
            self.state = DeviceState::Identified;
        }
        info!("MPU-6050 detected (WHO_AM_I: {:#x})", found);
        Ok(found)
    }

    pub(crate) fn write_register(&mut self, register: u8, value: u8) -> Result<(), CommE> {
        trace!("write {:#x} <- {:#x}", register, value);
        self.interface.write_u8(register, value).map_err(Error::from)
    }

    /// Writes a typed register value to its own address.
    pub(crate) fn write<R>(&mut self, value: R) -> Result<(), CommE>
    where
        R: Register<Raw = u8> + Into<u8>,
    {
        self.write_register(R::ADDRESS, value.into())
    }

    /// Reads a typed register value from its own address.
    pub(crate) fn read<R>(&mut self) -> Result<R, CommE>
    where
        R: Register<Raw = u8> + From<u8>,
    {
        let raw = self.interface.read_u8(R::ADDRESS)?;
        Ok(R::from(raw))
    }

    /// One block read of all output registers; short transfers are errors.
    pub(crate) fn read_sample(&mut self) -> Result<RawSample, CommE> {
        let mut block = [0u8; SAMPLE_BLOCK_LEN];
        let received = self.interface.read_block(REG_ACCEL_XOUT_H, &mut block)?;
        if received != SAMPLE_BLOCK_LEN {
            warn!("sample read returned {} of {} bytes", received, SAMPLE_BLOCK_LEN);
            return Err(Error::PartialTransfer {
                expected: SAMPLE_BLOCK_LEN,
                received,
            });
        }

        Ok(RawSample::from_be_bytes(&block))
    }

    pub(crate) fn apply_config(&mut self, config: Config) -> Result<(), CommE> {
        self.require(DeviceState::Identified)?;

        if let Err(err) = self.write_config_registers(&config) {
            self.mark_out_of_sync();
            warn!("configuration write failed; hardware may be partially updated");
            return Err(err);
        }

        self.config = config;
        self.config_in_sync = true;
        self.state = DeviceState::Configured;
        debug!(
            "configuration applied: div={} gyro={} accel={} dlpf={}",
            config.sample_rate_div,
            config.gyro_range as u8,
            config.accel_range as u8,
            config.dlpf as u8
        );
        Ok(())
    }

    fn write_config_registers(&mut self, config: &Config) -> Result<(), CommE> {
        self.write_register(REG_SMPLRT_DIV, config.sample_rate_div)?;
        self.write_register(REG_CONFIG, config.config_register())?;
        self.write_register(REG_GYRO_CONFIG, config.gyro_config_register())?;
        self.write_register(REG_ACCEL_CONFIG, config.accel_config_register())?;
        Ok(())
    }
}
