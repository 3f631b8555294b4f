//! Self-test and calibration against the fake bus.

use embedded_hal_mock::eh1::delay::NoopDelay;
use mpu6050_core::registers::{REG_ACCEL_CONFIG, REG_ACCEL_XOUT_H, REG_GYRO_CONFIG};
use mpu6050_core::{
    CalibrationOffsets, CalibrationSettings, DeviceState, Error, SelfTestLimits, TransportError,
};

use crate::common::{BusOp, attach, attach_initialized};

#[test]
fn self_test_passes_on_strong_response_and_restores_ranges() {
    let (imu, bus) = attach_initialized();
    imu.configure_ranges(8, 1000).unwrap();
    bus.set_self_test_response(3_000, 2_000);
    bus.clear_ops();

    let limits = SelfTestLimits::minimum_response(1_000, 500);
    let report = imu.run_self_test(&limits, &mut NoopDelay::new()).unwrap();

    assert!(report.passed);
    assert_eq!(report.accel_deviation, [3_000; 3]);
    assert_eq!(report.gyro_deviation, [2_000; 3]);
    assert_eq!(
        bus.writes(),
        vec![
            (REG_ACCEL_CONFIG, 0xF0),
            (REG_GYRO_CONFIG, 0xF0),
            (REG_ACCEL_CONFIG, 0x10),
            (REG_GYRO_CONFIG, 0x10),
        ]
    );
    assert_eq!(bus.register(REG_ACCEL_CONFIG), 0x10);
    assert_eq!(bus.register(REG_GYRO_CONFIG), 0x10);
}

#[test]
fn self_test_fails_without_a_response() {
    let (imu, _bus) = attach_initialized();

    let limits = SelfTestLimits::minimum_response(1_000, 500);
    let report = imu.run_self_test(&limits, &mut NoopDelay::new()).unwrap();

    assert!(!report.passed);
    assert_eq!(report.accel_deviation, [0; 3]);
    assert_eq!(report.gyro_deviation, [0; 3]);
}

#[test]
fn self_test_restores_ranges_after_a_failed_step() {
    let (imu, bus) = attach_initialized();
    bus.fail_write_to(REG_GYRO_CONFIG, TransportError::RemoteIo);

    let limits = SelfTestLimits::minimum_response(1_000, 500);
    assert_eq!(
        imu.run_self_test(&limits, &mut NoopDelay::new()),
        Err(Error::Interface(TransportError::RemoteIo))
    );
    assert_eq!(bus.register(REG_ACCEL_CONFIG), 0x00);
    assert_eq!(bus.register(REG_GYRO_CONFIG), 0x00);
}

#[test]
fn failed_restore_flags_the_handle_until_reset() {
    let (imu, bus) = attach_initialized();
    bus.set_self_test_response(3_000, 2_000);
    bus.fail_nth_write_to(REG_ACCEL_CONFIG, 2, TransportError::RemoteIo);

    let limits = SelfTestLimits::minimum_response(1_000, 500);
    assert_eq!(
        imu.run_self_test(&limits, &mut NoopDelay::new()),
        Err(Error::Interface(TransportError::RemoteIo))
    );
    assert_eq!(bus.register(REG_ACCEL_CONFIG), 0xE0);
    assert_eq!(bus.register(REG_GYRO_CONFIG), 0x00);
    assert!(!imu.config_in_sync());
    assert_eq!(imu.state(), DeviceState::Identified);
    assert_eq!(imu.read_scaled(), Err(Error::NotReady));

    imu.reset(&mut NoopDelay::new()).unwrap();
    assert!(imu.config_in_sync());
    assert_eq!(bus.register(REG_ACCEL_CONFIG), 0x00);
    assert_eq!(imu.read_scaled().unwrap().accel_x, 0);
}

#[test]
fn self_test_requires_a_configured_device() {
    let (imu, bus) = attach();

    let limits = SelfTestLimits::minimum_response(1, 1);
    assert_eq!(imu.run_self_test(&limits, &mut NoopDelay::new()), Err(Error::NotReady));
    assert!(bus.ops().is_empty());
}

#[test]
fn calibration_cancels_resting_bias() {
    let (imu, bus) = attach_initialized();

    let offsets = imu.calibrate(&CalibrationSettings::default(), &mut NoopDelay::new()).unwrap();

    assert_eq!(offsets, CalibrationOffsets { accel: [0, 0, 0], gyro: [-16_384, 0, 0] });
    let blocks = bus
        .ops()
        .iter()
        .filter(|op| matches!(op, BusOp::Block { register: REG_ACCEL_XOUT_H, .. }))
        .count();
    assert_eq!(blocks, 100);
}

#[test]
fn noisy_gyro_exhausts_every_attempt() {
    let (imu, bus) = attach_initialized();
    bus.set_gyro_noise(&[0, 500]);

    let settings = CalibrationSettings {
        samples: 10,
        max_spread: 100,
        max_attempts: 3,
    };
    assert_eq!(
        imu.calibrate(&settings, &mut NoopDelay::new()),
        Err(Error::CalibrationUnstable)
    );
    assert_eq!(bus.ops().len(), 30);
}

#[test]
fn calibration_rejects_empty_settings() {
    let (imu, bus) = attach_initialized();

    let settings = CalibrationSettings {
        samples: 0,
        ..CalibrationSettings::default()
    };
    assert_eq!(
        imu.calibrate(&settings, &mut NoopDelay::new()),
        Err(Error::InvalidArgument)
    );
    assert!(bus.ops().is_empty());
}
