//! Register-file fake of an MPU-6050 on a shared bus.
//!
//! The fake keeps a full 128-byte register file, records every transfer and
//! synthesises output data from the ranges currently programmed, so a driver
//! that scales with the right configuration always sees +1 g on Z and
//! +125 °/s on X.

use std::sync::{Arc, Mutex, MutexGuard};

use mpu6050_core::TransportError;
use mpu6050_core::interface::Mpu6050Interface;
use mpu6050_core::registers::{
    EXPECTED_WHO_AM_I, PWR1_DEVICE_RESET, PWR1_SLEEP, REG_ACCEL_CONFIG, REG_ACCEL_XOUT_H,
    REG_GYRO_CONFIG, REG_PWR_MGMT_1, REG_WHO_AM_I, SAMPLE_BLOCK_LEN, SELF_TEST_ENABLE_MASK,
};

/// One recorded bus transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusOp {
    Read { register: u8 },
    Write { register: u8, value: u8 },
    Block { register: u8, len: usize },
}

#[derive(Debug)]
struct FakeState {
    registers: [u8; 128],
    ops: Vec<BusOp>,
    address: Option<u8>,
    fail_next_read: Option<TransportError>,
    fail_next_block: Option<TransportError>,
    // (register, writes to that register still to pass, error)
    fail_write_to: Option<(u8, usize, TransportError)>,
    short_block: Option<usize>,
    gyro_noise: Vec<i16>,
    noise_idx: usize,
    self_test_response: (i16, i16),
}

impl FakeState {
    fn power_on_registers() -> [u8; 128] {
        let mut registers = [0u8; 128];
        registers[REG_PWR_MGMT_1 as usize] = PWR1_SLEEP;
        registers[REG_WHO_AM_I as usize] = EXPECTED_WHO_AM_I;
        registers
    }

    fn accel_counts_per_g(&self) -> i16 {
        let afs_sel = (self.registers[REG_ACCEL_CONFIG as usize] >> 3) & 0x03;
        16_384 >> afs_sel
    }

    fn gyro_counts_for_125_dps(&self) -> i16 {
        let fs_sel = (self.registers[REG_GYRO_CONFIG as usize] >> 3) & 0x03;
        16_384 >> fs_sel
    }

    fn self_test_active(&self, register: u8) -> bool {
        self.registers[register as usize] & SELF_TEST_ENABLE_MASK != 0
    }

    fn next_noise(&mut self) -> i16 {
        if self.gyro_noise.is_empty() {
            return 0;
        }
        let noise = self.gyro_noise[self.noise_idx];
        self.noise_idx = (self.noise_idx + 1) % self.gyro_noise.len();
        noise
    }

    fn output_block(&mut self) -> [u8; SAMPLE_BLOCK_LEN] {
        let (accel_excite, gyro_excite) = self.self_test_response;
        let accel_bias = if self.self_test_active(REG_ACCEL_CONFIG) { accel_excite } else { 0 };
        let gyro_bias = if self.self_test_active(REG_GYRO_CONFIG) { gyro_excite } else { 0 };
        let noise = self.next_noise();

        let words = [
            accel_bias,
            accel_bias,
            self.accel_counts_per_g() + accel_bias,
            0,
            self.gyro_counts_for_125_dps() + gyro_bias + noise,
            gyro_bias,
            gyro_bias,
        ];

        let mut block = [0u8; SAMPLE_BLOCK_LEN];
        for (chunk, word) in block.chunks_exact_mut(2).zip(words) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }
        self.registers[REG_ACCEL_XOUT_H as usize..][..SAMPLE_BLOCK_LEN].copy_from_slice(&block);
        block
    }
}

/// Cloneable handle to the fake; clones share one register file.
#[derive(Debug, Clone)]
pub struct FakeBus {
    state: Arc<Mutex<FakeState>>,
}

impl FakeBus {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeState {
                registers: FakeState::power_on_registers(),
                ops: Vec::new(),
                address: Some(0x68),
                fail_next_read: None,
                fail_next_block: None,
                fail_write_to: None,
                short_block: None,
                gyro_noise: Vec::new(),
                noise_idx: 0,
                self_test_response: (0, 0),
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn register(&self, register: u8) -> u8 {
        self.state().registers[register as usize]
    }

    pub fn set_register(&self, register: u8, value: u8) {
        self.state().registers[register as usize] = value;
    }

    pub fn set_address(&self, address: Option<u8>) {
        self.state().address = address;
    }

    pub fn ops(&self) -> Vec<BusOp> {
        self.state().ops.clone()
    }

    pub fn clear_ops(&self) {
        self.state().ops.clear();
    }

    pub fn writes(&self) -> Vec<(u8, u8)> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                BusOp::Write { register, value } => Some((register, value)),
                _ => None,
            })
            .collect()
    }

    pub fn fail_next_read(&self, err: TransportError) {
        self.state().fail_next_read = Some(err);
    }

    pub fn fail_next_block(&self, err: TransportError) {
        self.state().fail_next_block = Some(err);
    }

    /// Fails the next write addressed to `register`.
    pub fn fail_write_to(&self, register: u8, err: TransportError) {
        self.fail_nth_write_to(register, 1, err);
    }

    /// Fails the `nth` (1-based) upcoming write addressed to `register`.
    pub fn fail_nth_write_to(&self, register: u8, nth: usize, err: TransportError) {
        self.state().fail_write_to = Some((register, nth.saturating_sub(1), err));
    }

    /// Every block read transfers at most `len` bytes.
    pub fn short_block_reads(&self, len: Option<usize>) {
        self.state().short_block = len;
    }

    /// Values added to gyro X on successive block reads.
    pub fn set_gyro_noise(&self, noise: &[i16]) {
        let mut state = self.state();
        state.gyro_noise = noise.to_vec();
        state.noise_idx = 0;
    }

    /// Counts added to every accel/gyro axis while the self-test bits are set.
    pub fn set_self_test_response(&self, accel: i16, gyro: i16) {
        self.state().self_test_response = (accel, gyro);
    }
}

impl Mpu6050Interface for FakeBus {
    type Error = TransportError;

    fn read_u8(&mut self, register: u8) -> Result<u8, Self::Error> {
        let mut state = self.state();
        state.ops.push(BusOp::Read { register });
        if let Some(err) = state.fail_next_read.take() {
            return Err(err);
        }
        Ok(state.registers[register as usize])
    }

    fn write_u8(&mut self, register: u8, value: u8) -> Result<(), Self::Error> {
        let mut state = self.state();
        state.ops.push(BusOp::Write { register, value });
        if let Some((target, skip, err)) = state.fail_write_to {
            if target == register {
                if skip == 0 {
                    state.fail_write_to = None;
                    return Err(err);
                }
                state.fail_write_to = Some((target, skip - 1, err));
            }
        }

        if register == REG_PWR_MGMT_1 && value & PWR1_DEVICE_RESET != 0 {
            state.registers = FakeState::power_on_registers();
        } else {
            state.registers[register as usize] = value;
        }
        Ok(())
    }

    fn read_block(&mut self, register: u8, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let mut state = self.state();
        state.ops.push(BusOp::Block { register, len: buf.len() });
        if let Some(err) = state.fail_next_block.take() {
            return Err(err);
        }

        if register == REG_ACCEL_XOUT_H {
            state.output_block();
        }
        let len = state.short_block.map_or(buf.len(), |max| max.min(buf.len()));
        let start = register as usize;
        buf[..len].copy_from_slice(&state.registers[start..start + len]);
        Ok(len)
    }

    fn bus_address(&self) -> Option<u8> {
        self.state().address
    }
}
