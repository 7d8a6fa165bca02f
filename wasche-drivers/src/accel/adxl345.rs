//! ADXL345 3-axis accelerometer (I2C)
//!
//! Runs in full-resolution mode at ±16 g, which fixes the scale at 4 mg/LSB
//! regardless of range. Output data rate is 100 Hz to match the sampling
//! loop.
//!
//! # Bus protocol
//!
//! - Register write: `[reg, value]`
//! - Register read: write `[reg]`, then read; multi-byte reads
//!   auto-increment the register pointer
//! - Axis data: 6 bytes from DATAX0, little-endian `i16` per axis (x, y, z)

use embedded_hal::i2c::I2c;
use wasche_core::analysis::RawSample;
use wasche_core::traits::{Accelerometer, SensorError};

/// I2C address with the ALT ADDRESS pin low
pub const DEFAULT_ADDRESS: u8 = 0x53;

/// Fixed value of the DEVID register
pub const DEVICE_ID: u8 = 0xE5;

/// ADXL345 register addresses
pub mod reg {
    /// Device ID
    pub const DEVID: u8 = 0x00;
    /// Data rate and power mode control
    pub const BW_RATE: u8 = 0x2C;
    /// Power-saving features control
    pub const POWER_CTL: u8 = 0x2D;
    /// Data format control
    pub const DATA_FORMAT: u8 = 0x31;
    /// X-axis data 0; Y and Z follow
    pub const DATAX0: u8 = 0x32;
}

/// Register values written during configuration
pub mod val {
    /// FULL_RES | range ±16 g
    pub const DATA_FORMAT_FULL_RES_16G: u8 = 0x0B;
    /// 100 Hz output data rate, normal power
    pub const BW_RATE_100HZ: u8 = 0x0A;
    /// Measurement mode
    pub const POWER_CTL_MEASURE: u8 = 0x08;
}

/// ADXL345 driver over a blocking I2C bus
pub struct Adxl345<I2C> {
    i2c: I2C,
    address: u8,
    configured: bool,
}

impl<I2C: I2c> Adxl345<I2C> {
    /// Create a driver at the default address
    pub fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            address: DEFAULT_ADDRESS,
            configured: false,
        }
    }

    /// Give back the bus
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// True once the configuration sequence has completed
    pub fn is_configured(&self) -> bool {
        self.configured
    }

    /// Read the DEVID register
    pub fn device_id(&mut self) -> Result<u8, SensorError> {
        self.read_reg(reg::DEVID)
    }

    fn configure(&mut self) -> Result<(), SensorError> {
        self.configured = false;

        self.write_reg(reg::DATA_FORMAT, val::DATA_FORMAT_FULL_RES_16G)?;
        self.write_reg(reg::BW_RATE, val::BW_RATE_100HZ)?;
        // Measurement starts last, once format and rate are set
        self.write_reg(reg::POWER_CTL, val::POWER_CTL_MEASURE)?;

        self.configured = true;
        Ok(())
    }

    fn write_reg(&mut self, register: u8, value: u8) -> Result<(), SensorError> {
        self.i2c
            .write(self.address, &[register, value])
            .map_err(|_| SensorError::Bus)
    }

    fn read_reg(&mut self, register: u8) -> Result<u8, SensorError> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.address, &[register], &mut buf)
            .map_err(|_| SensorError::Bus)?;
        Ok(buf[0])
    }
}

impl<I2C: I2c> Accelerometer for Adxl345<I2C> {
    fn init(&mut self) -> Result<(), SensorError> {
        let id = self.device_id()?;
        if id != DEVICE_ID {
            return Err(SensorError::UnexpectedDeviceId(id));
        }
        self.configure()
    }

    fn read_sample(&mut self) -> Result<RawSample, SensorError> {
        if !self.configured {
            return Err(SensorError::NotReady);
        }

        let mut buf = [0u8; 6];
        self.i2c
            .write_read(self.address, &[reg::DATAX0], &mut buf)
            .map_err(|_| SensorError::Bus)?;

        Ok(RawSample::new(
            i16::from_le_bytes([buf[0], buf[1]]),
            i16::from_le_bytes([buf[2], buf[3]]),
            i16::from_le_bytes([buf[4], buf[5]]),
        ))
    }

    fn test_connection(&mut self) -> bool {
        match self.device_id() {
            // A device that never came up gets configured on the first good probe
            Ok(DEVICE_ID) => self.configured || self.configure().is_ok(),
            _ => false,
        }
    }
}
