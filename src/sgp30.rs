//! SGP30 gas sensor driver.
//!
//! The SGP30 reports equivalent CO2 (ppm) and total VOC (ppb) over I2C. Every
//! command is a 16-bit word written big-endian; after a fixed delay the
//! answer is read back as 16-bit words, each followed by its own CRC-8.
//!
//! The air-quality algorithm runs inside the sensor and expects
//! [`measure`](Sgp30::measure) to be called about once per second after
//! [`init_air_quality`](Sgp30::init_air_quality). Its calibration can be
//! saved with [`get_baseline`](Sgp30::get_baseline) and restored after a
//! power cycle with [`set_baseline`](Sgp30::set_baseline).

use crc::{CRC_8_NRSC_5, Crc};
use embedded_hal::{delay::DelayNs, i2c::I2c};

use crate::error::Sgp30Error;

/// SGP30 I2C address.
pub const SGP30_ADDRESS: u8 = 0x58;

/// Sensirion's CRC-8: polynomial 0x31, init 0xFF, no reflection, no final xor.
const CRC: Crc<u8> = Crc::<u8>::new(&CRC_8_NRSC_5);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u16)]
enum Command {
    InitAirQuality = 0x2003,
    MeasureAirQuality = 0x2008,
    GetBaseline = 0x2015,
    SetBaseline = 0x201E,
}

impl Command {
    fn bytes(self) -> [u8; 2] {
        (self as u16).to_be_bytes()
    }

    /// Milliseconds to wait before the sensor is ready again.
    fn duration_ms(self) -> u32 {
        match self {
            Command::MeasureAirQuality => 12,
            _ => 10,
        }
    }
}

/// One air-quality measurement.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AirQuality {
    /// Equivalent CO2 in parts per million.
    pub co2_ppm: u16,
    /// Total volatile organic compounds in parts per billion.
    pub tvoc_ppb: u16,
}

/// Calibration baseline of the air-quality algorithm.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Baseline {
    /// Raw CO2 baseline word.
    pub co2: u16,
    /// Raw TVOC baseline word.
    pub tvoc: u16,
}

/// Driver for the SGP30 gas sensor.
pub struct Sgp30<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
}

impl<I2C, D, E> Sgp30<I2C, D>
where
    I2C: I2c<Error = E>,
    D: DelayNs,
{
    /// Creates a driver for a sensor at [`SGP30_ADDRESS`].
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self::with_address(i2c, delay, SGP30_ADDRESS)
    }

    /// Creates a driver for a sensor at `address`.
    pub fn with_address(i2c: I2C, delay: D, address: u8) -> Self {
        Sgp30 {
            i2c,
            delay,
            address,
        }
    }

    /// Gives back the bus and the delay provider.
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    /// Starts the on-chip air-quality algorithm.
    ///
    /// The first ~15 seconds of measurements after this read 400 ppm and
    /// 0 ppb while the sensor warms up.
    pub fn init_air_quality(&mut self) -> Result<(), Sgp30Error<E>> {
        self.write(Command::InitAirQuality, &[])
    }

    /// Reads one eCO2/TVOC measurement.
    ///
    /// The sensor expects this once per second to keep its baseline
    /// compensation running.
    pub fn measure(&mut self) -> Result<AirQuality, Sgp30Error<E>> {
        let [co2_ppm, tvoc_ppb] = self.query(Command::MeasureAirQuality)?;
        Ok(AirQuality { co2_ppm, tvoc_ppb })
    }

    /// Reads the current baseline so it can be restored after a power cycle.
    pub fn get_baseline(&mut self) -> Result<Baseline, Sgp30Error<E>> {
        let [co2, tvoc] = self.query(Command::GetBaseline)?;
        Ok(Baseline { co2, tvoc })
    }

    /// Restores a baseline saved with [`get_baseline`](Self::get_baseline).
    ///
    /// The sensor takes the two words in the opposite order from the one it
    /// reports them in: TVOC first, then CO2.
    pub fn set_baseline(&mut self, baseline: Baseline) -> Result<(), Sgp30Error<E>> {
        let [tvoc_hi, tvoc_lo] = baseline.tvoc.to_be_bytes();
        let [co2_hi, co2_lo] = baseline.co2.to_be_bytes();
        self.write(
            Command::SetBaseline,
            &[
                tvoc_hi,
                tvoc_lo,
                crc8(&[tvoc_hi, tvoc_lo]),
                co2_hi,
                co2_lo,
                crc8(&[co2_hi, co2_lo]),
            ],
        )
    }

    /// Sends `command` followed by already CRC-framed `args`, then waits.
    fn write(&mut self, command: Command, args: &[u8]) -> Result<(), Sgp30Error<E>> {
        let mut buf = [0u8; 8];
        let len = 2 + args.len();
        buf[..2].copy_from_slice(&command.bytes());
        buf[2..len].copy_from_slice(args);

        self.i2c.write(self.address, &buf[..len])?;
        self.delay.delay_ms(command.duration_ms());
        Ok(())
    }

    /// Sends `command` and reads back two CRC-checked words.
    fn query(&mut self, command: Command) -> Result<[u16; 2], Sgp30Error<E>> {
        self.write(command, &[])?;

        let mut response = [0u8; 6];
        self.i2c.read(self.address, &mut response)?;

        let mut words = [0u16; 2];
        for (word, chunk) in words.iter_mut().zip(response.chunks_exact(3)) {
            if crc8(&chunk[..2]) != chunk[2] {
                warn!(
                    "sgp30: crc mismatch on {=[u8]:#x}, expected {=u8:#x}",
                    chunk,
                    crc8(&chunk[..2])
                );
                return Err(Sgp30Error::CrcMismatch);
            }
            *word = u16::from_be_bytes([chunk[0], chunk[1]]);
        }
        Ok(words)
    }
}

fn crc8(bytes: &[u8]) -> u8 {
    CRC.checksum(bytes)
}
