//! Averaging of successful readings into flat log records.
//!
//! A logger reads both sensors periodically, feeds every cycle where both
//! reads succeeded into an [`Averager`], and appends a [`LogRecord`] line each
//! time a window completes. Failed cycles are simply not pushed.

use core::fmt;

use crate::frame::Reading;
use crate::sgp30::AirQuality;

/// Readings averaged per log record by default.
pub const PER_LOG: usize = 6;

/// Mean values over one averaging window.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Averages {
    /// Temperature in degrees Celsius.
    pub temperature: f32,
    /// Relative humidity in percent.
    pub humidity: f32,
    /// Equivalent CO2 in ppm.
    pub co2: f32,
    /// Total volatile organic compounds in ppb.
    pub tvoc: f32,
}

/// Accumulates `N` paired readings and yields their mean.
#[derive(Clone, Debug)]
pub struct Averager<const N: usize = PER_LOG> {
    sums: Averages,
    count: usize,
}

impl<const N: usize> Averager<N> {
    /// Creates an empty window.
    ///
    /// An empty window size is rejected at compile time:
    ///
    /// ```compile_fail
    /// let averager = dht22_decoder::Averager::<0>::default();
    /// ```
    pub const fn new() -> Self {
        const { assert!(N > 0, "averaging window must not be empty") };
        Averager {
            sums: Averages {
                temperature: 0.0,
                humidity: 0.0,
                co2: 0.0,
                tvoc: 0.0,
            },
            count: 0,
        }
    }

    /// Adds one cycle's readings.
    ///
    /// Returns the averages and starts a new window when this was the `N`th
    /// push since the last one.
    pub fn push(&mut self, reading: Reading, air: AirQuality) -> Option<Averages> {
        self.sums.temperature += reading.temperature;
        self.sums.humidity += reading.relative_humidity;
        self.sums.co2 += f32::from(air.co2_ppm);
        self.sums.tvoc += f32::from(air.tvoc_ppb);
        self.count += 1;

        if self.count < N {
            return None;
        }

        let n = N as f32;
        let averages = Averages {
            temperature: self.sums.temperature / n,
            humidity: self.sums.humidity / n,
            co2: self.sums.co2 / n,
            tvoc: self.sums.tvoc / n,
        };
        self.reset();
        Some(averages)
    }

    /// Readings collected in the current window.
    pub fn pending(&self) -> usize {
        self.count
    }

    /// Drops the current window.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl<const N: usize> Default for Averager<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// One line of the air log: `timestamp,temperature,humidity,co2,tvoc`.
///
/// The timestamp is Unix seconds; values are written with six decimals. The
/// `Display` output ends with a newline, so records can be appended to a log
/// file as they are.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LogRecord {
    /// Unix time the window closed, in seconds.
    pub timestamp: u64,
    pub averages: Averages,
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Averages {
            temperature,
            humidity,
            co2,
            tvoc,
        } = self.averages;
        writeln!(
            f,
            "{},{temperature:.6},{humidity:.6},{co2:.6},{tvoc:.6}",
            self.timestamp
        )
    }
}
