//! Pulse-width samples and bit reconstruction.
//!
//! Every bit the DHT22 sends is a low pulse of roughly constant width
//! followed by a high pulse: ~26-28us for a `0`, ~70us for a `1`. The driver
//! doesn't time pulses in microseconds, it counts polling iterations, so the
//! cutoff between short and long is taken from the low pulses of the same
//! transmission rather than from a fixed constant.

use crate::frame::Frame;

/// Number of low/high windows sampled: one acknowledgement plus 40 data bits.
pub const WINDOWS: usize = 41;

/// Number of pulse counters in a [`PulseTrain`].
pub const PULSE_COUNT: usize = WINDOWS * 2;

const DATA_WINDOWS: usize = WINDOWS - 1;

/// Polling-iteration counts for every pulse of one transmission.
///
/// Even indices hold low pulses, odd indices the high pulse that follows.
/// Window 0 is the sensor's acknowledgement; windows 1 to 40 carry data.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PulseTrain {
    counts: [u32; PULSE_COUNT],
}

impl Default for PulseTrain {
    fn default() -> Self {
        Self::from_counts([0; PULSE_COUNT])
    }
}

impl PulseTrain {
    /// Wraps counts laid out as low, high per window, acknowledgement first.
    pub const fn from_counts(counts: [u32; PULSE_COUNT]) -> Self {
        PulseTrain { counts }
    }

    /// The raw counts in sampling order.
    pub fn counts(&self) -> &[u32; PULSE_COUNT] {
        &self.counts
    }

    /// Iterations spent low at the start of `window`.
    pub fn low(&self, window: usize) -> u32 {
        self.counts[window * 2]
    }

    /// Iterations spent high in `window`.
    pub fn high(&self, window: usize) -> u32 {
        self.counts[window * 2 + 1]
    }

    /// Mean low-pulse width over the 40 data windows.
    ///
    /// The acknowledgement low is ~80us, not the ~50us bit-start marker, so
    /// it is left out of the mean.
    pub fn threshold(&self) -> u32 {
        let sum: u32 = (1..WINDOWS).map(|window| self.low(window)).sum();
        sum / DATA_WINDOWS as u32
    }

    /// Reconstructs the five frame bytes, MSB first.
    ///
    /// A high pulse at least as long as [`threshold`](Self::threshold) is a
    /// `1`. The checksum is not verified here.
    pub fn decode(&self) -> Frame {
        let threshold = self.threshold();
        let mut bytes = [0u8; 5];

        for bit in 0..DATA_WINDOWS {
            let index = bit / 8;
            bytes[index] <<= 1;
            if self.high(bit + 1) >= threshold {
                bytes[index] |= 1;
            }
        }

        Frame::new(bytes)
    }
}
