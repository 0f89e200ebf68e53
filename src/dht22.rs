use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin, PinState},
};

use crate::error::DhtError;
use crate::frame::{Frame, Reading};
use crate::line::{Claim, DataLine};
use crate::pulse::{PULSE_COUNT, PulseTrain};

/// Maximum polling iterations a single wait may take.
///
/// Every wait for the line to change state counts its iterations and gives up
/// with [`DhtError::Timeout`] when the count reaches this value.
pub const MAX_COUNT: u32 = 36_000;

/// How long the line is held high before the start signal, in milliseconds.
pub const WAKE_HIGH_MS: u32 = 500;

/// How long the start signal holds the line low, in milliseconds.
pub const WAKE_LOW_MS: u32 = 20;

/// Spin iterations between claiming the input and the first poll.
pub const SETTLE_SPINS: u32 = 50;

/// Driver for the DHT22 temperature and humidity sensor.
///
/// The driver owns the data line for as long as it lives; use
/// [`release`](Dht22::release) to get it back.
pub struct Dht22<LINE, D> {
    line: LINE,
    delay: D,
}

impl<LINE, DELAY, E> Dht22<LINE, DELAY>
where
    LINE: DataLine<Error = E>,
    DELAY: DelayNs,
{
    /// Creates a new instance of the DHT22 driver.
    ///
    /// # Arguments
    ///
    /// * `line` - The data line the DHT22 is wired to. It is claimed and released per read.
    /// * `delay` - A delay provider implementing the `DelayNs` trait.
    pub fn new(line: LINE, delay: DELAY) -> Self {
        Dht22 { line, delay }
    }

    /// Gives back the data line and the delay provider.
    pub fn release(self) -> (LINE, DELAY) {
        (self.line, self.delay)
    }

    /// Reads a temperature and humidity measurement from the DHT22 sensor.
    ///
    /// This method performs the complete transaction: waking the sensor,
    /// sampling the 41 pulse windows of its answer, decoding the five bytes
    /// and validating the checksum. It blocks for a little over 520 ms.
    ///
    /// See [`read_pulses`](Self::read_pulses) for the state the line is left in.
    ///
    /// # Returns
    ///
    /// * `Ok(Reading)` if the read is successful and the checksum is valid.
    /// * `Err(DhtError)` if a communication or checksum error occurs.
    pub fn read(&mut self) -> Result<Reading, DhtError<E>> {
        let pulses = self.read_pulses()?;
        let frame = pulses.decode();

        if !frame.is_valid() {
            warn!(
                "dht22: checksum mismatch, got {=u8:#x} expected {=u8:#x}",
                frame.checksum(),
                Frame::checksum_for(frame.data())
            );
            return Err(DhtError::ChecksumMismatch);
        }

        let reading = frame.reading();
        debug!("dht22: {}", reading);
        Ok(reading)
    }

    /// Runs the wake sequence and samples the sensor's answer.
    ///
    /// The line idles high for [`WAKE_HIGH_MS`] with interrupts enabled.
    /// Everything from the start of the [`WAKE_LOW_MS`] start signal to the
    /// last sampled edge runs inside a critical section.
    ///
    /// After a successful read, a timeout or a bad pin read the line is left
    /// claimed as an input, and the next call releases and re-claims it. If
    /// the line cannot be claimed or driven it is left released.
    pub fn read_pulses(&mut self) -> Result<PulseTrain, DhtError<E>> {
        self.line.release();

        let mut claim =
            Claim::output(&mut self.line, PinState::High).map_err(DhtError::ClaimFailed)?;
        self.delay.delay_ms(WAKE_HIGH_MS);

        critical_section::with(|_cs| {
            claim.set_low()?;
            self.delay.delay_ms(WAKE_LOW_MS);

            claim.switch_to_input().map_err(DhtError::ClaimFailed)?;
            for _ in 0..SETTLE_SPINS {
                core::hint::spin_loop();
            }

            sample(&mut claim)
        })
    }
}

/// Counts the acknowledgement and the 40 data windows.
fn sample<P: InputPin>(pin: &mut P) -> Result<PulseTrain, DhtError<P::Error>> {
    let mut counts = [0u32; PULSE_COUNT];

    // Sensor pulls the line low to acknowledge
    wait_while(pin, PinState::High)?;

    for pair in counts.chunks_exact_mut(2) {
        pair[0] = wait_while(pin, PinState::Low)?; // bit start, ~50us
        pair[1] = wait_while(pin, PinState::High)?; // ~27us = 0, ~70us = 1
    }

    trace!("dht22: pulses {}", counts);
    Ok(PulseTrain::from_counts(counts))
}

/// Polls `pin` while it reads `level`.
///
/// # Returns
///
/// * `Ok(u32)` with the number of polls that saw `level`
/// * `Err(DhtError::Timeout)` if that number reaches [`MAX_COUNT`]
fn wait_while<P: InputPin>(pin: &mut P, level: PinState) -> Result<u32, DhtError<P::Error>> {
    let mut count = 0;
    while PinState::from(pin.is_high()?) == level {
        count += 1;
        if count >= MAX_COUNT {
            warn!(
                "dht22: line stuck {=str}",
                if level == PinState::High { "high" } else { "low" }
            );
            return Err(DhtError::Timeout);
        }
    }
    Ok(count)
}
