//! Simulated data lines for driver tests.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, ErrorKind, ErrorType, InputPin, OutputPin, PinState};
use embedded_hal_mock::eh1::digital::Mock as PinMock;

use crate::frame::Frame;
use crate::line::DataLine;
use crate::pulse::{PULSE_COUNT, PulseTrain};

/// Polls the line stays high between the input claim and the acknowledgement.
pub const RESPONSE_DELAY: u32 = 20;
pub const ACK_LOW: u32 = 80;
pub const ACK_HIGH: u32 = 80;
/// Bit-start low marker width.
pub const LOW_MARKER: u32 = 50;
/// High pulse for a `0`: half the marker.
pub const ZERO_HIGH: u32 = 25;
/// High pulse for a `1`: one and a half times the marker.
pub const ONE_HIGH: u32 = 75;
/// Low the sensor holds after the last bit before releasing the bus.
pub const TRAILER: u32 = 50;

/// Pulse counts a clean transmission of `frame` would produce.
pub fn encode_frame(frame: Frame) -> PulseTrain {
    let mut counts = [0; PULSE_COUNT];
    counts[0] = ACK_LOW;
    counts[1] = ACK_HIGH;

    for (i, byte) in frame.bytes().iter().enumerate() {
        for bit in 0..8 {
            let window = 1 + i * 8 + bit;
            counts[window * 2] = LOW_MARKER;
            counts[window * 2 + 1] = if byte & (0x80 >> bit) != 0 {
                ONE_HIGH
            } else {
                ZERO_HIGH
            };
        }
    }

    PulseTrain::from_counts(counts)
}

/// Mode changes and writes seen by a simulated line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEvent {
    Released,
    ClaimedOutput(PinState),
    ClaimedInput,
    Set(PinState),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimError {
    NotInput,
    NotOutput,
    Rejected,
}

impl digital::Error for SimError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Released,
    Output,
    Input,
}

/// A line that replays a recorded waveform, one level per poll.
///
/// The waveform restarts every time the line is claimed as an input, the
/// way a real sensor answers every wake sequence. Once it runs out the line
/// reads high, like a released pulled-up bus.
pub struct SimLine {
    segments: Vec<(PinState, u32)>,
    segment: usize,
    consumed: u32,
    mode: Mode,
    events: Vec<LineEvent>,
    reject_claims: bool,
    reject_input_claims: bool,
    polls: u64,
}

impl SimLine {
    /// A line with no sensor attached.
    pub fn idle() -> Self {
        Self::with_segments(Vec::new())
    }

    /// A line that reads `(level, polls)` segments in order.
    pub fn with_segments(segments: Vec<(PinState, u32)>) -> Self {
        SimLine {
            segments,
            segment: 0,
            consumed: 0,
            mode: Mode::Released,
            events: Vec::new(),
            reject_claims: false,
            reject_input_claims: false,
            polls: 0,
        }
    }

    /// A line on which the driver will measure exactly `counts`.
    ///
    /// Every wait loop spends one extra poll seeing the next level, so each
    /// pulse lasts one poll longer than the count it should produce.
    pub fn replaying(counts: &[u32]) -> Self {
        let mut segments = vec![(PinState::High, RESPONSE_DELAY)];
        let mut level = PinState::Low;
        for &count in counts {
            segments.push((level, count + 1));
            level = !level;
        }
        segments.push((level, TRAILER + 1));

        Self::with_segments(segments)
    }

    /// A line on which the sensor sends `frame`.
    pub fn sending(frame: Frame) -> Self {
        Self::replaying(encode_frame(frame).counts())
    }

    pub fn reject_claims(&mut self, reject: bool) {
        self.reject_claims = reject;
    }

    /// Refuses input claims only, so a start signal goes out but nothing is sampled.
    pub fn reject_input_claims(&mut self, reject: bool) {
        self.reject_input_claims = reject;
    }

    pub fn events(&self) -> &[LineEvent] {
        &self.events
    }

    pub fn polls(&self) -> u64 {
        self.polls
    }

    pub fn is_claimed_input(&self) -> bool {
        self.mode == Mode::Input
    }

    fn sample(&mut self) -> PinState {
        self.polls += 1;
        while let Some(&(level, len)) = self.segments.get(self.segment) {
            if self.consumed < len {
                self.consumed += 1;
                return level;
            }
            self.segment += 1;
            self.consumed = 0;
        }
        PinState::High
    }

    fn set(&mut self, level: PinState) -> Result<(), SimError> {
        if self.mode != Mode::Output {
            return Err(SimError::NotOutput);
        }
        self.events.push(LineEvent::Set(level));
        Ok(())
    }
}

impl ErrorType for SimLine {
    type Error = SimError;
}

impl InputPin for SimLine {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        if self.mode != Mode::Input {
            return Err(SimError::NotInput);
        }
        Ok(self.sample() == PinState::High)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.is_high()?)
    }
}

impl OutputPin for SimLine {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set(PinState::Low)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set(PinState::High)
    }
}

impl DataLine for SimLine {
    fn release(&mut self) {
        if self.mode != Mode::Released {
            self.events.push(LineEvent::Released);
            self.mode = Mode::Released;
        }
    }

    fn claim_output(&mut self, initial: PinState) -> Result<(), Self::Error> {
        if self.reject_claims {
            return Err(SimError::Rejected);
        }
        self.mode = Mode::Output;
        self.events.push(LineEvent::ClaimedOutput(initial));
        Ok(())
    }

    fn claim_input(&mut self) -> Result<(), Self::Error> {
        if self.reject_claims || self.reject_input_claims {
            return Err(SimError::Rejected);
        }
        self.mode = Mode::Input;
        self.segment = 0;
        self.consumed = 0;
        self.events.push(LineEvent::ClaimedInput);
        Ok(())
    }
}

/// An `embedded-hal-mock` pin with direction claims recorded alongside.
///
/// Claiming as an output drives the initial level through the mock, so it
/// shows up as a `set` transaction.
pub struct MockLine {
    pin: PinMock,
    events: Vec<LineEvent>,
}

impl MockLine {
    pub fn new(pin: PinMock) -> Self {
        MockLine {
            pin,
            events: Vec::new(),
        }
    }

    pub fn events(&self) -> &[LineEvent] {
        &self.events
    }
}

impl ErrorType for MockLine {
    type Error = <PinMock as ErrorType>::Error;
}

impl InputPin for MockLine {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.pin.is_high()
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.pin.is_low()
    }
}

impl OutputPin for MockLine {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.pin.set_low()
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.pin.set_high()
    }
}

impl DataLine for MockLine {
    fn release(&mut self) {
        self.events.push(LineEvent::Released);
    }

    fn claim_output(&mut self, initial: PinState) -> Result<(), Self::Error> {
        self.events.push(LineEvent::ClaimedOutput(initial));
        self.pin.set_state(initial)
    }

    fn claim_input(&mut self) -> Result<(), Self::Error> {
        self.events.push(LineEvent::ClaimedInput);
        Ok(())
    }
}

/// A delay that records each millisecond wait and whether it ran inside a
/// critical section.
#[derive(Debug, Default)]
pub struct SectionDelay {
    calls: Vec<(u32, bool)>,
}

impl SectionDelay {
    pub fn calls(&self) -> &[(u32, bool)] {
        &self.calls
    }
}

impl DelayNs for SectionDelay {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_ms(&mut self, ms: u32) {
        self.calls.push((ms, in_critical_section()));
    }
}

/// Whether the calling thread holds the critical section.
///
/// With the `std` implementation another thread blocks on entry for as long
/// as this one holds it. Sections held by other tests are short, so a second
/// of waiting only elapses when the caller is the holder.
fn in_critical_section() -> bool {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        critical_section::with(|_cs| {
            let _ = tx.send(());
        })
    });
    rx.recv_timeout(Duration::from_secs(1)).is_err()
}
