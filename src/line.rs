//! Direction claims on the single-wire data line.

use embedded_hal::digital::{ErrorType, InputPin, OutputPin, PinState};

/// A GPIO line that must be claimed for a direction before use.
///
/// This is the capability the DHT22 driver needs on top of the plain
/// [`InputPin`] and [`OutputPin`] traits: on a Linux `gpiod` line (or an MCU
/// flex pin) the direction is requested per transaction and given back
/// afterwards. Level reads are only valid after [`claim_input`], level writes
/// only after [`claim_output`].
///
/// [`claim_input`]: DataLine::claim_input
/// [`claim_output`]: DataLine::claim_output
pub trait DataLine: InputPin + OutputPin {
    /// Drops any current claim. Releasing an unclaimed line does nothing.
    fn release(&mut self);

    /// Claims the line as an output driving `initial`.
    fn claim_output(&mut self, initial: PinState) -> Result<(), Self::Error>;

    /// Claims the line as an input.
    fn claim_input(&mut self) -> Result<(), Self::Error>;
}

impl<T: DataLine + ?Sized> DataLine for &mut T {
    fn release(&mut self) {
        T::release(self)
    }

    fn claim_output(&mut self, initial: PinState) -> Result<(), Self::Error> {
        T::claim_output(self, initial)
    }

    fn claim_input(&mut self) -> Result<(), Self::Error> {
        T::claim_input(self)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    Output,
    Input,
}

/// A direction claim on a [`DataLine`] for one transaction.
///
/// The claim starts out as an output. Dropping it while it is still an
/// output releases the line. Once switched to input it is left in place, so
/// the line stays an input until the next [`DataLine::release`].
pub struct Claim<'a, L: DataLine> {
    line: &'a mut L,
    direction: Direction,
}

impl<'a, L: DataLine> Claim<'a, L> {
    /// Claims `line` as an output driving `initial`.
    pub fn output(line: &'a mut L, initial: PinState) -> Result<Self, L::Error> {
        line.claim_output(initial)?;
        Ok(Self {
            line,
            direction: Direction::Output,
        })
    }

    /// Gives up the output claim and claims the line as an input.
    ///
    /// If the input claim is refused the line is left released.
    pub fn switch_to_input(&mut self) -> Result<(), L::Error> {
        self.line.release();
        self.direction = Direction::Input;
        self.line.claim_input()
    }

    /// Returns `true` once [`switch_to_input`](Self::switch_to_input) was called.
    pub fn is_input(&self) -> bool {
        self.direction == Direction::Input
    }
}

impl<L: DataLine> ErrorType for Claim<'_, L> {
    type Error = L::Error;
}

impl<L: DataLine> OutputPin for Claim<'_, L> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.line.set_low()
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.line.set_high()
    }
}

impl<L: DataLine> InputPin for Claim<'_, L> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.line.is_high()
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.line.is_low()
    }
}

impl<L: DataLine> Drop for Claim<'_, L> {
    fn drop(&mut self) {
        if self.direction == Direction::Output {
            self.line.release();
        }
    }
}
