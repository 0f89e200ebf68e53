use core::fmt;

/// Possible errors from the DHT22 driver.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq)]
pub enum DhtError<E> {
    /// A polling loop hit the iteration ceiling before the line changed state.
    Timeout,
    /// Checksum did not match the received data.
    ChecksumMismatch,
    /// The data line could not be claimed as an input or an output.
    ClaimFailed(E),
    /// Error from the GPIO pin while reading or driving a claimed line.
    PinError(E),
}

impl<E> From<E> for DhtError<E> {
    fn from(value: E) -> Self {
        Self::PinError(value)
    }
}

impl<E: fmt::Debug> fmt::Display for DhtError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => f.write_str("timed out waiting for the data line"),
            Self::ChecksumMismatch => f.write_str("frame checksum mismatch"),
            Self::ClaimFailed(e) => write!(f, "could not claim the data line: {e:?}"),
            Self::PinError(e) => write!(f, "data line error: {e:?}"),
        }
    }
}

impl<E: fmt::Debug> core::error::Error for DhtError<E> {}

/// Possible errors from the SGP30 driver.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq)]
pub enum Sgp30Error<E> {
    /// Error from the I2C bus.
    I2c(E),
    /// A returned word failed its CRC-8 check.
    CrcMismatch,
}

impl<E> From<E> for Sgp30Error<E> {
    fn from(value: E) -> Self {
        Self::I2c(value)
    }
}

impl<E: fmt::Debug> fmt::Display for Sgp30Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I2c(e) => write!(f, "i2c error: {e:?}"),
            Self::CrcMismatch => f.write_str("word crc mismatch"),
        }
    }
}

impl<E: fmt::Debug> core::error::Error for Sgp30Error<E> {}
