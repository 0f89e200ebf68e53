//! DHT22 Pulse-Width Decoder for Embedded Rust
//!
//! This crate reads the DHT22 (AM2302) temperature and humidity sensor by
//! counting how long its single data line stays low and high, then rebuilding
//! the 40-bit frame from the relative pulse widths. It is built on top of the
//! [`embedded-hal`] traits and works the same on an MCU pin or a Linux
//! `gpiod` line.
//!
//! # Features
//! - Blocking synchronous API using `embedded-hal` traits
//! - Adaptive bit threshold taken from each transmission's own timing
//! - Bounded waits: every polling loop gives up after [`MAX_COUNT`] iterations
//! - A lock-held-for-the-whole-transaction handle for sharing one sensor
//! - A companion driver for the SGP30 gas sensor and a log-record averager
//! - HTML status and baseline pages rendered through `Display`
//! - Designed for `no_std` environments
//! - Optional logging support via `defmt`
//!
//! # Dependencies
//! The DHT22 driver needs:
//! - A [`DataLine`]: an [`InputPin`] + [`OutputPin`] whose direction is claimed per read
//! - [`DelayNs`] for the wake sequence
//!
//! # Optional Features
//! - `defmt`: Implements `defmt::Format` and logs timeouts and checksum failures
//!
//! # Example
//!
//! ```ignore
//! let mut dht = Dht22::new(line, delay);
//! match dht.read() {
//!     Ok(Reading { temperature, relative_humidity }) => { /* ... */ }
//!     Err(DhtError::Timeout | DhtError::ChecksumMismatch) => { /* retry next cycle */ }
//!     Err(e) => { /* line unavailable */ }
//! }
//! ```
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal
//! [`InputPin`]: embedded_hal::digital::InputPin
//! [`OutputPin`]: embedded_hal::digital::OutputPin
//! [`DelayNs`]: embedded_hal::delay::DelayNs

#![cfg_attr(not(test), no_std)]

// This mod MUST go first, so that the others see its macros.
mod fmt;

pub mod averager;
pub mod dht22;
pub mod error;
pub mod frame;
pub mod line;
pub mod pulse;
pub mod sgp30;
pub mod shared;
pub mod status;

#[cfg(test)]
mod testing;

pub use averager::{Averager, Averages, LogRecord};
pub use dht22::{Dht22, MAX_COUNT};
pub use error::{DhtError, Sgp30Error};
pub use frame::{Frame, Reading};
pub use line::{Claim, DataLine};
pub use pulse::PulseTrain;
pub use sgp30::{AirQuality, Baseline, Sgp30};
pub use shared::SharedDht22;
pub use status::{BaselinePage, StatusPage};
