//! A DHT22 handle that can be shared between tasks.
//!
//! Two tasks reading the same sensor must never interleave: a second wake
//! sequence in the middle of sampling corrupts both pulse trains. The lock
//! here is taken once and held for the whole transaction.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::{Mutex, raw::RawMutex};
use embedded_hal::delay::DelayNs;

use crate::dht22::Dht22;
use crate::error::DhtError;
use crate::frame::Reading;
use crate::line::DataLine;

/// A [`Dht22`] behind a blocking mutex.
///
/// Pick `M` the usual `embassy-sync` way: `CriticalSectionRawMutex` when
/// readers run on different threads or interrupt priorities,
/// `NoopRawMutex` when they share one executor.
pub struct SharedDht22<M: RawMutex, LINE, DELAY> {
    inner: Mutex<M, RefCell<Dht22<LINE, DELAY>>>,
}

impl<M, LINE, DELAY, E> SharedDht22<M, LINE, DELAY>
where
    M: RawMutex,
    LINE: DataLine<Error = E>,
    DELAY: DelayNs,
{
    /// Wraps `dht`. Usable in a `static` initializer.
    pub const fn new(dht: Dht22<LINE, DELAY>) -> Self {
        SharedDht22 {
            inner: Mutex::new(RefCell::new(dht)),
        }
    }

    /// Runs one complete [`Dht22::read`] while holding the lock.
    pub fn read(&self) -> Result<Reading, DhtError<E>> {
        self.inner.lock(|dht| dht.borrow_mut().read())
    }

    /// Gives back the wrapped driver.
    pub fn into_inner(self) -> Dht22<LINE, DELAY> {
        self.inner.into_inner().into_inner()
    }
}
