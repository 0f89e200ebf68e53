//! HTML fragments for a small status page.
//!
//! The pages are rendered through [`Display`](core::fmt::Display) so they can
//! be written straight into a response body. Serving them is left to the
//! application; send them with [`CONTENT_TYPE`].

use core::fmt;

use crate::frame::Reading;
use crate::sgp30::{AirQuality, Baseline};

/// Content type of every rendered page.
pub const CONTENT_TYPE: &str = "text/html";

const ERROR_PAGE: &str = "<h2>Error</h2>";

/// The current-conditions page.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StatusPage {
    /// Both sensors answered.
    Current { reading: Reading, air: AirQuality },
    /// At least one of the reads failed.
    Error,
}

impl StatusPage {
    /// Builds the page from one DHT22 read and one SGP30 measurement.
    pub fn from_reads<E1, E2>(
        reading: Result<Reading, E1>,
        air: Result<AirQuality, E2>,
    ) -> Self {
        match (reading, air) {
            (Ok(reading), Ok(air)) => StatusPage::Current { reading, air },
            _ => StatusPage::Error,
        }
    }
}

impl fmt::Display for StatusPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let StatusPage::Current { reading, air } = self else {
            return f.write_str(ERROR_PAGE);
        };
        write!(
            f,
            "<h2>Air quality</h2>\
             <h3>Temperature: {:.6} C</h3>\
             <h3>Humidity: {:.6} %</h3>\
             <h3>CO2: {} ppm</h3>\
             <h3>TVOC: {} ppb</h3>",
            reading.temperature, reading.relative_humidity, air.co2_ppm, air.tvoc_ppb
        )
    }
}

/// The page showing the SGP30's stored baseline.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BaselinePage {
    Stored(Baseline),
    Error,
}

impl<E> From<Result<Baseline, E>> for BaselinePage {
    fn from(baseline: Result<Baseline, E>) -> Self {
        match baseline {
            Ok(baseline) => BaselinePage::Stored(baseline),
            Err(_) => BaselinePage::Error,
        }
    }
}

impl fmt::Display for BaselinePage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaselinePage::Stored(Baseline { co2, tvoc }) => write!(
                f,
                "<h2>Baselines</h2><h3>CO2: {co2}</h3><h3>TVOC: {tvoc}</h3>"
            ),
            BaselinePage::Error => f.write_str(ERROR_PAGE),
        }
    }
}
