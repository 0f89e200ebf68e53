/// Reading returned by the DHT22 sensor.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reading {
    /// Temperature in degrees Celsius.
    pub temperature: f32,
    /// Relative humidity in percent.
    pub relative_humidity: f32,
}

/// The five bytes of one DHT22 transmission.
///
/// In wire order: humidity high, humidity low, temperature high,
/// temperature low, checksum.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Frame([u8; 5]);

impl Frame {
    /// Wraps five raw bytes as received, checksum included.
    pub const fn new(bytes: [u8; 5]) -> Self {
        Frame(bytes)
    }

    /// Builds a frame from four data bytes, appending their checksum.
    pub fn from_data(data: [u8; 4]) -> Self {
        let [a, b, c, d] = data;
        Frame([a, b, c, d, Self::checksum_for(data)])
    }

    /// The checksum the sensor sends for `data`: the low byte of their sum.
    pub fn checksum_for(data: [u8; 4]) -> u8 {
        data.iter().fold(0u8, |sum, v| sum.wrapping_add(*v))
    }

    /// All five bytes as received.
    pub fn bytes(&self) -> [u8; 5] {
        self.0
    }

    /// The four data bytes, without the checksum.
    pub fn data(&self) -> [u8; 4] {
        let [a, b, c, d, _] = self.0;
        [a, b, c, d]
    }

    /// The checksum byte the sensor sent.
    pub fn checksum(&self) -> u8 {
        self.0[4]
    }

    /// Returns `true` when the checksum byte matches the data bytes.
    pub fn is_valid(&self) -> bool {
        Self::checksum_for(self.data()) == self.checksum()
    }

    /// Converts the data bytes into engineering units.
    ///
    /// The checksum is not looked at; values outside the sensor's physical
    /// range are passed through unchanged.
    pub fn reading(&self) -> Reading {
        let [hum_hi, hum_lo, temp_hi, temp_lo] = self.data();

        let joined_humidity = u16::from_be_bytes([hum_hi, hum_lo]);
        let relative_humidity = joined_humidity as f32 / 10.0;

        let is_temp_negative = (temp_hi >> 7) != 0;
        let temp_hi = temp_hi & 0b0111_1111;
        let joined_temp = u16::from_be_bytes([temp_hi, temp_lo]);
        let mut temperature = joined_temp as f32 / 10.0;
        if is_temp_negative {
            temperature = -temperature;
        }

        Reading {
            temperature,
            relative_humidity,
        }
    }
}
