//! Error definitions for the LT8722 driver.

/// Driver error, generic over the SPI transport error.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Eq, PartialEq)]
pub enum Error<SpiError> {
    /// Underlying SPI transaction failed.
    Spi(SpiError),
    /// The device did not answer with the 0xA5 acknowledge byte; it is
    /// desynchronized or not responding. Carries the captured byte.
    Acknowledge(u8),
    /// Acknowledge was valid but the device CRC did not match the locally
    /// computed one; the frame was corrupted on the bus.
    Checksum { received: u8, computed: u8 },
}

impl<SpiError: core::fmt::Debug> core::fmt::Display for Error<SpiError> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Spi(e) => write!(f, "SPI error: {:?}", e),
            Error::Acknowledge(ack) => {
                write!(f, "device acknowledge was {:#04x}, expected 0xA5", ack)
            }
            Error::Checksum { received, computed } => write!(
                f,
                "CRC mismatch: device sent {:#04x}, computed {:#04x}",
                received, computed
            ),
        }
    }
}
