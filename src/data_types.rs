//! Data types for the LT8722 driver: the per-transaction result and the
//! named preset values of the configuration registers (datasheet tables).

/// Captured bytes of one SPI transaction, labeled by the frame codec and
/// validated by the accessor. Transient; produced and consumed per call.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TransactionResult {
    /// Status word, most-significant byte first.
    pub status: [u8; 2],
    /// Register data, most-significant byte first. Zero on status-read
    /// frames, which carry no payload.
    pub data: [u8; 4],
    /// CRC byte the device sent for this frame.
    pub crc: u8,
    /// Acknowledge byte captured at the final position.
    pub ack: u8,
}

impl TransactionResult {
    /// Status register content as a 16-bit word.
    pub fn status_word(&self) -> u16 {
        u16::from_be_bytes(self.status)
    }

    /// Register data as a 32-bit word.
    pub fn word(&self) -> u32 {
        u32::from_be_bytes(self.data)
    }
}

/// Output voltage clamp presets, 1.25 V steps (SPIS_OV_CLAMP codes; the
/// negative clamp register takes the 4-bit complement of these).
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum VoltageLimit {
    V1P25 = 0x00,
    V2P50 = 0x01,
    V3P75 = 0x02,
    V5P00 = 0x03,
    V6P25 = 0x04,
    V7P50 = 0x05,
    V8P75 = 0x06,
    V10P00 = 0x07,
    V11P25 = 0x08,
    V12P50 = 0x09,
    V13P75 = 0x0A,
    V15P00 = 0x0B,
    V16P25 = 0x0C,
    V17P50 = 0x0D,
    V18P75 = 0x0E,
    V20P00 = 0x0F,
}

/// PWM switch frequency presets (SW_FRQ_SET).
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum PwmFrequency {
    Mhz0P5 = 0x0,
    Mhz1P0 = 0x1,
    Mhz1P5 = 0x2,
    Mhz2P0 = 0x3,
    Mhz2P5 = 0x4,
    Mhz3P0 = 0x5,
}

/// Switch frequency adjustment presets (SW_FRQ_ADJ).
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum PwmAdjust {
    Adj0 = 0x0,
    AdjPlus15 = 0x1,
    AdjMinus15 = 0x2,
}

/// System duty cycle range presets (SYS_DC).
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum PwmDutyCycle {
    Duty20To80 = 0x0,
    Duty15To85 = 0x1,
    Duty10To90 = 0x2,
}

/// VCC LDO regulation presets (VCC_VREG).
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum LdoVoltage {
    V3P1 = 0x0,
    V3P4 = 0x1,
}

/// Peak inductor current presets after a BST-SW refresh period (SW_VC_INT).
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum InductorCurrent {
    A0P252 = 0x0,
    A0P594 = 0x1,
    A0P936 = 0x2,
    A1P278 = 0x3,
    A1P620 = 0x4,
    A1P962 = 0x5,
    A2P304 = 0x6,
    A2P646 = 0x7,
}

/// Linear power stage MOSFET power limit presets (PWR_LIM).
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum PowerLimit {
    W2P0 = 0x0,
    NoLimit = 0x5,
    W3P0 = 0xA,
    W3P5 = 0xF,
}

/// Analog output multiplexer selections that map to a monitor quantity.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum AnalogOutput {
    /// Output voltage sense.
    Voltage = 0x3,
    /// Output current sense.
    Current = 0x4,
    /// Die temperature sense.
    Temperature = 0x8,
}

macro_rules! impl_code {
    ($($ty:ty),+ $(,)?) => {
        $(impl $ty {
            /// Raw register code of this preset.
            pub const fn code(self) -> u8 {
                self as u8
            }
        })+
    };
}

impl_code!(
    VoltageLimit,
    PwmFrequency,
    PwmAdjust,
    PwmDutyCycle,
    LdoVoltage,
    InductorCurrent,
    PowerLimit,
    AnalogOutput,
);
