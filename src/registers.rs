//! Register map, command bitfields and unit conversions for the LT8722.
//! Addresses, field positions and transfer functions are taken from the
//! datasheet; all conversions truncate toward zero.

/// Acknowledge byte returned by the device at the final frame position.
pub const ACK: u8 = 0xA5;

/// Device registers (7-bit addresses). The status register is 16 bits wide,
/// all others are 32 bits, transferred most-significant byte first.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum Register {
    /// SPIS_COMMAND: control bits, bit [18-0].
    Command = 0x00,
    /// SPIS_STATUS: latched fault/state flags, bit [10-0]. Read-only.
    Status = 0x01,
    /// SPIS_DAC_ILIMN: negative current limit.
    NegativeCurrentLimit = 0x02,
    /// SPIS_DAC_ILIMP: positive current limit.
    PositiveCurrentLimit = 0x03,
    /// SPIS_DAC: output voltage DAC code.
    OutputVoltage = 0x04,
    /// SPIS_OV_CLAMP: positive output voltage clamp.
    PositiveVoltageLimit = 0x05,
    /// SPIS_UV_CLAMP: negative output voltage clamp.
    NegativeVoltageLimit = 0x06,
    /// SPIS_AMUX: analog output multiplexer control.
    AnalogOutput = 0x07,
}

impl Register {
    /// Raw 7-bit register address.
    pub const fn addr(self) -> u8 {
        self as u8
    }
}

/// Named bitfields of the command register, each a contiguous run of bits
/// addressed by (offset, width).
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CommandField {
    /// ENABLE_REQ: linear power stage enable request.
    EnableRequest,
    /// SWEN_REQ: PWM switch enable request.
    SwitchEnableRequest,
    /// SW_FRQ_SET: PWM switch frequency.
    FrequencySet,
    /// SW_FRQ_ADJ: switch frequency adjustment.
    FrequencyAdjust,
    /// SYS_DC: system duty cycle range.
    DutyCycle,
    /// VCC_VREG: VCC LDO regulation point.
    LdoSelect,
    /// SW_VC_INT: peak inductor current after a BST-SW refresh.
    PeakInductorCurrent,
    /// SPI_RST: soft reset of all registers except status.
    SoftReset,
    /// PWR_LIM: linear power stage MOSFET power limit.
    PowerLimit,
}

impl CommandField {
    /// (bit offset, bit width) of the field inside the command word.
    pub const fn location(self) -> (u8, u8) {
        match self {
            CommandField::EnableRequest => (0, 1),
            CommandField::SwitchEnableRequest => (1, 1),
            CommandField::FrequencySet => (2, 3),
            CommandField::FrequencyAdjust => (5, 2),
            CommandField::DutyCycle => (7, 2),
            CommandField::LdoSelect => (9, 1),
            CommandField::PeakInductorCurrent => (11, 3),
            CommandField::SoftReset => (14, 1),
            CommandField::PowerLimit => (15, 4),
        }
    }
}

/// Analog mux code that outputs the internal 1.25 V reference.
pub const AMUX_REF_1V25: u8 = 0x6;
/// Analog mux code that outputs the internal 1.65 V reference.
pub const AMUX_REF_1V65: u8 = 0x7;

/// Voltage DAC LSB in volts (2.5 V over a 25-bit span).
pub const DAC_LSB: f64 = 2.5 / 33_554_432.0;
/// Current limit DAC LSB in amps.
pub const CURRENT_LIMIT_LSB: f64 = 0.013_28;
/// Positive current limit full-scale offset in amps.
pub const CURRENT_LIMIT_OFFSET: f64 = 6.8;
/// Gain of the output power stage relative to the DAC voltage.
pub const POWER_STAGE_GAIN: f64 = -16.0;

/// Map an LSB-first bit position of a register word to the index of the byte
/// holding it (big-endian word, so bit 0 lives in byte 3) and the bit offset
/// inside that byte.
pub const fn bit_location(bit: u8) -> (usize, u8) {
    (3 - (bit / 8) as usize, bit % 8)
}

/// Encode a DAC input voltage as the 32-bit two's-complement register code.
/// 1.25 V encodes as 0; voltages below 1.25 V give small positive codes,
/// voltages above wrap to codes near 2^32.
pub fn vdac_to_code(voltage: f64) -> u32 {
    ((1.25 - voltage) / DAC_LSB) as i64 as u32
}

/// Decode a 32-bit two's-complement register code back to the DAC voltage.
pub fn code_to_vdac(code: u32) -> f64 {
    1.25 - (code as i32 as f64) * DAC_LSB
}

/// Encode a positive output current limit (amps) as the 16-bit register code.
pub fn positive_current_limit_code(amps: f64) -> u16 {
    (-((amps - CURRENT_LIMIT_OFFSET) / CURRENT_LIMIT_LSB)) as u16
}

/// Encode a negative output current limit magnitude (amps) as the 16-bit
/// register code.
pub fn negative_current_limit_code(amps: f64) -> u16 {
    (amps / CURRENT_LIMIT_LSB) as u16
}

/// Derive the negative-direction clamp bits from a positive-direction
/// voltage limit code: bitwise complement, masked to 4 bits.
pub const fn negative_voltage_limit_bits(code: u8) -> u8 {
    !code & 0x0F
}

/// Output voltage (volts) from two analog mux samples: the selected sense
/// voltage and the 1.25 V reference, both in millivolts. Subtracting the
/// reference cancels the mux offset; the power stage scales by 16.
pub fn output_voltage_from_samples(sense_mv: u16, ref_1p25_mv: u16) -> f64 {
    (ref_1p25_mv as f64 - sense_mv as f64) / 1000.0 * 16.0
}

/// Output current (amps) from the current sense sample and the 1.65 V
/// reference sample, both in millivolts.
pub fn output_current_from_samples(sense_mv: u16, ref_1p65_mv: u16) -> f64 {
    (ref_1p65_mv as f64 - sense_mv as f64) / 1000.0 * 8.0
}

/// Die temperature (degrees Celsius) from the temperature sense sample in
/// millivolts: offset 1.421125 V, slope 4.715 mV/K.
pub fn die_temperature_from_sample(sense_mv: u16) -> f64 {
    (sense_mv as f64 / 1000.0 - 1.421_125) / 0.004_715
}
