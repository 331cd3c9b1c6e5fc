//! Driver for the LT8722.
//! Blocking SPI accessor plus the composite sequences from the datasheet;
//! the async version mirrors this API behind the `async` feature.

use crate::data_types::{
    AnalogOutput, InductorCurrent, LdoVoltage, PowerLimit, PwmAdjust, PwmDutyCycle, PwmFrequency,
    TransactionResult, VoltageLimit,
};
use crate::error::Error;
use crate::frame::{self, CrcSpan};
use crate::registers::{
    ACK, AMUX_REF_1V25, AMUX_REF_1V65, CommandField, POWER_STAGE_GAIN, Register, bit_location,
    die_temperature_from_sample, negative_current_limit_code, negative_voltage_limit_bits,
    output_current_from_samples, output_voltage_from_samples, positive_current_limit_code,
    vdac_to_code,
};

/// Settling time after changing the analog mux selection.
const ANALOG_SETTLE_MS: u32 = 10;

/// One analog sample of the device's monitor pin, in millivolts. Implemented
/// by whatever ADC channel the VDDIO-referred AOUT pin is wired to.
pub trait AnalogInput {
    fn read_millivolts(&mut self) -> u16;
}

/// Number of ramp steps and the per-step delay in microseconds for a timed
/// voltage ramp. A zero step size or equal endpoints plan zero steps, so the
/// ramp degenerates to a no-op instead of dividing by zero.
pub fn ramp_plan(start: f64, end: f64, step_size: f64, duration_ms: u32) -> (u32, u32) {
    if step_size <= 0.0 || start == end {
        return (0, 0);
    }
    let span = if end > start { end - start } else { start - end };
    let quotient = span / step_size;
    // Ceiling without libm: the last, possibly partial step still runs.
    let mut steps = quotient as u32;
    if (steps as f64) < quotient {
        steps += 1;
    }
    if steps == 0 {
        return (0, 0);
    }
    (steps, duration_ms.saturating_mul(1_000) / steps)
}

/// Apply the acknowledge and CRC checks to a captured frame.
fn validate<E>(result: TransactionResult, span: CrcSpan) -> Result<TransactionResult, Error<E>> {
    if result.ack != ACK {
        return Err(Error::Acknowledge(result.ack));
    }
    let computed = frame::response_crc(&result, span);
    if computed != result.crc {
        return Err(Error::Checksum {
            received: result.crc,
            computed,
        });
    }
    Ok(result)
}

/// LT8722 driver. Owns the SPI device (chip-select framing included) and a
/// delay provider for the ramp pacing and analog mux settling times.
pub struct Lt8722<SPI, D> {
    spi: SPI,
    delay: D,
}

impl<SPI, D> Lt8722<SPI, D> {
    /// Create a new driver instance from an SPI device and a delay provider.
    pub fn new(spi: SPI, delay: D) -> Self {
        Self { spi, delay }
    }

    /// Release the underlying SPI device and delay provider.
    pub fn free(self) -> (SPI, D) {
        (self.spi, self.delay)
    }
}

impl<SPI, D> Lt8722<SPI, D>
where
    SPI: embedded_hal::spi::SpiDevice,
    D: embedded_hal::delay::DelayNs,
{
    /// Read the status register (4-byte frame, no data payload).
    pub fn read_status(&mut self) -> Result<TransactionResult, Error<SPI::Error>> {
        let mut buf = frame::status_read_frame();
        self.spi.transfer_in_place(&mut buf).map_err(Error::Spi)?;
        validate(frame::capture_status_frame(&buf), CrcSpan::Status)
    }

    /// Read a register (8-byte frame).
    pub fn read_register(&mut self, reg: Register) -> Result<TransactionResult, Error<SPI::Error>> {
        let mut buf = frame::register_read_frame(reg.addr());
        self.spi.transfer_in_place(&mut buf).map_err(Error::Spi)?;
        validate(frame::capture_read_frame(&buf), CrcSpan::StatusAndData)
    }

    /// Write four data bytes (most-significant first) to a register.
    pub fn write_register_bytes(
        &mut self,
        reg: Register,
        data: [u8; 4],
    ) -> Result<TransactionResult, Error<SPI::Error>> {
        let mut buf = frame::register_write_frame(reg.addr(), data);
        self.spi.transfer_in_place(&mut buf).map_err(Error::Spi)?;
        validate(frame::capture_write_frame(&buf), CrcSpan::Status)
    }

    /// Write a 32-bit word to a register.
    pub fn write_register(
        &mut self,
        reg: Register,
        word: u32,
    ) -> Result<TransactionResult, Error<SPI::Error>> {
        self.write_register_bytes(reg, word.to_be_bytes())
    }

    /// Replace `num_bits` bits of a register starting at `start_bit` with the
    /// low bits of `value`, leaving all other bits unchanged. Two bus
    /// transactions (read then write), not atomic; callers sharing the bus
    /// must serialize around the whole driver.
    pub fn set_bits(
        &mut self,
        reg: Register,
        start_bit: u8,
        num_bits: u8,
        value: u8,
    ) -> Result<TransactionResult, Error<SPI::Error>> {
        let mut data = self.read_register(reg)?.data;
        for i in 0..num_bits {
            let (byte, offset) = bit_location(start_bit + i);
            if (value >> i) & 0x01 != 0 {
                data[byte] |= 1 << offset;
            } else {
                data[byte] &= !(1 << offset);
            }
        }
        self.write_register_bytes(reg, data)
    }

    /// Update one named bitfield of the command register.
    pub fn set_command_field(
        &mut self,
        field: CommandField,
        value: u8,
    ) -> Result<TransactionResult, Error<SPI::Error>> {
        let (offset, width) = field.location();
        self.set_bits(Register::Command, offset, width, value)
    }

    /// Reset all registers apart from the status register by pulsing the
    /// soft-reset bit. Both writes are issued even if the first fails.
    pub fn reset_all_registers(&mut self) -> Result<(), Error<SPI::Error>> {
        let set = self.set_command_field(CommandField::SoftReset, 1).map(drop);
        let clear = self.set_command_field(CommandField::SoftReset, 0).map(drop);
        set.and(clear)
    }

    /// Clear the latched status register flags.
    pub fn reset_status(&mut self) -> Result<TransactionResult, Error<SPI::Error>> {
        self.write_register(Register::Status, 0)
    }

    /// Reset all registers and clear the status flags.
    pub fn reset(&mut self) -> Result<(), Error<SPI::Error>> {
        let registers = self.reset_all_registers();
        let status = self.reset_status().map(drop);
        registers.and(status)
    }

    /// Soft-start procedure preventing large inrush currents: enable the
    /// linear stage at the 2.5 V DAC midpoint, ramp down to 1.25 V over
    /// 20 ms, then enable the switch. Every step is issued even after an
    /// earlier one failed; the first error is the aggregate report.
    pub fn soft_start(&mut self) -> Result<(), Error<SPI::Error>> {
        let mut outcome = self.reset_all_registers();
        outcome = outcome.and(self.reset_status().map(drop));
        outcome = outcome.and(
            self.set_command_field(CommandField::EnableRequest, 1)
                .map(drop),
        );
        outcome = outcome.and(self.set_dac_voltage(2.5).map(drop));
        outcome = outcome.and(self.reset_status().map(drop));
        self.delay.delay_ms(2);
        outcome = outcome.and(self.ramp_output_voltage(2.5, 1.25, 0.01, 20).map(drop));
        outcome = outcome.and(
            self.set_command_field(CommandField::SwitchEnableRequest, 1)
                .map(drop),
        );
        outcome = outcome.and(self.reset_status().map(drop));
        self.delay.delay_ms(2);
        outcome
    }

    /// Turn the output off by releasing both enable requests, then clear the
    /// status flags.
    pub fn power_off(&mut self) -> Result<(), Error<SPI::Error>> {
        let mut outcome = self
            .set_command_field(CommandField::EnableRequest, 0)
            .map(drop);
        outcome = outcome.and(
            self.set_command_field(CommandField::SwitchEnableRequest, 0)
                .map(drop),
        );
        outcome.and(self.reset_status().map(drop))
    }

    /// Status register content, bit [10-0].
    pub fn get_status(&mut self) -> Result<u16, Error<SPI::Error>> {
        Ok(self.read_status()?.status_word())
    }

    /// Command register content, bit [18-0].
    pub fn get_command(&mut self) -> Result<u32, Error<SPI::Error>> {
        Ok(self.read_register(Register::Command)?.word())
    }

    /// Set the output voltage, referred to the power stage output.
    pub fn set_voltage(&mut self, voltage: f64) -> Result<TransactionResult, Error<SPI::Error>> {
        self.set_dac_voltage(voltage / POWER_STAGE_GAIN + 1.25)
    }

    /// Set the DAC input voltage directly (no power stage gain applied).
    pub fn set_dac_voltage(
        &mut self,
        voltage: f64,
    ) -> Result<TransactionResult, Error<SPI::Error>> {
        self.write_register(Register::OutputVoltage, vdac_to_code(voltage))
    }

    /// Move the DAC voltage linearly from `start` to `end` in `step_size`
    /// increments spread over `duration_ms`, then read back the settled
    /// register. Accumulated floating-point drift is not corrected, so the
    /// final value may differ slightly from `end`. Zero step size or equal
    /// endpoints issue no writes. Best-effort: every step is issued even
    /// after an earlier failure; the first error is the aggregate report.
    pub fn ramp_output_voltage(
        &mut self,
        start: f64,
        end: f64,
        step_size: f64,
        duration_ms: u32,
    ) -> Result<TransactionResult, Error<SPI::Error>> {
        let (steps, delay_us) = ramp_plan(start, end, step_size, duration_ms);
        let mut outcome: Result<(), Error<SPI::Error>> = Ok(());
        let mut current = start;
        for _ in 0..steps {
            if start >= end {
                current -= step_size;
            } else {
                current += step_size;
            }
            outcome = outcome.and(self.set_dac_voltage(current).map(drop));
            self.delay.delay_us(delay_us);
        }
        outcome.and(self.read_register(Register::OutputVoltage))
    }

    /// Set the positive output voltage clamp.
    pub fn set_positive_voltage_limit(
        &mut self,
        limit: VoltageLimit,
    ) -> Result<TransactionResult, Error<SPI::Error>> {
        self.write_register(Register::PositiveVoltageLimit, limit.code() as u32)
    }

    /// Set the negative output voltage clamp. The register takes the 4-bit
    /// complement of the positive-direction code.
    pub fn set_negative_voltage_limit(
        &mut self,
        limit: VoltageLimit,
    ) -> Result<TransactionResult, Error<SPI::Error>> {
        let bits = negative_voltage_limit_bits(limit.code());
        self.write_register(Register::NegativeVoltageLimit, bits as u32)
    }

    /// Set the positive output current limit in amps.
    pub fn set_positive_current_limit(
        &mut self,
        amps: f64,
    ) -> Result<TransactionResult, Error<SPI::Error>> {
        let code = positive_current_limit_code(amps);
        self.write_register(Register::PositiveCurrentLimit, code as u32)
    }

    /// Set the negative output current limit magnitude in amps.
    pub fn set_negative_current_limit(
        &mut self,
        amps: f64,
    ) -> Result<TransactionResult, Error<SPI::Error>> {
        let code = negative_current_limit_code(amps);
        self.write_register(Register::NegativeCurrentLimit, code as u32)
    }

    /// Set the PWM switch frequency.
    pub fn set_pwm_frequency(
        &mut self,
        value: PwmFrequency,
    ) -> Result<TransactionResult, Error<SPI::Error>> {
        self.set_command_field(CommandField::FrequencySet, value.code())
    }

    /// Set the PWM switch frequency adjustment.
    pub fn set_pwm_adjust(
        &mut self,
        value: PwmAdjust,
    ) -> Result<TransactionResult, Error<SPI::Error>> {
        self.set_command_field(CommandField::FrequencyAdjust, value.code())
    }

    /// Set the PWM duty cycle range.
    pub fn set_pwm_duty_cycle(
        &mut self,
        value: PwmDutyCycle,
    ) -> Result<TransactionResult, Error<SPI::Error>> {
        self.set_command_field(CommandField::DutyCycle, value.code())
    }

    /// Set the VCC LDO regulation point.
    pub fn set_ldo_voltage(
        &mut self,
        value: LdoVoltage,
    ) -> Result<TransactionResult, Error<SPI::Error>> {
        self.set_command_field(CommandField::LdoSelect, value.code())
    }

    /// Set the typical peak inductor current after a BST-SW refresh period.
    pub fn set_peak_inductor_current(
        &mut self,
        value: InductorCurrent,
    ) -> Result<TransactionResult, Error<SPI::Error>> {
        self.set_command_field(CommandField::PeakInductorCurrent, value.code())
    }

    /// Set the linear power stage MOSFET power limit.
    pub fn set_power_limit(
        &mut self,
        value: PowerLimit,
    ) -> Result<TransactionResult, Error<SPI::Error>> {
        self.set_command_field(CommandField::PowerLimit, value.code())
    }

    /// Enable the analog output buffer.
    pub fn enable_analog_output(&mut self) -> Result<TransactionResult, Error<SPI::Error>> {
        self.set_bits(Register::AnalogOutput, 6, 1, 0x01)
    }

    /// Disable the analog output buffer.
    pub fn disable_analog_output(&mut self) -> Result<TransactionResult, Error<SPI::Error>> {
        self.set_bits(Register::AnalogOutput, 6, 1, 0x00)
    }

    /// Select which internal signal the analog mux routes to the AOUT pin.
    pub fn select_analog_output(
        &mut self,
        code: u8,
    ) -> Result<TransactionResult, Error<SPI::Error>> {
        self.set_bits(Register::AnalogOutput, 0, 4, code)
    }

    /// Read one monitor quantity through the analog mux. Voltage and current
    /// combine the sense sample with a second sample of the matching internal
    /// reference to cancel the mux offset; temperature uses a single sample.
    /// Best-effort: every step including the final buffer disable is issued
    /// even after an earlier failure; the first error is the aggregate report.
    pub fn read_analog_output<A: AnalogInput>(
        &mut self,
        output: AnalogOutput,
        adc: &mut A,
    ) -> Result<f64, Error<SPI::Error>> {
        let mut outcome = self.enable_analog_output().map(drop);
        outcome = outcome.and(self.select_analog_output(output.code()).map(drop));
        self.delay.delay_ms(ANALOG_SETTLE_MS);
        let sense = adc.read_millivolts();
        let value = match output {
            AnalogOutput::Voltage => {
                outcome = outcome.and(self.select_analog_output(AMUX_REF_1V25).map(drop));
                self.delay.delay_ms(ANALOG_SETTLE_MS);
                let reference = adc.read_millivolts();
                output_voltage_from_samples(sense, reference)
            }
            AnalogOutput::Current => {
                outcome = outcome.and(self.select_analog_output(AMUX_REF_1V65).map(drop));
                self.delay.delay_ms(ANALOG_SETTLE_MS);
                let reference = adc.read_millivolts();
                output_current_from_samples(sense, reference)
            }
            AnalogOutput::Temperature => die_temperature_from_sample(sense),
        };
        outcome = outcome.and(self.disable_analog_output().map(drop));
        outcome.map(|()| value)
    }
}

#[cfg(feature = "async")]
impl<SPI, D> Lt8722<SPI, D>
where
    SPI: embedded_hal_async::spi::SpiDevice,
    D: embedded_hal_async::delay::DelayNs,
{
    /// Async version of [`read_status`](Self::read_status).
    pub async fn read_status_async(&mut self) -> Result<TransactionResult, Error<SPI::Error>> {
        let mut buf = frame::status_read_frame();
        self.spi
            .transfer_in_place(&mut buf)
            .await
            .map_err(Error::Spi)?;
        validate(frame::capture_status_frame(&buf), CrcSpan::Status)
    }

    pub async fn read_register_async(
        &mut self,
        reg: Register,
    ) -> Result<TransactionResult, Error<SPI::Error>> {
        let mut buf = frame::register_read_frame(reg.addr());
        self.spi
            .transfer_in_place(&mut buf)
            .await
            .map_err(Error::Spi)?;
        validate(frame::capture_read_frame(&buf), CrcSpan::StatusAndData)
    }

    pub async fn write_register_bytes_async(
        &mut self,
        reg: Register,
        data: [u8; 4],
    ) -> Result<TransactionResult, Error<SPI::Error>> {
        let mut buf = frame::register_write_frame(reg.addr(), data);
        self.spi
            .transfer_in_place(&mut buf)
            .await
            .map_err(Error::Spi)?;
        validate(frame::capture_write_frame(&buf), CrcSpan::Status)
    }

    pub async fn write_register_async(
        &mut self,
        reg: Register,
        word: u32,
    ) -> Result<TransactionResult, Error<SPI::Error>> {
        self.write_register_bytes_async(reg, word.to_be_bytes())
            .await
    }

    pub async fn set_bits_async(
        &mut self,
        reg: Register,
        start_bit: u8,
        num_bits: u8,
        value: u8,
    ) -> Result<TransactionResult, Error<SPI::Error>> {
        let mut data = self.read_register_async(reg).await?.data;
        for i in 0..num_bits {
            let (byte, offset) = bit_location(start_bit + i);
            if (value >> i) & 0x01 != 0 {
                data[byte] |= 1 << offset;
            } else {
                data[byte] &= !(1 << offset);
            }
        }
        self.write_register_bytes_async(reg, data).await
    }

    pub async fn set_command_field_async(
        &mut self,
        field: CommandField,
        value: u8,
    ) -> Result<TransactionResult, Error<SPI::Error>> {
        let (offset, width) = field.location();
        self.set_bits_async(Register::Command, offset, width, value)
            .await
    }

    pub async fn reset_all_registers_async(&mut self) -> Result<(), Error<SPI::Error>> {
        let set = self
            .set_command_field_async(CommandField::SoftReset, 1)
            .await
            .map(drop);
        let clear = self
            .set_command_field_async(CommandField::SoftReset, 0)
            .await
            .map(drop);
        set.and(clear)
    }

    pub async fn reset_status_async(&mut self) -> Result<TransactionResult, Error<SPI::Error>> {
        self.write_register_async(Register::Status, 0).await
    }

    pub async fn reset_async(&mut self) -> Result<(), Error<SPI::Error>> {
        let registers = self.reset_all_registers_async().await;
        let status = self.reset_status_async().await.map(drop);
        registers.and(status)
    }

    /// Async version of [`soft_start`](Self::soft_start).
    pub async fn soft_start_async(&mut self) -> Result<(), Error<SPI::Error>> {
        let mut outcome = self.reset_all_registers_async().await;
        outcome = outcome.and(self.reset_status_async().await.map(drop));
        outcome = outcome.and(
            self.set_command_field_async(CommandField::EnableRequest, 1)
                .await
                .map(drop),
        );
        outcome = outcome.and(self.set_dac_voltage_async(2.5).await.map(drop));
        outcome = outcome.and(self.reset_status_async().await.map(drop));
        self.delay.delay_ms(2).await;
        outcome = outcome.and(
            self.ramp_output_voltage_async(2.5, 1.25, 0.01, 20)
                .await
                .map(drop),
        );
        outcome = outcome.and(
            self.set_command_field_async(CommandField::SwitchEnableRequest, 1)
                .await
                .map(drop),
        );
        outcome = outcome.and(self.reset_status_async().await.map(drop));
        self.delay.delay_ms(2).await;
        outcome
    }

    pub async fn power_off_async(&mut self) -> Result<(), Error<SPI::Error>> {
        let mut outcome = self
            .set_command_field_async(CommandField::EnableRequest, 0)
            .await
            .map(drop);
        outcome = outcome.and(
            self.set_command_field_async(CommandField::SwitchEnableRequest, 0)
                .await
                .map(drop),
        );
        outcome.and(self.reset_status_async().await.map(drop))
    }

    pub async fn get_status_async(&mut self) -> Result<u16, Error<SPI::Error>> {
        Ok(self.read_status_async().await?.status_word())
    }

    pub async fn get_command_async(&mut self) -> Result<u32, Error<SPI::Error>> {
        Ok(self.read_register_async(Register::Command).await?.word())
    }

    pub async fn set_voltage_async(
        &mut self,
        voltage: f64,
    ) -> Result<TransactionResult, Error<SPI::Error>> {
        self.set_dac_voltage_async(voltage / POWER_STAGE_GAIN + 1.25)
            .await
    }

    pub async fn set_dac_voltage_async(
        &mut self,
        voltage: f64,
    ) -> Result<TransactionResult, Error<SPI::Error>> {
        self.write_register_async(Register::OutputVoltage, vdac_to_code(voltage))
            .await
    }

    /// Async version of [`ramp_output_voltage`](Self::ramp_output_voltage).
    pub async fn ramp_output_voltage_async(
        &mut self,
        start: f64,
        end: f64,
        step_size: f64,
        duration_ms: u32,
    ) -> Result<TransactionResult, Error<SPI::Error>> {
        let (steps, delay_us) = ramp_plan(start, end, step_size, duration_ms);
        let mut outcome: Result<(), Error<SPI::Error>> = Ok(());
        let mut current = start;
        for _ in 0..steps {
            if start >= end {
                current -= step_size;
            } else {
                current += step_size;
            }
            outcome = outcome.and(self.set_dac_voltage_async(current).await.map(drop));
            self.delay.delay_us(delay_us).await;
        }
        outcome.and(self.read_register_async(Register::OutputVoltage).await)
    }

    pub async fn set_positive_voltage_limit_async(
        &mut self,
        limit: VoltageLimit,
    ) -> Result<TransactionResult, Error<SPI::Error>> {
        self.write_register_async(Register::PositiveVoltageLimit, limit.code() as u32)
            .await
    }

    pub async fn set_negative_voltage_limit_async(
        &mut self,
        limit: VoltageLimit,
    ) -> Result<TransactionResult, Error<SPI::Error>> {
        let bits = negative_voltage_limit_bits(limit.code());
        self.write_register_async(Register::NegativeVoltageLimit, bits as u32)
            .await
    }

    pub async fn set_positive_current_limit_async(
        &mut self,
        amps: f64,
    ) -> Result<TransactionResult, Error<SPI::Error>> {
        let code = positive_current_limit_code(amps);
        self.write_register_async(Register::PositiveCurrentLimit, code as u32)
            .await
    }

    pub async fn set_negative_current_limit_async(
        &mut self,
        amps: f64,
    ) -> Result<TransactionResult, Error<SPI::Error>> {
        let code = negative_current_limit_code(amps);
        self.write_register_async(Register::NegativeCurrentLimit, code as u32)
            .await
    }

    pub async fn set_pwm_frequency_async(
        &mut self,
        value: PwmFrequency,
    ) -> Result<TransactionResult, Error<SPI::Error>> {
        self.set_command_field_async(CommandField::FrequencySet, value.code())
            .await
    }

    pub async fn set_pwm_adjust_async(
        &mut self,
        value: PwmAdjust,
    ) -> Result<TransactionResult, Error<SPI::Error>> {
        self.set_command_field_async(CommandField::FrequencyAdjust, value.code())
            .await
    }

    pub async fn set_pwm_duty_cycle_async(
        &mut self,
        value: PwmDutyCycle,
    ) -> Result<TransactionResult, Error<SPI::Error>> {
        self.set_command_field_async(CommandField::DutyCycle, value.code())
            .await
    }

    pub async fn set_ldo_voltage_async(
        &mut self,
        value: LdoVoltage,
    ) -> Result<TransactionResult, Error<SPI::Error>> {
        self.set_command_field_async(CommandField::LdoSelect, value.code())
            .await
    }

    pub async fn set_peak_inductor_current_async(
        &mut self,
        value: InductorCurrent,
    ) -> Result<TransactionResult, Error<SPI::Error>> {
        self.set_command_field_async(CommandField::PeakInductorCurrent, value.code())
            .await
    }

    pub async fn set_power_limit_async(
        &mut self,
        value: PowerLimit,
    ) -> Result<TransactionResult, Error<SPI::Error>> {
        self.set_command_field_async(CommandField::PowerLimit, value.code())
            .await
    }

    pub async fn enable_analog_output_async(
        &mut self,
    ) -> Result<TransactionResult, Error<SPI::Error>> {
        self.set_bits_async(Register::AnalogOutput, 6, 1, 0x01).await
    }

    pub async fn disable_analog_output_async(
        &mut self,
    ) -> Result<TransactionResult, Error<SPI::Error>> {
        self.set_bits_async(Register::AnalogOutput, 6, 1, 0x00).await
    }

    pub async fn select_analog_output_async(
        &mut self,
        code: u8,
    ) -> Result<TransactionResult, Error<SPI::Error>> {
        self.set_bits_async(Register::AnalogOutput, 0, 4, code).await
    }

    /// Async version of [`read_analog_output`](Self::read_analog_output).
    pub async fn read_analog_output_async<A: AnalogInput>(
        &mut self,
        output: AnalogOutput,
        adc: &mut A,
    ) -> Result<f64, Error<SPI::Error>> {
        let mut outcome = self.enable_analog_output_async().await.map(drop);
        outcome = outcome.and(
            self.select_analog_output_async(output.code())
                .await
                .map(drop),
        );
        self.delay.delay_ms(ANALOG_SETTLE_MS).await;
        let sense = adc.read_millivolts();
        let value = match output {
            AnalogOutput::Voltage => {
                outcome = outcome.and(
                    self.select_analog_output_async(AMUX_REF_1V25)
                        .await
                        .map(drop),
                );
                self.delay.delay_ms(ANALOG_SETTLE_MS).await;
                let reference = adc.read_millivolts();
                output_voltage_from_samples(sense, reference)
            }
            AnalogOutput::Current => {
                outcome = outcome.and(
                    self.select_analog_output_async(AMUX_REF_1V65)
                        .await
                        .map(drop),
                );
                self.delay.delay_ms(ANALOG_SETTLE_MS).await;
                let reference = adc.read_millivolts();
                output_current_from_samples(sense, reference)
            }
            AnalogOutput::Temperature => die_temperature_from_sample(sense),
        };
        outcome = outcome.and(self.disable_analog_output_async().await.map(drop));
        outcome.map(|()| value)
    }
}
