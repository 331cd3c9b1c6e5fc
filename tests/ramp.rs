use embedded_hal_mock::eh1::delay::NoopDelay;
use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTrans};
use lt8722_rs::crc::crc8;
use lt8722_rs::driver::{Lt8722, ramp_plan};
use lt8722_rs::error::Error;
use lt8722_rs::registers::vdac_to_code;

fn spi_op(out: Vec<u8>, response: Vec<u8>) -> Vec<SpiTrans<u8>> {
    vec![
        SpiTrans::transaction_start(),
        SpiTrans::transfer_in_place(out, response),
        SpiTrans::transaction_end(),
    ]
}

fn voltage_write_frame(code: u32) -> Vec<u8> {
    let data = code.to_be_bytes();
    let mut out = vec![0xF2, 0x08, data[0], data[1], data[2], data[3], 0, 0];
    out[6] = crc8(&out[..6]);
    out
}

fn voltage_read_op() -> Vec<SpiTrans<u8>> {
    let out = vec![0xF4, 0x08, crc8(&[0xF4, 0x08]), 0, 0, 0, 0, 0];
    let response = vec![0, 0, 0, 0, 0, 0, crc8(&[0u8; 6]), 0xA5];
    spi_op(out, response)
}

#[test]
fn plan_matches_soft_start_ramp() {
    // |2.5 - 1.25| / 0.01 rounds up to 125 steps, 20 ms / 125 = 160 us each.
    assert_eq!(ramp_plan(2.5, 1.25, 0.01, 20), (125, 160));
}

#[test]
fn plan_degenerates_to_no_op() {
    assert_eq!(ramp_plan(3.0, 3.0, 0.01, 5), (0, 0));
    assert_eq!(ramp_plan(1.0, 2.0, 0.0, 5), (0, 0));
    assert_eq!(ramp_plan(1.0, 2.0, -0.5, 5), (0, 0));
}

#[test]
fn plan_takes_partial_final_step() {
    // 0.25 / 0.1 = 2.5: the partial remainder still needs a step.
    assert_eq!(ramp_plan(0.0, 0.25, 0.1, 30).0, 3);
    // A step larger than the whole span is one step.
    assert_eq!(ramp_plan(0.0, 0.25, 1.0, 30).0, 1);
}

#[test]
fn downward_ramp_issues_every_intermediate_write() {
    let mut expectations = Vec::new();
    let mut current = 2.5f64;
    for _ in 0..125 {
        current -= 0.01;
        expectations.extend(spi_op(
            voltage_write_frame(vdac_to_code(current)),
            vec![0, 0, 0, 0, 0, 0, 0, 0xA5],
        ));
    }
    expectations.extend(voltage_read_op());
    let mock = SpiMock::new(&expectations);
    let mut driver = Lt8722::new(mock, NoopDelay::new());

    let result = driver.ramp_output_voltage(2.5, 1.25, 0.01, 20).unwrap();
    assert_eq!(result.word(), 0);

    let (mut spi, _delay) = driver.free();
    spi.done();
}

#[test]
fn ramp_continues_after_failed_step() {
    // Three-step upward ramp whose first write gets a bad acknowledge: the
    // remaining writes and the settled-value read must still be issued, and
    // the first error is the aggregate report.
    let mut expectations = Vec::new();
    let mut current = 0.0f64;
    for step in 0..3 {
        current += 0.01;
        let response = if step == 0 {
            vec![0, 0, 0, 0, 0, 0, 0, 0x00]
        } else {
            vec![0, 0, 0, 0, 0, 0, 0, 0xA5]
        };
        expectations.extend(spi_op(voltage_write_frame(vdac_to_code(current)), response));
    }
    expectations.extend(voltage_read_op());
    let mock = SpiMock::new(&expectations);
    let mut driver = Lt8722::new(mock, NoopDelay::new());

    let result = driver.ramp_output_voltage(0.0, 0.03, 0.01, 3);
    assert!(matches!(result, Err(Error::Acknowledge(0x00))));

    let (mut spi, _delay) = driver.free();
    spi.done();
}

#[test]
fn degenerate_ramp_performs_zero_writes() {
    // Equal endpoints: no division, no writes, only the settled-value read.
    let expectations = voltage_read_op();
    let mock = SpiMock::new(&expectations);
    let mut driver = Lt8722::new(mock, NoopDelay::new());

    driver.ramp_output_voltage(3.0, 3.0, 0.01, 5).unwrap();

    let (mut spi, _delay) = driver.free();
    spi.done();
}
