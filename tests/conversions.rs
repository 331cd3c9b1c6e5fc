use lt8722_rs::registers::{
    CommandField, DAC_LSB, bit_location, code_to_vdac, die_temperature_from_sample,
    negative_current_limit_code, negative_voltage_limit_bits, output_current_from_samples,
    output_voltage_from_samples, positive_current_limit_code, vdac_to_code,
};

#[test]
fn vdac_midpoint_encodes_as_zero() {
    assert_eq!(vdac_to_code(1.25), 0);
}

#[test]
fn vdac_below_midpoint_is_small_positive() {
    // Exactly 100 LSBs below the midpoint.
    assert_eq!(vdac_to_code(1.25 - 100.0 * DAC_LSB), 100);

    let code = vdac_to_code(1.2);
    assert!(code > 0);
    assert!(code < 0x0100_0000);
}

#[test]
fn vdac_above_midpoint_wraps_high() {
    // Two's complement: just above 1.25 V lands near 2^32.
    assert!(vdac_to_code(1.3) > 0xF000_0000);
    assert_eq!(vdac_to_code(1.25 + 100.0 * DAC_LSB), 100u32.wrapping_neg());
}

#[test]
fn vdac_roundtrip_within_one_lsb() {
    for v in [0.5, 1.0, 1.25, 2.0, 2.5] {
        let back = code_to_vdac(vdac_to_code(v));
        assert!((back - v).abs() <= DAC_LSB, "{v} round-tripped to {back}");
    }
}

#[test]
fn current_limit_codes_truncate() {
    // Positive: -((4.5 - 6.8) / 0.01328) = 173.19 -> 173.
    assert_eq!(positive_current_limit_code(4.5), 173);
    // Negative magnitude: 4.5 / 0.01328 = 338.85 -> 338.
    assert_eq!(negative_current_limit_code(4.5), 338);
    // Full positive scale encodes as zero.
    assert_eq!(positive_current_limit_code(6.8), 0);
}

#[test]
fn negative_voltage_limit_is_nibble_complement() {
    assert_eq!(negative_voltage_limit_bits(0x05), 0x0A);
    assert_eq!(negative_voltage_limit_bits(0x00), 0x0F);
    assert_eq!(negative_voltage_limit_bits(0x0F), 0x00);
}

#[test]
fn bit_positions_map_into_big_endian_word() {
    assert_eq!(bit_location(0), (3, 0));
    assert_eq!(bit_location(7), (3, 7));
    assert_eq!(bit_location(8), (2, 0));
    assert_eq!(bit_location(15), (2, 7));
    assert_eq!(bit_location(17), (1, 1));
    assert_eq!(bit_location(31), (0, 7));
}

#[test]
fn command_field_locations_match_datasheet() {
    let fields = [
        (CommandField::EnableRequest, (0, 1)),
        (CommandField::SwitchEnableRequest, (1, 1)),
        (CommandField::FrequencySet, (2, 3)),
        (CommandField::FrequencyAdjust, (5, 2)),
        (CommandField::DutyCycle, (7, 2)),
        (CommandField::LdoSelect, (9, 1)),
        (CommandField::PeakInductorCurrent, (11, 3)),
        (CommandField::SoftReset, (14, 1)),
        (CommandField::PowerLimit, (15, 4)),
    ];
    for (field, location) in fields {
        assert_eq!(field.location(), location, "{field:?}");
    }
}

#[test]
fn monitor_transfer_functions() {
    // Voltage: (1.25 V reference - 0.25 V sense) * 16 = 16 V.
    assert!((output_voltage_from_samples(250, 1250) - 16.0).abs() < 1e-9);
    // Current: (1.65 V reference - 0.65 V sense) * 8 = 8 A.
    assert!((output_current_from_samples(650, 1650) - 8.0).abs() < 1e-9);
    // Temperature: offset/slope pair around 1.421125 V.
    let t = die_temperature_from_sample(1893);
    assert!(t > 100.0 && t < 100.2, "temperature {t}");
}
