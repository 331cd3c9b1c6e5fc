//! CRC-8 for the LT8722 SPI frames.
//!
//! The device protects every transaction with a CRC-8 over the frame header
//! (and, for data frames, the payload): polynomial x^8 + x^2 + x + 1 (0x07),
//! initial value 0x00, no reflection, no output XOR.

const POLYNOMIAL: u8 = 0x07;

const fn build_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u8;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 0x80 != 0 {
                (crc << 1) ^ POLYNOMIAL
            } else {
                crc << 1
            };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

/// 256-entry lookup table, one entry per running-CRC/input-byte combination.
pub const CRC_TABLE: [u8; 256] = build_table();

/// Compute the CRC-8 of `data`, folding left to right from 0x00.
pub fn crc8(data: &[u8]) -> u8 {
    data.iter()
        .fold(0u8, |crc, byte| CRC_TABLE[(crc ^ byte) as usize])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_matches_bitwise_definition() {
        // Spot-check the generated table against the textbook bit loop.
        for input in [0x00u8, 0x01, 0x10, 0x7F, 0x80, 0xF0, 0xFF] {
            let mut crc = input;
            for _ in 0..8 {
                crc = if crc & 0x80 != 0 {
                    (crc << 1) ^ POLYNOMIAL
                } else {
                    crc << 1
                };
            }
            assert_eq!(CRC_TABLE[input as usize], crc);
        }
    }
}
