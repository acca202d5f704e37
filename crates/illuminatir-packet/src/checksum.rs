//! CRC-8/KOOP packet checksum.
//!
//! Polynomial 0xD5 (0xEA in Koopman notation), MSB first, no reflection and
//! no final XOR. Because there is no final XOR the running value can be fed
//! back in as the seed of the next chunk.

/// Seed for a fresh checksum computation.
pub const CRC8_INITIAL_SEED: u8 = 0;

const POLYNOMIAL: u8 = 0xd5;

const TABLE: [u8; 256] = build_table();

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

/// Compute the checksum of `data`, continuing from `crc`.
///
/// Pass [`CRC8_INITIAL_SEED`] for a fresh computation, or the result of a
/// previous call to extend it over the next chunk.
pub fn crc8(data: &[u8], crc: u8) -> u8 {
    data.iter()
        .fold(crc, |crc, &byte| TABLE[(crc ^ byte) as usize])
}
