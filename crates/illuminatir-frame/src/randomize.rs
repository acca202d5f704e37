use crate::lfsr::Lfsr127;

/// XOR the LFSR keystream over a single packet, in place.
///
/// The register is seeded from the last byte (the checksum), and every byte
/// between the header and the checksum is whitened. Header and checksum stay
/// as they are, so applying this twice restores the input. Buffers shorter
/// than 3 bytes are left alone.
pub fn randomize(packet: &mut [u8], lfsr: &mut Lfsr127) {
    let len = packet.len();
    if len < 3 {
        return;
    }
    lfsr.reseed(packet[len - 1]);
    for byte in &mut packet[1..len - 1] {
        *byte ^= lfsr.next_byte();
    }
}
