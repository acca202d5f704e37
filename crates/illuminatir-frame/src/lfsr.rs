/// Maximal-length 7-bit linear feedback shift register (period 127).
///
/// Feedback is the XOR of the two lowest register bits, shifted in at bit 6.
/// Each output byte collects eight consecutive low bits, most significant
/// first. A zero seed would lock the register, so it is replaced by 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lfsr127 {
    state: u8,
}

impl Lfsr127 {
    pub fn new(seed: u8) -> Self {
        let mut lfsr = Self { state: 1 };
        lfsr.reseed(seed);
        lfsr
    }

    pub fn reseed(&mut self, seed: u8) {
        self.state = if seed == 0 { 1 } else { seed };
    }

    /// Advance the register by eight steps and return the collected bits.
    pub fn next_byte(&mut self) -> u8 {
        let mut out = 0u8;
        for _ in 0..8 {
            let feedback = (self.state ^ (self.state >> 1)) & 1;
            self.state = (self.state >> 1) | (feedback << 6);
            out = (out << 1) | (self.state & 1);
        }
        out
    }
}

impl Default for Lfsr127 {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Iterator for Lfsr127 {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        Some(self.next_byte())
    }
}
