//! Parse a single raw packet and print the channel it sets.
//!
//! Run with:
//!   cargo run --example parse-minimal

use illuminatir::packet::{parse, PacketSink};

struct Printer;

impl PacketSink for Printer {
    fn set_channel(&mut self, channel: u8, value: u8) {
        println!("Setting channel {channel} to {value}.");
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Sets channel 8 to 42.
    let packet = [0x00, 8, 42, 0xaa];
    parse(&packet, &mut Printer)?;
    Ok(())
}
