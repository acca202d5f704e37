//! Build a COBS-framed offset-array packet and print it as hex.
//!
//! Run with:
//!   cargo run --example cobs-build
//!
//! Feed the output back with:
//!   cargo run --features cli -- parse --framing cobs <HEX>

use illuminatir::frame::{cobs_build_offset_array, MAX_COBS_PACKET_SIZE};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut frame = [0u8; MAX_COBS_PACKET_SIZE];
    let values = [11, 22, 33, 44, 55, 66, 77, 88];

    let len = cobs_build_offset_array(&mut frame, 0, &values)?;

    let hex: String = frame[..len].iter().map(|b| format!("{b:02X}")).collect();
    println!("0x{hex}");
    Ok(())
}
