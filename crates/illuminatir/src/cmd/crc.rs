use illuminatir_packet::crc8;
use serde::Serialize;

use crate::cmd::{decode_hex, CrcArgs};
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_json, print_raw, print_table, OutputFormat};

#[derive(Serialize)]
struct CrcOutput {
    size: usize,
    seed: u8,
    crc: u8,
}

pub fn run(args: CrcArgs, format: OutputFormat) -> CliResult<i32> {
    let input = decode_hex("input", &args.input)?;
    let out = CrcOutput {
        size: input.len(),
        seed: args.seed,
        crc: crc8(&input, args.seed),
    };

    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table => print_table(
            vec!["SIZE", "SEED", "CRC"],
            vec![vec![
                out.size.to_string(),
                format!("{:#04x}", out.seed),
                format!("{:#04x}", out.crc),
            ]],
        ),
        OutputFormat::Pretty => println!(
            "size={} seed={:#04x} crc={:#04x}",
            out.size, out.seed, out.crc
        ),
        OutputFormat::Raw => print_raw(&[out.crc])?,
    }
    Ok(SUCCESS)
}
