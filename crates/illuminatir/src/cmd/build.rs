use illuminatir_frame::{
    cobs_build_config, cobs_build_offset_array, rand_cobs_build_config,
    rand_cobs_build_offset_array, Lfsr127, MAX_COBS_PACKET_SIZE,
};
use illuminatir_packet::{PayloadType, RawPacket, Result};
use serde::Serialize;
use tracing::debug;

use crate::cmd::{BuildCommand, Framing};
use crate::exit::{packet_error, CliResult, SUCCESS};
use crate::output::{print_json, print_raw, print_table, OutputFormat};

#[derive(Serialize)]
struct BuildOutput {
    payload_type: &'static str,
    framing: Framing,
    size: usize,
    bytes: String,
}

pub fn run(command: BuildCommand, format: OutputFormat) -> CliResult<i32> {
    let (kind, framing, bytes) = match command {
        BuildCommand::OffsetArray(args) => {
            let framing = args.framing.framing;
            let bytes = encode(|dst, lfsr| match framing {
                Framing::Raw => copy_raw(dst, RawPacket::offset_array(args.offset, &args.values)?),
                Framing::Cobs => cobs_build_offset_array(dst, args.offset, &args.values),
                Framing::RandCobs => {
                    rand_cobs_build_offset_array(dst, args.offset, &args.values, lfsr)
                }
            })
            .map_err(|err| packet_error("build offset-array", err))?;
            (PayloadType::OffsetArray, framing, bytes)
        }
        BuildCommand::Config(args) => {
            let framing = args.framing.framing;
            let key = args.key.as_bytes();
            let bytes = encode(|dst, lfsr| match framing {
                Framing::Raw => copy_raw(dst, RawPacket::config(key, &args.values)?),
                Framing::Cobs => cobs_build_config(dst, key, &args.values),
                Framing::RandCobs => rand_cobs_build_config(dst, key, &args.values, lfsr),
            })
            .map_err(|err| packet_error("build config", err))?;
            (PayloadType::Config, framing, bytes)
        }
    };

    debug!(
        payload_type = kind.name(),
        framing = framing.name(),
        size = bytes.len(),
        "built packet"
    );

    let out = BuildOutput {
        payload_type: kind.name(),
        framing,
        size: bytes.len(),
        bytes: hex::encode(&bytes),
    };
    print_build(&out, &bytes, format)?;
    Ok(SUCCESS)
}

/// Run a builder against a buffer large enough for any framing.
fn encode(build: impl FnOnce(&mut [u8], &mut Lfsr127) -> Result<usize>) -> Result<Vec<u8>> {
    let mut buf = [0u8; MAX_COBS_PACKET_SIZE];
    let len = build(&mut buf, &mut Lfsr127::default())?;
    Ok(buf[..len].to_vec())
}

fn copy_raw(dst: &mut [u8], packet: RawPacket) -> Result<usize> {
    dst[..packet.len()].copy_from_slice(&packet);
    Ok(packet.len())
}

fn print_build(out: &BuildOutput, bytes: &[u8], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(out),
        OutputFormat::Table => print_table(
            vec!["TYPE", "FRAMING", "SIZE", "BYTES"],
            vec![vec![
                out.payload_type.to_string(),
                out.framing.name().to_string(),
                out.size.to_string(),
                out.bytes.clone(),
            ]],
        ),
        OutputFormat::Pretty => println!(
            "type={} framing={} size={} bytes={}",
            out.payload_type,
            out.framing.name(),
            out.size,
            out.bytes
        ),
        OutputFormat::Raw => print_raw(bytes)?,
    }
    Ok(())
}
