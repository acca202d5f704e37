use clap::{Args, Subcommand, ValueEnum};
use serde::Serialize;

use crate::exit::{hex_error, CliResult};
use crate::output::OutputFormat;

pub mod build;
pub mod crc;
pub mod parse;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a packet and print its bytes.
    #[command(subcommand)]
    Build(BuildCommand),
    /// Parse packets and print the channel and config updates they carry.
    Parse(ParseArgs),
    /// Compute the CRC-8/KOOP checksum of some bytes.
    Crc(CrcArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Build(command) => build::run(command, format),
        Command::Parse(args) => parse::run(args, format),
        Command::Crc(args) => crc::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// How packets are wrapped on the wire.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Framing {
    /// Plain packets.
    #[default]
    Raw,
    /// COBS-encoded, without the trailing delimiter.
    Cobs,
    /// LFSR-whitened, then COBS-encoded.
    RandCobs,
}

impl Framing {
    pub fn name(self) -> &'static str {
        match self {
            Framing::Raw => "raw",
            Framing::Cobs => "cobs",
            Framing::RandCobs => "rand-cobs",
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum BuildCommand {
    /// Consecutive channel values starting at an offset.
    OffsetArray(OffsetArrayArgs),
    /// A configuration key with optional value bytes.
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
pub struct FramingArgs {
    /// Wire framing.
    #[arg(long, value_enum, default_value_t, env = "ILLUMINATIR_FRAMING")]
    pub framing: Framing,
}

#[derive(Args, Debug)]
pub struct OffsetArrayArgs {
    /// First channel to set.
    #[arg(long, short = 'o', default_value = "0", value_parser = parse_byte)]
    pub offset: u8,
    /// Channel values (comma-separated, 1 to 16 of them).
    #[arg(long, short = 'v', value_delimiter = ',', required = true, value_parser = parse_byte)]
    pub values: Vec<u8>,
    #[command(flatten)]
    pub framing: FramingArgs,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Configuration key, e.g. Base or MakeDefault.
    #[arg(long, short = 'k')]
    pub key: String,
    /// Value bytes (comma-separated).
    #[arg(long, short = 'v', value_delimiter = ',', value_parser = parse_byte)]
    pub values: Vec<u8>,
    #[command(flatten)]
    pub framing: FramingArgs,
}

#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Packet bytes as hex, optionally prefixed with 0x.
    pub input: String,
    #[command(flatten)]
    pub framing: FramingArgs,
}

#[derive(Args, Debug)]
pub struct CrcArgs {
    /// Bytes as hex, optionally prefixed with 0x.
    pub input: String,
    /// Initial CRC value.
    #[arg(long, default_value = "0", value_parser = parse_byte)]
    pub seed: u8,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Accept decimal (`42`) or hex (`0x2a`) byte values.
pub fn parse_byte(value: &str) -> Result<u8, String> {
    let value = value.trim();
    let parsed = match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => value.parse::<u8>(),
    };
    parsed.map_err(|err| format!("invalid byte value '{value}': {err}"))
}

/// Decode a hex argument; whitespace, `:` separators and a `0x` prefix are ignored.
pub fn decode_hex(context: &str, input: &str) -> CliResult<Vec<u8>> {
    let trimmed = input.trim();
    let trimmed = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let digits: String = trimmed
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':')
        .collect();
    hex::decode(digits).map_err(|err| hex_error(context, err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exit::USAGE;

    #[test]
    fn byte_values_accept_decimal_and_hex() {
        assert_eq!(parse_byte("42"), Ok(42));
        assert_eq!(parse_byte("0x2a"), Ok(42));
        assert_eq!(parse_byte("0XFF"), Ok(255));
        assert!(parse_byte("256").is_err());
        assert!(parse_byte("0xzz").is_err());
    }

    #[test]
    fn hex_input_ignores_separators() {
        assert_eq!(
            decode_hex("input", "0x00 08:2A aa").unwrap(),
            vec![0x00, 0x08, 0x2a, 0xaa]
        );
        assert_eq!(decode_hex("input", "").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn bad_hex_is_a_usage_error() {
        let err = decode_hex("input", "abc").unwrap_err();
        assert_eq!(err.code, USAGE);
    }
}
