use illuminatir_frame::{cobs_parse, rand_cobs_parse, Lfsr127};
use illuminatir_packet::PacketSink;
use serde::Serialize;
use tracing::debug;

use crate::cmd::{decode_hex, Framing, ParseArgs};
use crate::exit::{packet_error, CliResult, SUCCESS};
use crate::output::{key_preview, print_json, print_table, OutputFormat};

#[derive(Serialize, Debug, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "snake_case")]
enum Event {
    Channel { channel: u8, value: u8 },
    Config { key: String, values: String },
}

#[derive(Default)]
struct Collector {
    events: Vec<Event>,
}

impl PacketSink for Collector {
    fn set_channel(&mut self, channel: u8, value: u8) {
        self.events.push(Event::Channel { channel, value });
    }

    fn set_config(&mut self, key: &[u8], values: &[u8]) {
        self.events.push(Event::Config {
            key: key_preview(key),
            values: hex::encode(values),
        });
    }
}

pub fn run(args: ParseArgs, format: OutputFormat) -> CliResult<i32> {
    let input = decode_hex("input", &args.input)?;
    let framing = args.framing.framing;

    let mut collector = Collector::default();
    let result = match framing {
        Framing::Raw => illuminatir_packet::parse(&input, &mut collector),
        Framing::Cobs => cobs_parse(&input, &mut collector),
        Framing::RandCobs => rand_cobs_parse(&input, &mut collector, &mut Lfsr127::default()),
    };
    debug!(
        framing = framing.name(),
        size = input.len(),
        events = collector.events.len(),
        "parsed input"
    );

    // Updates decoded before a bad packet are still reported.
    print_events(&collector.events, format);
    result.map_err(|err| packet_error("parse", err))?;
    Ok(SUCCESS)
}

fn print_events(events: &[Event], format: OutputFormat) {
    match format {
        OutputFormat::Json => events.iter().for_each(print_json),
        OutputFormat::Table => print_table(
            vec!["EVENT", "CHANNEL/KEY", "VALUE"],
            events.iter().map(event_row).collect(),
        ),
        OutputFormat::Pretty => {
            for event in events {
                match event {
                    Event::Channel { channel, value } => {
                        println!("channel={channel} value={value}")
                    }
                    Event::Config { key, values } => println!("config key={key} values={values}"),
                }
            }
        }
        OutputFormat::Raw => {
            for row in events.iter().map(event_row) {
                println!("{}", row.join("\t"));
            }
        }
    }
}

fn event_row(event: &Event) -> Vec<String> {
    match event {
        Event::Channel { channel, value } => {
            vec!["channel".to_string(), channel.to_string(), value.to_string()]
        }
        Event::Config { key, values } => vec!["config".to_string(), key.clone(), values.clone()],
    }
}
