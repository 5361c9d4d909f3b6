#![deny(missing_docs)]
//! A command-line interface for generating OTP board-info records.

use boardinfo_core::{BoardInfoError, Header, MacAddress, OTP_WORDS, Record, TouchedWord, report};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{error, info};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(
    after_help = "EXAMPLES:\n  \n# Print the programming CSV for a board\notp-boardinfo generate --serial-number 0x12345678 --mac-address 12:34:56:78:9A:BC --board-string XK-AUDIO\n\n# Take the fields from a JSON record file\notp-boardinfo generate --record ./board.json\n\n# Save the raw record, then report it later\notp-boardinfo encode --serial-number 42 --output ./board.bin\notp-boardinfo report --input ./board.bin\n\n# Show the fields stored in a raw record\notp-boardinfo inspect --input ./board.bin"
)]
struct Cli {
    /// Size of the target OTP image in 32-bit words.
    #[arg(long, global = true, value_name = "WORDS", default_value_t = OTP_WORDS)]
    capacity_words: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a record and print the words to program, one CSV line per word
    Generate {
        #[command(flatten)]
        record: RecordArgs,

        /// Output format of the report
        #[arg(long, value_enum, default_value_t = ReportFormat::Csv)]
        format: ReportFormat,
    },
    /// Encode a record and save the raw buffer
    Encode {
        #[command(flatten)]
        record: RecordArgs,

        /// Path to write the encoded record to
        #[arg(short, long, value_name = "OUTPUT_FILE")]
        output: PathBuf,
    },
    /// Print the words to program for a previously encoded record
    Report {
        /// Path to the encoded record
        #[arg(short, long, value_name = "INPUT_FILE")]
        input: PathBuf,

        /// Output format of the report
        #[arg(long, value_enum, default_value_t = ReportFormat::Csv)]
        format: ReportFormat,
    },
    /// Show the fields stored in an encoded record or OTP dump
    Inspect {
        /// Path to the encoded record
        #[arg(short, long, value_name = "INPUT_FILE")]
        input: PathBuf,
    },
}

#[derive(Args)]
struct RecordArgs {
    /// 32-bit serial number
    #[arg(long, value_name = "arg", value_parser = parse_u32)]
    serial_number: Option<u32>,

    /// MAC address(es) (specified in the form 12:34:56:78:9A:BC)
    #[arg(long = "mac-address", value_name = "arg")]
    mac_addresses: Vec<String>,

    /// 32-bit board identifier
    #[arg(long, value_name = "arg", value_parser = parse_u32)]
    board_id: Option<u32>,

    /// Board string
    #[arg(long, value_name = "arg")]
    board_string: Option<String>,

    /// JSON file with record fields. Options given on the command line take precedence.
    #[arg(long, value_name = "RECORD_FILE")]
    record: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ReportFormat {
    /// One `*,0xIII,0xVVVVVVVV` line per word
    Csv,
    /// A JSON array of index/value pairs
    Json,
}

/// What `inspect` prints for a parsed record.
#[derive(Serialize)]
struct Inspection<'a> {
    header: Header,
    record: &'a Record,
}

/// Parses a 32-bit integer, honouring `0x`, `0o` and `0b` prefixes.
///
/// Only digits may follow the prefix, and a decimal number other than zero
/// may not start with `0`.
fn parse_u32(arg: &str) -> Result<u32, String> {
    let (digits, radix) = match arg.get(..2) {
        Some("0x" | "0X") => (&arg[2..], 16),
        Some("0o" | "0O") => (&arg[2..], 8),
        Some("0b" | "0B") => (&arg[2..], 2),
        _ => (arg, 10),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(format!("'{arg}' is not a 32-bit unsigned integer"));
    }
    if radix == 10 && digits.starts_with('0') && digits.chars().any(|c| c != '0') {
        return Err(format!("'{arg}' has a leading zero; use 0o for octal"));
    }
    u32::from_str_radix(digits, radix)
        .map_err(|e| format!("'{arg}' is not a 32-bit unsigned integer: {e}"))
}

fn load_record(path: &Path) -> Record {
    let text = fs::read_to_string(path).unwrap_or_else(|e| {
        error!("Failed to read record file '{}': {e}", path.display());
        process::exit(1);
    });
    serde_json::from_str(&text).unwrap_or_else(|e| {
        error!("Failed to parse record file '{}': {e}", path.display());
        process::exit(1);
    })
}

impl RecordArgs {
    /// Merges the record file (if any) with the fields given on the command line.
    fn resolve(&self) -> Record {
        let mut record = self.record.as_deref().map(load_record).unwrap_or_default();
        if self.serial_number.is_some() {
            record.serial_number = self.serial_number;
        }
        if self.board_id.is_some() {
            record.board_id = self.board_id;
        }
        if self.board_string.is_some() {
            record.board_string.clone_from(&self.board_string);
        }
        if !self.mac_addresses.is_empty() {
            record.mac_addresses = self
                .mac_addresses
                .iter()
                .map(|mac| mac.parse::<MacAddress>())
                .collect::<Result<_, _>>()
                .unwrap_or_else(|e| exit_with(&e));
        }
        record
    }
}

fn exit_with(e: &BoardInfoError) -> ! {
    error!("{e}");
    process::exit(1);
}

fn encode_record(args: &RecordArgs) -> Vec<u8> {
    let record = args.resolve();
    let buffer = record.encode().unwrap_or_else(|e| exit_with(&e));
    info!("Encoded board-info record into {} bytes.", buffer.len());
    buffer
}

fn read_buffer(path: &Path) -> Vec<u8> {
    fs::read(path).unwrap_or_else(|e| {
        error!("Failed to read '{}': {e}", path.display());
        process::exit(1);
    })
}

fn print_report(buffer: &[u8], capacity_words: usize, format: ReportFormat) {
    let touched: Vec<TouchedWord> =
        report::diff(buffer, capacity_words).unwrap_or_else(|e| exit_with(&e));
    info!("{} OTP word(s) to program.", touched.len());
    match format {
        ReportFormat::Csv => print!("{}", report::render(&touched)),
        ReportFormat::Json => match serde_json::to_string_pretty(&touched) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                error!("Failed to serialize report: {e}");
                process::exit(1);
            }
        },
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Generate { record, format } => {
            let buffer = encode_record(record);
            print_report(&buffer, cli.capacity_words, *format);
        }
        Commands::Encode { record, output } => {
            let buffer = encode_record(record);
            if let Err(e) = fs::write(output, &buffer) {
                error!("Failed to write '{}': {e}", output.display());
                process::exit(1);
            }
            info!("Wrote encoded record to '{}'.", output.display());
        }
        Commands::Report { input, format } => {
            let buffer = read_buffer(input);
            print_report(&buffer, cli.capacity_words, *format);
        }
        Commands::Inspect { input } => {
            let buffer = read_buffer(input);
            let (header, record) =
                Record::decode_with_header(&buffer).unwrap_or_else(|e| exit_with(&e));
            let inspection = Inspection {
                header,
                record: &record,
            };
            match serde_json::to_string_pretty(&inspection) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    error!("Failed to serialize record: {e}");
                    process::exit(1);
                }
            }
        }
    }
}
