use std::io::stdout;

use bitcrush::{
    BitReader, BitWriter, Word,
    foundation::{used_bits_u64, used_bytes_u64},
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use miette::IntoDiagnostic;
use tracing_subscriber::{EnvFilter, prelude::*};

mod field;

use field::{Field, bytes_to_words, parse_hex, to_hex, words_to_bytes};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Packs fields into bytes and prints them as hex
    Pack(PackArgs),

    /// Decodes hex bytes back into fields
    Unpack(UnpackArgs),

    /// Prints the used bit and byte counts of a value
    Count(CountArgs),
}

#[derive(Args)]
struct PackArgs {
    /// Backing word shape
    #[arg(long, value_enum, default_value_t = WordShape::U8)]
    word: WordShape,

    /// Fields such as u12=5, s32=-129, p16=7, b=true, f=1.5
    #[arg(required = true)]
    fields: Vec<Field>,
}

#[derive(Args)]
struct UnpackArgs {
    /// Backing word shape
    #[arg(long, value_enum, default_value_t = WordShape::U8)]
    word: WordShape,

    /// Packed bytes as hex
    hex: String,

    /// Field kinds such as u12, s32, p16, b, f
    #[arg(required = true)]
    fields: Vec<Field>,
}

#[derive(Args)]
struct CountArgs {
    /// Decimal, or hex with a 0x prefix
    value: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum WordShape {
    U8,
    U16,
    U32,
    U64,
}

fn pack<W: Word>(fields: &[Field]) -> miette::Result<(usize, Vec<u8>)> {
    let capacity: usize = fields.iter().map(|field| field.kind.max_bits()).sum();
    let mut buf = vec![W::default(); capacity.div_ceil(W::BITS)];
    let mut writer = BitWriter::new(&mut buf);

    for field in fields {
        field.encode(&mut writer)?;
        tracing::debug!(
            "packed field; kind={}; position={}",
            field.kind,
            writer.position()
        );
    }

    let written = writer.position();
    Ok((written, words_to_bytes(&buf, written.div_ceil(8))))
}

fn unpack<W: Word>(bytes: &[u8], fields: &[Field]) -> miette::Result<Vec<String>> {
    let words = bytes_to_words::<W>(bytes);
    let mut reader = BitReader::new(&words);

    fields
        .iter()
        .map(|field| -> miette::Result<String> {
            let value = field.decode(&mut reader)?;
            tracing::debug!(
                "unpacked field; kind={}; position={}",
                field.kind,
                reader.position()
            );
            Ok(format!("{} = {value}", field.kind))
        })
        .collect()
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    let file_appender = tracing_appender::rolling::never("target", "bitcrush.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .without_time()
        .with_level(false);

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(stdout)
        .with_ansi(true)
        .without_time()
        .with_level(false);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(file_layer)
        .with(stdout_layer)
        .init();

    match cli.command {
        Commands::Pack(args) => {
            tracing::info!("pack; word={:?}; fields={}", args.word, args.fields.len());
            let (bits, bytes) = match args.word {
                WordShape::U8 => pack::<u8>(&args.fields)?,
                WordShape::U16 => pack::<u16>(&args.fields)?,
                WordShape::U32 => pack::<u32>(&args.fields)?,
                WordShape::U64 => pack::<u64>(&args.fields)?,
            };

            println!("bits: {bits}");
            println!("hex: {}", to_hex(&bytes));
        }
        Commands::Unpack(args) => {
            tracing::info!("unpack; word={:?}; fields={}", args.word, args.fields.len());
            let bytes = parse_hex(&args.hex)?;
            let lines = match args.word {
                WordShape::U8 => unpack::<u8>(&bytes, &args.fields)?,
                WordShape::U16 => unpack::<u16>(&bytes, &args.fields)?,
                WordShape::U32 => unpack::<u32>(&bytes, &args.fields)?,
                WordShape::U64 => unpack::<u64>(&bytes, &args.fields)?,
            };

            for line in lines {
                println!("{line}");
            }
        }
        Commands::Count(args) => {
            let value = match args.value.strip_prefix("0x") {
                Some(hex) => u64::from_str_radix(hex, 16),
                None => args.value.parse(),
            }
            .into_diagnostic()?;

            println!("used bits: {}", used_bits_u64(value));
            println!("used bytes: {}", used_bytes_u64(value));
        }
    }

    Ok(())
}
