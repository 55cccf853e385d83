mod logging;

use clap::Parser;
use decodegen::{Backend, EmitConfig, Guard, RangePolicy, Width, compile, load::parse_table_text};
use lazy_static::lazy_static;

use crate::logging::LogLevel;

lazy_static! {
    static ref cli_args: Args = Args::parse();
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, clap::ValueEnum)]
enum WidthArg {
    #[value(name = "16")]
    W16,
    #[value(name = "32")]
    W32,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, clap::ValueEnum)]
enum BackendArg {
    Mask,
    Range,
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path of the template table file.
    path: std::path::PathBuf,

    /// Declared word width of the table.
    #[arg(value_enum, short, long, default_value_t = WidthArg::W16)]
    width: WidthArg,

    /// Guard backend to emit.
    #[arg(value_enum, short, long, default_value_t = BackendArg::Mask)]
    backend: BackendArg,

    /// Emit mask guards for range-hostile patterns instead of aborting.
    #[arg(long, default_value_t = false)]
    range_fallback: bool,

    /// Switch log level.
    #[arg(value_enum, long = "loglevel", default_value_t = LogLevel::Info)]
    log_level: LogLevel,
}

fn main() {
    let _logger_handle = logging::init(cli_args.log_level);

    let width = match cli_args.width {
        WidthArg::W16 => Width::W16,
        WidthArg::W32 => Width::W32,
    };
    let config = EmitConfig {
        backend: match cli_args.backend {
            BackendArg::Mask => Backend::MaskChain,
            BackendArg::Range => Backend::Range,
        },
        range_policy: if cli_args.range_fallback {
            RangePolicy::MaskFallback
        } else {
            RangePolicy::Strict
        },
    };

    let text = match std::fs::read_to_string(&cli_args.path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Failed to read {:?}: {}", cli_args.path, e);
            std::process::exit(1);
        }
    };

    let records = match parse_table_text(&text, width).and_then(|table| compile(table, &config)) {
        Ok(records) => records,
        Err(e) => {
            eprintln!("Compile error: {}", e);
            std::process::exit(1);
        }
    };

    log::info!(
        "compiled {} guard records from {:?}",
        records.len(),
        cli_args.path
    );

    let digits = (width.bits() / 4) as usize;
    for record in &records {
        let fields: String = record.fields.iter().map(|f| f.name).collect();
        match record.guard {
            Guard::Mask { mask, value } => println!(
                "mask  0x{mask:0digits$x} 0x{value:0digits$x} -> {} [{fields}]",
                record.tag
            ),
            Guard::Range { low, high } => println!(
                "range 0x{low:0digits$x}..=0x{high:0digits$x} -> {} [{fields}]",
                record.tag
            ),
        }
    }
}
