//! pybotgram type generator
//!
//! Generates the `pybotgram.types` Python package from the Bot API schema.

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Parser;
use pybotgram_typegen::config::{
    FormatterKind, GeneratorConfig, LINE_LENGTH, RenderOptions, TYPES_PACKAGE,
};
use pybotgram_typegen::errors::GeneratorError;
use pybotgram_typegen::format::formatter_for;
use pybotgram_typegen::output::generate_and_write;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// pybotgram type generator - turns the Bot API schema into Python dataclasses
#[derive(Parser, Debug)]
#[command(name = "pybotgram-typegen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Machine-readable Bot API schema (JSON)
    #[arg(short, long, default_value = "telegram-bot-api-spec/api.min.json")]
    schema: PathBuf,

    /// Directory containing types.txt and init.txt
    #[arg(short, long, default_value = "typegen/templates")]
    templates: PathBuf,

    /// Output directory for the generated package
    #[arg(short, long, default_value = "pybotgram/types")]
    output: PathBuf,

    /// Column limit for docstrings and the formatter
    #[arg(long, default_value_t = LINE_LENGTH)]
    line_length: usize,

    /// Dotted Python package the generated modules import each other from
    #[arg(long, default_value = TYPES_PACKAGE)]
    package: String,

    /// Formatter the generated sources are passed through
    #[arg(long, value_enum, default_value_t = FormatterKind::Black)]
    formatter: FormatterKind,

    /// Emit field types that name undeclared types instead of failing
    #[arg(long)]
    allow_unresolved: bool,

    /// Override a type's file identifier (e.g. --rename ChatID=chat_id)
    #[arg(long, value_name = "TYPE=IDENT", value_parser = parse_rename)]
    rename: Vec<(String, String)>,

    /// Print generated files without writing them
    #[arg(long)]
    dry_run: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_rename(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((type_name, ident)) if !type_name.is_empty() => {
            Ok((type_name.to_string(), ident.to_string()))
        }
        _ => Err(format!("expected TYPE=IDENT, got '{raw}'")),
    }
}

/// Initialize tracing with verbosity-based filtering.
///
/// Warnings are always shown. `RUST_LOG` overrides the mapping.
fn init_tracing(verbose: u8) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            // -v: one line per file written
            1 => "warn,pybotgram_typegen=info".to_string(),
            // -vv: per-type rendering and formatter runs
            2 => "warn,pybotgram_typegen=debug".to_string(),
            _ => "debug,pybotgram_typegen=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(false)
                .with_file(verbose >= 4)
                .with_line_number(verbose >= 4)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn main() -> Result<(), GeneratorError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = GeneratorConfig {
        schema_path: cli.schema,
        template_dir: cli.templates,
        output_dir: cli.output,
        render: RenderOptions {
            line_width: cli.line_length,
            package: cli.package,
        },
        formatter: cli.formatter,
        strict_references: !cli.allow_unresolved,
        naming_exceptions: cli.rename.into_iter().collect::<BTreeMap<_, _>>(),
    };

    let formatter = formatter_for(config.formatter);
    let files = generate_and_write(&config, formatter.as_ref(), cli.dry_run)?;

    if cli.dry_run {
        for file in &files {
            println!("# ---- {} ----", file.file_name);
            println!("{}", file.contents);
        }
    }

    Ok(())
}
