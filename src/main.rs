//! Slot Context CLI
//!
//! Usage:
//!   slot-context [OPTIONS] <DOCUMENT>
//!
//! Options:
//!   -s, --slots <FILE>  Slot overrides file (TOML, repeatable, later files win)
//!   --no-defaults       Do not bind the built-in slot defaults
//!   --no-wrapper        Ignore the `wrapper` slot
//!   -v, --verbose       Log provider scopes and merges to stderr
//!   -h, --help          Print help

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::debug;

use slot_context::logging::{init_logging, LoggingConfig};
use slot_context::{context, render_document, Document, Overrides, RenderError, RenderOptions};

#[derive(Parser)]
#[command(name = "slot-context")]
#[command(about = "Render a content document through overridable slot renderers")]
struct Cli {
    /// Document to render (TOML)
    document: PathBuf,

    /// Slot overrides file; may be given several times, later files win
    #[arg(short, long = "slots", value_name = "FILE")]
    slots: Vec<PathBuf>,

    /// Do not bind the built-in slot defaults
    #[arg(long)]
    no_defaults: bool,

    /// Ignore the wrapper slot
    #[arg(long)]
    no_wrapper: bool,

    /// Log provider scopes and merges to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    if let Err(e) = init_logging(&LoggingConfig::new().with_level(level)) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    match run(&cli) {
        Ok(html) => println!("{}", html),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<String, RenderError> {
    let mut slots = Overrides::new();
    for path in &cli.slots {
        let loaded = Overrides::from_file(path)?;
        debug!(
            path = %path.display(),
            name = ?loaded.name,
            entries = loaded.len(),
            "loaded slot overrides"
        );
        slots.extend(loaded);
    }

    let doc = Document::from_file(&cli.document)?;

    let mut options = RenderOptions::new().with_defaults(!cli.no_defaults);
    if cli.no_wrapper {
        options = options.without_wrapper();
    }

    context::provide(&slots, || render_document(&doc, &options))
}
