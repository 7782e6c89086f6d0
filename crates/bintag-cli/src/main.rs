//! `bintag` CLI — pack, dump, and analyze tagged binary value files.
//!
//! ## Usage
//!
//! ```sh
//! # Author a save file from JSON (stdin → stdout)
//! echo '{"level":1,"scores":[10,20]}' | bintag pack > save.dat
//!
//! # Pack from file to file
//! bintag pack -i save.json -o save.dat
//!
//! # Dump a binary file back to pretty-printed JSON
//! bintag dump -i save.dat
//!
//! # Show size and node statistics
//! bintag stats -i save.dat
//! ```
//!
//! JSON is the authoring surface only: `null` and booleans have no binary
//! counterpart and are rejected at pack time, and integer widths are chosen
//! per the bridge's documented mapping.

use std::io::{self, Read, Write};

use anyhow::{Context, Result};
use bintag_core::Value;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "bintag",
    version,
    about = "Tagged binary value store CLI",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack JSON into the binary format
    Pack {
        /// Input JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Dump a binary file back to pretty-printed JSON
    Dump {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Show size and node statistics for a binary file
    Stats {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Pack { input, output } => {
            let text = read_input_text(input.as_deref())?;
            let json: serde_json::Value =
                serde_json::from_str(&text).context("Input is not valid JSON")?;
            let value = bintag_core::from_json(&json)
                .context("JSON cannot be represented in the binary format")?;
            let bytes = bintag_core::to_bytes(&value).context("Failed to pack value")?;
            write_output_bytes(output.as_deref(), &bytes)?;
        }
        Commands::Dump { input, output } => {
            let bytes = read_input_bytes(input.as_deref())?;
            let value =
                bintag_core::from_bytes(&bytes).context("Failed to decode binary input")?;
            let json = bintag_core::to_json(&value);
            let mut pretty = serde_json::to_string_pretty(&json)?;
            pretty.push('\n');
            write_output_bytes(output.as_deref(), pretty.as_bytes())?;
        }
        Commands::Stats { input } => {
            let bytes = read_input_bytes(input.as_deref())?;
            let value =
                bintag_core::from_bytes(&bytes).context("Failed to decode binary input")?;
            let stats = TreeStats::collect(&value);
            println!("Size:       {} bytes", bytes.len());
            println!("Values:     {}", stats.values);
            println!("Compounds:  {}", stats.compounds);
            println!("Arrays:     {}", stats.arrays);
            println!("Strings:    {}", stats.strings);
            println!("Max depth:  {}", stats.max_depth);
        }
    }

    Ok(())
}

/// Node counts for `stats`. Only tagged values count as nodes — elements of
/// homogeneous arrays are payload, not values.
#[derive(Default)]
struct TreeStats {
    values: usize,
    compounds: usize,
    arrays: usize,
    strings: usize,
    max_depth: usize,
}

impl TreeStats {
    fn collect(root: &Value) -> TreeStats {
        let mut stats = TreeStats::default();
        stats.visit(root, 1);
        stats
    }

    fn visit(&mut self, value: &Value, depth: usize) {
        self.values += 1;
        self.max_depth = self.max_depth.max(depth);
        match value {
            Value::String(_) => self.strings += 1,
            Value::Compound(compound) => {
                self.compounds += 1;
                for (_, child) in compound.iter() {
                    self.visit(child, depth + 1);
                }
            }
            Value::ValueArray(items) => {
                self.arrays += 1;
                for child in items {
                    self.visit(child, depth + 1);
                }
            }
            Value::ByteArray(_)
            | Value::ShortArray(_)
            | Value::IntArray(_)
            | Value::LongArray(_)
            | Value::FloatArray(_)
            | Value::DoubleArray(_)
            | Value::StringArray(_) => self.arrays += 1,
            _ => {}
        }
    }
}

fn read_input_text(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn read_input_bytes(path: Option<&str>) -> Result<Vec<u8>> {
    match path {
        Some(path) => {
            std::fs::read(path).with_context(|| format!("Failed to read file: {path}"))
        }
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output_bytes(path: Option<&str>, content: &[u8]) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {path}"))?;
        }
        None => {
            io::stdout()
                .lock()
                .write_all(content)
                .context("Failed to write to stdout")?;
        }
    }
    Ok(())
}
