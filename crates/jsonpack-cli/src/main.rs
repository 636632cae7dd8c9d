//! `jsonpack` CLI — pack JSON into the compact dictionary format and back.
//!
//! ## Usage
//!
//! ```sh
//! # Pack JSON (stdin → stdout)
//! echo '{"a":1,"b":1}' | jsonpack pack
//!
//! # Pack from file to file
//! jsonpack pack -i data.json -o data.jsonpack
//!
//! # Unpack back to pretty-printed JSON
//! jsonpack unpack -i data.jsonpack
//!
//! # Show compression statistics
//! jsonpack stats -i data.json
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Read};

#[derive(Parser)]
#[command(
    name = "jsonpack",
    version,
    about = "Dictionary-deduplicating compact JSON encoding"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack JSON into the compact dictionary format
    Pack {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Unpack packed text back to JSON
    Unpack {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Show packing statistics (byte counts, reduction ratio)
    Stats {
        /// Input JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Pack { input, output } => {
            let json = read_input(input.as_deref())?;
            let packed = jsonpack_core::pack_json(&json).context("Failed to pack JSON")?;
            write_output(output.as_deref(), &packed)?;
        }
        Commands::Unpack { input, output } => {
            let packed = read_input(input.as_deref())?;
            let json = jsonpack_core::unpack_json(packed.trim_end())
                .context("Failed to unpack input")?;
            // Pretty-print the JSON output
            let value: serde_json::Value = serde_json::from_str(&json)?;
            let pretty = serde_json::to_string_pretty(&value)?;
            write_output(output.as_deref(), &pretty)?;
        }
        Commands::Stats { input } => {
            let json = read_input(input.as_deref())?;
            let packed = jsonpack_core::pack_json(&json).context("Failed to pack JSON")?;
            // compare against minified JSON so whitespace doesn't flatter us
            let value: serde_json::Value = serde_json::from_str(&json)?;
            let minified = serde_json::to_string(&value)?;
            let json_bytes = minified.len();
            let packed_bytes = packed.len();
            let ratio = if json_bytes > 0 {
                (1.0 - (packed_bytes as f64 / json_bytes as f64)) * 100.0
            } else {
                0.0
            };
            println!("JSON size:    {} bytes", json_bytes);
            println!("Packed size:  {} bytes", packed_bytes);
            println!("Reduction:    {:.1}%", ratio);
        }
    }

    Ok(())
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
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

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
