//! CLI tool for gridkit - parses a saved clipboard payload and outputs JSON
//!
//! Usage:
//!   gridkit_cli <clipboard.html|clipboard.tsv>              # Output JSON to stdout
//!   gridkit_cli <clipboard.html|clipboard.tsv> -o out.json  # Output JSON to file
//!
//! Files containing a `<table` tag are read as HTML, anything else as
//! tab-separated text.

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Write};

use gridkit::clipboard::{parse_html, parse_plain_text};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: gridkit_cli <clipboard-dump> [-o output.json]");
        std::process::exit(1);
    }

    let input_path = &args[1];
    let output_path = if args.len() > 3 && args[2] == "-o" {
        Some(&args[3])
    } else {
        None
    };

    // Read input file
    let text = match fs::read_to_string(input_path) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error reading {}: {}", input_path, e);
            std::process::exit(1);
        }
    };

    // Parse as HTML when it looks like a table, otherwise as TSV
    let rows = if text.to_ascii_lowercase().contains("<table") {
        match parse_html(&text) {
            Ok(Some(rows)) => rows,
            Ok(None) => Vec::new(),
            Err(e) => {
                eprintln!("Error parsing HTML: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        parse_plain_text(&text)
    };

    // Serialize to JSON
    let json = match serde_json::to_string_pretty(&rows) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error serializing JSON: {}", e);
            std::process::exit(1);
        }
    };

    // Output
    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(path, &json) {
                eprintln!("Error writing {}: {}", path, e);
                std::process::exit(1);
            }
            eprintln!("Written: {} ({} rows)", path, rows.len());
        }
        None => {
            io::stdout().write_all(json.as_bytes()).unwrap();
            println!();
        }
    }
}
