// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// clap is a popular Rust library for parsing command-line arguments.
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// The surface is tiny: URLs come from stdin, so the only knobs are the
// concurrency cap and the output format.
// =============================================================================

use clap::Parser;

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "go-counter",
    version = "0.1.0",
    about = "Counts 'Go' substrings in URL responses, fetched with bounded concurrency",
    long_about = "go-counter reads URLs from stdin (one per line, blank lines ignored), \
                  fetches each with at most -k requests in flight, and prints one count \
                  or error line per URL plus the aggregate total."
)]
pub struct Cli {
    /// Number of simultaneous fetches
    ///
    /// allow_negative_numbers lets a bad value like -k -3 reach our own
    /// validation, which rejects anything below 1 as a configuration error
    #[arg(
        short = 'k',
        long = "concurrency",
        default_value_t = 5,
        allow_negative_numbers = true
    )]
    pub concurrency: i64,

    /// Output results in JSON format instead of plain lines
    ///
    /// This is an optional flag: --json
    #[arg(long)]
    pub json: bool,
}
