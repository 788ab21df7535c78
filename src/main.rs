// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Read the URL list from stdin (one per line)
// 3. Run the bounded-concurrency scheduler over the URLs
// 4. Print one line per result plus the total (or JSON with --json)
// 5. Exit with proper code (0 = all fetched, 1 = some fetches failed,
//    2 = fatal error such as a stdin read failure or a bad -k value)
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli; //       src/cli.rs - command-line parsing
mod counter; //   src/counter.rs - pure substring counting
mod fetch; //     src/fetch.rs - Fetcher trait + reqwest implementation
mod input; //     src/input.rs - stdin line reading
mod scheduler; // src/scheduler/ - bounded fan-out/fan-in core

use clap::Parser;
use cli::Cli;

// anyhow::Result is like std::result::Result but simpler for applications
// It lets us return any error type with the ? operator
use anyhow::Result;

use scheduler::TaskResult;

// The substring we count in every response body
const PATTERN: &[u8] = b"Go";

// The #[tokio::main] attribute transforms our async main into a real main
// function. It creates a tokio runtime and runs our async code inside it.
#[tokio::main]
async fn main() {
    // Run our application logic and capture the exit code
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // Fatal error (stdin read failure, bad configuration, ...):
            // print a diagnostic and exit with code 2
            eprintln!("Error: {e:#}");
            2
        }
    };

    std::process::exit(exit_code);
}

// This is the main application logic
// Returns:
//   Ok(0) = every URL fetched and counted
//   Ok(1) = at least one URL failed to fetch
//   Err   = fatal error (reported by main, exit code 2)
async fn run() -> Result<i32> {
    // Parse command-line arguments into our Cli struct
    // This will automatically handle --help, --version, etc.
    let cli = Cli::parse();

    // Read all URLs up front; a read error here is fatal and produces
    // no output at all
    let urls = input::read_urls(tokio::io::stdin()).await?;

    let fetcher = fetch::HttpFetcher::new()?;

    // Fan the URLs out under the concurrency cap. This only returns once
    // every task has finished, so the store below is complete.
    let store = scheduler::run(urls, cli.concurrency, fetcher, |body| {
        counter::count_occurrences(body, PATTERN)
    })
    .await?;

    let (results, total) = store.into_parts();

    print_report(&results, total, cli.json)?;

    // Per-URL errors are data, not failures of the program itself, but
    // they do flip the exit code so CI pipelines can notice
    let failed = results.iter().filter(|r| !r.is_ok()).count();
    if failed > 0 {
        Ok(1)
    } else {
        Ok(0)
    }
}

// Prints the results either as plain lines or JSON
//
// Plain mode matches the classic format:
//   Count for <url>: <n>
//   <url>: Error '<message>'
//   Total: <sum>
fn print_report(results: &[TaskResult], total: usize, json: bool) -> Result<()> {
    if json {
        let report = serde_json::json!({
            "results": results,
            "total": total,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for result in results {
            println!("{result}");
        }
        println!("Total: {total}");
    }
    Ok(())
}
