// src/input.rs
// =============================================================================
// This module reads the URL list from an input stream.
//
// Key functionality:
// - Reads lines until end-of-stream and returns them as-is
// - A read error here is FATAL: the caller aborts before any output
//
// Blank lines are returned too; deciding to skip them is the scheduler's
// policy, not the reader's.
//
// Rust concepts:
// - AsyncBufReadExt: Adds .lines() to async readers
// - Generics over AsyncRead: Tests can feed a byte slice instead of stdin
// =============================================================================

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

// Reads lines from `reader` until EOF.
//
// Generic over the reader so main can pass tokio::io::stdin() while tests
// pass an in-memory byte slice.
pub async fn read_urls<R>(reader: R) -> Result<Vec<String>>
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    let mut urls = Vec::new();

    while let Some(line) = lines
        .next_line()
        .await
        .context("failed to read URL list from input")?
    {
        urls.push(line);
    }

    Ok(urls)
}
