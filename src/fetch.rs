// src/fetch.rs
// =============================================================================
// This module is the HTTP transport seam.
//
// Key functionality:
// - Fetcher trait: "give me a URL, I'll give you body bytes or an error"
// - HttpFetcher: the real implementation on top of reqwest
//
// The scheduler only ever talks to the trait. That's what lets the tests
// swap the network out for fakes (canned bodies, forced errors, concurrency
// gauges) without touching the scheduling code at all.
//
// Rust concepts:
// - Traits: Like interfaces; define behavior without fixing the type
// - impl Future in traits: Async methods in traits on stable Rust
// - Send bound: The returned future may hop between runtime threads
// =============================================================================

use anyhow::Result;
use reqwest::Client;
use std::future::Future;
use std::time::Duration;

// The injected transport: fetch a URL, return the raw response body.
//
// Whatever the HTTP status is, a response that arrives is a success here -
// we count substrings in whatever body the server sent. Only transport
// failures (DNS, refused connection, timeout, broken body read) are errors.
pub trait Fetcher: Send + Sync + 'static {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

// The real Fetcher, backed by a shared reqwest Client.
//
// The client is created once and reused for every request (connection
// pooling); cloning it elsewhere is cheap because it's reference counted
// internally.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds the fetcher with a 10 second per-request timeout and a
    /// bounded redirect policy, so one slow server can't wedge its worker
    /// forever in practice
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(HttpFetcher { client })
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?;

        // Note: no status check on purpose. A 404 page still has a body,
        // and we count occurrences in whatever the server returned.
        let body = response.bytes().await?;
        Ok(body.to_vec())
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a trait instead of calling reqwest directly in the scheduler?
//    - The scheduler's job is admission and collection, not HTTP
//    - With a trait seam, tests inject a fake and never hit the network
//
// 2. What does `impl Future<...> + Send` in the trait mean?
//    - An async method, spelled out so we can also require Send
//    - tokio::spawn moves tasks between threads, so futures must be Send
//    - In the impl we can still write it as a plain `async fn`
//
// 3. Why Vec<u8> and not String?
//    - Response bodies aren't guaranteed to be valid UTF-8
//    - The counter scans bytes, so bytes are exactly what it needs
// -----------------------------------------------------------------------------
